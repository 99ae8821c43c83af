//! Entity-component store shared by all processors

pub mod store;

pub use store::{Component, Store};
