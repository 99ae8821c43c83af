//! Enemy decision making

pub mod fsm;

pub use fsm::{step, AiAction, Decision, Senses};
