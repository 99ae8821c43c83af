//! N Key Rollover - frame simulation core of a terminal action game
//!
//! An entity-component store, a frame-scoped broadcast bus, a persistent
//! addressed mailbox and a fixed pipeline of processors that run once per
//! frame. Rendering, input and scene content sit behind the narrow traits
//! in [`interfaces`] and [`scene`].

pub mod ai;
pub mod components;
pub mod core;
pub mod ecs;
pub mod interfaces;
pub mod messaging;
pub mod particles;
pub mod pipeline;
pub mod processors;
pub mod scene;

pub use crate::core::{GameConfig, Result, SimError};
pub use pipeline::{Game, GameSummary, ProcessorId, PIPELINE_ORDER};
