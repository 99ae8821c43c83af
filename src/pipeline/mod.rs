//! Frame pipeline: processor order, per-frame context and the driver

pub mod context;
pub mod game;
pub mod order;

pub use context::{FrameContext, GameClock, GameState, Processor};
pub use game::{FrameReport, Game, GameSummary};
pub use order::{ProcessorId, PIPELINE_ORDER};
