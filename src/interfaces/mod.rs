//! Narrow contracts to the collaborators around the simulation core

pub mod input;
pub mod map;
pub mod render;

pub use input::{GameKey, InputQueue, KeyEvent};
pub use map::{MapView, OpenArena};
pub use render::{DrawCommand, RenderQueue, RenderSink, TextCanvas};
