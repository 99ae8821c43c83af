pub mod config;
pub mod error;
pub mod kinds;
pub mod types;

pub use config::GameConfig;
pub use error::{Result, SimError};
pub use kinds::{EnemyKind, SkillKind, WeaponKind};
pub use types::{Color, Direction, EntityId, Frame, Rect, Vec2};
