//! Scene content and progression

pub mod book;
pub mod manager;

pub use book::{EnemySpawn, SceneBook, SceneDef, SceneryDef};
pub use manager::{SceneManager, SceneState};
