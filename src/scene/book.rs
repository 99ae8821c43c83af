//! Static scene content
//!
//! Scene definitions are loaded once at startup, either from TOML or from
//! the built-in campaign, and never change while the game runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::kinds::EnemyKind;
use crate::core::types::Vec2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub pos: Vec2,
}

/// A decoration glyph placed by the environment processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneryDef {
    pub glyph: char,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    pub name: String,
    pub player_spawn: Vec2,
    /// Walking past this x coordinate after clearing the scene moves on
    pub exit_x: f32,
    /// Speech bubble shown on the player when the scene starts
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub scenery: Vec<SceneryDef>,
}

/// Ordered list of scenes making up a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneBook {
    #[serde(rename = "scene")]
    pub scenes: Vec<SceneDef>,
}

impl SceneBook {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let book = Self::from_toml(&content)?;
        tracing::info!("Loaded {} scenes from {}", book.len(), path.display());
        Ok(book)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let book: SceneBook = toml::from_str(content)?;
        if book.scenes.is_empty() {
            return Err(SimError::InvalidConfig("scene book has no scenes".into()));
        }
        Ok(book)
    }

    pub fn get(&self, index: usize) -> Result<&SceneDef> {
        self.scenes
            .get(index)
            .ok_or_else(|| SimError::UnknownScene(format!("index {}", index)))
    }

    pub fn find(&self, name: &str) -> Result<usize> {
        self.scenes
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| SimError::UnknownScene(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl Default for SceneBook {
    /// Built-in three scene campaign
    fn default() -> Self {
        let enemy = |kind, x, y| EnemySpawn { kind, pos: Vec2::new(x, y) };
        let deco = |glyph, x, y| SceneryDef { glyph, pos: Vec2::new(x, y) };

        Self {
            scenes: vec![
                SceneDef {
                    name: "Village".into(),
                    player_spawn: Vec2::new(50.0, 250.0),
                    exit_x: 760.0,
                    intro: Some("WASD to move, space to attack".into()),
                    enemies: vec![
                        enemy(EnemyKind::StickFigure, 400.0, 200.0),
                        enemy(EnemyKind::StickFigure, 500.0, 300.0),
                        enemy(EnemyKind::StickFigure, 600.0, 240.0),
                    ],
                    scenery: vec![deco('^', 120.0, 80.0), deco('^', 300.0, 420.0), deco('#', 680.0, 60.0)],
                },
                SceneDef {
                    name: "Meadow".into(),
                    player_spawn: Vec2::new(50.0, 250.0),
                    exit_x: 760.0,
                    intro: Some("Cows. Why is it always cows".into()),
                    enemies: vec![
                        enemy(EnemyKind::Cow, 350.0, 150.0),
                        enemy(EnemyKind::Cow, 450.0, 350.0),
                        enemy(EnemyKind::Rambo, 650.0, 250.0),
                    ],
                    scenery: vec![deco('"', 200.0, 100.0), deco('"', 520.0, 440.0)],
                },
                SceneDef {
                    name: "Lair".into(),
                    player_spawn: Vec2::new(50.0, 250.0),
                    exit_x: 760.0,
                    intro: Some("Something big lives here".into()),
                    enemies: vec![
                        enemy(EnemyKind::StickFigure, 300.0, 200.0),
                        enemy(EnemyKind::Dragon, 550.0, 180.0),
                        enemy(EnemyKind::Big, 650.0, 320.0),
                    ],
                    scenery: vec![deco('|', 400.0, 60.0), deco('|', 400.0, 440.0)],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_scene_file_parses() {
        let book = SceneBook::from_toml(include_str!("../../data/scenes.toml")).expect("scenes.toml");
        assert_eq!(book.len(), 3);
        assert_eq!(book.scenes[0].enemies.len(), 3);
        assert_eq!(book.find("Lair").ok(), Some(2));
    }

    #[test]
    fn test_unknown_scene_is_an_error() {
        let book = SceneBook::default();
        assert!(matches!(book.get(9), Err(SimError::UnknownScene(_))));
        assert!(matches!(book.find("Moon"), Err(SimError::UnknownScene(_))));
    }

    #[test]
    fn test_empty_book_rejected() {
        assert!(SceneBook::from_toml("scene = []").is_err());
    }
}
