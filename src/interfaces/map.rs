//! Map/collision collaborator

use serde::{Deserialize, Serialize};

use crate::core::types::{Rect, Vec2};

/// Read-only view of the playfield consumed by movement and environment
pub trait MapView {
    fn is_walkable(&self, pos: Vec2) -> bool;
    fn bounds(&self) -> Rect;
}

/// Rectangular arena with optional blocked areas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenArena {
    pub bounds: Rect,
    #[serde(default)]
    pub obstacles: Vec<Rect>,
}

impl OpenArena {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacle(mut self, obstacle: Rect) -> Self {
        self.obstacles.push(obstacle);
        self
    }
}

impl Default for OpenArena {
    /// 80x25 terminal cells at the default cell size
    fn default() -> Self {
        Self::new(Rect::new(0.0, 0.0, 800.0, 500.0))
    }
}

impl MapView for OpenArena {
    fn is_walkable(&self, pos: Vec2) -> bool {
        self.bounds.contains(pos) && !self.obstacles.iter().any(|o| o.contains(pos))
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
