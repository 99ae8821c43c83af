//! Location and visible state

use serde::{Deserialize, Serialize};

use crate::core::types::{Color, Direction, Vec2};

/// Where an entity is and which way it faces
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub pos: Vec2,
    pub facing: Direction,
}

impl Position {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            facing: Direction::default(),
        }
    }
}

/// Animation states driven by the character-animation processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Walking,
    Windup,
    Attacking,
    Stunned,
    Dying,
}

impl AnimationState {
    /// States that persist until an explicit event ends them
    pub fn is_sticky(&self) -> bool {
        matches!(self, AnimationState::Stunned | AnimationState::Dying)
    }
}

/// What the renderer should draw for an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub glyph: char,
    pub color: Color,
    pub visible: bool,
    pub animation: AnimationState,
    /// Time left before a timed animation falls back to idle
    pub animation_remaining: f32,
}

impl Renderable {
    pub fn new(glyph: char, color: Color) -> Self {
        Self {
            glyph,
            color,
            visible: true,
            animation: AnimationState::Idle,
            animation_remaining: 0.0,
        }
    }

    /// Glyph shown for the current animation state
    pub fn current_glyph(&self) -> char {
        match self.animation {
            AnimationState::Dying => '%',
            AnimationState::Stunned => 'z',
            _ => self.glyph,
        }
    }

    pub fn current_color(&self) -> Color {
        match self.animation {
            AnimationState::Dying => Color::Grey,
            AnimationState::Attacking => Color::Yellow,
            AnimationState::Windup => Color::Cyan,
            _ => self.color,
        }
    }
}
