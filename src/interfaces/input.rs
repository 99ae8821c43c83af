//! Input collaborator: logical key codes delivered between frames

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::kinds::SkillKind;
use crate::core::types::Direction;

/// Logical keys understood by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKey {
    Move(Direction),
    Attack,
    Block,
    NextWeapon,
    Skill(SkillKind),
    Restart,
    /// Any key the simulation has no binding for
    Other(char),
}

impl GameKey {
    /// Default keyboard layout used by the frontends
    pub fn from_char(c: char) -> GameKey {
        match c {
            'a' => GameKey::Move(Direction::Left),
            'd' => GameKey::Move(Direction::Right),
            'w' => GameKey::Move(Direction::Up),
            's' => GameKey::Move(Direction::Down),
            ' ' => GameKey::Attack,
            'b' => GameKey::Block,
            'c' => GameKey::NextWeapon,
            'q' => GameKey::Skill(SkillKind::Cleave),
            'e' => GameKey::Skill(SkillKind::Laser),
            'r' => GameKey::Skill(SkillKind::Explosion),
            '\n' => GameKey::Restart,
            other => GameKey::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: GameKey,
    /// Seconds since the frontend started
    pub timestamp: f64,
}

/// Key events received since the last frame
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<KeyEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: KeyEvent) {
        self.pending.push_back(event);
    }

    pub fn press(&mut self, key: GameKey, timestamp: f64) {
        self.push(KeyEvent { key, timestamp });
    }

    /// Remove and return every pending event in arrival order
    pub fn drain(&mut self) -> Vec<KeyEvent> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
