use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Vec2};

/// Behavioural state of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Wander,
    Chase,
    Attack,
    Stunned,
    Dying,
}

impl AiState {
    pub fn name(&self) -> &'static str {
        match self {
            AiState::Wander => "wander",
            AiState::Chase => "chase",
            AiState::Attack => "attack",
            AiState::Stunned => "stunned",
            AiState::Dying => "dying",
        }
    }
}

/// Per-enemy state machine data, written only by the AI processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ai {
    pub state: AiState,
    /// State to return to when a stun expires
    pub resume_state: AiState,
    pub target: Option<EntityId>,
    /// Time since the last wander destination was picked
    pub wander_timer: f32,
    /// Time spent winding up the current attack
    pub attack_timer: f32,
    pub destination: Option<Vec2>,
}

impl Ai {
    pub fn new() -> Self {
        Self {
            state: AiState::Wander,
            resume_state: AiState::Wander,
            target: None,
            wander_timer: 0.0,
            attack_timer: 0.0,
            destination: None,
        }
    }
}

impl Default for Ai {
    fn default() -> Self {
        Self::new()
    }
}
