//! Role tags and short-lived cosmetic components

use serde::{Deserialize, Serialize};

use crate::core::kinds::EnemyKind;
use crate::core::types::EntityId;
use crate::ecs::Store;

/// Marks the player; carries run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub score: u32,
    pub kills: u32,
    pub attacks: u32,
    /// Cleared on spawn and relocation until the appear effect is shown
    pub appeared: bool,
}

/// Marks an enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Movement speed (world units per second)
    pub speed: f32,
    /// Time since entering the dying state; `None` while alive
    pub death_elapsed: Option<f32>,
}

impl Enemy {
    pub fn new(kind: EnemyKind, speed: f32) -> Self {
        Self {
            kind,
            speed,
            death_elapsed: None,
        }
    }
}

/// Background decoration owned by the environment processor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenery;

/// Removes the entity once `remaining` runs out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifetime {
    pub remaining: f32,
}

/// Text shown above an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechBubble {
    pub text: String,
    pub remaining: f32,
}

/// Which side an entity fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn of(store: &Store, entity: EntityId) -> Option<Faction> {
        if store.has::<Player>(entity) {
            Some(Faction::Player)
        } else if store.has::<Enemy>(entity) {
            Some(Faction::Enemy)
        } else {
            None
        }
    }

    /// Whether an attack from `self` may hurt `other`
    pub fn is_hostile_to(&self, other: Faction) -> bool {
        *self != other
    }
}

/// The first (and normally only) player entity
pub fn find_player(store: &Store) -> Option<EntityId> {
    store.query::<Player>().map(|(id, _)| id).min()
}
