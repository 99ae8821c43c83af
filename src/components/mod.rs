//! Component types attached to entities in the [`Store`](crate::ecs::Store)

pub mod ai;
pub mod combat;
pub mod roles;
pub mod spatial;

pub use ai::{Ai, AiState};
pub use combat::{Attackable, Defense, DefenseMode, Offense, Passive, PassiveTrigger};
pub use roles::{find_player, Enemy, Faction, Lifetime, Player, Scenery, SpeechBubble};
pub use spatial::{AnimationState, Position, Renderable};
