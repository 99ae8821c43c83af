//! Broadcast message payloads
//!
//! Every broadcast kind is its own payload struct. The `broadcast_messages!`
//! macro ties each struct to a [`MessageKind`] and a [`Message`] variant and
//! implements [`BroadcastPayload`] for it; only types implementing that trait
//! can be posted to the [`MessageBus`](super::MessageBus).

use serde::{Deserialize, Serialize};

use crate::core::kinds::{EnemyKind, SkillKind, WeaponKind};
use crate::core::types::{Color, Direction, EntityId, Rect, Vec2};
use crate::interfaces::input::GameKey;

/// A payload that travels on the frame-scoped broadcast bus
pub trait BroadcastPayload: Clone + Sized + 'static {
    const KIND: MessageKind;
    fn into_message(self) -> Message;
    fn from_message(message: &Message) -> Option<&Self>;
}

macro_rules! broadcast_messages {
    ($($name:ident),* $(,)?) => {
        /// Discriminant of a broadcast [`Message`]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum MessageKind {
            $($name),*
        }

        impl MessageKind {
            pub const ALL: &'static [MessageKind] = &[$(MessageKind::$name),*];
        }

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub enum Message {
            $($name($name)),*
        }

        impl Message {
            pub fn kind(&self) -> MessageKind {
                match self {
                    $(Message::$name(_) => MessageKind::$name),*
                }
            }
        }

        $(
            impl BroadcastPayload for $name {
                const KIND: MessageKind = MessageKind::$name;

                fn into_message(self) -> Message {
                    Message::$name(self)
                }

                fn from_message(message: &Message) -> Option<&Self> {
                    match message {
                        Message::$name(payload) => Some(payload),
                        _ => None,
                    }
                }
            }
        )*
    };
}

broadcast_messages!(
    Keypress,
    PlayerLocation,
    AttackAt,
    AttackIntent,
    AttackWindup,
    PlayerAttack,
    EntityAttack,
    EntityMoved,
    EntityStun,
    EntityEndStun,
    EntityDying,
    EntityDead,
    SpawnEnemy,
    SpawnPlayer,
    SceneMove,
    GameStart,
    GameOver,
    EmitTexture,
    EmitTextureMinimal,
    EmitParticleEffect,
    EmitMirageEffect,
);

/// One key press delivered by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypress {
    pub key: GameKey,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerLocation {
    pub entity: EntityId,
    pub pos: Vec2,
}

/// What an attack is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackTarget {
    Entity(EntityId),
    Area(Rect),
}

impl AttackTarget {
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            AttackTarget::Entity(e) => Some(*e),
            AttackTarget::Area(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackAt {
    pub source: EntityId,
    pub target: AttackTarget,
    pub damage: i32,
    pub weapon: WeaponKind,
    /// Stun applied on hit (seconds, 0 = none)
    pub stun: f32,
}

/// An enemy finished its windup and wants to strike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackIntent {
    pub source: EntityId,
    pub target: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackWindup {
    pub entity: EntityId,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttack {
    pub entity: EntityId,
    pub weapon: WeaponKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityAttack {
    pub entity: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityMoved {
    pub entity: EntityId,
    pub from: Vec2,
    pub to: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityStun {
    pub entity: EntityId,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityEndStun {
    pub entity: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityDying {
    pub entity: EntityId,
    pub killer: Option<EntityId>,
}

/// Posted when a dying entity is removed from the store
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityDead {
    pub entity: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnEnemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPlayer {
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMove {
    pub scene: usize,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStart {
    pub scene: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameOver {
    pub player: EntityId,
}

/// Named textures with a fixed look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureKind {
    WeaponSwing(WeaponKind),
    Blood,
}

impl TextureKind {
    pub fn glyph(&self) -> char {
        match self {
            TextureKind::WeaponSwing(weapon) => weapon.swing_glyph(),
            TextureKind::Blood => ',',
        }
    }

    pub fn color(&self) -> Color {
        match self {
            TextureKind::WeaponSwing(_) => Color::White,
            TextureKind::Blood => Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitTexture {
    pub kind: TextureKind,
    pub pos: Vec2,
    pub facing: Direction,
}

/// A single raw glyph shown for a short time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitTextureMinimal {
    pub glyph: char,
    pub color: Color,
    pub pos: Vec2,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitParticleEffect {
    pub source: EntityId,
    pub skill: SkillKind,
    pub origin: Vec2,
    pub direction: Direction,
    pub damage: i32,
    pub stun: f32,
    pub range: f32,
}

/// Cosmetic-only feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MirageKind {
    Impact,
    Damage(i32),
    Blocked,
    Death,
    Appear,
}

impl MirageKind {
    pub fn text(&self) -> String {
        match self {
            MirageKind::Impact => "*".to_string(),
            MirageKind::Damage(amount) => format!("-{}", amount),
            MirageKind::Blocked => "Blocked".to_string(),
            MirageKind::Death => "x_x".to_string(),
            MirageKind::Appear => "!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitMirageEffect {
    pub pos: Vec2,
    pub effect: MirageKind,
}
