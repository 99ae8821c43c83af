//! Addressed mailbox
//!
//! One slot per (entity, kind). A post overwrites whatever unconsumed payload
//! sits in the slot (last write wins); a take empties it. Slots survive frame
//! boundaries until taken, overwritten or purged with their entity.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::kinds::WeaponKind;
use crate::core::types::{Direction, EntityId, Frame, Vec2};

/// A payload that is delivered to one specific entity
pub trait DirectPayload: Sized + 'static {
    const KIND: DirectMessageKind;
    fn into_message(self) -> DirectMessage;
    fn from_message(message: DirectMessage) -> Option<Self>;
    fn from_message_ref(message: &DirectMessage) -> Option<&Self>;
}

macro_rules! direct_messages {
    ($($name:ident),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum DirectMessageKind {
            $($name),*
        }

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub enum DirectMessage {
            $($name($name)),*
        }

        impl DirectMessage {
            pub fn kind(&self) -> DirectMessageKind {
                match self {
                    $(DirectMessage::$name(_) => DirectMessageKind::$name),*
                }
            }
        }

        $(
            impl DirectPayload for $name {
                const KIND: DirectMessageKind = DirectMessageKind::$name;

                fn into_message(self) -> DirectMessage {
                    DirectMessage::$name(self)
                }

                fn from_message(message: DirectMessage) -> Option<Self> {
                    match message {
                        DirectMessage::$name(payload) => Some(payload),
                        _ => None,
                    }
                }

                fn from_message_ref(message: &DirectMessage) -> Option<&Self> {
                    match message {
                        DirectMessage::$name(payload) => Some(payload),
                        _ => None,
                    }
                }
            }
        )*
    };
}

direct_messages!(MovePlayer, MoveEnemy, ReceiveDamage, ActivateSpeechBubble);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovePlayer {
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveEnemy {
    pub destination: Vec2,
}

/// One resolved hit waiting to be applied to its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub source: EntityId,
    pub amount: i32,
    pub weapon: WeaponKind,
    pub stun: f32,
}

/// Pending hits for one entity, in the order their attacks were posted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiveDamage {
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivateSpeechBubble {
    pub text: String,
    pub duration: f32,
}

#[derive(Debug, Clone)]
struct Slot {
    posted: Frame,
    message: DirectMessage,
}

#[derive(Debug, Default)]
pub struct Mailbox {
    frame: Frame,
    slots: AHashMap<(EntityId, DirectMessageKind), Slot>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    /// Post to `entity`, replacing any unconsumed payload of the same kind.
    /// Returns true when a previous payload was overwritten.
    pub fn post<T: DirectPayload>(&mut self, entity: EntityId, payload: T) -> bool {
        let previous = self.slots.insert(
            (entity, T::KIND),
            Slot {
                posted: self.frame,
                message: payload.into_message(),
            },
        );
        if previous.is_some() {
            tracing::trace!("{:?} for {} overwritten", T::KIND, entity);
        }
        previous.is_some()
    }

    pub fn take<T: DirectPayload>(&mut self, entity: EntityId) -> Option<T> {
        let slot = self.slots.remove(&(entity, T::KIND))?;
        T::from_message(slot.message)
    }

    pub fn peek<T: DirectPayload>(&self, entity: EntityId) -> Option<&T> {
        self.slots
            .get(&(entity, T::KIND))
            .and_then(|slot| T::from_message_ref(&slot.message))
    }

    /// Frame in which the pending payload was posted
    pub fn posted_frame<T: DirectPayload>(&self, entity: EntityId) -> Option<Frame> {
        self.slots.get(&(entity, T::KIND)).map(|slot| slot.posted)
    }

    /// Entities with a pending payload of kind `T`, in id order
    pub fn recipients<T: DirectPayload>(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .slots
            .keys()
            .filter(|(_, kind)| *kind == T::KIND)
            .map(|(entity, _)| *entity)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Drop every slot addressed to a destroyed entity
    pub fn purge_entity(&mut self, entity: EntityId) {
        self.slots.retain(|(owner, _), _| *owner != entity);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
