//! The two message channels between processors
//!
//! * [`MessageBus`]: frame-scoped broadcast, cleared after every frame.
//! * [`Mailbox`]: persistent, addressed to one entity, single slot per kind.
//!
//! A payload type implements exactly one of [`BroadcastPayload`] and
//! [`DirectPayload`], so routing a kind through the wrong channel does not
//! compile.

pub mod broadcast;
pub mod direct;
pub mod messages;

pub use broadcast::{Envelope, MessageBus};
pub use direct::{
    ActivateSpeechBubble, DirectMessage, DirectMessageKind, DirectPayload, Hit, Mailbox,
    MoveEnemy, MovePlayer, ReceiveDamage,
};
pub use messages::*;
