//! Frame-scoped broadcast bus
//!
//! Messages posted by the processor at stage N are visible to stages N+1..end
//! of the same frame and are dropped by [`MessageBus::reset_frame`] once the
//! pipeline finishes. Reading never consumes: any number of processors may
//! drain the same kind.

use crate::core::types::Frame;
use crate::pipeline::ProcessorId;

use super::messages::{BroadcastPayload, Message, MessageKind};

/// A posted message with the frame and stage that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub frame: Frame,
    pub stage: Option<ProcessorId>,
    pub message: Message,
}

#[derive(Debug, Default)]
pub struct MessageBus {
    frame: Frame,
    stage: Option<ProcessorId>,
    envelopes: Vec<Envelope>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    /// Record which processor is posting; set by the frame driver
    pub fn set_stage(&mut self, stage: Option<ProcessorId>) {
        self.stage = stage;
    }

    pub fn post<T: BroadcastPayload>(&mut self, payload: T) {
        self.envelopes.push(Envelope {
            frame: self.frame,
            stage: self.stage,
            message: payload.into_message(),
        });
    }

    /// All messages of one kind posted so far this frame, in posting order
    pub fn drain(&self, kind: MessageKind) -> impl Iterator<Item = &Message> {
        self.envelopes(kind).map(|e| &e.message)
    }

    pub fn envelopes(&self, kind: MessageKind) -> impl Iterator<Item = &Envelope> {
        self.envelopes.iter().filter(move |e| e.message.kind() == kind)
    }

    /// Typed view over one kind
    pub fn read<T: BroadcastPayload>(&self) -> impl Iterator<Item = &T> {
        self.drain(T::KIND).filter_map(T::from_message)
    }

    /// Owned copies of one kind, for processors that post while reading
    pub fn collect<T: BroadcastPayload>(&self) -> Vec<T> {
        self.read::<T>().cloned().collect()
    }

    pub fn latest<T: BroadcastPayload>(&self) -> Option<&T> {
        self.read::<T>().last()
    }

    pub fn count(&self, kind: MessageKind) -> usize {
        self.envelopes(kind).count()
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    /// Drop every message of every kind
    pub fn reset_frame(&mut self) {
        self.envelopes.clear();
        self.stage = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{EntityId, Vec2};
    use crate::messaging::messages::{EntityDying, PlayerLocation};
    use proptest::prelude::*;

    #[test]
    fn test_drain_is_repeatable_and_ordered() {
        let mut bus = MessageBus::new();
        bus.post(EntityDying { entity: EntityId(1), killer: None });
        bus.post(PlayerLocation { entity: EntityId(0), pos: Vec2::ZERO });
        bus.post(EntityDying { entity: EntityId(2), killer: None });

        let first: Vec<_> = bus.read::<EntityDying>().map(|m| m.entity).collect();
        let second: Vec<_> = bus.read::<EntityDying>().map(|m| m.entity).collect();
        assert_eq!(first, vec![EntityId(1), EntityId(2)]);
        assert_eq!(first, second);
        assert_eq!(bus.count(MessageKind::PlayerLocation), 1);
    }

    #[test]
    fn test_envelope_records_stage_and_frame() {
        let mut bus = MessageBus::new();
        bus.set_frame(9);
        bus.set_stage(Some(ProcessorId::Attackable));
        bus.post(EntityDying { entity: EntityId(3), killer: None });

        let env = bus.envelopes(MessageKind::EntityDying).next().unwrap();
        assert_eq!(env.frame, 9);
        assert_eq!(env.stage, Some(ProcessorId::Attackable));
    }

    #[test]
    fn test_latest_returns_last_posted() {
        let mut bus = MessageBus::new();
        bus.post(PlayerLocation { entity: EntityId(0), pos: Vec2::new(1.0, 1.0) });
        bus.post(PlayerLocation { entity: EntityId(0), pos: Vec2::new(2.0, 2.0) });
        assert_eq!(bus.latest::<PlayerLocation>().map(|m| m.pos.x), Some(2.0));
    }

    proptest! {
        #[test]
        fn prop_reset_clears_every_kind(ids in proptest::collection::vec(0u32..100, 0..40)) {
            let mut bus = MessageBus::new();
            for id in &ids {
                bus.post(EntityDying { entity: EntityId(*id), killer: None });
                bus.post(PlayerLocation { entity: EntityId(*id), pos: Vec2::ZERO });
            }

            bus.reset_frame();

            for kind in MessageKind::ALL {
                prop_assert_eq!(bus.drain(*kind).count(), 0);
            }
            prop_assert!(bus.is_empty());
        }
    }
}
