use crate::components::find_player;
use crate::core::error::Result;
use crate::interfaces::GameKey;
use crate::messaging::{Keypress, MovePlayer};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 2: turn queued key events into `Keypress` broadcasts
///
/// Exactly one `Keypress` is posted per received event. Movement keys are
/// also addressed to the player as `MovePlayer`; several in one frame
/// collapse to the last one.
pub struct InputProcessor;

impl Processor for InputProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Input
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        let player = find_player(ctx.store);

        for event in ctx.input.drain() {
            ctx.bus.post(Keypress {
                key: event.key,
                timestamp: event.timestamp,
            });

            if let (GameKey::Move(direction), Some(player)) = (event.key, player) {
                if ctx.mailbox.post(player, MovePlayer { direction }) {
                    tracing::trace!("Movement key overrode an earlier one this frame");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Player;
    use crate::core::types::Direction;

    use crate::pipeline::context::testing::Harness;

    #[test]
    fn test_one_keypress_per_event() {
        let mut h = Harness::new();
        h.state.input.press(GameKey::Attack, 0.1);
        h.state.input.press(GameKey::Block, 0.2);
        h.state.input.press(GameKey::Attack, 0.3);
        h.run(&InputProcessor, 0.1).unwrap();

        let keys: Vec<GameKey> = h.state.bus.read::<Keypress>().map(|k| k.key).collect();
        assert_eq!(keys, vec![GameKey::Attack, GameKey::Block, GameKey::Attack]);
        assert!(h.state.input.is_empty());
    }

    #[test]
    fn test_last_movement_key_wins() {
        let mut h = Harness::new();
        let player = h.state.store.create_entity();
        h.state.store.attach(player, Player::default()).unwrap();

        h.state.input.press(GameKey::Move(Direction::Left), 0.1);
        h.state.input.press(GameKey::Move(Direction::Up), 0.2);
        h.run(&InputProcessor, 0.1).unwrap();

        let pending = h.state.mailbox.take::<MovePlayer>(player);
        assert_eq!(pending, Some(MovePlayer { direction: Direction::Up }));
    }

    #[test]
    fn test_movement_without_player_only_broadcasts() {
        let mut h = Harness::new();
        h.state.input.press(GameKey::Move(Direction::Right), 0.1);
        h.run(&InputProcessor, 0.1).unwrap();

        assert_eq!(h.state.bus.read::<Keypress>().count(), 1);
        assert!(h.state.mailbox.is_empty());
    }
}
