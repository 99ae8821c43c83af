use rand::Rng;

use crate::ai::{step, AiAction, Senses};
use crate::components::{Ai, AiState, Attackable, Offense, Position};
use crate::core::error::Result;
use crate::core::types::{Color, Vec2};
use crate::messaging::{AttackIntent, AttackWindup, EmitTextureMinimal, MoveEnemy, PlayerLocation};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 4: step every enemy state machine
///
/// Reads the player location broadcast by movement and the durable stun and
/// dying flags on `Attackable`. Owns the `Ai` component.
pub struct AiProcessor;

impl Processor for AiProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Ai
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        let player = ctx.bus.latest::<PlayerLocation>().copied();
        let config = ctx.config;
        let tuning = &config.ai;

        for entity in ctx.store.entities_with::<Ai>() {
            let Some(pos) = ctx.store.get::<Position>(entity).map(|p| p.pos) else {
                continue;
            };
            let (is_stunned, is_dying) = ctx
                .store
                .get::<Attackable>(entity)
                .map_or((false, false), |a| (a.is_stunned, !a.is_alive()));
            let attack_ready = ctx.store.get::<Offense>(entity).map_or(false, |o| o.is_ready());
            let senses = Senses {
                distance_to_player: player.map(|p| pos.distance(&p.pos)),
                is_stunned,
                is_dying,
                attack_ready,
            };

            let Some(ai) = ctx.store.get_mut::<Ai>(entity) else {
                continue;
            };
            let previous = ai.state;
            let decision = step(ai, &senses, tuning, ctx.dt);

            if let Some(state) = decision.entered {
                tracing::debug!("Enemy {} {} -> {}", entity, previous.name(), state.name());
                if previous == AiState::Wander && state == AiState::Chase {
                    ctx.bus.post(EmitTextureMinimal {
                        glyph: '!',
                        color: Color::Yellow,
                        pos: pos + Vec2::new(0.0, -config.render.cell_height),
                        duration: 0.5,
                    });
                }
            }

            match decision.action {
                AiAction::Hold => {}
                AiAction::Wander { repick } => {
                    if repick || ai.destination.is_none() {
                        let r = tuning.wander_radius;
                        let offset = if r > 0.0 {
                            Vec2::new(ctx.rng.gen_range(-r..=r), ctx.rng.gen_range(-r..=r))
                        } else {
                            Vec2::ZERO
                        };
                        ai.destination = Some(ctx.map.bounds().clamp(pos + offset));
                    }
                    if let Some(destination) = ai.destination {
                        if pos.distance(&destination) > tuning.arrive_distance {
                            ctx.mailbox.post(entity, MoveEnemy { destination });
                        }
                    }
                }
                AiAction::Chase => {
                    if let Some(player) = player {
                        ai.target = Some(player.entity);
                        ctx.mailbox.post(entity, MoveEnemy { destination: player.pos });
                    }
                }
                AiAction::Windup => {
                    ai.target = player.map(|p| p.entity);
                    ctx.bus.post(AttackWindup {
                        entity,
                        duration: tuning.windup,
                    });
                }
                AiAction::Strike => {
                    if let Some(player) = player {
                        ctx.bus.post(AttackIntent {
                            source: entity,
                            target: player.entity,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kinds::WeaponKind;
    use crate::core::types::EntityId;
    use crate::messaging::MessageKind;
    use crate::pipeline::context::testing::Harness;

    fn spawn_enemy(h: &mut Harness, pos: Vec2) -> EntityId {
        let e = h.state.store.create_entity();
        h.state.store.attach(e, Ai::new()).unwrap();
        h.state.store.attach(e, Position::at(pos)).unwrap();
        h.state.store.attach(e, Attackable::new(30)).unwrap();
        h.state.store.attach(e, Offense::new(WeaponKind::Claw, 10, 1.0)).unwrap();
        e
    }

    fn player_at(h: &mut Harness, pos: Vec2) {
        h.state.bus.post(PlayerLocation { entity: EntityId(99), pos });
    }

    #[test]
    fn test_notices_player_and_chases() {
        let mut h = Harness::new();
        let e = spawn_enemy(&mut h, Vec2::new(100.0, 100.0));
        player_at(&mut h, Vec2::new(240.0, 100.0));
        h.run(&AiProcessor, 0.1).unwrap();

        assert_eq!(h.state.store.get::<Ai>(e).unwrap().state, AiState::Chase);
        assert_eq!(h.state.bus.count(MessageKind::EmitTextureMinimal), 1);
        let mv = h.state.mailbox.peek::<MoveEnemy>(e).unwrap();
        assert_eq!(mv.destination, Vec2::new(240.0, 100.0));
    }

    #[test]
    fn test_wander_destination_stays_in_bounds() {
        let mut h = Harness::new();
        let e = spawn_enemy(&mut h, Vec2::new(1.0, 1.0));
        h.run(&AiProcessor, 0.1).unwrap();

        let destination = h.state.store.get::<Ai>(e).unwrap().destination.unwrap();
        assert!(h.map.bounds.contains(destination));
    }

    #[test]
    fn test_negative_wander_radius_stays_put() {
        let mut h = Harness::new();
        h.config.ai.wander_radius = -5.0;
        let e = spawn_enemy(&mut h, Vec2::new(300.0, 300.0));
        h.run(&AiProcessor, 0.1).unwrap();

        let ai = h.state.store.get::<Ai>(e).unwrap();
        assert_eq!(ai.destination, Some(Vec2::new(300.0, 300.0)));
        assert!(h.state.mailbox.peek::<MoveEnemy>(e).is_none());
    }

    #[test]
    fn test_windup_then_intent() {
        let mut h = Harness::new();
        let e = spawn_enemy(&mut h, Vec2::new(100.0, 100.0));
        h.state.store.get_mut::<Ai>(e).unwrap().state = AiState::Chase;

        player_at(&mut h, Vec2::new(130.0, 100.0));
        h.run(&AiProcessor, 0.25).unwrap();
        assert_eq!(h.state.bus.read::<AttackWindup>().count(), 1);
        h.next_frame();

        for _ in 0..2 {
            player_at(&mut h, Vec2::new(130.0, 100.0));
            h.run(&AiProcessor, 0.25).unwrap();
        }
        let intents: Vec<_> = h.state.bus.collect::<AttackIntent>();
        assert_eq!(intents, vec![AttackIntent { source: e, target: EntityId(99) }]);
    }
}
