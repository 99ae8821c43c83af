use crate::components::{find_player, Attackable, Enemy, Player, Position};
use crate::core::error::Result;
use crate::core::types::{Direction, EntityId, Vec2};
use crate::ecs::Store;
use crate::messaging::{EmitMirageEffect, EntityMoved, MirageKind, MoveEnemy, MovePlayer, PlayerLocation};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 3: apply movement requests from the mailbox
///
/// Stunned and dying entities consume their request without moving. Every
/// frame with a live player ends with a `PlayerLocation` broadcast for the
/// AI stage. The first frame after the player is placed also posts the
/// appear effect.
pub struct MovementProcessor;

fn can_move(store: &Store, entity: EntityId) -> bool {
    store
        .get::<Attackable>(entity)
        .map_or(true, |a| a.is_alive() && !a.is_stunned)
}

impl MovementProcessor {
    fn move_player(&self, ctx: &mut FrameContext, player: EntityId) {
        let Some(MovePlayer { direction }) = ctx.mailbox.take::<MovePlayer>(player) else {
            return;
        };
        if !can_move(ctx.store, player) {
            return;
        }
        let Some(position) = ctx.store.get_mut::<Position>(player) else {
            return;
        };

        if matches!(direction, Direction::Left | Direction::Right) {
            position.facing = direction;
        }
        let from = position.pos;
        let to = from + direction.unit() * ctx.config.player.step;
        if !ctx.map.is_walkable(to) {
            tracing::trace!("Player {} blocked at {:?}", player, to);
            return;
        }
        position.pos = to;
        ctx.bus.post(EntityMoved { entity: player, from, to });
    }

    fn move_enemy(&self, ctx: &mut FrameContext, entity: EntityId) {
        let Some(MoveEnemy { destination }) = ctx.mailbox.take::<MoveEnemy>(entity) else {
            return;
        };
        if !can_move(ctx.store, entity) {
            return;
        }
        let Some(speed) = ctx.store.get::<Enemy>(entity).map(|e| e.speed) else {
            return;
        };
        let arrive = ctx.config.ai.arrive_distance;
        let bounds = ctx.map.bounds();
        let Some(position) = ctx.store.get_mut::<Position>(entity) else {
            return;
        };

        let from = position.pos;
        let delta = destination - from;
        let distance = delta.length();
        if distance <= arrive {
            return;
        }
        let to = bounds.clamp(from + delta.normalize() * (speed * ctx.dt).min(distance));
        if to == from || !ctx.map.is_walkable(to) {
            return;
        }

        if let Some(facing) = Direction::from_delta(to - from) {
            position.facing = facing;
        }
        position.pos = to;
        ctx.bus.post(EntityMoved { entity, from, to });
    }
}

impl Processor for MovementProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Movement
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        let player = find_player(ctx.store);
        if let Some(player) = player {
            self.move_player(ctx, player);
        }

        for entity in ctx.store.entities_with::<Enemy>() {
            self.move_enemy(ctx, entity);
        }

        if let Some(player) = player {
            let alive = ctx.store.get::<Attackable>(player).map_or(true, |a| a.is_alive());
            let pos: Option<Vec2> = ctx.store.get::<Position>(player).map(|p| p.pos);
            if let (true, Some(pos)) = (alive, pos) {
                ctx.bus.post(PlayerLocation { entity: player, pos });
                if let Some(stats) = ctx.store.get_mut::<Player>(player) {
                    if !stats.appeared {
                        stats.appeared = true;
                        ctx.bus.post(EmitMirageEffect { pos, effect: MirageKind::Appear });
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
    use crate::components::Player;
    use crate::core::kinds::EnemyKind;
    use crate::pipeline::context::testing::Harness;

    fn spawn_player(h: &mut Harness, pos: Vec2) -> EntityId {
        let e = h.state.store.create_entity();
        h.state.store.attach(e, Player::default()).unwrap();
        h.state.store.attach(e, Position::at(pos)).unwrap();
        h.state.store.attach(e, Attackable::new(100)).unwrap();
        e
    }

    fn spawn_enemy(h: &mut Harness, pos: Vec2) -> EntityId {
        let e = h.state.store.create_entity();
        h.state.store.attach(e, Enemy::new(EnemyKind::StickFigure, 100.0)).unwrap();
        h.state.store.attach(e, Position::at(pos)).unwrap();
        h.state.store.attach(e, Attackable::new(30)).unwrap();
        e
    }

    #[test]
    fn test_player_steps_and_faces() {
        let mut h = Harness::new();
        let p = spawn_player(&mut h, Vec2::new(100.0, 100.0));
        h.state.mailbox.post(p, MovePlayer { direction: Direction::Left });
        h.run(&MovementProcessor, 0.1).unwrap();

        let pos = h.state.store.get::<Position>(p).unwrap();
        assert_eq!(pos.pos, Vec2::new(90.0, 100.0));
        assert_eq!(pos.facing, Direction::Left);
        assert_eq!(h.state.bus.read::<EntityMoved>().count(), 1);
        assert_eq!(h.state.bus.latest::<PlayerLocation>().map(|l| l.pos), Some(Vec2::new(90.0, 100.0)));
    }

    #[test]
    fn test_player_cannot_leave_arena() {
        let mut h = Harness::new();
        let p = spawn_player(&mut h, Vec2::new(5.0, 100.0));
        h.state.mailbox.post(p, MovePlayer { direction: Direction::Left });
        h.run(&MovementProcessor, 0.1).unwrap();

        assert_eq!(h.state.store.get::<Position>(p).unwrap().pos.x, 5.0);
        assert_eq!(h.state.bus.read::<EntityMoved>().count(), 0);
        assert!(h.state.mailbox.peek::<MovePlayer>(p).is_none());
    }

    #[test]
    fn test_enemy_moves_at_speed_toward_destination() {
        let mut h = Harness::new();
        let e = spawn_enemy(&mut h, Vec2::new(100.0, 100.0));
        h.state.mailbox.post(e, MoveEnemy { destination: Vec2::new(300.0, 100.0) });
        h.run(&MovementProcessor, 0.5).unwrap();

        let pos = h.state.store.get::<Position>(e).unwrap();
        assert_eq!(pos.pos, Vec2::new(150.0, 100.0));
        assert_eq!(pos.facing, Direction::Right);
    }

    #[test]
    fn test_stunned_enemy_stays_put() {
        let mut h = Harness::new();
        let e = spawn_enemy(&mut h, Vec2::new(100.0, 100.0));
        h.state.store.get_mut::<Attackable>(e).unwrap().stun(1.0);
        h.state.mailbox.post(e, MoveEnemy { destination: Vec2::new(300.0, 100.0) });
        h.run(&MovementProcessor, 0.5).unwrap();

        assert_eq!(h.state.store.get::<Position>(e).unwrap().pos, Vec2::new(100.0, 100.0));
        assert!(h.state.mailbox.is_empty());
    }

    #[test]
    fn test_player_appears_once() {
        let mut h = Harness::new();
        let p = spawn_player(&mut h, Vec2::new(100.0, 100.0));
        h.run(&MovementProcessor, 0.1).unwrap();
        let appear: Vec<EmitMirageEffect> = h.state.bus.collect();
        assert_eq!(appear.len(), 1);
        assert_eq!(appear[0].effect, MirageKind::Appear);
        assert_eq!(appear[0].pos, Vec2::new(100.0, 100.0));
        h.next_frame();

        h.run(&MovementProcessor, 0.1).unwrap();
        assert_eq!(h.state.bus.read::<EmitMirageEffect>().count(), 0);
        h.next_frame();

        // Relocation re-arms the effect
        h.state.store.get_mut::<Player>(p).unwrap().appeared = false;
        h.run(&MovementProcessor, 0.1).unwrap();
        assert_eq!(h.state.bus.read::<EmitMirageEffect>().count(), 1);
    }

    #[test]
    fn test_dying_player_reports_no_location() {
        let mut h = Harness::new();
        let p = spawn_player(&mut h, Vec2::new(100.0, 100.0));
        h.state.store.get_mut::<Attackable>(p).unwrap().is_dying = true;
        h.run(&MovementProcessor, 0.1).unwrap();
        assert!(h.state.bus.latest::<PlayerLocation>().is_none());
    }
}
