use crate::components::{Ai, Attackable, Defense, Enemy, Offense, Passive, Position, Renderable};
use crate::core::error::Result;
use crate::core::kinds::{EnemyKind, WeaponKind};
use crate::core::types::Direction;
use crate::messaging::{AttackAt, EntityAttack, EntityDead, EntityDying, SpawnEnemy};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Slack for accumulated frame times when comparing against the death duration
const DEATH_EPSILON: f32 = 1e-4;

/// Stage 17: enemy lifecycle
///
/// Spawns enemies, announces their strikes for animation, and removes dead
/// ones once the death animation has played for `death_duration`.
pub struct EnemyProcessor;

impl EnemyProcessor {
    fn spawn(&self, ctx: &mut FrameContext, spawn: SpawnEnemy) -> Result<()> {
        let stats = *ctx.config.enemies.get(spawn.kind);
        let combat = &ctx.config.combat;
        let store = &mut *ctx.store;

        let entity = store.create_entity();
        store.attach(entity, Enemy::new(spawn.kind, stats.speed))?;
        store.attach(
            entity,
            Position {
                pos: spawn.pos,
                facing: Direction::Left,
            },
        )?;
        store.attach(entity, Renderable::new(spawn.kind.glyph(), spawn.kind.color()))?;
        store.attach(entity, Attackable::new(stats.health))?;
        store.attach(entity, Offense::new(WeaponKind::Claw, stats.damage, stats.attack_cooldown))?;
        store.attach(entity, Ai::new())?;

        match spawn.kind {
            EnemyKind::Cow => {
                store.attach(entity, Passive::on_move(combat.trample_damage, combat.trample_radius))?;
            }
            EnemyKind::Dragon => {
                store.attach(
                    entity,
                    Passive::interval(combat.burn_interval, combat.burn_damage, combat.burn_radius),
                )?;
            }
            EnemyKind::Big => {
                store.attach(entity, Defense::armor(combat.armor_mitigation))?;
            }
            _ => {}
        }

        tracing::debug!("Spawned {:?} {} at {:?}", spawn.kind, entity, spawn.pos);
        Ok(())
    }
}

impl Processor for EnemyProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Enemy
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        let duration = ctx.config.combat.death_duration;
        for entity in ctx.store.entities_with::<Enemy>() {
            let Some(enemy) = ctx.store.get_mut::<Enemy>(entity) else {
                continue;
            };
            let Some(elapsed) = enemy.death_elapsed.as_mut() else {
                continue;
            };
            *elapsed += ctx.dt;
            if *elapsed + DEATH_EPSILON >= duration {
                tracing::debug!("Removing dead {:?} {}", enemy.kind, entity);
                ctx.store.destroy_later(entity);
                ctx.bus.post(EntityDead { entity });
            }
        }

        for dying in ctx.bus.collect::<EntityDying>() {
            if let Some(enemy) = ctx.store.get_mut::<Enemy>(dying.entity) {
                enemy.death_elapsed.get_or_insert(0.0);
            }
        }

        let strikers: Vec<_> = ctx
            .bus
            .read::<AttackAt>()
            .filter(|a| a.weapon == WeaponKind::Claw && ctx.store.has::<Enemy>(a.source))
            .map(|a| a.source)
            .collect();
        for entity in strikers {
            ctx.bus.post(EntityAttack { entity });
        }

        for spawn in ctx.bus.collect::<SpawnEnemy>() {
            self.spawn(ctx, spawn)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::PassiveTrigger;
    use crate::core::types::{EntityId, Vec2};
    use crate::messaging::{AttackTarget, MessageKind};
    use crate::pipeline::context::testing::Harness;

    #[test]
    fn test_spawn_uses_roster_stats() {
        let mut h = Harness::new();
        h.state.bus.post(SpawnEnemy { kind: EnemyKind::Dragon, pos: Vec2::new(300.0, 200.0) });
        h.state.bus.post(SpawnEnemy { kind: EnemyKind::Big, pos: Vec2::new(400.0, 200.0) });
        h.run(&EnemyProcessor, 0.1).unwrap();

        let enemies = h.state.store.entities_with::<Enemy>();
        assert_eq!(enemies.len(), 2);
        let dragon = enemies[0];
        assert_eq!(h.state.store.get::<Attackable>(dragon).unwrap().health, 120);
        assert!(h.state.store.has::<Passive>(dragon));
        assert!(h.state.store.has::<Defense>(enemies[1]));
    }

    #[test]
    fn test_cow_tramples_on_move() {
        let mut h = Harness::new();
        h.state.bus.post(SpawnEnemy { kind: EnemyKind::Cow, pos: Vec2::new(300.0, 200.0) });
        h.run(&EnemyProcessor, 0.1).unwrap();

        let cow = h.state.store.entities_with::<Enemy>()[0];
        let passive = h.state.store.get::<Passive>(cow).unwrap();
        assert_eq!(passive.trigger, PassiveTrigger::OnMove);
        assert_eq!(passive.damage, h.config.combat.trample_damage);
    }

    #[test]
    fn test_dead_enemy_removed_after_death_duration() {
        let mut h = Harness::new();
        h.state.bus.post(SpawnEnemy { kind: EnemyKind::Cow, pos: Vec2::new(300.0, 200.0) });
        h.run(&EnemyProcessor, 0.25).unwrap();
        h.next_frame();
        let cow = h.state.store.entities_with::<Enemy>()[0];

        h.state.bus.post(EntityDying { entity: cow, killer: None });
        h.run(&EnemyProcessor, 0.25).unwrap();
        h.next_frame();

        for _ in 0..3 {
            h.run(&EnemyProcessor, 0.25).unwrap();
            assert_eq!(h.state.bus.count(MessageKind::EntityDead), 0);
            h.next_frame();
            assert!(h.state.store.contains(cow));
        }

        h.run(&EnemyProcessor, 0.25).unwrap();
        assert_eq!(h.state.bus.collect::<EntityDead>(), vec![EntityDead { entity: cow }]);
        h.next_frame();
        assert!(!h.state.store.contains(cow));
    }

    #[test]
    fn test_enemy_claw_announces_attack() {
        let mut h = Harness::new();
        h.state.bus.post(SpawnEnemy { kind: EnemyKind::Rambo, pos: Vec2::new(300.0, 200.0) });
        h.run(&EnemyProcessor, 0.1).unwrap();
        h.next_frame();
        let rambo = h.state.store.entities_with::<Enemy>()[0];

        h.state.bus.post(AttackAt {
            source: rambo,
            target: AttackTarget::Entity(EntityId(77)),
            damage: 25,
            weapon: WeaponKind::Claw,
            stun: 0.0,
        });
        h.run(&EnemyProcessor, 0.1).unwrap();
        assert_eq!(h.state.bus.collect::<EntityAttack>(), vec![EntityAttack { entity: rambo }]);
    }
}
