use crate::components::{Attackable, Faction, Position};
use crate::core::error::Result;
use crate::core::kinds::WeaponKind;
use crate::core::types::{EntityId, Vec2};
use crate::messaging::{AttackAt, AttackTarget};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 9: move particles and let damaging ones hit
///
/// A damaging particle hits each hostile entity it touches at most once.
/// Touching is tested along the path swept this frame, so fast particles
/// cannot skip over a target between frames.
pub struct ParticleProcessor;

impl Processor for ParticleProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Particle
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        ctx.particles.travel(ctx.dt);

        let targets: Vec<(EntityId, Vec2, Option<Faction>)> = ctx
            .store
            .query::<Attackable>()
            .filter(|(_, a)| a.is_alive())
            .filter_map(|(e, _)| {
                let pos = ctx.store.get::<Position>(e)?.pos;
                Some((e, pos, Faction::of(ctx.store, e)))
            })
            .collect();

        for particle in ctx.particles.iter_mut() {
            let Some(damage) = particle.damage else {
                continue;
            };
            for (entity, pos, faction) in &targets {
                let hostile = match (particle.faction, faction) {
                    (Some(own), Some(other)) => own.is_hostile_to(*other),
                    _ => true,
                };
                if !hostile
                    || *entity == particle.source
                    || particle.hit.contains(entity)
                    || pos.distance_to_segment(particle.prev, particle.pos) > damage.radius
                {
                    continue;
                }
                particle.hit.push(*entity);
                ctx.bus.post(AttackAt {
                    source: particle.source,
                    target: AttackTarget::Entity(*entity),
                    damage: damage.amount,
                    weapon: WeaponKind::Skill,
                    stun: damage.stun,
                });
            }
        }
        ctx.particles.expire();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Enemy;
    use crate::core::kinds::EnemyKind;
    use crate::core::types::Color;
    use crate::particles::{Particle, ParticleDamage};
    use crate::pipeline::context::testing::Harness;

    fn beam(from: Vec2) -> Particle {
        Particle {
            source: EntityId(500),
            faction: Some(Faction::Player),
            pos: from,
            prev: from,
            velocity: Vec2::new(100.0, 0.0),
            remaining: 2.0,
            glyph: '=',
            color: Color::Cyan,
            text: None,
            damage: Some(ParticleDamage { amount: 20, stun: 0.0, radius: 10.0 }),
            hit: Vec::new(),
        }
    }

    #[test]
    fn test_beam_hits_enemy_once() {
        let mut h = Harness::new();
        let e = h.state.store.create_entity();
        h.state.store.attach(e, Enemy::new(EnemyKind::Cow, 60.0)).unwrap();
        h.state.store.attach(e, Attackable::new(80)).unwrap();
        h.state.store.attach(e, Position::at(Vec2::new(110.0, 100.0))).unwrap();
        h.state.particles.spawn(beam(Vec2::new(100.0, 100.0)));

        h.run(&ParticleProcessor, 0.1).unwrap();
        assert_eq!(h.state.bus.collect::<AttackAt>().len(), 1);
        h.next_frame();

        h.run(&ParticleProcessor, 0.05).unwrap();
        assert_eq!(h.state.bus.read::<AttackAt>().count(), 0);
    }

    #[test]
    fn test_fast_beam_hits_target_it_passes_over() {
        let mut h = Harness::new();
        let e = h.state.store.create_entity();
        h.state.store.attach(e, Enemy::new(EnemyKind::StickFigure, 0.0)).unwrap();
        h.state.store.attach(e, Attackable::new(30)).unwrap();
        h.state.store.attach(e, Position::at(Vec2::new(160.0, 100.0))).unwrap();
        let mut fast = beam(Vec2::new(145.0, 100.0));
        fast.velocity = Vec2::new(400.0, 0.0);
        h.state.particles.spawn(fast);

        // One 40 unit step from 145 to 185 is more than 10 away at both ends
        h.run(&ParticleProcessor, 0.1).unwrap();
        assert_eq!(h.state.bus.read::<AttackAt>().count(), 1);
    }

    #[test]
    fn test_beam_expiring_this_frame_still_hits() {
        let mut h = Harness::new();
        let e = h.state.store.create_entity();
        h.state.store.attach(e, Enemy::new(EnemyKind::StickFigure, 0.0)).unwrap();
        h.state.store.attach(e, Attackable::new(30)).unwrap();
        h.state.store.attach(e, Position::at(Vec2::new(125.0, 100.0))).unwrap();
        let mut short = beam(Vec2::new(100.0, 100.0));
        short.remaining = 0.3;
        h.state.particles.spawn(short);

        h.run(&ParticleProcessor, 0.5).unwrap();
        assert_eq!(h.state.bus.read::<AttackAt>().count(), 1);
        assert!(h.state.particles.is_empty());
    }

    #[test]
    fn test_beam_ignores_own_faction() {
        let mut h = Harness::new();
        let p = h.state.store.create_entity();
        h.state.store.attach(p, crate::components::Player::default()).unwrap();
        h.state.store.attach(p, Attackable::new(100)).unwrap();
        h.state.store.attach(p, Position::at(Vec2::new(110.0, 100.0))).unwrap();
        h.state.particles.spawn(beam(Vec2::new(100.0, 100.0)));

        h.run(&ParticleProcessor, 0.1).unwrap();
        assert_eq!(h.state.bus.read::<AttackAt>().count(), 0);
    }
}
