use crate::components::Faction;
use crate::core::error::Result;
use crate::core::kinds::{SkillKind, WeaponKind};
use crate::core::types::Rect;
use crate::messaging::{AttackAt, AttackTarget, EmitParticleEffect};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 7: spawn skill particles
///
/// Area skills hit immediately with one `AttackAt` over their blast area;
/// the laser's particles travel and hit in the particle stage.
pub struct ParticleEmitterProcessor;

/// Blast area of an area skill, `None` for travelling skills
pub fn blast_area(effect: &EmitParticleEffect) -> Option<Rect> {
    match effect.skill {
        SkillKind::Cleave => {
            let center = effect.origin + effect.direction.unit() * (effect.range / 2.0);
            Some(Rect::around(center, effect.range / 2.0))
        }
        SkillKind::Explosion => Some(Rect::around(effect.origin, effect.range)),
        SkillKind::Laser => None,
    }
}

impl Processor for ParticleEmitterProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::ParticleEmitter
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        for effect in ctx.bus.collect::<EmitParticleEffect>() {
            let faction = Faction::of(ctx.store, effect.source);
            ctx.particles.emit_skill(&effect, faction, ctx.config, ctx.rng);

            if let Some(area) = blast_area(&effect) {
                ctx.bus.post(AttackAt {
                    source: effect.source,
                    target: AttackTarget::Area(area),
                    damage: effect.damage,
                    weapon: WeaponKind::Skill,
                    stun: effect.stun,
                });
            }
        }
        Ok(())
    }
}
