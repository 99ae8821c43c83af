use crate::components::Position;
use crate::core::error::Result;
use crate::messaging::{AttackAt, AttackTarget, EmitMirageEffect, MirageKind};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 10: cosmetic impact marker for every attack
pub struct OnHitProcessor;

impl Processor for OnHitProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::OnHit
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        for attack in ctx.bus.collect::<AttackAt>() {
            let pos = match attack.target {
                AttackTarget::Entity(target) => match ctx.store.get::<Position>(target) {
                    Some(p) => p.pos,
                    None => continue,
                },
                AttackTarget::Area(area) => area.center(),
            };
            ctx.bus.post(EmitMirageEffect {
                pos,
                effect: MirageKind::Impact,
            });
        }
        Ok(())
    }
}
