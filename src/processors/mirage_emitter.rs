use crate::core::error::Result;
use crate::core::types::Vec2;
use crate::messaging::EmitMirageEffect;
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 14: floating combat text
pub struct MirageEmitterProcessor;

impl Processor for MirageEmitterProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::MirageEmitter
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        let lift = Vec2::new(0.0, -ctx.config.render.cell_height);
        let lifetime = ctx.config.combat.mirage_lifetime;
        for mirage in ctx.bus.read::<EmitMirageEffect>() {
            ctx.particles.emit_mirage(mirage.pos + lift, mirage.effect, lifetime);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::MirageKind;
    use crate::pipeline::context::testing::Harness;

    #[test]
    fn test_each_mirage_becomes_text() {
        let mut h = Harness::new();
        h.state.bus.post(EmitMirageEffect { pos: Vec2::new(50.0, 50.0), effect: MirageKind::Damage(7) });
        h.state.bus.post(EmitMirageEffect { pos: Vec2::new(60.0, 50.0), effect: MirageKind::Blocked });
        h.run(&MirageEmitterProcessor, 0.1).unwrap();

        let texts: Vec<String> = h.state.particles.iter().filter_map(|p| p.text.clone()).collect();
        assert_eq!(texts, vec!["-7".to_string(), "Blocked".to_string()]);
    }
}
