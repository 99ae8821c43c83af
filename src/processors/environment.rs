use crate::components::{Position, Renderable, Scenery};
use crate::core::error::Result;
use crate::core::types::Color;
use crate::messaging::{GameStart, SceneMove};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 16: rebuild scenery whenever a scene starts
pub struct EnvironmentProcessor;

impl Processor for EnvironmentProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Environment
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        let started = ctx.bus.read::<GameStart>().next().is_some() || ctx.bus.read::<SceneMove>().next().is_some();
        if !started {
            return Ok(());
        }

        for entity in ctx.store.entities_with::<Scenery>() {
            ctx.store.destroy(entity);
        }

        let bounds = ctx.map.bounds();
        let scene = ctx.scene.current()?;
        for deco in &scene.scenery {
            if !bounds.contains(deco.pos) {
                tracing::warn!("Scenery '{}' at {:?} is outside the map", deco.glyph, deco.pos);
                continue;
            }
            let entity = ctx.store.create_entity();
            ctx.store.attach(entity, Scenery)?;
            ctx.store.attach(entity, Position::at(deco.pos))?;
            ctx.store.attach(entity, Renderable::new(deco.glyph, Color::Grey))?;
        }
        tracing::debug!("Placed {} scenery entities", ctx.store.count::<Scenery>());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::context::testing::Harness;

    #[test]
    fn test_scenery_replaced_on_scene_change() {
        let mut h = Harness::new();
        h.state.scene.begin(0).unwrap();
        h.state.bus.post(GameStart { scene: 0 });
        h.run(&EnvironmentProcessor, 0.1).unwrap();
        assert_eq!(h.state.store.count::<Scenery>(), 3);
        h.next_frame();

        h.run(&EnvironmentProcessor, 0.1).unwrap();
        assert_eq!(h.state.store.count::<Scenery>(), 3);

        h.state.scene.begin(1).unwrap();
        h.state.bus.post(SceneMove { scene: 1, name: "Meadow".into() });
        h.run(&EnvironmentProcessor, 0.1).unwrap();
        assert_eq!(h.state.store.count::<Scenery>(), 2);
    }
}
