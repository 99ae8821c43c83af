use crate::components::{Lifetime, Position, Renderable};
use crate::core::error::Result;
use crate::core::types::{Color, Direction, Vec2};
use crate::ecs::Store;
use crate::messaging::{EmitTexture, EmitTextureMinimal};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 20a: short-lived textures
///
/// Every `EmitTexture`/`EmitTextureMinimal` becomes an entity with a
/// `Lifetime`; expired ones are removed at the end of the frame.
pub struct RenderableMinimalProcessor;

fn spawn_texture(
    store: &mut Store,
    pos: Vec2,
    facing: Direction,
    glyph: char,
    color: Color,
    remaining: f32,
) -> Result<()> {
    let entity = store.create_entity();
    store.attach(entity, Position { pos, facing })?;
    store.attach(entity, Renderable::new(glyph, color))?;
    store.attach(entity, Lifetime { remaining })?;
    Ok(())
}

impl Processor for RenderableMinimalProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::RenderableMinimal
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        for entity in ctx.store.entities_with::<Lifetime>() {
            let Some(lifetime) = ctx.store.get_mut::<Lifetime>(entity) else {
                continue;
            };
            lifetime.remaining -= ctx.dt;
            if lifetime.remaining <= 0.0 {
                ctx.store.destroy_later(entity);
            }
        }

        let lifetime = ctx.config.combat.texture_lifetime;
        for texture in ctx.bus.read::<EmitTexture>() {
            spawn_texture(
                ctx.store,
                texture.pos,
                texture.facing,
                texture.kind.glyph(),
                texture.kind.color(),
                lifetime,
            )?;
        }
        for texture in ctx.bus.read::<EmitTextureMinimal>() {
            spawn_texture(
                ctx.store,
                texture.pos,
                Direction::default(),
                texture.glyph,
                texture.color,
                texture.duration,
            )?;
        }
        Ok(())
    }
}
