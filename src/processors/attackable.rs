use crate::components::{Attackable, Player, Position};
use crate::core::error::Result;
use crate::messaging::{
    EmitMirageEffect, EmitTexture, EntityDying, EntityEndStun, EntityStun, GameOver, MirageKind,
    ReceiveDamage, TextureKind,
};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 13: apply damage to health
///
/// Owns `Attackable`. Hits are applied one by one in posting order; the hit
/// that brings health to zero marks the entity dying and posts exactly one
/// `EntityDying`. Hits after that are ignored.
pub struct AttackableProcessor;

impl Processor for AttackableProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Attackable
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        for entity in ctx.store.entities_with::<Attackable>() {
            let Some(attackable) = ctx.store.get_mut::<Attackable>(entity) else {
                continue;
            };
            if !attackable.is_stunned {
                continue;
            }
            attackable.stun_remaining -= ctx.dt;
            if attackable.stun_remaining <= 0.0 {
                attackable.is_stunned = false;
                attackable.stun_remaining = 0.0;
                ctx.bus.post(EntityEndStun { entity });
            }
        }

        for entity in ctx.mailbox.recipients::<ReceiveDamage>() {
            let Some(pending) = ctx.mailbox.take::<ReceiveDamage>(entity) else {
                continue;
            };
            let is_player = ctx.store.has::<Player>(entity);
            // Only the cosmetic messages need a position
            let position = ctx.store.get::<Position>(entity).copied().unwrap_or_default();
            let Some(attackable) = ctx.store.get_mut::<Attackable>(entity) else {
                continue;
            };

            for hit in pending.hits {
                if !attackable.is_alive() {
                    tracing::trace!("Ignoring hit on dying {}", entity);
                    continue;
                }
                let health = attackable.apply_damage(hit.amount);
                attackable.damaged_at = Some(ctx.frame);
                ctx.bus.post(EmitMirageEffect {
                    pos: position.pos,
                    effect: MirageKind::Damage(hit.amount),
                });
                ctx.bus.post(EmitTexture {
                    kind: TextureKind::Blood,
                    pos: position.pos,
                    facing: position.facing,
                });

                if health == 0 {
                    attackable.is_dying = true;
                    attackable.is_stunned = false;
                    tracing::debug!("{} dies (killed by {})", entity, hit.source);
                    ctx.bus.post(EntityDying {
                        entity,
                        killer: Some(hit.source),
                    });
                    ctx.bus.post(EmitMirageEffect {
                        pos: position.pos,
                        effect: MirageKind::Death,
                    });
                    if is_player {
                        ctx.bus.post(GameOver { player: entity });
                    }
                } else if hit.stun > 0.0 {
                    attackable.stun(hit.stun);
                    ctx.bus.post(EntityStun {
                        entity,
                        duration: hit.stun,
                    });
                }
            }
        }
        Ok(())
    }
}
