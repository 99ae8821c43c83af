use crate::components::{find_player, Defense, DefenseMode, Position};
use crate::core::error::Result;
use crate::interfaces::GameKey;
use crate::messaging::{EmitMirageEffect, Keypress, MirageKind, ReceiveDamage};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 12: block and armor mitigation
///
/// Runs between damage and attackable, rewriting pending `ReceiveDamage`
/// in place. A hit mitigated to nothing is dropped and shows "Blocked".
pub struct DefenseProcessor;

impl Processor for DefenseProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Defense
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        for entity in ctx.store.entities_with::<Defense>() {
            if let Some(defense) = ctx.store.get_mut::<Defense>(entity) {
                defense.block_remaining = (defense.block_remaining - ctx.dt).max(0.0);
                defense.cooldown_remaining = (defense.cooldown_remaining - ctx.dt).max(0.0);
            }
        }

        let block_pressed = ctx.bus.read::<Keypress>().any(|k| k.key == GameKey::Block);
        if let (true, Some(player)) = (block_pressed, find_player(ctx.store)) {
            if let Some(defense) = ctx.store.get_mut::<Defense>(player) {
                if defense.mode == DefenseMode::Block && defense.cooldown_remaining <= 0.0 {
                    defense.block_remaining = ctx.config.combat.block_duration;
                    defense.cooldown_remaining = ctx.config.combat.block_cooldown;
                    tracing::debug!("Player {} blocks", player);
                } else {
                    tracing::trace!("Block still cooling down");
                }
            }
        }

        for entity in ctx.mailbox.recipients::<ReceiveDamage>() {
            let Some(defense) = ctx.store.get::<Defense>(entity) else {
                continue;
            };
            if !defense.is_active() {
                continue;
            }
            let Some(mut pending) = ctx.mailbox.take::<ReceiveDamage>(entity) else {
                continue;
            };
            let pos = ctx.store.get::<Position>(entity).map(|p| p.pos).unwrap_or_default();

            let before = pending.hits.len();
            pending.hits.retain_mut(|hit| {
                hit.amount = defense.mitigate(hit.amount);
                hit.amount > 0
            });
            for _ in pending.hits.len()..before {
                ctx.bus.post(EmitMirageEffect {
                    pos,
                    effect: MirageKind::Blocked,
                });
            }

            if !pending.hits.is_empty() {
                ctx.mailbox.post(entity, pending);
            }
        }
        Ok(())
    }
}
