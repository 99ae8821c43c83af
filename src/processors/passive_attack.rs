use crate::components::{Attackable, Passive, PassiveTrigger, Position};
use crate::core::error::Result;
use crate::core::kinds::WeaponKind;
use crate::core::types::{Rect, Vec2};
use crate::messaging::{AttackAt, AttackTarget, EntityMoved};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 8: auras that damage everything hostile around their carrier
pub struct PassiveAttackProcessor;

impl Processor for PassiveAttackProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::PassiveAttack
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        for entity in ctx.store.entities_with::<Passive>() {
            let active = ctx
                .store
                .get::<Attackable>(entity)
                .map_or(true, |a| a.is_alive() && !a.is_stunned);
            let Some(pos) = ctx.store.get::<Position>(entity).map(|p| p.pos) else {
                continue;
            };
            let moved_to: Option<Vec2> = ctx
                .bus
                .read::<EntityMoved>()
                .filter(|m| m.entity == entity)
                .last()
                .map(|m| m.to);
            let Some(passive) = ctx.store.get_mut::<Passive>(entity) else {
                continue;
            };
            if !active {
                continue;
            }

            let center = match passive.trigger {
                PassiveTrigger::Interval { every } => {
                    passive.timer += ctx.dt;
                    if passive.timer < every {
                        continue;
                    }
                    passive.timer -= every;
                    pos
                }
                PassiveTrigger::OnMove => match moved_to {
                    Some(to) => to,
                    None => continue,
                },
            };

            ctx.bus.post(AttackAt {
                source: entity,
                target: AttackTarget::Area(Rect::around(center, passive.radius)),
                damage: passive.damage,
                weapon: WeaponKind::Skill,
                stun: 0.0,
            });
        }
        Ok(())
    }
}
