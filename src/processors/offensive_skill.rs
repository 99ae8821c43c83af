use crate::components::{find_player, Attackable, Offense, Position};
use crate::core::error::Result;
use crate::core::kinds::SkillKind;
use crate::core::types::EntityId;
use crate::interfaces::GameKey;
use crate::messaging::{ActivateSpeechBubble, EmitParticleEffect, Keypress};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 6: player skills
///
/// A ready skill becomes an `EmitParticleEffect`; the particle stages do
/// the damage. Pressing a skill that is still cooling down makes the player
/// complain instead.
pub struct OffensiveSkillProcessor;

impl OffensiveSkillProcessor {
    fn cast(&self, ctx: &mut FrameContext, player: EntityId, skill: SkillKind) {
        let can_act = ctx
            .store
            .get::<Attackable>(player)
            .map_or(true, |a| a.is_alive() && !a.is_stunned);
        if !can_act {
            return;
        }
        let Some(position) = ctx.store.get::<Position>(player).copied() else {
            return;
        };
        let stats = *ctx.config.skills.get(skill);
        let Some(offense) = ctx.store.get_mut::<Offense>(player) else {
            return;
        };

        if !offense.skill_ready(skill) {
            tracing::trace!("Skill {:?} still cooling down", skill);
            ctx.mailbox.post(
                player,
                ActivateSpeechBubble {
                    text: "Not ready yet".into(),
                    duration: ctx.config.combat.speech_bubble_duration,
                },
            );
            return;
        }
        offense.trigger_skill(skill, stats.cooldown);

        tracing::debug!("Player {} casts {:?}", player, skill);
        ctx.bus.post(EmitParticleEffect {
            source: player,
            skill,
            origin: position.pos,
            direction: position.facing,
            damage: stats.damage,
            stun: stats.stun,
            range: stats.range,
        });
    }
}

impl Processor for OffensiveSkillProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::OffensiveSkill
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        for entity in ctx.store.entities_with::<Offense>() {
            if let Some(offense) = ctx.store.get_mut::<Offense>(entity) {
                offense.tick_skills(ctx.dt);
            }
        }

        let Some(player) = find_player(ctx.store) else {
            return Ok(());
        };
        let skills: Vec<SkillKind> = ctx
            .bus
            .read::<Keypress>()
            .filter_map(|k| match k.key {
                GameKey::Skill(skill) => Some(skill),
                _ => None,
            })
            .collect();
        for skill in skills {
            self.cast(ctx, player, skill);
        }
        Ok(())
    }
}
