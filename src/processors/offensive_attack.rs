use crate::components::{find_player, Attackable, Offense, Position};
use crate::core::error::Result;
use crate::core::kinds::WeaponKind;
use crate::core::types::{Direction, EntityId, Rect, Vec2};
use crate::ecs::Store;
use crate::interfaces::GameKey;
use crate::messaging::{
    ActivateSpeechBubble, AttackAt, AttackIntent, AttackTarget, EmitTexture, Keypress, PlayerAttack,
    TextureKind,
};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 5: basic attacks
///
/// Ticks attack cooldowns, then turns the player's attack key and enemy
/// `AttackIntent`s into `AttackAt`. An attacker still cooling down produces
/// nothing, so re-entering the attack state never strikes twice per window.
pub struct OffensiveAttackProcessor;

/// Hit area of a weapon swing: `reach` long in the facing direction, `width` across
pub fn swing_area(pos: Vec2, facing: Direction, reach: f32, width: f32) -> Rect {
    let center = pos + facing.unit() * (reach / 2.0);
    let (w, h) = match facing {
        Direction::Left | Direction::Right => (reach, width),
        Direction::Up | Direction::Down => (width, reach),
    };
    Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
}

fn can_act(store: &Store, entity: EntityId) -> bool {
    store
        .get::<Attackable>(entity)
        .map_or(true, |a| a.is_alive() && !a.is_stunned)
}

impl OffensiveAttackProcessor {
    fn player_attack(&self, ctx: &mut FrameContext, player: EntityId) {
        if !can_act(ctx.store, player) {
            return;
        }
        let Some(position) = ctx.store.get::<Position>(player).copied() else {
            return;
        };
        let Some(offense) = ctx.store.get_mut::<Offense>(player) else {
            return;
        };
        if !offense.is_ready() {
            tracing::trace!("Player attack ignored, {:.2}s cooldown left", offense.cooldown_remaining);
            return;
        }
        offense.trigger();

        let weapon = offense.weapon;
        let (reach, width) = ctx
            .config
            .weapons
            .get(weapon)
            .map_or((40.0, 40.0), |w| (w.reach, w.width));
        let area = swing_area(position.pos, position.facing, reach, width);

        ctx.bus.post(AttackAt {
            source: player,
            target: AttackTarget::Area(area),
            damage: offense.damage,
            weapon,
            stun: offense.stun,
        });
        ctx.bus.post(PlayerAttack { entity: player, weapon });
        ctx.bus.post(EmitTexture {
            kind: TextureKind::WeaponSwing(weapon),
            pos: area.center(),
            facing: position.facing,
        });
    }

    fn next_weapon(&self, ctx: &mut FrameContext, player: EntityId) {
        let Some(offense) = ctx.store.get_mut::<Offense>(player) else {
            return;
        };
        let weapon = offense.weapon.next_player_weapon();
        if let Some(stats) = ctx.config.weapons.get(weapon) {
            offense.weapon = weapon;
            offense.damage = stats.damage;
            offense.cooldown = stats.cooldown;
            offense.stun = stats.stun;
        }
        tracing::debug!("Player switched to {:?}", weapon);
        ctx.mailbox.post(
            player,
            ActivateSpeechBubble {
                text: format!("{:?}", weapon),
                duration: ctx.config.combat.speech_bubble_duration,
            },
        );
    }

    fn enemy_attack(&self, ctx: &mut FrameContext, intent: AttackIntent) {
        if !can_act(ctx.store, intent.source) {
            return;
        }
        let Some(target_pos) = ctx.store.get::<Position>(intent.target).map(|p| p.pos) else {
            return;
        };
        let facing = ctx
            .store
            .get::<Position>(intent.source)
            .map(|p| p.facing)
            .unwrap_or_default();
        let Some(offense) = ctx.store.get_mut::<Offense>(intent.source) else {
            return;
        };
        if !offense.is_ready() {
            tracing::trace!("Enemy {} attack ignored, still cooling down", intent.source);
            return;
        }
        offense.trigger();

        ctx.bus.post(AttackAt {
            source: intent.source,
            target: AttackTarget::Entity(intent.target),
            damage: offense.damage,
            weapon: WeaponKind::Claw,
            stun: offense.stun,
        });
        ctx.bus.post(EmitTexture {
            kind: TextureKind::WeaponSwing(WeaponKind::Claw),
            pos: target_pos,
            facing,
        });
    }
}

impl Processor for OffensiveAttackProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::OffensiveAttack
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        for entity in ctx.store.entities_with::<Offense>() {
            if let Some(offense) = ctx.store.get_mut::<Offense>(entity) {
                offense.tick_attack(ctx.dt);
            }
        }

        if let Some(player) = find_player(ctx.store) {
            let keys: Vec<GameKey> = ctx.bus.read::<Keypress>().map(|k| k.key).collect();
            for key in keys {
                match key {
                    GameKey::Attack => self.player_attack(ctx, player),
                    GameKey::NextWeapon => self.next_weapon(ctx, player),
                    _ => {}
                }
            }
        }

        for intent in ctx.bus.collect::<AttackIntent>() {
            self.enemy_attack(ctx, intent);
        }
        Ok(())
    }
}
