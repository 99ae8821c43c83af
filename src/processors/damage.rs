use crate::components::{Attackable, Faction, Position};
use crate::core::error::Result;
use crate::core::types::EntityId;
use crate::ecs::Store;
use crate::messaging::{AttackAt, AttackTarget, Hit, ReceiveDamage};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 11: resolve `AttackAt` into addressed `ReceiveDamage`
///
/// Attacks are handled in posting order. Each victim's hits accumulate in
/// one `ReceiveDamage` in that same order, so two attacks on one entity in
/// a frame are applied one after the other, never merged.
pub struct DamageProcessor;

/// Entities an attack lands on: live, hostile to the attacker, not the attacker
pub fn resolve_targets(store: &Store, attack: &AttackAt) -> Vec<EntityId> {
    let attacker = Faction::of(store, attack.source);
    let eligible = |entity: EntityId| {
        if entity == attack.source {
            return false;
        }
        let Some(attackable) = store.get::<Attackable>(entity) else {
            return false;
        };
        if !attackable.is_alive() {
            return false;
        }
        match (attacker, Faction::of(store, entity)) {
            (Some(own), Some(other)) => own.is_hostile_to(other),
            (None, Some(_)) => true,
            (_, None) => false,
        }
    };

    match attack.target {
        AttackTarget::Entity(entity) => {
            if eligible(entity) {
                vec![entity]
            } else {
                Vec::new()
            }
        }
        AttackTarget::Area(area) => {
            let mut hit: Vec<EntityId> = store
                .query::<Position>()
                .filter(|(_, p)| area.contains(p.pos))
                .map(|(e, _)| e)
                .filter(|e| eligible(*e))
                .collect();
            hit.sort();
            hit
        }
    }
}

impl Processor for DamageProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Damage
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        for attack in ctx.bus.collect::<AttackAt>() {
            for target in resolve_targets(ctx.store, &attack) {
                let Some(multiplier) = ctx.store.get::<Attackable>(target).map(|a| a.damage_taken_multiplier)
                else {
                    continue;
                };
                let amount = (attack.damage as f32 * multiplier).round() as i32;

                let mut pending = ctx.mailbox.take::<ReceiveDamage>(target).unwrap_or_default();
                pending.hits.push(Hit {
                    source: attack.source,
                    amount,
                    weapon: attack.weapon,
                    stun: attack.stun,
                });
                tracing::trace!("{} -> {}: {} damage queued", attack.source, target, amount);
                ctx.mailbox.post(target, pending);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Enemy, Player, Scenery};
    use crate::core::kinds::{EnemyKind, WeaponKind};
    use crate::core::types::{Rect, Vec2};
    use crate::pipeline::context::testing::Harness;

    struct Arena {
        h: Harness,
        player: EntityId,
        near: EntityId,
        far: EntityId,
    }

    fn arena() -> Arena {
        let mut h = Harness::new();
        let store = &mut h.state.store;
        let player = store.create_entity();
        store.attach(player, Player::default()).unwrap();
        store.attach(player, Attackable::new(100)).unwrap();
        store.attach(player, Position::at(Vec2::new(100.0, 100.0))).unwrap();

        let mut enemy = |x: f32| {
            let e = store.create_entity();
            store.attach(e, Enemy::new(EnemyKind::StickFigure, 100.0)).unwrap();
            store.attach(e, Attackable::new(30)).unwrap();
            store.attach(e, Position::at(Vec2::new(x, 100.0))).unwrap();
            e
        };
        let near = enemy(120.0);
        let far = enemy(300.0);

        let tree = store.create_entity();
        store.attach(tree, Scenery).unwrap();
        store.attach(tree, Position::at(Vec2::new(110.0, 100.0))).unwrap();

        Arena { h, player, near, far }
    }

    fn swing(source: EntityId, target: AttackTarget, damage: i32) -> AttackAt {
        AttackAt { source, target, damage, weapon: WeaponKind::HitSquare, stun: 0.0 }
    }

    #[test]
    fn test_area_hits_only_hostiles_inside() {
        let Arena { h, player, near, far } = arena();
        let area = AttackTarget::Area(Rect::new(90.0, 90.0, 50.0, 20.0));
        let targets = resolve_targets(&h.state.store, &swing(player, area, 25));
        assert_eq!(targets, vec![near]);
        assert!(!targets.contains(&far));
    }

    #[test]
    fn test_enemy_cannot_hurt_enemy() {
        let Arena { h, near, far, .. } = arena();
        let targets = resolve_targets(&h.state.store, &swing(near, AttackTarget::Entity(far), 10));
        assert!(targets.is_empty());
    }

    #[test]
    fn test_hits_accumulate_in_posting_order() {
        let Arena { mut h, player, near, .. } = arena();
        h.state.bus.post(swing(player, AttackTarget::Entity(near), 10));
        h.state.bus.post(swing(player, AttackTarget::Entity(near), 7));
        h.run(&DamageProcessor, 0.1).unwrap();

        let pending = h.state.mailbox.take::<ReceiveDamage>(near).unwrap();
        let amounts: Vec<i32> = pending.hits.iter().map(|hit| hit.amount).collect();
        assert_eq!(amounts, vec![10, 7]);
    }

    #[test]
    fn test_multiplier_applies_and_dying_targets_are_skipped() {
        let Arena { mut h, player, near, far } = arena();
        h.state.store.get_mut::<Attackable>(near).unwrap().damage_taken_multiplier = 1.5;
        h.state.store.get_mut::<Attackable>(far).unwrap().is_dying = true;
        h.state.bus.post(swing(player, AttackTarget::Entity(near), 10));
        h.state.bus.post(swing(player, AttackTarget::Entity(far), 10));
        h.run(&DamageProcessor, 0.1).unwrap();

        assert_eq!(h.state.mailbox.peek::<ReceiveDamage>(near).unwrap().hits[0].amount, 15);
        assert!(h.state.mailbox.peek::<ReceiveDamage>(far).is_none());
    }
}
