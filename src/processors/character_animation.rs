use crate::components::{AnimationState, Renderable};
use crate::core::error::Result;
use crate::core::types::EntityId;
use crate::ecs::Store;
use crate::messaging::{
    AttackWindup, EntityAttack, EntityDying, EntityEndStun, EntityMoved, EntityStun, PlayerAttack,
};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// How long the walking pose lingers after a step
const WALK_ANIMATION: f32 = 0.2;

/// Stage 19: drive `Renderable.animation` from this frame's events
///
/// Dying overrides everything and is final. Stunned holds until the stun
/// ends. Timed states fall back to idle when their timer runs out.
pub struct CharacterAnimationProcessor;

fn set_animation(store: &mut Store, entity: EntityId, state: AnimationState, duration: f32) {
    let Some(renderable) = store.get_mut::<Renderable>(entity) else {
        return;
    };
    let current = renderable.animation;
    let allowed = match state {
        AnimationState::Dying => true,
        AnimationState::Stunned => current != AnimationState::Dying,
        AnimationState::Idle => !current.is_sticky(),
        AnimationState::Walking => matches!(current, AnimationState::Idle | AnimationState::Walking),
        AnimationState::Windup | AnimationState::Attacking => !current.is_sticky(),
    };
    if allowed {
        renderable.animation = state;
        renderable.animation_remaining = duration;
    }
}

impl Processor for CharacterAnimationProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::CharacterAnimation
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        for entity in ctx.store.entities_with::<Renderable>() {
            let Some(renderable) = ctx.store.get_mut::<Renderable>(entity) else {
                continue;
            };
            if renderable.animation_remaining <= 0.0 || renderable.animation.is_sticky() {
                continue;
            }
            renderable.animation_remaining -= ctx.dt;
            if renderable.animation_remaining <= 0.0 {
                renderable.animation_remaining = 0.0;
                renderable.animation = AnimationState::Idle;
            }
        }

        let attack_time = ctx.config.combat.attack_animation;
        let bus = &*ctx.bus;
        let store = &mut *ctx.store;

        for moved in bus.read::<EntityMoved>() {
            set_animation(store, moved.entity, AnimationState::Walking, WALK_ANIMATION);
        }
        for windup in bus.read::<AttackWindup>() {
            set_animation(store, windup.entity, AnimationState::Windup, windup.duration);
        }
        for attack in bus.read::<PlayerAttack>() {
            set_animation(store, attack.entity, AnimationState::Attacking, attack_time);
        }
        for attack in bus.read::<EntityAttack>() {
            set_animation(store, attack.entity, AnimationState::Attacking, attack_time);
        }
        for stun in bus.read::<EntityStun>() {
            set_animation(store, stun.entity, AnimationState::Stunned, stun.duration);
        }
        for end in bus.read::<EntityEndStun>() {
            if store.get::<Renderable>(end.entity).is_some_and(|r| r.animation == AnimationState::Stunned) {
                if let Some(renderable) = store.get_mut::<Renderable>(end.entity) {
                    renderable.animation = AnimationState::Idle;
                    renderable.animation_remaining = 0.0;
                }
            }
        }
        for dying in bus.read::<EntityDying>() {
            set_animation(store, dying.entity, AnimationState::Dying, 0.0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kinds::WeaponKind;
    use crate::core::types::{Color, Vec2};
    use crate::pipeline::context::testing::Harness;

    fn actor(h: &mut Harness) -> EntityId {
        let e = h.state.store.create_entity();
        h.state.store.attach(e, Renderable::new('x', Color::Red)).unwrap();
        e
    }

    fn animation(h: &Harness, e: EntityId) -> AnimationState {
        h.state.store.get::<Renderable>(e).unwrap().animation
    }

    #[test]
    fn test_attack_animation_times_out() {
        let mut h = Harness::new();
        let p = actor(&mut h);
        h.state.bus.post(PlayerAttack { entity: p, weapon: WeaponKind::HitSquare });
        h.run(&CharacterAnimationProcessor, 0.1).unwrap();
        assert_eq!(animation(&h, p), AnimationState::Attacking);
        h.next_frame();

        h.run(&CharacterAnimationProcessor, 0.5).unwrap();
        assert_eq!(animation(&h, p), AnimationState::Idle);
    }

    #[test]
    fn test_dying_overrides_and_sticks() {
        let mut h = Harness::new();
        let e = actor(&mut h);
        h.state.bus.post(EntityStun { entity: e, duration: 1.0 });
        h.state.bus.post(EntityDying { entity: e, killer: None });
        h.run(&CharacterAnimationProcessor, 0.1).unwrap();
        assert_eq!(animation(&h, e), AnimationState::Dying);
        h.next_frame();

        h.state.bus.post(EntityMoved { entity: e, from: Vec2::ZERO, to: Vec2::new(1.0, 0.0) });
        h.state.bus.post(EntityEndStun { entity: e });
        h.run(&CharacterAnimationProcessor, 5.0).unwrap();
        assert_eq!(animation(&h, e), AnimationState::Dying);
    }

    #[test]
    fn test_walking_does_not_cut_an_attack() {
        let mut h = Harness::new();
        let e = actor(&mut h);
        h.state.bus.post(EntityAttack { entity: e });
        h.state.bus.post(EntityMoved { entity: e, from: Vec2::ZERO, to: Vec2::new(1.0, 0.0) });
        h.run(&CharacterAnimationProcessor, 0.1).unwrap();
        assert_eq!(animation(&h, e), AnimationState::Attacking);
    }

    #[test]
    fn test_stun_ends_on_event() {
        let mut h = Harness::new();
        let e = actor(&mut h);
        h.state.bus.post(EntityStun { entity: e, duration: 0.5 });
        h.run(&CharacterAnimationProcessor, 0.1).unwrap();
        h.next_frame();
        h.run(&CharacterAnimationProcessor, 1.0).unwrap();
        assert_eq!(animation(&h, e), AnimationState::Stunned);
        h.next_frame();

        h.state.bus.post(EntityEndStun { entity: e });
        h.run(&CharacterAnimationProcessor, 0.1).unwrap();
        assert_eq!(animation(&h, e), AnimationState::Idle);
    }
}
