//! The frame pipeline's processors, one module per stage

pub mod ai;
pub mod attackable;
pub mod character_animation;
pub mod damage;
pub mod defense;
pub mod enemy;
pub mod environment;
pub mod gametime;
pub mod input;
pub mod mirage_emitter;
pub mod movement;
pub mod offensive_attack;
pub mod offensive_skill;
pub mod on_hit;
pub mod particle;
pub mod particle_emitter;
pub mod passive_attack;
pub mod player;
pub mod renderable;
pub mod renderable_minimal;
pub mod scene;

pub use ai::AiProcessor;
pub use attackable::AttackableProcessor;
pub use character_animation::CharacterAnimationProcessor;
pub use damage::DamageProcessor;
pub use defense::DefenseProcessor;
pub use enemy::EnemyProcessor;
pub use environment::EnvironmentProcessor;
pub use gametime::GametimeProcessor;
pub use input::InputProcessor;
pub use mirage_emitter::MirageEmitterProcessor;
pub use movement::MovementProcessor;
pub use offensive_attack::OffensiveAttackProcessor;
pub use offensive_skill::OffensiveSkillProcessor;
pub use on_hit::OnHitProcessor;
pub use particle::ParticleProcessor;
pub use particle_emitter::ParticleEmitterProcessor;
pub use passive_attack::PassiveAttackProcessor;
pub use player::PlayerProcessor;
pub use renderable::RenderableProcessor;
pub use renderable_minimal::RenderableMinimalProcessor;
pub use scene::SceneProcessor;

use crate::pipeline::{Processor, ProcessorId};

/// The processor implementing one pipeline stage
pub fn build(id: ProcessorId) -> Box<dyn Processor> {
    match id {
        ProcessorId::Gametime => Box::new(GametimeProcessor),
        ProcessorId::Input => Box::new(InputProcessor),
        ProcessorId::Movement => Box::new(MovementProcessor),
        ProcessorId::Ai => Box::new(AiProcessor),
        ProcessorId::OffensiveAttack => Box::new(OffensiveAttackProcessor),
        ProcessorId::OffensiveSkill => Box::new(OffensiveSkillProcessor),
        ProcessorId::ParticleEmitter => Box::new(ParticleEmitterProcessor),
        ProcessorId::PassiveAttack => Box::new(PassiveAttackProcessor),
        ProcessorId::Particle => Box::new(ParticleProcessor),
        ProcessorId::OnHit => Box::new(OnHitProcessor),
        ProcessorId::Damage => Box::new(DamageProcessor),
        ProcessorId::Defense => Box::new(DefenseProcessor),
        ProcessorId::Attackable => Box::new(AttackableProcessor),
        ProcessorId::MirageEmitter => Box::new(MirageEmitterProcessor),
        ProcessorId::Scene => Box::new(SceneProcessor),
        ProcessorId::Environment => Box::new(EnvironmentProcessor),
        ProcessorId::Enemy => Box::new(EnemyProcessor),
        ProcessorId::Player => Box::new(PlayerProcessor),
        ProcessorId::CharacterAnimation => Box::new(CharacterAnimationProcessor),
        ProcessorId::RenderableMinimal => Box::new(RenderableMinimalProcessor),
        ProcessorId::Renderable => Box::new(RenderableProcessor),
    }
}
