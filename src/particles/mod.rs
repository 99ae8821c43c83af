pub mod emitter;

pub use emitter::{Particle, ParticleDamage, ParticleEmitter};
