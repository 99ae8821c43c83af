//! Particle emitter resource
//!
//! Holds every live particle: skill visuals, damaging projectiles (laser
//! beams) and floating combat text. It is owned by the game and passed to
//! processors through the frame context.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::components::Faction;
use crate::core::config::GameConfig;
use crate::core::kinds::SkillKind;
use crate::core::types::{Color, EntityId, Vec2};
use crate::messaging::{EmitParticleEffect, MirageKind};

/// Damage carried by a travelling particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleDamage {
    pub amount: i32,
    pub stun: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub source: EntityId,
    pub faction: Option<Faction>,
    pub pos: Vec2,
    /// Position before the last move; hits are tested along `prev..pos`
    pub prev: Vec2,
    pub velocity: Vec2,
    pub remaining: f32,
    pub glyph: char,
    pub color: Color,
    /// Floating text instead of a glyph
    pub text: Option<String>,
    pub damage: Option<ParticleDamage>,
    /// Entities this particle already damaged
    pub hit: Vec<EntityId>,
}

impl Particle {
    fn visual(source: EntityId, pos: Vec2, velocity: Vec2, remaining: f32, glyph: char, color: Color) -> Self {
        Self {
            source,
            faction: None,
            pos,
            prev: pos,
            velocity,
            remaining,
            glyph,
            color,
            text: None,
            damage: None,
            hit: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn is_mirage(&self) -> bool {
        self.text.is_some()
    }
}

#[derive(Debug, Default)]
pub struct ParticleEmitter {
    particles: Vec<Particle>,
}

impl ParticleEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Spawn the particles of a skill effect
    pub fn emit_skill(
        &mut self,
        effect: &EmitParticleEffect,
        faction: Option<Faction>,
        config: &GameConfig,
        rng: &mut ChaCha8Rng,
    ) {
        let facing = effect.direction.unit();
        match effect.skill {
            SkillKind::Cleave => {
                let center = effect.origin + facing * (effect.range / 2.0);
                for _ in 0..8 {
                    let jitter = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                    let pos = center + jitter * (effect.range / 2.0);
                    self.spawn(Particle::visual(effect.source, pos, Vec2::ZERO, 0.3, '*', Color::Yellow));
                }
            }
            SkillKind::Explosion => {
                for i in 0..12 {
                    let angle = i as f32 / 12.0 * std::f32::consts::TAU;
                    let dir = Vec2::new(angle.cos(), angle.sin());
                    let speed = effect.range / 0.5 * rng.gen_range(0.8..1.0);
                    self.spawn(Particle::visual(effect.source, effect.origin, dir * speed, 0.5, 'o', Color::Red));
                }
            }
            SkillKind::Laser => {
                let speed = config.skills.laser_speed.max(1.0);
                let mut beam = Particle::visual(
                    effect.source,
                    effect.origin,
                    facing * speed,
                    effect.range / speed,
                    '=',
                    Color::Cyan,
                );
                beam.faction = faction;
                beam.damage = Some(ParticleDamage {
                    amount: effect.damage,
                    stun: effect.stun,
                    radius: config.render.cell_width,
                });
                self.spawn(beam);
            }
        }
    }

    /// Floating combat text rising from `pos`
    pub fn emit_mirage(&mut self, pos: Vec2, effect: MirageKind, lifetime: f32) {
        let color = match effect {
            MirageKind::Damage(_) | MirageKind::Death => Color::Red,
            MirageKind::Blocked => Color::Cyan,
            MirageKind::Impact | MirageKind::Appear => Color::Yellow,
        };
        let mut particle = Particle::visual(EntityId(u32::MAX), pos, Vec2::new(0.0, -20.0), lifetime, ' ', color);
        particle.text = Some(effect.text());
        self.spawn(particle);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    /// Move and age every particle without removing expired ones.
    /// A particle never travels past the end of its lifetime.
    pub fn travel(&mut self, dt: f32) {
        for p in &mut self.particles {
            let step = dt.min(p.remaining.max(0.0));
            p.prev = p.pos;
            p.pos = p.pos + p.velocity * step;
            p.remaining -= dt;
        }
    }

    /// Drop expired particles; returns how many went
    pub fn expire(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        before - self.particles.len()
    }

    /// Move and age every particle; returns the number that expired
    pub fn advance(&mut self, dt: f32) -> usize {
        self.travel(dt);
        self.expire()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn mirage_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_mirage()).count()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
