//! The fixed processor order
//!
//! Every frame runs the processors listed in [`PIPELINE_ORDER`], front to
//! back. A message posted on the broadcast bus by the processor at position
//! `i` is visible to positions `> i` of the same frame only, so the order
//! is load-bearing: input before movement, combat before rendering.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ProcessorId {
    Gametime,
    Input,
    Movement,
    Ai,
    OffensiveAttack,
    OffensiveSkill,
    ParticleEmitter,
    PassiveAttack,
    Particle,
    OnHit,
    Damage,
    Defense,
    Attackable,
    MirageEmitter,
    Scene,
    Environment,
    Enemy,
    Player,
    CharacterAnimation,
    RenderableMinimal,
    Renderable,
}

/// Stage order of one frame
pub const PIPELINE_ORDER: [ProcessorId; 21] = [
    // 1. game time (dt, elapsed)
    ProcessorId::Gametime,
    // 2. keypresses from the input collaborator
    ProcessorId::Input,
    // 3. apply movement requests
    ProcessorId::Movement,
    // 4. enemy state machines
    ProcessorId::Ai,
    // 5-9. everything that produces AttackAt
    ProcessorId::OffensiveAttack,
    ProcessorId::OffensiveSkill,
    ProcessorId::ParticleEmitter,
    ProcessorId::PassiveAttack,
    ProcessorId::Particle,
    // 10-13. everything that resolves AttackAt
    ProcessorId::OnHit,
    ProcessorId::Damage,
    ProcessorId::Defense,
    ProcessorId::Attackable,
    // 14. floating combat text
    ProcessorId::MirageEmitter,
    // 15-18. spawning, scene flow, death bookkeeping
    ProcessorId::Scene,
    ProcessorId::Environment,
    ProcessorId::Enemy,
    ProcessorId::Player,
    // 19. animation state from this frame's events
    ProcessorId::CharacterAnimation,
    // 20. rendering events, raw textures first
    ProcessorId::RenderableMinimal,
    ProcessorId::Renderable,
];

impl ProcessorId {
    pub fn name(&self) -> &'static str {
        match self {
            ProcessorId::Gametime => "gametime",
            ProcessorId::Input => "input",
            ProcessorId::Movement => "movement",
            ProcessorId::Ai => "ai",
            ProcessorId::OffensiveAttack => "offensive_attack",
            ProcessorId::OffensiveSkill => "offensive_skill",
            ProcessorId::ParticleEmitter => "particle_emitter",
            ProcessorId::PassiveAttack => "passive_attack",
            ProcessorId::Particle => "particle",
            ProcessorId::OnHit => "on_hit",
            ProcessorId::Damage => "damage",
            ProcessorId::Defense => "defense",
            ProcessorId::Attackable => "attackable",
            ProcessorId::MirageEmitter => "mirage_emitter",
            ProcessorId::Scene => "scene",
            ProcessorId::Environment => "environment",
            ProcessorId::Enemy => "enemy",
            ProcessorId::Player => "player",
            ProcessorId::CharacterAnimation => "character_animation",
            ProcessorId::RenderableMinimal => "renderable_minimal",
            ProcessorId::Renderable => "renderable",
        }
    }

    /// Zero-based stage index in [`PIPELINE_ORDER`]
    pub fn position(&self) -> usize {
        PIPELINE_ORDER
            .iter()
            .position(|id| id == self)
            .unwrap_or(PIPELINE_ORDER.len())
    }

    /// Whether messages posted by `self` are visible to `reader` in the same frame
    pub fn precedes(&self, reader: ProcessorId) -> bool {
        self.position() < reader.position()
    }
}

impl std::fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
