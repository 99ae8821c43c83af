//! Combat components: health, offense, defense and passive auras
//!
//! Ownership: `Attackable` is written by the attackable processor, `Offense`
//! by the offensive-attack and offensive-skill processors, `Defense` by the
//! defense processor and `Passive` by the passive-attack processor. Any
//! processor may read them.

use serde::{Deserialize, Serialize};

use crate::core::kinds::{SkillKind, WeaponKind};
use crate::core::types::Frame;

/// Health and incapacitation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attackable {
    pub health: i32,
    pub max_health: i32,
    pub is_stunned: bool,
    pub stun_remaining: f32,
    /// Set exactly once when health reaches zero; never cleared
    pub is_dying: bool,
    /// Multiplier applied to incoming damage before defense
    pub damage_taken_multiplier: f32,
    /// Frame in which health last went down
    pub damaged_at: Option<Frame>,
}

impl Attackable {
    pub fn new(max_health: i32) -> Self {
        Self {
            health: max_health,
            max_health,
            is_stunned: false,
            stun_remaining: 0.0,
            is_dying: false,
            damage_taken_multiplier: 1.0,
            damaged_at: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0 && !self.is_dying
    }

    /// Subtract damage, clamping at zero. Returns the health left.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        self.health = (self.health - amount.max(0)).max(0);
        self.health
    }

    /// Stun for `duration`, keeping the longer of an existing stun
    pub fn stun(&mut self, duration: f32) {
        self.is_stunned = true;
        self.stun_remaining = self.stun_remaining.max(duration);
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

/// Equipped weapon and cooldown timers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offense {
    pub weapon: WeaponKind,
    pub damage: i32,
    /// Minimum time between two basic attacks
    pub cooldown: f32,
    pub cooldown_remaining: f32,
    /// Stun applied by the basic attack
    pub stun: f32,
    /// Remaining cooldown per skill, indexed by [`SkillKind::slot`]
    pub skill_cooldowns: [f32; 3],
}

impl Offense {
    pub fn new(weapon: WeaponKind, damage: i32, cooldown: f32) -> Self {
        Self {
            weapon,
            damage,
            cooldown,
            cooldown_remaining: 0.0,
            stun: 0.0,
            skill_cooldowns: [0.0; 3],
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    /// Start the cooldown window after an attack
    pub fn trigger(&mut self) {
        self.cooldown_remaining = self.cooldown;
    }

    pub fn skill_ready(&self, skill: SkillKind) -> bool {
        self.skill_cooldowns[skill.slot()] <= 0.0
    }

    pub fn trigger_skill(&mut self, skill: SkillKind, cooldown: f32) {
        self.skill_cooldowns[skill.slot()] = cooldown;
    }

    pub fn tick_attack(&mut self, dt: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }

    pub fn tick_skills(&mut self, dt: f32) {
        for cd in &mut self.skill_cooldowns {
            *cd = (*cd - dt).max(0.0);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefenseMode {
    /// Active only for a short window after the block key
    Block,
    /// Always active
    Armor,
}

/// Damage mitigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defense {
    pub mode: DefenseMode,
    /// Fraction of incoming damage removed while active
    pub mitigation: f32,
    pub block_remaining: f32,
    pub cooldown_remaining: f32,
}

impl Defense {
    pub fn block(mitigation: f32) -> Self {
        Self {
            mode: DefenseMode::Block,
            mitigation,
            block_remaining: 0.0,
            cooldown_remaining: 0.0,
        }
    }

    pub fn armor(mitigation: f32) -> Self {
        Self {
            mode: DefenseMode::Armor,
            mitigation,
            block_remaining: 0.0,
            cooldown_remaining: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        match self.mode {
            DefenseMode::Armor => true,
            DefenseMode::Block => self.block_remaining > 0.0,
        }
    }

    /// Damage left after mitigation, rounded to the nearest point
    pub fn mitigate(&self, amount: i32) -> i32 {
        if !self.is_active() {
            return amount;
        }
        (amount as f32 * (1.0 - self.mitigation)).round() as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PassiveTrigger {
    /// Fires every `every` seconds
    Interval { every: f32 },
    /// Fires whenever the carrier moved this frame
    OnMove,
}

/// Damage aura around its carrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passive {
    pub trigger: PassiveTrigger,
    pub damage: i32,
    pub radius: f32,
    pub timer: f32,
}

impl Passive {
    pub fn interval(every: f32, damage: i32, radius: f32) -> Self {
        Self {
            trigger: PassiveTrigger::Interval { every },
            damage,
            radius,
            timer: 0.0,
        }
    }

    pub fn on_move(damage: i32, radius: f32) -> Self {
        Self {
            trigger: PassiveTrigger::OnMove,
            damage,
            radius,
            timer: 0.0,
        }
    }
}
