//! Game content enumerations shared by components, messages and config

use serde::{Deserialize, Serialize};

use crate::core::types::Color;

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    StickFigure,
    Cow,
    Rambo,
    Dragon,
    Big,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::StickFigure,
        EnemyKind::Cow,
        EnemyKind::Rambo,
        EnemyKind::Dragon,
        EnemyKind::Big,
    ];

    pub fn glyph(&self) -> char {
        match self {
            EnemyKind::StickFigure => 'x',
            EnemyKind::Cow => 'C',
            EnemyKind::Rambo => 'R',
            EnemyKind::Dragon => 'D',
            EnemyKind::Big => 'B',
        }
    }

    pub fn color(&self) -> Color {
        match self {
            EnemyKind::StickFigure => Color::Red,
            EnemyKind::Cow => Color::Brown,
            EnemyKind::Rambo => Color::Magenta,
            EnemyKind::Dragon => Color::Green,
            EnemyKind::Big => Color::Yellow,
        }
    }
}

/// Weapons usable with the basic attack key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    #[default]
    HitSquare,
    HitLine,
    HitWhip,
    Charge,
    /// Enemy melee; always targets a single entity
    Claw,
    /// Damage dealt by skills, particles and auras
    Skill,
}

impl WeaponKind {
    /// Player weapon rotation for the weapon-select key
    pub fn next_player_weapon(&self) -> WeaponKind {
        match self {
            WeaponKind::HitSquare => WeaponKind::HitLine,
            WeaponKind::HitLine => WeaponKind::HitWhip,
            WeaponKind::HitWhip => WeaponKind::Charge,
            _ => WeaponKind::HitSquare,
        }
    }

    pub fn swing_glyph(&self) -> char {
        match self {
            WeaponKind::HitSquare => '#',
            WeaponKind::HitLine => '-',
            WeaponKind::HitWhip => '~',
            WeaponKind::Charge => '>',
            WeaponKind::Claw => '/',
            WeaponKind::Skill => '*',
        }
    }
}

/// Player skills bound to the skill keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Cleave,
    Laser,
    Explosion,
}

impl SkillKind {
    pub const ALL: [SkillKind; 3] = [SkillKind::Cleave, SkillKind::Laser, SkillKind::Explosion];

    pub fn slot(&self) -> usize {
        match self {
            SkillKind::Cleave => 0,
            SkillKind::Laser => 1,
            SkillKind::Explosion => 2,
        }
    }
}
