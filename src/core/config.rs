//! Game configuration with documented constants
//!
//! All tuning numbers are collected here. A TOML file can override any
//! subset of them; missing keys keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::kinds::{EnemyKind, SkillKind, WeaponKind};

/// Top-level configuration handed to every processor through the frame context
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the simulation RNG (wander destinations, particle spread)
    pub seed: u64,
    pub ai: AiTuning,
    pub combat: CombatTuning,
    pub player: PlayerTuning,
    pub enemies: EnemyRoster,
    pub weapons: WeaponTable,
    pub skills: SkillTable,
    pub render: RenderTuning,
}

/// Enemy behaviour thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Distance below which a wandering enemy starts chasing (world units)
    pub detection_range: f32,

    /// Distance below which a chasing enemy starts an attack
    pub attack_range: f32,

    /// A chasing enemy gives up once the player is further than
    /// `detection_range * chase_exit_factor`. Must be >= 1 or the
    /// wander/chase boundary flickers.
    pub chase_exit_factor: f32,

    /// An attacking enemy falls back to chase once the player is further
    /// than `attack_range * attack_exit_factor`.
    pub attack_exit_factor: f32,

    /// Delay between entering the attack state and the strike (seconds)
    pub windup: f32,

    /// How often a wandering enemy picks a new destination (seconds)
    pub wander_interval: f32,

    /// Maximum distance of a wander destination from the enemy
    pub wander_radius: f32,

    /// Movement stops when closer than this to the destination
    pub arrive_distance: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            detection_range: 150.0,
            attack_range: 50.0,
            chase_exit_factor: 1.5,
            attack_exit_factor: 1.5,
            windup: 0.5,
            wander_interval: 2.0,
            wander_radius: 100.0,
            arrive_distance: 5.0,
        }
    }
}

/// Combat timings shared by all combatants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Time between reaching zero health and removal from the store (seconds)
    pub death_duration: f32,
    /// How long a block stays up after the block key
    pub block_duration: f32,
    /// Delay before the block key works again
    pub block_cooldown: f32,
    /// Fraction of damage removed while blocking (1.0 = full block)
    pub block_mitigation: f32,
    /// Permanent fraction removed by armored enemies
    pub armor_mitigation: f32,
    /// How long attack/hit animations stay visible
    pub attack_animation: f32,
    /// Lifetime of floating combat text
    pub mirage_lifetime: f32,
    /// Lifetime of transient textures (weapon swings, blood)
    pub texture_lifetime: f32,
    /// Lifetime of speech bubbles
    pub speech_bubble_duration: f32,
    /// Interval of the dragon burn aura
    pub burn_interval: f32,
    /// Damage per burn tick
    pub burn_damage: i32,
    /// Radius of the dragon burn aura
    pub burn_radius: f32,
    /// Damage dealt by a cow to everything it walks into
    pub trample_damage: i32,
    pub trample_radius: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            death_duration: 1.0,
            block_duration: 0.5,
            block_cooldown: 1.5,
            block_mitigation: 1.0,
            armor_mitigation: 0.25,
            attack_animation: 0.3,
            mirage_lifetime: 1.0,
            texture_lifetime: 0.3,
            speech_bubble_duration: 1.5,
            burn_interval: 1.0,
            burn_damage: 5,
            burn_radius: 70.0,
            trample_damage: 2,
            trample_radius: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: i32,
    /// Distance covered by one movement key press (world units)
    pub step: f32,
    /// Points awarded per enemy killed by the player
    pub score_per_kill: u32,
    pub start_weapon: WeaponKind,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            step: 10.0,
            score_per_kill: 100,
            start_weapon: WeaponKind::HitSquare,
        }
    }
}

/// Per-kind enemy statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub health: i32,
    /// Movement speed (world units per second)
    pub speed: f32,
    pub damage: i32,
    /// Minimum time between two strikes (seconds)
    pub attack_cooldown: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyRoster {
    pub stick_figure: EnemyStats,
    pub cow: EnemyStats,
    pub rambo: EnemyStats,
    pub dragon: EnemyStats,
    pub big: EnemyStats,
}

impl Default for EnemyRoster {
    fn default() -> Self {
        Self {
            stick_figure: EnemyStats { health: 30, speed: 120.0, damage: 10, attack_cooldown: 1.0 },
            cow: EnemyStats { health: 80, speed: 60.0, damage: 20, attack_cooldown: 2.0 },
            rambo: EnemyStats { health: 60, speed: 140.0, damage: 25, attack_cooldown: 1.2 },
            dragon: EnemyStats { health: 120, speed: 80.0, damage: 35, attack_cooldown: 1.8 },
            big: EnemyStats { health: 150, speed: 50.0, damage: 40, attack_cooldown: 2.5 },
        }
    }
}

impl EnemyRoster {
    pub fn get(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::StickFigure => &self.stick_figure,
            EnemyKind::Cow => &self.cow,
            EnemyKind::Rambo => &self.rambo,
            EnemyKind::Dragon => &self.dragon,
            EnemyKind::Big => &self.big,
        }
    }
}

/// Basic-attack weapon statistics
///
/// The hit area is a rectangle `reach` long and `width` wide extending from
/// the attacker in its facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: i32,
    pub cooldown: f32,
    pub reach: f32,
    pub width: f32,
    /// Stun applied on hit (seconds, 0 = none)
    pub stun: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTable {
    pub hit_square: WeaponStats,
    pub hit_line: WeaponStats,
    pub hit_whip: WeaponStats,
    pub charge: WeaponStats,
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self {
            hit_square: WeaponStats { damage: 25, cooldown: 0.3, reach: 40.0, width: 40.0, stun: 0.0 },
            hit_line: WeaponStats { damage: 20, cooldown: 0.4, reach: 80.0, width: 20.0, stun: 0.0 },
            hit_whip: WeaponStats { damage: 15, cooldown: 0.6, reach: 100.0, width: 30.0, stun: 0.5 },
            charge: WeaponStats { damage: 30, cooldown: 1.0, reach: 60.0, width: 60.0, stun: 1.0 },
        }
    }
}

impl WeaponTable {
    /// Stats for a player weapon; enemy claws and skills are not in the table
    pub fn get(&self, kind: WeaponKind) -> Option<&WeaponStats> {
        match kind {
            WeaponKind::HitSquare => Some(&self.hit_square),
            WeaponKind::HitLine => Some(&self.hit_line),
            WeaponKind::HitWhip => Some(&self.hit_whip),
            WeaponKind::Charge => Some(&self.charge),
            WeaponKind::Claw | WeaponKind::Skill => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillStats {
    pub damage: i32,
    pub cooldown: f32,
    /// Blast radius for area skills, travel distance for the laser
    pub range: f32,
    pub stun: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillTable {
    pub cleave: SkillStats,
    pub laser: SkillStats,
    pub explosion: SkillStats,
    /// Laser particle speed (world units per second)
    pub laser_speed: f32,
}

impl Default for SkillTable {
    fn default() -> Self {
        Self {
            cleave: SkillStats { damage: 30, cooldown: 2.0, range: 60.0, stun: 0.0 },
            laser: SkillStats { damage: 20, cooldown: 3.0, range: 300.0, stun: 0.0 },
            explosion: SkillStats { damage: 40, cooldown: 5.0, range: 90.0, stun: 1.5 },
            laser_speed: 400.0,
        }
    }
}

impl SkillTable {
    pub fn get(&self, kind: SkillKind) -> &SkillStats {
        match kind {
            SkillKind::Cleave => &self.cleave,
            SkillKind::Laser => &self.laser,
            SkillKind::Explosion => &self.explosion,
        }
    }
}

/// Mapping from world units to terminal cells
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderTuning {
    pub cell_width: f32,
    pub cell_height: f32,
    /// Name of the restart key shown on the game over and victory banners
    pub restart_hint: String,
}

impl Default for RenderTuning {
    fn default() -> Self {
        Self {
            cell_width: 10.0,
            cell_height: 20.0,
            restart_hint: "Enter".to_string(),
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a (possibly partial) config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let ai = &self.ai;
        if ai.chase_exit_factor < 1.0 || ai.attack_exit_factor < 1.0 {
            return Err(SimError::InvalidConfig(format!(
                "exit factors must be >= 1 (chase {}, attack {})",
                ai.chase_exit_factor, ai.attack_exit_factor
            )));
        }

        if ai.attack_range >= ai.detection_range {
            return Err(SimError::InvalidConfig(format!(
                "attack_range ({}) should be < detection_range ({})",
                ai.attack_range, ai.detection_range
            )));
        }

        if ai.windup <= 0.0 || ai.wander_interval <= 0.0 || self.combat.death_duration <= 0.0 {
            return Err(SimError::InvalidConfig("durations must be positive".into()));
        }

        let mitigations = [self.combat.block_mitigation, self.combat.armor_mitigation];
        if mitigations.iter().any(|m| !(0.0..=1.0).contains(m)) {
            return Err(SimError::InvalidConfig("mitigation must be within 0..=1".into()));
        }

        for (name, value) in self.distances() {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }

        let scales = [
            ("skills.laser_speed", self.skills.laser_speed),
            ("render.cell_width", self.render.cell_width),
            ("render.cell_height", self.render.cell_height),
        ];
        for (name, value) in scales {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidConfig(format!("{} must be positive, got {}", name, value)));
            }
        }

        Ok(())
    }

    /// Lengths, speeds and timers that feed random ranges or motion
    fn distances(&self) -> Vec<(String, f32)> {
        let ai = &self.ai;
        let combat = &self.combat;
        let mut values = vec![
            ("ai.detection_range".to_string(), ai.detection_range),
            ("ai.attack_range".to_string(), ai.attack_range),
            ("ai.wander_radius".to_string(), ai.wander_radius),
            ("ai.arrive_distance".to_string(), ai.arrive_distance),
            ("combat.block_duration".to_string(), combat.block_duration),
            ("combat.block_cooldown".to_string(), combat.block_cooldown),
            ("combat.burn_interval".to_string(), combat.burn_interval),
            ("combat.burn_radius".to_string(), combat.burn_radius),
            ("combat.trample_radius".to_string(), combat.trample_radius),
            ("player.step".to_string(), self.player.step),
        ];
        for kind in EnemyKind::ALL {
            let stats = self.enemies.get(kind);
            values.push((format!("enemies.{:?}.speed", kind), stats.speed));
            values.push((format!("enemies.{:?}.attack_cooldown", kind), stats.attack_cooldown));
        }
        let weapons = &self.weapons;
        for (name, w) in [
            ("hit_square", &weapons.hit_square),
            ("hit_line", &weapons.hit_line),
            ("hit_whip", &weapons.hit_whip),
            ("charge", &weapons.charge),
        ] {
            values.push((format!("weapons.{}.reach", name), w.reach));
            values.push((format!("weapons.{}.width", name), w.width));
            values.push((format!("weapons.{}.cooldown", name), w.cooldown));
        }
        for kind in SkillKind::ALL {
            let stats = self.skills.get(kind);
            values.push((format!("skills.{:?}.range", kind), stats.range));
            values.push((format!("skills.{:?}.cooldown", kind), stats.cooldown));
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml(
            r#"
            seed = 7
            [ai]
            detection_range = 200.0
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.seed, 7);
        assert_eq!(config.ai.detection_range, 200.0);
        assert_eq!(config.ai.attack_range, 50.0);
        assert_eq!(config.enemies.get(EnemyKind::Cow).health, 80);
    }

    #[test]
    fn test_rejects_flickering_hysteresis() {
        let mut config = GameConfig::default();
        config.ai.chase_exit_factor = 0.9;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_attack_range_beyond_detection() {
        let mut config = GameConfig::default();
        config.ai.attack_range = 300.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_wander_radius() {
        let result = GameConfig::from_toml("[ai]\nwander_radius = -5.0");
        assert!(matches!(result, Err(SimError::InvalidConfig(msg)) if msg.contains("wander_radius")));
    }

    #[test]
    fn test_rejects_non_finite_and_zero_scales() {
        let mut config = GameConfig::default();
        config.ai.arrive_distance = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.skills.laser_speed = 0.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.enemies.cow.speed = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_weapon_table_has_no_claw() {
        let table = WeaponTable::default();
        assert!(table.get(WeaponKind::Claw).is_none());
        assert_eq!(table.get(WeaponKind::HitSquare).map(|w| w.damage), Some(25));
    }
}
