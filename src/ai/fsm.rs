//! Enemy behaviour state machine
//!
//! `step` is a pure function over the [`Ai`] component and a snapshot of
//! what the enemy can perceive this frame. The AI processor turns the
//! returned [`Decision`] into bus and mailbox traffic.
//!
//! Transitions:
//! - wander -> chase: player closer than `detection_range`
//! - chase -> wander: player further than `detection_range * chase_exit_factor`
//! - chase -> attack: player closer than `attack_range`
//! - attack -> chase: windup elapsed and either the weapon is still cooling
//!   down or the player is further than `attack_range * attack_exit_factor`
//! - any -> stunned while stunned, then back to the remembered state
//! - any -> dying, terminal

use crate::components::{Ai, AiState};
use crate::core::config::AiTuning;

/// What the enemy perceives this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Senses {
    /// `None` when there is no live player
    pub distance_to_player: Option<f32>,
    pub is_stunned: bool,
    pub is_dying: bool,
    /// Basic attack off cooldown
    pub attack_ready: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    /// Do nothing this frame
    Hold,
    /// Keep walking to the wander destination, picking a new one if `repick`
    Wander { repick: bool },
    /// Move toward the player
    Chase,
    /// Entered the attack state; the windup starts now
    Windup,
    /// Windup finished in range with the weapon ready
    Strike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: AiAction,
    /// New state when the step changed it
    pub entered: Option<AiState>,
}

impl Decision {
    fn stay(action: AiAction) -> Self {
        Self { action, entered: None }
    }

    fn enter(state: AiState, action: AiAction) -> Self {
        Self { action, entered: Some(state) }
    }
}

/// Advance one enemy by `dt` seconds
pub fn step(ai: &mut Ai, senses: &Senses, tuning: &AiTuning, dt: f32) -> Decision {
    if ai.state == AiState::Dying {
        return Decision::stay(AiAction::Hold);
    }
    if senses.is_dying {
        ai.state = AiState::Dying;
        ai.destination = None;
        return Decision::enter(AiState::Dying, AiAction::Hold);
    }

    if senses.is_stunned {
        if ai.state == AiState::Stunned {
            return Decision::stay(AiAction::Hold);
        }
        ai.resume_state = ai.state;
        ai.state = AiState::Stunned;
        ai.attack_timer = 0.0;
        return Decision::enter(AiState::Stunned, AiAction::Hold);
    }

    if ai.state == AiState::Stunned {
        ai.state = ai.resume_state;
        let action = match ai.state {
            AiState::Attack => {
                ai.attack_timer = 0.0;
                AiAction::Windup
            }
            AiState::Chase => AiAction::Chase,
            _ => AiAction::Wander { repick: ai.destination.is_none() },
        };
        return Decision::enter(ai.state, action);
    }

    let Some(distance) = senses.distance_to_player else {
        return match ai.state {
            AiState::Wander => wander(ai, tuning, dt),
            _ => {
                lose_target(ai);
                Decision::enter(AiState::Wander, AiAction::Wander { repick: true })
            }
        };
    };

    match ai.state {
        AiState::Wander => {
            if distance < tuning.detection_range {
                ai.state = AiState::Chase;
                ai.destination = None;
                Decision::enter(AiState::Chase, AiAction::Chase)
            } else {
                wander(ai, tuning, dt)
            }
        }
        AiState::Chase => {
            if distance > tuning.detection_range * tuning.chase_exit_factor {
                lose_target(ai);
                Decision::enter(AiState::Wander, AiAction::Wander { repick: true })
            } else if distance < tuning.attack_range {
                ai.state = AiState::Attack;
                ai.attack_timer = 0.0;
                Decision::enter(AiState::Attack, AiAction::Windup)
            } else {
                Decision::stay(AiAction::Chase)
            }
        }
        AiState::Attack => {
            ai.attack_timer += dt;
            if ai.attack_timer < tuning.windup {
                return Decision::stay(AiAction::Hold);
            }
            let in_range = distance <= tuning.attack_range * tuning.attack_exit_factor;
            if in_range && senses.attack_ready {
                ai.attack_timer = 0.0;
                Decision::stay(AiAction::Strike)
            } else {
                ai.state = AiState::Chase;
                ai.attack_timer = 0.0;
                Decision::enter(AiState::Chase, AiAction::Chase)
            }
        }
        AiState::Stunned | AiState::Dying => Decision::stay(AiAction::Hold),
    }
}

fn wander(ai: &mut Ai, tuning: &AiTuning, dt: f32) -> Decision {
    ai.wander_timer += dt;
    let repick = ai.destination.is_none() || ai.wander_timer >= tuning.wander_interval;
    if repick {
        ai.wander_timer = 0.0;
    }
    Decision::stay(AiAction::Wander { repick })
}

fn lose_target(ai: &mut Ai) {
    ai.state = AiState::Wander;
    ai.target = None;
    ai.destination = None;
    ai.wander_timer = 0.0;
    ai.attack_timer = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn senses(distance: f32) -> Senses {
        Senses {
            distance_to_player: Some(distance),
            attack_ready: true,
            ..Default::default()
        }
    }

    fn in_state(state: AiState) -> Ai {
        Ai { state, ..Ai::new() }
    }

    #[test]
    fn test_wander_to_chase_inside_detection() {
        let tuning = AiTuning::default();
        let mut ai = Ai::new();
        let d = step(&mut ai, &senses(140.0), &tuning, 0.1);
        assert_eq!(d.entered, Some(AiState::Chase));
        assert_eq!(ai.state, AiState::Chase);
    }

    #[test]
    fn test_chase_hysteresis_band() {
        let tuning = AiTuning::default();
        let mut ai = in_state(AiState::Chase);

        for distance in [151.0, 200.0, 225.0] {
            let d = step(&mut ai, &senses(distance), &tuning, 0.1);
            assert_eq!(ai.state, AiState::Chase, "left chase at {}", distance);
            assert_eq!(d.action, AiAction::Chase);
        }

        let d = step(&mut ai, &senses(225.5), &tuning, 0.1);
        assert_eq!(d.entered, Some(AiState::Wander));
        assert_eq!(ai.target, None);
    }

    #[test]
    fn test_wander_does_not_chase_outside_detection() {
        let tuning = AiTuning::default();
        let mut ai = Ai::new();
        let d = step(&mut ai, &senses(200.0), &tuning, 0.1);
        assert_eq!(ai.state, AiState::Wander);
        assert_eq!(d.action, AiAction::Wander { repick: true });
    }

    #[test]
    fn test_wander_repicks_on_interval() {
        let tuning = AiTuning::default();
        let mut ai = Ai::new();
        ai.destination = Some(crate::core::types::Vec2::new(1.0, 1.0));

        let d = step(&mut ai, &senses(500.0), &tuning, 1.0);
        assert_eq!(d.action, AiAction::Wander { repick: false });
        let d = step(&mut ai, &senses(500.0), &tuning, 1.0);
        assert_eq!(d.action, AiAction::Wander { repick: true });
        assert_eq!(ai.wander_timer, 0.0);
    }

    #[test]
    fn test_attack_windup_then_strike() {
        let tuning = AiTuning::default();
        let mut ai = in_state(AiState::Chase);

        let d = step(&mut ai, &senses(40.0), &tuning, 0.25);
        assert_eq!(d.action, AiAction::Windup);
        assert_eq!(ai.state, AiState::Attack);

        let d = step(&mut ai, &senses(40.0), &tuning, 0.25);
        assert_eq!(d.action, AiAction::Hold);
        let d = step(&mut ai, &senses(40.0), &tuning, 0.25);
        assert_eq!(d.action, AiAction::Strike);
        assert_eq!(ai.state, AiState::Attack);
    }

    #[test]
    fn test_attack_falls_back_when_cooling_down() {
        let tuning = AiTuning::default();
        let mut ai = in_state(AiState::Attack);
        let mut s = senses(40.0);
        s.attack_ready = false;

        let d = step(&mut ai, &s, &tuning, 0.5);
        assert_eq!(d.entered, Some(AiState::Chase));
        assert_eq!(d.action, AiAction::Chase);
    }

    #[test]
    fn test_attack_holds_during_windup_even_out_of_range() {
        let tuning = AiTuning::default();
        let mut ai = in_state(AiState::Attack);

        let d = step(&mut ai, &senses(100.0), &tuning, 0.25);
        assert_eq!(d.action, AiAction::Hold);
        let d = step(&mut ai, &senses(100.0), &tuning, 0.25);
        assert_eq!(d.entered, Some(AiState::Chase));
    }

    #[test]
    fn test_stun_restores_previous_state() {
        let tuning = AiTuning::default();
        let mut ai = in_state(AiState::Chase);
        let mut s = senses(100.0);
        s.is_stunned = true;

        let d = step(&mut ai, &s, &tuning, 0.1);
        assert_eq!(d.entered, Some(AiState::Stunned));
        assert_eq!(step(&mut ai, &s, &tuning, 0.1).action, AiAction::Hold);

        s.is_stunned = false;
        let d = step(&mut ai, &s, &tuning, 0.1);
        assert_eq!(d.entered, Some(AiState::Chase));
        assert_eq!(ai.state, AiState::Chase);
    }

    #[test]
    fn test_dying_is_terminal() {
        let tuning = AiTuning::default();
        let mut ai = in_state(AiState::Attack);
        let mut s = senses(10.0);
        s.is_dying = true;

        assert_eq!(step(&mut ai, &s, &tuning, 0.1).entered, Some(AiState::Dying));

        s.is_dying = false;
        s.is_stunned = true;
        let d = step(&mut ai, &s, &tuning, 0.1);
        assert_eq!(d, Decision { action: AiAction::Hold, entered: None });
        assert_eq!(ai.state, AiState::Dying);
    }

    #[test]
    fn test_no_player_returns_to_wander() {
        let tuning = AiTuning::default();
        let mut ai = in_state(AiState::Attack);
        let d = step(&mut ai, &Senses::default(), &tuning, 0.1);
        assert_eq!(d.entered, Some(AiState::Wander));
    }
}
