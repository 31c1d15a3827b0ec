//! Declarative action timing.
//!
//! Every player action is described by a startup/active/recovery window and
//! a single routine maps elapsed state time to the current sub-phase.
//! Defensive actions use a window with no startup and no active part.

use serde::{Deserialize, Serialize};

use crate::config::GameData;
use crate::player::PlayerState;

/// Sub-phase of a timed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackPhase {
    /// Winding up, no effect.
    Windup,
    /// Active damage window.
    Active,
    /// Recovering, no effect.
    Recovery,
    /// Action finished, actor returns to idle.
    Complete,
}

impl AttackPhase {
    /// Check if the action can deal damage.
    #[must_use]
    pub fn can_damage(&self) -> bool {
        *self == Self::Active
    }

    /// Check if the action is finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        *self == Self::Complete
    }
}

/// Timing of one action (ms).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionWindow {
    /// Duration of the wind-up.
    pub startup: f32,
    /// Duration of the damage window.
    pub active: f32,
    /// Duration of the recovery.
    pub recovery: f32,
}

impl ActionWindow {
    /// Create a new action window.
    #[must_use]
    pub fn new(startup: f32, active: f32, recovery: f32) -> Self {
        Self {
            startup: startup.max(0.0),
            active: active.max(0.0),
            recovery: recovery.max(0.0),
        }
    }

    /// An action that only lasts, without any damage window.
    #[must_use]
    pub fn lasting(duration: f32) -> Self {
        Self::new(0.0, 0.0, duration)
    }

    /// Get total action duration.
    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.startup + self.active + self.recovery
    }

    /// Sub-phase after `elapsed` ms in the action.
    #[must_use]
    pub fn phase_at(&self, elapsed: f32) -> AttackPhase {
        if elapsed < self.startup {
            AttackPhase::Windup
        } else if elapsed < self.startup + self.active {
            AttackPhase::Active
        } else if elapsed < self.total_duration() {
            AttackPhase::Recovery
        } else {
            AttackPhase::Complete
        }
    }
}

/// Per-state duration table for the player, built once per fight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTable {
    /// Both jabs.
    pub jab: ActionWindow,
    /// Star punch.
    pub star: ActionWindow,
    /// Dodges and duck.
    pub evade: ActionWindow,
    /// Invulnerability granted on dodge entry.
    pub dodge_invuln: f32,
    /// Invulnerability granted on duck entry.
    pub duck_invuln: f32,
    /// Knockout pause.
    pub winded: f32,
}

impl PhaseTable {
    /// Build the table from game data.
    #[must_use]
    pub fn from_data(data: &GameData) -> Self {
        let p = &data.tuning.player;
        Self {
            jab: ActionWindow::new(p.jab_startup_ms, p.jab_active_ms, p.jab_recovery_ms),
            star: ActionWindow::new(p.star_startup_ms, p.star_active_ms, p.star_recovery_ms),
            evade: ActionWindow::lasting(p.evade_ms),
            dodge_invuln: p.dodge_invuln_ms,
            duck_invuln: p.duck_invuln_ms,
            winded: data.hud.winded_ms,
        }
    }

    /// Timing window of a player state, if it is a timed action.
    ///
    /// `Idle` has no window and `Winded` ends on its own rule.
    #[must_use]
    pub fn window(&self, state: PlayerState) -> Option<ActionWindow> {
        match state {
            PlayerState::JabLeft | PlayerState::JabRight => Some(self.jab),
            PlayerState::Star => Some(self.star),
            PlayerState::DodgeLeft | PlayerState::DodgeRight | PlayerState::Duck => {
                Some(self.evade)
            },
            PlayerState::Idle | PlayerState::Winded => None,
        }
    }
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self::from_data(&GameData::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_progression() {
        let w = ActionWindow::new(100.0, 50.0, 200.0);
        assert_eq!(w.phase_at(0.0), AttackPhase::Windup);
        assert_eq!(w.phase_at(99.0), AttackPhase::Windup);
        assert_eq!(w.phase_at(100.0), AttackPhase::Active);
        assert_eq!(w.phase_at(149.0), AttackPhase::Active);
        assert_eq!(w.phase_at(150.0), AttackPhase::Recovery);
        assert_eq!(w.phase_at(349.0), AttackPhase::Recovery);
        assert_eq!(w.phase_at(350.0), AttackPhase::Complete);
        assert_eq!(w.total_duration(), 350.0);
    }

    #[test]
    fn test_lasting_window_never_damages() {
        let w = ActionWindow::lasting(260.0);
        assert!(!w.phase_at(0.0).can_damage());
        assert_eq!(w.phase_at(10.0), AttackPhase::Recovery);
        assert!(w.phase_at(260.0).is_finished());
    }

    #[test]
    fn test_table_from_defaults() {
        let table = PhaseTable::default();
        assert_eq!(table.window(PlayerState::Idle), None);
        assert_eq!(table.window(PlayerState::Winded), None);
        assert_eq!(table.window(PlayerState::JabLeft), table.window(PlayerState::JabRight));
        // Star winds up longer and recovers longer than a jab
        let star = table.window(PlayerState::Star).expect("star window");
        assert!(star.startup > table.jab.startup);
        assert!(star.recovery > table.jab.recovery);
    }
}
