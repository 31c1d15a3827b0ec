//! Fight session state.
//!
//! A session aggregates both actors, the top-level phase, the roster
//! selection and the banner clock. It holds no configuration; the
//! [`FightController`](crate::fight::FightController) drives it.

use serde::{Deserialize, Serialize};

use crate::hud::{HudSummary, Ticker};
use crate::opponent::Opponent;
use crate::player::Player;

/// Top-level session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Title screen, waiting for confirm.
    #[default]
    Title,
    /// Fight in progress.
    Fighting,
    /// Opponent stamina exhausted, waiting for confirm.
    Victory,
}

impl Phase {
    /// Returns display name for the phase.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Fighting => "Fighting",
            Self::Victory => "Victory",
        }
    }

    /// Returns whether this phase runs the simulation.
    #[must_use]
    pub fn should_simulate(self) -> bool {
        matches!(self, Self::Fighting)
    }
}

/// One player's run of fights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightSession {
    pub(crate) phase: Phase,
    pub(crate) selected_opponent: usize,
    pub(crate) player: Player,
    pub(crate) opponent: Opponent,
    pub(crate) ticker: Ticker,
    pub(crate) hud: HudSummary,
}

impl FightSession {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Roster index of the current opponent.
    #[must_use]
    pub const fn selected_opponent(&self) -> usize {
        self.selected_opponent
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable access to the player, for hooks such as granting stars.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The opponent.
    #[must_use]
    pub const fn opponent(&self) -> &Opponent {
        &self.opponent
    }

    /// Banner clock.
    #[must_use]
    pub const fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// HUD values from the last tick.
    #[must_use]
    pub const fn hud(&self) -> &HudSummary {
        &self.hud
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_fighting_simulates() {
        assert!(!Phase::Title.should_simulate());
        assert!(Phase::Fighting.should_simulate());
        assert!(!Phase::Victory.should_simulate());
        assert_eq!(Phase::default(), Phase::Title);
        assert_eq!(Phase::Victory.display_name(), "Victory");
    }
}
