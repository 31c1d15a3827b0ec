//! HUD summary and the scrolling banner.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::opponent::Opponent;
use crate::player::Player;

/// Values shown in the HUD line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSummary {
    /// Current opponent's name.
    pub opponent_name: String,
    /// Player hearts.
    pub hearts: u32,
    /// Player star charges.
    pub stars: u32,
    /// Opponent stamina, floored and clamped at zero.
    pub opponent_stamina: u32,
}

impl HudSummary {
    /// Summarize the two actors.
    #[must_use]
    pub fn capture(player: &Player, opponent: &Opponent) -> Self {
        Self {
            opponent_name: opponent.display_name().to_string(),
            hearts: player.hearts(),
            stars: player.star_charges(),
            opponent_stamina: display_stamina(opponent.stamina()),
        }
    }

    /// Full HUD line, with the link appended when one is configured.
    #[must_use]
    pub fn text(&self, link: &str) -> String {
        if link.is_empty() {
            self.to_string()
        } else {
            format!("{self} - Read more at {link}")
        }
    }
}

impl fmt::Display for HudSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Opponent: {} | Hearts: {} | Stars: {} | Opp Stamina: {}",
            self.opponent_name, self.hearts, self.stars, self.opponent_stamina
        )
    }
}

/// Stamina as displayed: floored, never negative.
#[must_use]
pub fn display_stamina(stamina: f32) -> u32 {
    if stamina.is_nan() {
        return 0;
    }
    stamina.max(0.0).floor() as u32
}

/// Rotates through banner lines at a fixed interval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    index: usize,
    elapsed: f32,
}

impl Ticker {
    /// Advance by `dt` ms over `len` lines.
    ///
    /// A long frame advances at most one line and restarts the interval.
    pub fn advance(&mut self, dt: f32, interval_ms: f32, len: usize) {
        self.elapsed += dt;
        if self.elapsed > interval_ms {
            self.elapsed = 0.0;
            if len > 0 {
                self.index = (self.index + 1) % len;
            }
        }
    }

    /// Index of the line currently shown.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Line currently shown, empty when there are no lines.
    #[must_use]
    pub fn current<'a>(&self, lines: &'a [String]) -> &'a str {
        lines
            .get(self.index % lines.len().max(1))
            .map_or("", String::as_str)
    }
}
