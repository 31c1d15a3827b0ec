//! Player state machine.
//!
//! The player starts actions only from idle: a request while busy is
//! dropped, never buffered, and never interrupts the current action. Timed
//! actions advance through the [`PhaseTable`] and fall back to idle once
//! complete. `Winded` is entered from outside when hearts run out.

use ringside_common::{Size, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::Placement;
use crate::input::PlayerAction;
use crate::timing::{AttackPhase, PhaseTable};

/// Starting (and unused) player stamina.
const PLAYER_STAMINA: f32 = 100.0;

/// Discrete player state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    /// Ready to act.
    #[default]
    Idle,
    /// Left jab in progress.
    JabLeft,
    /// Right jab in progress.
    JabRight,
    /// Dodging left.
    DodgeLeft,
    /// Dodging right.
    DodgeRight,
    /// Ducking.
    Duck,
    /// Star punch in progress.
    Star,
    /// Knocked down, waiting to recover.
    Winded,
}

impl PlayerState {
    /// State entered by starting `action`.
    #[must_use]
    pub fn for_action(action: PlayerAction) -> Self {
        match action {
            PlayerAction::JabLeft => Self::JabLeft,
            PlayerAction::JabRight => Self::JabRight,
            PlayerAction::DodgeLeft => Self::DodgeLeft,
            PlayerAction::DodgeRight => Self::DodgeRight,
            PlayerAction::Duck => Self::Duck,
            PlayerAction::Star => Self::Star,
        }
    }

    /// Animation key for this state.
    #[must_use]
    pub fn animation_key(self) -> &'static str {
        match self {
            Self::Idle | Self::Winded => "idle",
            Self::JabLeft => "jab_left",
            Self::JabRight => "jab_right",
            Self::DodgeLeft => "dodge_left",
            Self::DodgeRight => "dodge_right",
            Self::Duck => "duck",
            Self::Star => "star",
        }
    }
}

/// An offensive action whose damage window can be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strike {
    /// Either jab.
    Jab,
    /// Star punch.
    Star,
}

/// The player actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the sprite.
    pub position: Vec2,
    /// Sprite size.
    pub size: Size,
    state: PlayerState,
    state_elapsed: f32,
    invulnerable_remaining: f32,
    hearts: u32,
    max_hearts: u32,
    star_charges: u32,
    stamina: f32,
}

impl Player {
    /// Creates a player ready to fight.
    #[must_use]
    pub fn new(placement: Placement, hearts_start: u32, stars_start: u32) -> Self {
        let mut player = Self {
            position: placement.position,
            size: placement.size,
            state: PlayerState::Idle,
            state_elapsed: 0.0,
            invulnerable_remaining: 0.0,
            hearts: 0,
            max_hearts: 0,
            star_charges: 0,
            stamina: 0.0,
        };
        player.reset(hearts_start, stars_start);
        player
    }

    /// Reinitialize every mutable field.
    pub fn reset(&mut self, hearts_start: u32, stars_start: u32) {
        self.state = PlayerState::Idle;
        self.state_elapsed = 0.0;
        self.invulnerable_remaining = 0.0;
        self.hearts = hearts_start;
        self.max_hearts = hearts_start;
        self.star_charges = stars_start;
        self.stamina = PLAYER_STAMINA;
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PlayerState {
        self.state
    }

    /// Time spent in the current state (ms).
    #[must_use]
    pub const fn state_elapsed(&self) -> f32 {
        self.state_elapsed
    }

    /// Remaining invulnerability (ms).
    #[must_use]
    pub const fn invulnerable_remaining(&self) -> f32 {
        self.invulnerable_remaining
    }

    /// Whether the player currently ignores punches.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_remaining > 0.0
    }

    /// Remaining hearts.
    #[must_use]
    pub const fn hearts(&self) -> u32 {
        self.hearts
    }

    /// Hearts restored after a knockout.
    #[must_use]
    pub const fn max_hearts(&self) -> u32 {
        self.max_hearts
    }

    /// Star charges available.
    #[must_use]
    pub const fn star_charges(&self) -> u32 {
        self.star_charges
    }

    /// Player stamina.
    #[must_use]
    pub const fn stamina(&self) -> f32 {
        self.stamina
    }

    /// Whether a new action may start.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == PlayerState::Idle
    }

    /// Add one star charge.
    pub fn grant_star(&mut self) {
        self.star_charges = self.star_charges.saturating_add(1);
    }

    /// Extend invulnerability to at least `duration_ms`.
    pub fn grant_invulnerability(&mut self, duration_ms: f32) {
        self.invulnerable_remaining = self.invulnerable_remaining.max(duration_ms);
    }

    /// Try to start `action`. Returns whether the action started.
    ///
    /// Ignored unless idle; a star also needs a charge.
    pub fn try_start(&mut self, action: PlayerAction, table: &PhaseTable) -> bool {
        if !self.is_idle() {
            trace!(?action, state = ?self.state, "action ignored, player busy");
            return false;
        }

        match action {
            PlayerAction::Star if self.star_charges == 0 => {
                trace!("star ignored, no charges");
                return false;
            },
            PlayerAction::Star => self.star_charges -= 1,
            PlayerAction::DodgeLeft | PlayerAction::DodgeRight => {
                self.invulnerable_remaining = table.dodge_invuln;
            },
            PlayerAction::Duck => self.invulnerable_remaining = table.duck_invuln,
            PlayerAction::JabLeft | PlayerAction::JabRight => {},
        }

        self.enter(PlayerState::for_action(action));
        true
    }

    /// Advance timers by `dt` ms.
    pub fn advance(&mut self, dt: f32) {
        self.state_elapsed += dt;
        self.invulnerable_remaining = (self.invulnerable_remaining - dt).max(0.0);
    }

    /// Sub-phase of the current timed action, if any.
    #[must_use]
    pub fn action_phase(&self, table: &PhaseTable) -> Option<AttackPhase> {
        table
            .window(self.state)
            .map(|window| window.phase_at(self.state_elapsed))
    }

    /// The strike whose damage window is open right now.
    #[must_use]
    pub fn open_strike(&self, table: &PhaseTable) -> Option<Strike> {
        let strike = match self.state {
            PlayerState::JabLeft | PlayerState::JabRight => Strike::Jab,
            PlayerState::Star => Strike::Star,
            _ => return None,
        };
        self.action_phase(table)
            .filter(AttackPhase::can_damage)
            .map(|_| strike)
    }

    /// Run the timed-action logic for this tick.
    ///
    /// Completed actions return to idle. Returns the strike whose damage
    /// window is open after the update.
    pub fn update_action(&mut self, table: &PhaseTable) -> Option<Strike> {
        if self.action_phase(table).is_some_and(|p| p.is_finished()) {
            self.enter(PlayerState::Idle);
        }
        self.open_strike(table)
    }

    /// Take one heart, clamped at zero. Returns whether a heart was lost.
    pub fn lose_heart(&mut self) -> bool {
        if self.hearts == 0 {
            return false;
        }
        self.hearts -= 1;
        true
    }

    /// Knockout handling, run once per tick after damage.
    ///
    /// With no hearts left the player becomes winded; once the pause has
    /// elapsed hearts are restored and the player is idle again. Returns
    /// `true` on the tick the player recovers.
    pub fn update_knockout(&mut self, table: &PhaseTable) -> bool {
        if self.hearts > 0 {
            return false;
        }
        if self.state != PlayerState::Winded {
            debug!("player knocked down");
            self.enter(PlayerState::Winded);
            return false;
        }
        if self.state_elapsed > table.winded {
            self.hearts = self.max_hearts;
            self.enter(PlayerState::Idle);
            debug!(hearts = self.hearts, "player recovered");
            return true;
        }
        false
    }

    fn enter(&mut self, state: PlayerState) {
        debug!(from = ?self.state, to = ?state, "player transition");
        self.state = state;
        self.state_elapsed = 0.0;
    }
}
