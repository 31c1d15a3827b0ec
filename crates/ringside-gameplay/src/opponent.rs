//! Opponent state machine.
//!
//! The opponent cycles `Idle -> Tell -> Attack -> Recover -> Idle` on its
//! configured timings. Each transition fires once the state's limit has been
//! strictly exceeded. A swing connects at most once.

use ringside_common::{Size, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AttackTimings, OpponentProfile, Placement};

/// Opponent stamina at the start of a fight.
pub const OPPONENT_STAMINA: f32 = 100.0;

/// Discrete opponent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentState {
    /// Waiting before the next telegraph.
    #[default]
    Idle,
    /// Telegraphing the next punch.
    Tell,
    /// Punch damage window.
    Attack,
    /// Recovering after a punch.
    Recover,
}

impl OpponentState {
    /// Animation key for this state.
    #[must_use]
    pub fn animation_key(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Tell => "tell",
            Self::Attack => "punch",
            Self::Recover => "hit",
        }
    }

    /// State following this one in the cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::Tell,
            Self::Tell => Self::Attack,
            Self::Attack => Self::Recover,
            Self::Recover => Self::Idle,
        }
    }

    /// Time this state lasts before the cycle moves on (ms).
    #[must_use]
    pub fn limit(self, timings: &AttackTimings, idle_buffer_ms: f32) -> f32 {
        match self {
            Self::Idle => timings.tell_ms + idle_buffer_ms,
            Self::Tell => timings.tell_ms,
            Self::Attack => timings.active_ms,
            Self::Recover => timings.recovery_ms,
        }
    }
}

/// The opponent actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    /// Top-left corner of the sprite.
    pub position: Vec2,
    /// Sprite size.
    pub size: Size,
    state: OpponentState,
    state_elapsed: f32,
    stamina: f32,
    timings: AttackTimings,
    display_name: String,
    swing_connected: bool,
}

impl Opponent {
    /// Creates an opponent ready to fight.
    #[must_use]
    pub fn new(placement: Placement, profile: &OpponentProfile) -> Self {
        let mut opponent = Self {
            position: placement.position,
            size: placement.size,
            state: OpponentState::Idle,
            state_elapsed: 0.0,
            stamina: 0.0,
            timings: AttackTimings::NEVER,
            display_name: String::new(),
            swing_connected: false,
        };
        opponent.reset(profile);
        opponent
    }

    /// Reinitialize every mutable field from `profile`.
    pub fn reset(&mut self, profile: &OpponentProfile) {
        self.state = OpponentState::Idle;
        self.state_elapsed = 0.0;
        self.stamina = OPPONENT_STAMINA;
        self.timings = profile.timings;
        self.display_name.clone_from(&profile.name);
        self.swing_connected = false;
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> OpponentState {
        self.state
    }

    /// Time spent in the current state (ms).
    #[must_use]
    pub const fn state_elapsed(&self) -> f32 {
        self.state_elapsed
    }

    /// Remaining stamina, never negative.
    #[must_use]
    pub const fn stamina(&self) -> f32 {
        self.stamina
    }

    /// Attack cycle timings.
    #[must_use]
    pub const fn timings(&self) -> &AttackTimings {
        &self.timings
    }

    /// Name shown in the HUD.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether stamina is exhausted.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.stamina <= 0.0
    }

    /// Whether the current swing can still connect.
    #[must_use]
    pub fn is_punching(&self) -> bool {
        self.state == OpponentState::Attack && !self.swing_connected
    }

    /// Mark the current swing as landed.
    pub fn register_hit(&mut self) {
        self.swing_connected = true;
    }

    /// Remove stamina, clamped at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.stamina = (self.stamina - amount.max(0.0)).max(0.0);
    }

    /// Advance timers by `dt` ms.
    pub fn advance(&mut self, dt: f32) {
        self.state_elapsed += dt;
    }

    /// Move through the cycle once the current state's limit is exceeded.
    pub fn update_cycle(&mut self, idle_buffer_ms: f32) {
        if self.state_elapsed > self.state.limit(&self.timings, idle_buffer_ms) {
            let next = self.state.next();
            debug!(from = ?self.state, to = ?next, name = %self.display_name, "opponent transition");
            self.state = next;
            self.state_elapsed = 0.0;
            if next == OpponentState::Attack {
                self.swing_connected = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;

    fn opponent(timings: AttackTimings) -> Opponent {
        let profile = OpponentProfile {
            name: "Kid Tempo".to_string(),
            timings,
        };
        Opponent::new(ArenaConfig::default().opponent, &profile)
    }

    #[test]
    fn test_full_cycle() {
        let mut o = opponent(AttackTimings::new(300.0, 100.0, 200.0));

        o.advance(500.0);
        o.update_cycle(200.0);
        assert_eq!(o.state(), OpponentState::Idle, "limit must be exceeded, not reached");

        o.advance(1.0);
        o.update_cycle(200.0);
        assert_eq!(o.state(), OpponentState::Tell);

        o.advance(301.0);
        o.update_cycle(200.0);
        assert_eq!(o.state(), OpponentState::Attack);
        assert!(o.is_punching());

        o.advance(101.0);
        o.update_cycle(200.0);
        assert_eq!(o.state(), OpponentState::Recover);
        assert!(!o.is_punching());

        o.advance(201.0);
        o.update_cycle(200.0);
        assert_eq!(o.state(), OpponentState::Idle);
    }

    #[test]
    fn test_swing_connects_once() {
        let mut o = opponent(AttackTimings::new(0.0, 100.0, 0.0));
        o.advance(1.0);
        o.update_cycle(0.0);
        o.advance(1.0);
        o.update_cycle(0.0);
        assert_eq!(o.state(), OpponentState::Attack);

        o.register_hit();
        assert!(!o.is_punching());
        assert_eq!(o.state(), OpponentState::Attack);
    }

    #[test]
    fn test_never_timings_stay_idle() {
        let mut o = opponent(AttackTimings::NEVER);
        o.advance(1.0e9);
        o.update_cycle(200.0);
        assert_eq!(o.state(), OpponentState::Idle);
    }

    #[test]
    fn test_stamina_clamps_at_zero() {
        let mut o = opponent(AttackTimings::NEVER);
        o.take_damage(60.0);
        assert_eq!(o.stamina(), 40.0);
        o.take_damage(60.0);
        assert_eq!(o.stamina(), 0.0);
        assert!(o.is_defeated());
    }

    #[test]
    fn test_reset_restores_profile() {
        let mut o = opponent(AttackTimings::new(10.0, 10.0, 10.0));
        o.take_damage(30.0);
        o.advance(50.0);
        o.update_cycle(0.0);

        let other = OpponentProfile {
            name: "Iron Ledger".to_string(),
            timings: AttackTimings::new(500.0, 120.0, 400.0),
        };
        o.reset(&other);
        assert_eq!(o.state(), OpponentState::Idle);
        assert_eq!(o.stamina(), OPPONENT_STAMINA);
        assert_eq!(o.display_name(), "Iron Ledger");
        assert_eq!(o.timings(), &other.timings);
    }
}
