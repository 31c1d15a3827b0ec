//! Fight controller.
//!
//! Orchestrates one simulation tick: dispatches input intents to the player,
//! advances both actors, resolves hits through the hitbox geometry and
//! derives the outcome. The controller owns the immutable game data; all
//! mutable state lives in the [`FightSession`] passed in.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GameData;
use crate::hitbox::{opponent_regions, player_regions};
use crate::hud::{HudSummary, Ticker};
use crate::input::TickInput;
use crate::opponent::{Opponent, OpponentState};
use crate::player::{Player, PlayerState, Strike};
use crate::session::{FightSession, Phase};
use crate::timing::PhaseTable;

/// Jab damage is configured per this many milliseconds of overlap.
const DAMAGE_PERIOD_MS: f32 = 100.0;

/// What the presentation layer needs after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightSnapshot {
    /// Session phase.
    pub phase: Phase,
    /// Roster index of the current opponent.
    pub selected_opponent: usize,
    /// Player state.
    pub player_state: PlayerState,
    /// Time in the player state (ms).
    pub player_elapsed: f32,
    /// Opponent state.
    pub opponent_state: OpponentState,
    /// Time in the opponent state (ms).
    pub opponent_elapsed: f32,
    /// HUD values.
    pub hud: HudSummary,
    /// Full HUD line.
    pub hud_text: String,
    /// Banner line currently shown.
    pub banner: String,
}

/// Drives fight sessions with one set of game data.
#[derive(Debug, Clone)]
pub struct FightController {
    data: GameData,
    table: PhaseTable,
}

impl FightController {
    /// Create a controller. The data is sanitized first.
    #[must_use]
    pub fn new(mut data: GameData) -> Self {
        data.sanitize();
        let table = PhaseTable::from_data(&data);
        Self { data, table }
    }

    /// Game data in use.
    #[must_use]
    pub const fn data(&self) -> &GameData {
        &self.data
    }

    /// Player timing table in use.
    #[must_use]
    pub const fn table(&self) -> &PhaseTable {
        &self.table
    }

    /// Create a session on the title screen with the first opponent selected.
    #[must_use]
    pub fn new_session(&self) -> FightSession {
        let profile = self.data.opponent_profile(0);
        let player = Player::new(
            self.data.arena.player,
            self.data.hud.hearts_start,
            self.data.hud.stars_start,
        );
        let opponent = Opponent::new(self.data.arena.opponent, &profile);
        let hud = HudSummary::capture(&player, &opponent);
        FightSession {
            phase: Phase::Title,
            selected_opponent: 0,
            player,
            opponent,
            ticker: Ticker::default(),
            hud,
        }
    }

    /// Reinitialize both actors for the selected opponent.
    ///
    /// In-flight actions are discarded. Calling this twice is the same as
    /// calling it once.
    pub fn reset_fight(&self, session: &mut FightSession) {
        let profile = self.data.opponent_profile(session.selected_opponent);
        session
            .player
            .reset(self.data.hud.hearts_start, self.data.hud.stars_start);
        session.opponent.reset(&profile);
        session.hud = HudSummary::capture(&session.player, &session.opponent);
    }

    /// Handle the confirm signal.
    ///
    /// Title starts a fresh fight, Victory returns to the title. Returns
    /// whether the phase changed.
    pub fn confirm(&self, session: &mut FightSession) -> bool {
        match session.phase {
            Phase::Title => {
                self.reset_fight(session);
                session.phase = Phase::Fighting;
                info!(opponent = %session.opponent.display_name(), "fight started");
                true
            },
            Phase::Victory => {
                session.phase = Phase::Title;
                info!("back to title");
                true
            },
            Phase::Fighting => false,
        }
    }

    /// Select the next roster entry, wrapping around, and reset.
    ///
    /// Only allowed outside an active fight. Returns whether the selection
    /// changed.
    pub fn switch_opponent(&self, session: &mut FightSession) -> bool {
        if session.phase == Phase::Fighting {
            debug!("opponent switch ignored during a fight");
            return false;
        }
        session.selected_opponent = (session.selected_opponent + 1) % self.data.roster_len();
        self.reset_fight(session);
        info!(
            index = session.selected_opponent,
            opponent = %session.opponent.display_name(),
            "opponent selected"
        );
        true
    }

    /// Advance the session by `dt` ms with this tick's input.
    ///
    /// Negative or non-finite deltas count as zero. Outside the fight phase
    /// only the banner clock, next-opponent and confirm are processed, in
    /// that order.
    pub fn tick(&self, session: &mut FightSession, dt: f32, input: &TickInput) -> FightSnapshot {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        session.ticker.advance(
            dt,
            self.data.meta.ticker_interval_ms,
            self.data.meta.ticker.len(),
        );

        if input.next_opponent {
            self.switch_opponent(session);
        }
        if input.confirm {
            self.confirm(session);
        }

        if session.phase.should_simulate() {
            self.simulate(session, dt, input);
        }

        session.hud = HudSummary::capture(&session.player, &session.opponent);
        self.snapshot(session)
    }

    fn simulate(&self, session: &mut FightSession, dt: f32, input: &TickInput) {
        let FightSession {
            phase,
            player,
            opponent,
            ..
        } = session;
        let layout = &self.data.arena.hitboxes;
        let tuning = &self.data.tuning;

        for action in input.actions() {
            player.try_start(action, &self.table);
        }

        player.advance(dt);
        opponent.advance(dt);

        if let Some(strike) = player.update_action(&self.table) {
            let landed = player_regions(player, &self.table, layout)
                .strikes(&opponent_regions(opponent, layout));
            if landed {
                let rate = match strike {
                    Strike::Jab => tuning.player_damage,
                    Strike::Star => tuning.player_damage * tuning.star_damage_multiplier,
                };
                opponent.take_damage(rate * dt / DAMAGE_PERIOD_MS);
            }
        }

        if opponent.is_punching() && !player.is_invulnerable() {
            let landed = opponent_regions(opponent, layout)
                .strikes(&player_regions(player, &self.table, layout));
            if landed {
                player.lose_heart();
                player.grant_invulnerability(tuning.hit_invuln_ms);
                opponent.register_hit();
                debug!(hearts = player.hearts(), "player hit");
            }
        }
        opponent.update_cycle(tuning.opponent_idle_buffer_ms);

        if opponent.is_defeated() {
            *phase = Phase::Victory;
            info!(opponent = %opponent.display_name(), "victory");
        }
        player.update_knockout(&self.table);
    }

    /// Snapshot of the session for presentation.
    #[must_use]
    pub fn snapshot(&self, session: &FightSession) -> FightSnapshot {
        FightSnapshot {
            phase: session.phase,
            selected_opponent: session.selected_opponent,
            player_state: session.player.state(),
            player_elapsed: session.player.state_elapsed(),
            opponent_state: session.opponent.state(),
            opponent_elapsed: session.opponent.state_elapsed(),
            hud: session.hud.clone(),
            hud_text: session.hud.text(&self.data.meta.link),
            banner: session.ticker.current(&self.data.meta.ticker).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AttackTimings, OpponentConfig};
    use crate::input::PlayerAction;
    use proptest::prelude::*;

    const DT: f32 = 10.0;

    fn opponent(name: &str, ai: Option<AttackTimings>) -> OpponentConfig {
        OpponentConfig {
            name: name.to_string(),
            ai,
            ..OpponentConfig::default()
        }
    }

    fn data_with(ai: Option<AttackTimings>) -> GameData {
        let mut data = GameData::default();
        data.opponents = vec![opponent("Kid Tempo", ai), opponent("Iron Ledger", None)];
        data
    }

    fn fighting(controller: &FightController) -> FightSession {
        let mut session = controller.new_session();
        assert!(controller.confirm(&mut session));
        session
    }

    fn idle_ticks(controller: &FightController, session: &mut FightSession, ticks: usize) {
        for _ in 0..ticks {
            controller.tick(session, DT, &TickInput::NONE);
        }
    }

    /// Tick until the opponent reaches `state`, at most `limit` ticks.
    fn tick_until(
        controller: &FightController,
        session: &mut FightSession,
        state: OpponentState,
        limit: usize,
    ) {
        for _ in 0..limit {
            if session.opponent().state() == state {
                return;
            }
            controller.tick(session, DT, &TickInput::NONE);
        }
        panic!("opponent never reached {state:?}");
    }

    #[test]
    fn test_title_does_not_simulate() {
        let controller = FightController::new(data_with(Some(AttackTimings::new(0.0, 50.0, 0.0))));
        let mut session = controller.new_session();
        let before = session.clone();

        let snap = controller.tick(&mut session, 500.0, &TickInput::action(PlayerAction::JabLeft));
        assert_eq!(snap.phase, Phase::Title);
        assert_eq!(session.player(), before.player());
        assert_eq!(session.opponent(), before.opponent());
    }

    #[test]
    fn test_confirm_cycle() {
        let controller = FightController::new(data_with(None));
        let mut session = controller.new_session();

        let snap = controller.tick(&mut session, DT, &TickInput::confirm());
        assert_eq!(snap.phase, Phase::Fighting);

        // Confirm mid-fight does nothing
        assert!(!controller.confirm(&mut session));
        assert_eq!(session.phase(), Phase::Fighting);

        session.phase = Phase::Victory;
        controller.tick(&mut session, DT, &TickInput::confirm());
        assert_eq!(session.phase(), Phase::Title);
    }

    #[test]
    fn test_jab_drains_stamina_to_victory() {
        let mut data = data_with(None);
        data.tuning.player.jab_startup_ms = 0.0;
        data.tuning.player.jab_active_ms = 5000.0;
        data.tuning.player.jab_recovery_ms = 0.0;
        data.tuning.player_damage = 10.0;
        let controller = FightController::new(data);
        let mut session = fighting(&controller);

        // 10 stamina per 100ms of overlap: 1000ms empties 100 stamina
        controller.tick(&mut session, 100.0, &TickInput::action(PlayerAction::JabLeft));
        for _ in 0..8 {
            controller.tick(&mut session, 100.0, &TickInput::NONE);
        }
        assert_eq!(session.opponent().stamina(), 10.0);
        assert_eq!(session.phase(), Phase::Fighting);

        let snap = controller.tick(&mut session, 100.0, &TickInput::NONE);
        assert_eq!(session.opponent().stamina(), 0.0);
        assert_eq!(snap.phase, Phase::Victory);
        assert_eq!(snap.hud.opponent_stamina, 0);
    }

    #[test]
    fn test_jab_only_damages_in_active_window() {
        let mut data = data_with(None);
        data.tuning.player.jab_startup_ms = 100.0;
        data.tuning.player.jab_active_ms = 100.0;
        data.tuning.player.jab_recovery_ms = 100.0;
        let controller = FightController::new(data);
        let mut session = fighting(&controller);

        controller.tick(&mut session, 50.0, &TickInput::action(PlayerAction::JabRight));
        assert_eq!(session.opponent().stamina(), 100.0, "no damage during startup");

        controller.tick(&mut session, 50.0, &TickInput::NONE);
        controller.tick(&mut session, 50.0, &TickInput::NONE);
        assert_eq!(session.opponent().stamina(), 90.0);

        controller.tick(&mut session, 50.0, &TickInput::NONE);
        controller.tick(&mut session, 50.0, &TickInput::NONE);
        assert_eq!(session.opponent().stamina(), 90.0, "no damage during recovery");

        controller.tick(&mut session, 50.0, &TickInput::NONE);
        assert_eq!(session.player().state(), PlayerState::Idle);
    }

    #[test]
    fn test_star_deals_double_jab_damage() {
        let mut data = data_with(None);
        data.tuning.player.star_startup_ms = 0.0;
        data.tuning.player.star_active_ms = 1000.0;
        data.tuning.player_damage = 10.0;
        let controller = FightController::new(data);
        let mut session = fighting(&controller);
        session.player_mut().grant_star();

        controller.tick(&mut session, 100.0, &TickInput::action(PlayerAction::Star));
        assert_eq!(session.opponent().stamina(), 80.0);
    }

    #[test]
    fn test_one_attack_cycle_costs_one_heart() {
        let controller = FightController::new(data_with(Some(AttackTimings::new(100.0, 100.0, 100.0))));
        let mut session = fighting(&controller);
        assert_eq!(session.player().hearts(), 3);

        tick_until(&controller, &mut session, OpponentState::Attack, 100);
        tick_until(&controller, &mut session, OpponentState::Recover, 100);
        tick_until(&controller, &mut session, OpponentState::Idle, 100);
        assert_eq!(session.player().hearts(), 2);
    }

    #[test]
    fn test_swing_connects_once_without_hit_invulnerability() {
        let mut data = data_with(Some(AttackTimings::new(100.0, 300.0, 100.0)));
        data.tuning.hit_invuln_ms = 0.0;
        let controller = FightController::new(data);
        let mut session = fighting(&controller);

        tick_until(&controller, &mut session, OpponentState::Recover, 200);
        assert_eq!(session.player().hearts(), 2);
    }

    #[test]
    fn test_dodge_on_attack_entry_avoids_hit() {
        let mut data = data_with(Some(AttackTimings::new(100.0, 100.0, 100.0)));
        data.tuning.player.dodge_invuln_ms = 300.0;
        let controller = FightController::new(data);
        let mut session = fighting(&controller);

        tick_until(&controller, &mut session, OpponentState::Attack, 100);
        controller.tick(&mut session, DT, &TickInput::action(PlayerAction::DodgeLeft));
        assert_eq!(session.player().state(), PlayerState::DodgeLeft);

        tick_until(&controller, &mut session, OpponentState::Recover, 100);
        assert_eq!(session.player().hearts(), 3);
    }

    #[test]
    fn test_knockout_pause_then_recovery() {
        let mut data = data_with(Some(AttackTimings::new(100.0, 100.0, 5000.0)));
        data.hud.hearts_start = 1;
        data.hud.winded_ms = 500.0;
        let controller = FightController::new(data);
        let mut session = fighting(&controller);

        tick_until(&controller, &mut session, OpponentState::Recover, 100);
        assert_eq!(session.player().hearts(), 0);
        assert_eq!(session.player().state(), PlayerState::Winded);
        assert_eq!(session.phase(), Phase::Fighting, "a knockout does not end the session");

        // Actions are ignored while winded
        controller.tick(&mut session, DT, &TickInput::action(PlayerAction::JabLeft));
        assert_eq!(session.player().state(), PlayerState::Winded);

        let mut last_winded = session.player().state_elapsed();
        for _ in 0..200 {
            if session.player().state() != PlayerState::Winded {
                break;
            }
            last_winded = session.player().state_elapsed();
            controller.tick(&mut session, DT, &TickInput::NONE);
        }
        assert!(last_winded + DT > 500.0, "recovered too early");
        assert_eq!(session.player().state(), PlayerState::Idle);
        assert_eq!(session.player().hearts(), 1);
    }

    #[test]
    fn test_star_requires_charge() {
        let controller = FightController::new(data_with(None));
        let mut session = fighting(&controller);

        controller.tick(&mut session, DT, &TickInput::action(PlayerAction::Star));
        assert_eq!(session.player().state(), PlayerState::Idle);

        session.player_mut().grant_star();
        controller.tick(&mut session, DT, &TickInput::action(PlayerAction::Star));
        assert_eq!(session.player().state(), PlayerState::Star);
        assert_eq!(session.player().star_charges(), 0);

        // A second star cannot restart the one in progress
        session.player_mut().grant_star();
        let elapsed = session.player().state_elapsed();
        controller.tick(&mut session, DT, &TickInput::action(PlayerAction::Star));
        assert_eq!(session.player().state(), PlayerState::Star);
        assert_eq!(session.player().state_elapsed(), elapsed + DT);
        assert_eq!(session.player().star_charges(), 1);
    }

    #[test]
    fn test_switch_opponent_wraps_and_resets() {
        let controller = FightController::new(data_with(None));
        let mut session = controller.new_session();
        assert_eq!(session.opponent().display_name(), "Kid Tempo");

        assert!(controller.switch_opponent(&mut session));
        assert_eq!(session.selected_opponent(), 1);
        assert_eq!(session.opponent().display_name(), "Iron Ledger");

        assert!(controller.switch_opponent(&mut session));
        assert_eq!(session.selected_opponent(), 0);
    }

    #[test]
    fn test_switch_opponent_blocked_mid_fight() {
        let controller = FightController::new(data_with(None));
        let mut session = fighting(&controller);
        assert!(!controller.switch_opponent(&mut session));
        assert_eq!(session.selected_opponent(), 0);
    }

    #[test]
    fn test_next_opponent_signal_on_title_only() {
        let controller = FightController::new(data_with(None));
        let mut session = controller.new_session();

        let snap = controller.tick(&mut session, DT, &TickInput::next_opponent());
        assert_eq!(snap.selected_opponent, 1);
        assert_eq!(snap.hud.opponent_name, "Iron Ledger");

        // Switch then confirm on one tick fights the newly selected opponent
        let both = TickInput {
            confirm: true,
            ..TickInput::next_opponent()
        };
        let snap = controller.tick(&mut session, DT, &both);
        assert_eq!(snap.phase, Phase::Fighting);
        assert_eq!(snap.hud.opponent_name, "Kid Tempo");

        let snap = controller.tick(&mut session, DT, &TickInput::next_opponent());
        assert_eq!(snap.selected_opponent, 0);
    }

    #[test]
    fn test_empty_roster_still_fights() {
        let controller = FightController::new(GameData::default());
        let mut session = fighting(&controller);
        idle_ticks(&controller, &mut session, 500);
        assert_eq!(session.opponent().state(), OpponentState::Idle);
        assert_eq!(session.opponent().display_name(), "Sparring Bag");
    }

    #[test]
    fn test_negative_dt_is_clamped() {
        let controller = FightController::new(data_with(None));
        let mut session = fighting(&controller);
        controller.tick(&mut session, -250.0, &TickInput::action(PlayerAction::JabLeft));
        assert_eq!(session.player().state(), PlayerState::JabLeft);
        assert_eq!(session.player().state_elapsed(), 0.0);

        controller.tick(&mut session, f32::NAN, &TickInput::NONE);
        assert_eq!(session.player().state_elapsed(), 0.0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let controller = FightController::new(data_with(Some(AttackTimings::new(50.0, 50.0, 50.0))));
        let mut session = fighting(&controller);
        controller.tick(&mut session, DT, &TickInput::action(PlayerAction::JabLeft));
        idle_ticks(&controller, &mut session, 40);

        controller.reset_fight(&mut session);
        let once = session.clone();
        controller.reset_fight(&mut session);
        assert_eq!(session, once);
    }

    #[test]
    fn test_snapshot_hud_text() {
        let mut data = data_with(None);
        data.meta.link = "https://example.org".to_string();
        data.meta.ticker = vec!["Round one".to_string()];
        let controller = FightController::new(data);
        let mut session = fighting(&controller);

        let snap = controller.tick(&mut session, DT, &TickInput::NONE);
        assert_eq!(
            snap.hud_text,
            "Opponent: Kid Tempo | Hearts: 3 | Stars: 0 | Opp Stamina: 100 - Read more at https://example.org"
        );
        assert_eq!(snap.banner, "Round one");
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        proptest::array::uniform6(any::<bool>()).prop_map(|f| TickInput {
            jab_left: f[0],
            jab_right: f[1],
            dodge_left: f[2],
            dodge_right: f[3],
            duck: f[4],
            star: f[5],
            confirm: false,
            next_opponent: false,
        })
    }

    proptest! {
        #[test]
        fn prop_hearts_and_stamina_never_negative(
            steps in proptest::collection::vec((-50.0f32..250.0, arb_input()), 1..300),
        ) {
            let controller = FightController::new(data_with(Some(AttackTimings::new(60.0, 80.0, 60.0))));
            let mut session = fighting(&controller);
            session.player_mut().grant_star();

            for (dt, input) in steps {
                let snap = controller.tick(&mut session, dt, &input);
                let player = session.player();
                prop_assert!(player.hearts() <= player.max_hearts());
                prop_assert!(session.opponent().stamina() >= 0.0);
                prop_assert!(player.state_elapsed() >= 0.0);
                prop_assert!(player.invulnerable_remaining() >= 0.0);
                prop_assert!(session.opponent().state_elapsed() >= 0.0);
                prop_assert!(snap.hud.opponent_stamina <= 100);
            }
        }

        #[test]
        fn prop_busy_player_ignores_requests(
            actions in proptest::collection::vec(0usize..6, 1..20),
        ) {
            let controller = FightController::new(data_with(None));
            let table = controller.table().clone();
            let mut session = fighting(&controller);
            session.player_mut().grant_star();
            session.player_mut().try_start(PlayerAction::JabLeft, &table);
            session.player_mut().advance(5.0);

            let before = session.player().clone();
            for index in actions {
                prop_assert!(!session.player_mut().try_start(PlayerAction::ALL[index], &table));
            }
            prop_assert_eq!(session.player(), &before);
        }
    }
}
