//! Scripted boxer for headless runs.
//!
//! Drives the same [`KeyboardState`] a human would: it presses confirm on
//! the title and win screens, slips the opponent's telegraphed punch and
//! alternates jabs otherwise.

use ringside_gameplay::input::PlayerAction;
use ringside_gameplay::opponent::OpponentState;
use ringside_gameplay::session::{FightSession, Phase};
use tracing::trace;

use crate::keyboard::{KeyBindings, KeyboardState};

/// Keyboard-driving fight bot.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// How early before the punch lands to start a slip (ms).
    lead_ms: f32,
    /// Keys currently held down by the bot.
    held: Vec<String>,
    /// Alternates left/right for jabs and slips.
    lefty: bool,
}

impl Autopilot {
    /// Create a bot that slips `lead_ms` before the telegraph ends.
    #[must_use]
    pub fn new(lead_ms: f32) -> Self {
        Self {
            lead_ms: lead_ms.max(0.0),
            held: Vec::new(),
            lefty: true,
        }
    }

    /// Update held keys for the coming tick.
    pub fn drive(
        &mut self,
        session: &FightSession,
        bindings: &KeyBindings,
        keyboard: &mut KeyboardState,
    ) {
        let next = self.choose(session, bindings);
        for key in self.held.drain(..) {
            keyboard.key_up(&key);
        }
        if let Some(key) = next {
            trace!(key = %key, "autopilot press");
            keyboard.key_down(&key);
            self.held.push(key);
        }
    }

    fn choose(&mut self, session: &FightSession, bindings: &KeyBindings) -> Option<String> {
        match session.phase() {
            Phase::Title | Phase::Victory => {
                // Release between presses so confirm sees a fresh edge
                if self.held.is_empty() {
                    bindings.confirm_key().map(str::to_string)
                } else {
                    None
                }
            },
            Phase::Fighting => {
                if !session.player().is_idle() {
                    return None;
                }
                let action = self.pick_action(session)?;
                bindings.binding(action).map(|b| b.primary.clone())
            },
        }
    }

    fn pick_action(&mut self, session: &FightSession) -> Option<PlayerAction> {
        let opponent = session.opponent();
        let danger = match opponent.state() {
            OpponentState::Tell => {
                opponent.timings().tell_ms - opponent.state_elapsed() <= self.lead_ms
            },
            OpponentState::Attack => !session.player().is_invulnerable(),
            OpponentState::Idle | OpponentState::Recover => false,
        };

        self.lefty = !self.lefty;
        if danger {
            Some(if self.lefty {
                PlayerAction::DodgeLeft
            } else {
                PlayerAction::DodgeRight
            })
        } else if opponent.state() == OpponentState::Tell {
            None
        } else {
            Some(if self.lefty {
                PlayerAction::JabLeft
            } else {
                PlayerAction::JabRight
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringside_gameplay::config::GameData;
    use ringside_gameplay::fight::FightController;
    use ringside_gameplay::input::TickInput;

    #[test]
    fn test_confirm_presses_are_separated() {
        let controller = FightController::new(GameData::default());
        let session = controller.new_session();
        let bindings = KeyBindings::default();
        let mut keyboard = KeyboardState::new();
        let mut bot = Autopilot::new(32.0);

        bot.drive(&session, &bindings, &mut keyboard);
        assert!(keyboard.take_input(&bindings).confirm);

        bot.drive(&session, &bindings, &mut keyboard);
        assert_eq!(keyboard.take_input(&bindings), TickInput::NONE);

        bot.drive(&session, &bindings, &mut keyboard);
        assert!(keyboard.take_input(&bindings).confirm);
    }

    #[test]
    fn test_jabs_alternate_when_idle() {
        let controller = FightController::new(GameData::default());
        let mut session = controller.new_session();
        controller.confirm(&mut session);

        let bindings = KeyBindings::default();
        let mut keyboard = KeyboardState::new();
        let mut bot = Autopilot::new(32.0);

        bot.drive(&session, &bindings, &mut keyboard);
        let first = keyboard.take_input(&bindings);
        bot.drive(&session, &bindings, &mut keyboard);
        let second = keyboard.take_input(&bindings);

        assert!(first.jab_left || first.jab_right);
        assert!(second.jab_left || second.jab_right);
        assert_ne!(first.jab_left, second.jab_left);
    }
}
