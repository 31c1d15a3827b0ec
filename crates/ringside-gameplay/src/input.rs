//! Per-tick input intents.
//!
//! The host collects device state into an immutable [`TickInput`] once per
//! frame; the fight controller never reads ambient input.

use serde::{Deserialize, Serialize};

/// An action the player can start from idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Left jab.
    JabLeft,
    /// Right jab.
    JabRight,
    /// Slip to the left.
    DodgeLeft,
    /// Slip to the right.
    DodgeRight,
    /// Duck under a punch.
    Duck,
    /// Star punch, costs one star charge.
    Star,
}

impl PlayerAction {
    /// All actions, in dispatch priority order.
    pub const ALL: [Self; 6] = [
        Self::JabLeft,
        Self::JabRight,
        Self::DodgeLeft,
        Self::DodgeRight,
        Self::Duck,
        Self::Star,
    ];
}

/// Input intents asserted during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Left jab held.
    pub jab_left: bool,
    /// Right jab held.
    pub jab_right: bool,
    /// Left dodge held.
    pub dodge_left: bool,
    /// Right dodge held.
    pub dodge_right: bool,
    /// Duck held.
    pub duck: bool,
    /// Star held.
    pub star: bool,
    /// Confirm pressed this tick (title and win screens only).
    pub confirm: bool,
    /// Next-opponent pressed this tick (title and win screens only).
    pub next_opponent: bool,
}

impl TickInput {
    /// No intents.
    pub const NONE: Self = Self {
        jab_left: false,
        jab_right: false,
        dodge_left: false,
        dodge_right: false,
        duck: false,
        star: false,
        confirm: false,
        next_opponent: false,
    };

    /// Input asserting a single action.
    #[must_use]
    pub fn action(action: PlayerAction) -> Self {
        Self::NONE.with(action)
    }

    /// Input asserting only confirm.
    #[must_use]
    pub fn confirm() -> Self {
        Self {
            confirm: true,
            ..Self::NONE
        }
    }

    /// Input asserting only next-opponent.
    #[must_use]
    pub fn next_opponent() -> Self {
        Self {
            next_opponent: true,
            ..Self::NONE
        }
    }

    /// Add an asserted action.
    #[must_use]
    pub fn with(mut self, action: PlayerAction) -> Self {
        *self.flag_mut(action) = true;
        self
    }

    /// Whether `action` is asserted.
    #[must_use]
    pub fn is_asserted(&self, action: PlayerAction) -> bool {
        match action {
            PlayerAction::JabLeft => self.jab_left,
            PlayerAction::JabRight => self.jab_right,
            PlayerAction::DodgeLeft => self.dodge_left,
            PlayerAction::DodgeRight => self.dodge_right,
            PlayerAction::Duck => self.duck,
            PlayerAction::Star => self.star,
        }
    }

    /// Asserted actions in dispatch priority order.
    pub fn actions(&self) -> impl Iterator<Item = PlayerAction> + '_ {
        PlayerAction::ALL
            .into_iter()
            .filter(move |action| self.is_asserted(*action))
    }

    fn flag_mut(&mut self, action: PlayerAction) -> &mut bool {
        match action {
            PlayerAction::JabLeft => &mut self.jab_left,
            PlayerAction::JabRight => &mut self.jab_right,
            PlayerAction::DodgeLeft => &mut self.dodge_left,
            PlayerAction::DodgeRight => &mut self.dodge_right,
            PlayerAction::Duck => &mut self.duck,
            PlayerAction::Star => &mut self.star,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_in_priority_order() {
        let input = TickInput::action(PlayerAction::Star)
            .with(PlayerAction::DodgeLeft)
            .with(PlayerAction::JabRight);
        let actions: Vec<_> = input.actions().collect();
        assert_eq!(
            actions,
            vec![
                PlayerAction::JabRight,
                PlayerAction::DodgeLeft,
                PlayerAction::Star
            ]
        );
    }

    #[test]
    fn test_none_has_no_actions() {
        assert_eq!(TickInput::NONE.actions().count(), 0);
        assert!(!TickInput::NONE.confirm);
        assert!(TickInput::confirm().confirm);
        assert_eq!(TickInput::confirm().actions().count(), 0);
        assert!(TickInput::next_opponent().next_opponent);
        assert!(!TickInput::next_opponent().confirm);
    }
}
