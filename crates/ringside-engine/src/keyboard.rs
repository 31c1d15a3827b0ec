//! Keyboard bindings.
//!
//! This module provides:
//! - KeyBinding with primary/secondary keys per player action
//! - Conflict detection on rebind
//! - Held/pressed key tracking that folds into one [`TickInput`] per frame
//!
//! Keys are identified by their DOM-style names (`"a"`, `"ArrowLeft"`,
//! `"Enter"`) so bindings read the same in config files and in logs.

use std::collections::HashSet;

use ringside_gameplay::input::{PlayerAction, TickInput};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while rebinding keys.
#[derive(Debug, Error, PartialEq, Eq)]
#[allow(dead_code)]
pub enum BindError {
    /// Key is already bound to another action.
    #[error("Key {key} is already bound to {action:?}")]
    Conflict {
        /// The conflicting key.
        key: String,
        /// The action it's bound to.
        action: PlayerAction,
    },

    /// Empty key name.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}

/// Result type for binding operations.
pub type BindResult<T> = Result<T, BindError>;

/// A key binding with primary and optional secondary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// The action this binding is for.
    pub action: PlayerAction,
    /// Primary key.
    pub primary: String,
    /// Alternate key.
    pub secondary: Option<String>,
}

impl KeyBinding {
    /// Creates a new key binding.
    #[must_use]
    pub fn new(action: PlayerAction, primary: impl Into<String>) -> Self {
        Self {
            action,
            primary: primary.into(),
            secondary: None,
        }
    }

    /// Creates a key binding with secondary key.
    #[must_use]
    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }

    /// Returns whether the given key matches this binding.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.primary == key || self.secondary.as_deref() == Some(key)
    }
}

/// The full control scheme.
///
/// Confirm keys are kept apart from action keys: the default `Enter`
/// throws the star punch mid-fight and confirms on the title and win
/// screens. Next-opponent keys only matter outside a fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    bindings: Vec<KeyBinding>,
    confirm: Vec<String>,
    next_opponent: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: vec![
                KeyBinding::new(PlayerAction::JabLeft, "a").with_secondary("A"),
                KeyBinding::new(PlayerAction::JabRight, "s").with_secondary("S"),
                KeyBinding::new(PlayerAction::DodgeLeft, "ArrowLeft"),
                KeyBinding::new(PlayerAction::DodgeRight, "ArrowRight"),
                KeyBinding::new(PlayerAction::Duck, "ArrowDown"),
                KeyBinding::new(PlayerAction::Star, "Enter"),
            ],
            confirm: vec!["Enter".to_string()],
            next_opponent: vec!["n".to_string(), "N".to_string()],
        }
    }
}

#[allow(dead_code)]
impl KeyBindings {
    /// Binding for `action`, if any.
    #[must_use]
    pub fn binding(&self, action: PlayerAction) -> Option<&KeyBinding> {
        self.bindings.iter().find(|b| b.action == action)
    }

    /// Action bound to `key`.
    #[must_use]
    pub fn action_for(&self, key: &str) -> Option<PlayerAction> {
        self.bindings.iter().find(|b| b.matches(key)).map(|b| b.action)
    }

    /// Whether `key` confirms on the title and win screens.
    #[must_use]
    pub fn is_confirm(&self, key: &str) -> bool {
        self.confirm.iter().any(|k| k == key)
    }

    /// Whether `key` selects the next opponent.
    #[must_use]
    pub fn is_next_opponent(&self, key: &str) -> bool {
        self.next_opponent.iter().any(|k| k == key)
    }

    /// Set the primary key of `action`.
    ///
    /// # Errors
    ///
    /// Fails if the key is empty or already drives a different action.
    pub fn bind(&mut self, action: PlayerAction, key: &str) -> BindResult<()> {
        if key.is_empty() {
            return Err(BindError::InvalidKey(key.to_string()));
        }
        if let Some(existing) = self.action_for(key) {
            if existing != action {
                return Err(BindError::Conflict {
                    key: key.to_string(),
                    action: existing,
                });
            }
        }

        match self.bindings.iter_mut().find(|b| b.action == action) {
            Some(binding) => binding.primary = key.to_string(),
            None => self.bindings.push(KeyBinding::new(action, key)),
        }
        info!("Bound {key} to {action:?}");
        Ok(())
    }

    /// Remove every key from `action`. Returns whether it was bound.
    pub fn unbind(&mut self, action: PlayerAction) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.action != action);
        let removed = self.bindings.len() != before;
        if removed {
            debug!("Unbound {action:?}");
        }
        removed
    }

    /// First confirm key, if any.
    #[must_use]
    pub fn confirm_key(&self) -> Option<&str> {
        self.confirm.first().map(String::as_str)
    }

    /// Replace the confirm keys.
    pub fn set_confirm_keys<I, K>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.confirm = keys.into_iter().map(Into::into).collect();
    }

    /// Replace the next-opponent keys.
    pub fn set_next_opponent_keys<I, K>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.next_opponent = keys.into_iter().map(Into::into).collect();
    }
}

/// Key state between frames.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<String>,
    pressed: HashSet<String>,
}

#[allow(dead_code)]
impl KeyboardState {
    /// Creates an empty keyboard state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press.
    pub fn key_down(&mut self, key: &str) {
        if self.held.insert(key.to_string()) {
            self.pressed.insert(key.to_string());
        }
    }

    /// Record a key release.
    pub fn key_up(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Whether `key` is held.
    #[must_use]
    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// Build this frame's input and clear the pressed set.
    ///
    /// Actions follow held keys. Confirm and next-opponent fire only on the
    /// frame their key went down.
    pub fn take_input(&mut self, bindings: &KeyBindings) -> TickInput {
        let mut input = self
            .held
            .iter()
            .filter_map(|key| bindings.action_for(key))
            .fold(TickInput::NONE, TickInput::with);
        input.confirm = self.pressed.iter().any(|key| bindings.is_confirm(key));
        input.next_opponent = self.pressed.iter().any(|key| bindings.is_next_opponent(key));
        self.pressed.clear();
        input
    }

    /// Release everything.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}
