//! # Ringside Gameplay
//!
//! Fight simulation for the Ringside boxing mini-game.
//!
//! This crate provides the frame-driven core and its presentation adapter:
//! - Game data model (roster, timings, animations, text)
//! - Hit region geometry
//! - Player and opponent state machines
//! - Fight controller and session (title, fight, victory)
//! - HUD summary and banner ticker
//! - Draw-command emission for the host renderer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod fight;
pub mod hitbox;
pub mod hud;
pub mod input;
pub mod opponent;
pub mod player;
pub mod presentation;
pub mod session;
pub mod timing;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::fight::*;
    pub use crate::hitbox::*;
    pub use crate::hud::*;
    pub use crate::input::*;
    pub use crate::opponent::*;
    pub use crate::player::*;
    pub use crate::presentation::*;
    pub use crate::session::*;
    pub use crate::timing::*;
}

pub use prelude::*;
