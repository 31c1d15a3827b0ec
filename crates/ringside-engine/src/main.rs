//! # Ringside
//!
//! Headless host for the Ringside boxing mini-game.
//!
//! This crate ties together:
//! - Engine settings (`ringside.toml`) and the JSON game data
//! - Keyboard bindings and the scripted autopilot
//! - The fixed-step frame loop around the fight controller

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod autopilot;
mod config;
mod data_loader;
mod keyboard;
mod timing;


use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EngineConfig;

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("ringside=info".parse()?))
        .init();

    info!("Ringside starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig::load();
    let summary = app::run(config)?;

    info!("Final HUD: {}", summary.hud_text);
    info!("Ringside shutdown complete");
    Ok(())
}
