//! Game data loading.
//!
//! Reads the JSON game data document and rejects documents the fight
//! cannot be drawn with. Soft problems (missing timings, bad durations)
//! are repaired by [`GameData::sanitize`] instead.

use std::fs;
use std::path::Path;

use ringside_common::ConfigError;
use ringside_gameplay::config::GameData;
use tracing::{debug, info};

/// Load and validate the game data at `path`.
///
/// # Errors
///
/// `NotFound` if the file does not exist, `Read`/`Parse` if it cannot be
/// read or decoded, `Validation` if it describes an unusable canvas.
pub fn load_game_data(path: &Path) -> Result<GameData, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    let data = GameData::from_json_str(&contents, path)?;
    validate(&data)?;

    info!(
        "Loaded game data from {} ({} opponents)",
        path.display(),
        data.opponents.len()
    );
    for (index, opponent) in data.opponents.iter().enumerate() {
        debug!(index, name = %opponent.name, ai = opponent.ai.is_some(), "roster entry");
    }
    Ok(data)
}

fn validate(data: &GameData) -> Result<(), ConfigError> {
    if data.canvas.width == 0 || data.canvas.height == 0 {
        return Err(ConfigError::Validation(format!(
            "canvas must be non-empty, got {}x{}",
            data.canvas.width, data.canvas.height
        )));
    }

    if data.canvas.scale == 0 {
        return Err(ConfigError::Validation("canvas scale must be at least 1".to_string()));
    }

    for grid in std::iter::once(&data.player.grid).chain(data.opponents.iter().map(|o| &o.grid)) {
        if grid.cols == 0 || grid.rows == 0 {
            return Err(ConfigError::Validation(format!(
                "sprite grid must have at least one cell, got {}x{}",
                grid.cols, grid.rows
            )));
        }
    }

    Ok(())
}
