//! Engine configuration.
//!
//! Host-side settings for the headless runner. Loaded from `ringside.toml`;
//! a missing or invalid file falls back to defaults.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ringside_common::RingsideResult;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "ringside.toml";

/// Environment variable overriding the configuration file location.
const CONFIG_ENV: &str = "RINGSIDE_CONFIG";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Game data document (JSON).
    pub data_path: PathBuf,
    /// Simulation frames per second
    pub target_fps: u32,
    /// Frames to run before exiting
    pub max_frames: u32,
    /// Let the built-in boxer play
    pub autopilot: bool,
    /// Move to the next roster entry after each win
    pub advance_roster_on_victory: bool,
    /// Frames between HUD log lines (0 = never)
    pub hud_log_interval: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("assets/config.json"),
            target_fps: 60,
            max_frames: 60 * 60,
            autopilot: true,
            advance_roster_on_victory: true,
            hud_log_interval: 60,
        }
    }
}

#[allow(dead_code)]
impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns `RingsideError::Io` if the directory or file cannot be written.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> RingsideResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the configuration file path.
    fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from)
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.target_fps = self.target_fps.clamp(10, 240);
        self.max_frames = self.max_frames.max(1);
    }

    /// Milliseconds per simulation frame.
    #[must_use]
    pub fn frame_ms(&self) -> f32 {
        1000.0 / self.target_fps.max(1) as f32
    }
}
