//! Application lifecycle management.
//!
//! Headless host loop: keyboard (or autopilot) in, fight controller tick,
//! draw list out. A windowed front end would replace [`HeadlessSprites`]
//! with decoded images and feed real key events into the same loop.

use std::collections::HashMap;

use ringside_common::{ConfigError, RingsideResult};
use ringside_gameplay::config::{GameData, SpriteGrid};
use ringside_gameplay::fight::{FightController, FightSnapshot};
use ringside_gameplay::presentation::{DrawCommand, MonospaceMeasure, Presenter, SpriteLookup};
use ringside_gameplay::session::{FightSession, Phase};
use tracing::{debug, info, warn};

use crate::autopilot::Autopilot;
use crate::config::EngineConfig;
use crate::data_loader::load_game_data;
use crate::keyboard::{KeyBindings, KeyboardState};
use crate::timing::FrameTiming;

/// Nominal pixel size of one sprite-sheet cell without real images.
const CELL_PX: u32 = 64;

/// Stand-in image sizes derived from the sheet grids.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSprites {
    sizes: HashMap<String, (u32, u32)>,
}

impl HeadlessSprites {
    /// Register every image the game data names.
    #[must_use]
    pub fn from_data(data: &GameData) -> Self {
        let mut sprites = Self::default();
        sprites.register(&data.player.image, data.player.grid);
        for opponent in &data.opponents {
            sprites.register(&opponent.image, opponent.grid);
        }
        sprites.register(&data.meta.cover, SpriteGrid::default());
        sprites
    }

    fn register(&mut self, image: &str, grid: SpriteGrid) {
        if image.is_empty() {
            return;
        }
        self.sizes
            .insert(image.to_string(), (grid.cols * CELL_PX, grid.rows * CELL_PX));
    }
}

impl SpriteLookup for HeadlessSprites {
    fn image_size(&self, image: &str) -> Option<(u32, u32)> {
        self.sizes.get(image).copied()
    }
}

/// Outcome of a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Frames simulated
    pub frames: u32,
    /// Fights won
    pub wins: u32,
    /// Phase at exit
    pub phase: Phase,
    /// Roster index at exit
    pub selected_opponent: usize,
    /// HUD line at exit
    pub hud_text: String,
}

/// Headless application state.
pub struct Headless {
    /// Engine configuration
    config: EngineConfig,
    controller: FightController,
    session: FightSession,
    sprites: HeadlessSprites,
    measure: MonospaceMeasure,

    // === Input ===
    keyboard: KeyboardState,
    bindings: KeyBindings,
    autopilot: Option<Autopilot>,

    /// Frame clock
    timing: FrameTiming,
    frames: u32,
    wins: u32,
    last_draw_len: usize,
}

#[allow(dead_code)]
impl Headless {
    /// Build the host around already-loaded game data.
    #[must_use]
    pub fn new(config: EngineConfig, data: GameData) -> Self {
        let controller = FightController::new(data);
        let session = controller.new_session();
        let sprites = HeadlessSprites::from_data(controller.data());
        let timing = FrameTiming::new(config.target_fps);
        let autopilot = config
            .autopilot
            .then(|| Autopilot::new(timing.fixed_dt() * 2.0));

        Self {
            config,
            controller,
            session,
            sprites,
            measure: MonospaceMeasure::default(),
            keyboard: KeyboardState::new(),
            bindings: KeyBindings::default(),
            autopilot,
            timing,
            frames: 0,
            wins: 0,
            last_draw_len: 0,
        }
    }

    /// Current session.
    #[must_use]
    pub const fn session(&self) -> &FightSession {
        &self.session
    }

    /// Fights won so far.
    #[must_use]
    pub const fn wins(&self) -> u32 {
        self.wins
    }

    /// Draw commands emitted by the last frame.
    #[must_use]
    pub const fn last_draw_len(&self) -> usize {
        self.last_draw_len
    }

    /// Keyboard fed into the next frame.
    pub fn keyboard_mut(&mut self) -> &mut KeyboardState {
        &mut self.keyboard
    }

    /// Run one frame of `dt` milliseconds of wall time.
    ///
    /// Returns the last snapshot produced, or `None` if the frame clock had
    /// no full step to run.
    pub fn frame(&mut self, dt: f32) -> Option<FightSnapshot> {
        let steps = self.timing.accumulate(dt);
        let mut last = None;
        for _ in 0..steps {
            last = Some(self.step(self.timing.fixed_dt()));
        }
        self.frames += 1;

        if self.config.hud_log_interval > 0 && self.frames % self.config.hud_log_interval == 0 {
            if let Some(snapshot) = &last {
                if snapshot.phase == Phase::Fighting {
                    info!("{}", snapshot.hud_text);
                }
            }
        }
        last
    }

    /// Run one simulation step of `dt` ms.
    pub fn step(&mut self, dt: f32) -> FightSnapshot {
        if let Some(autopilot) = &mut self.autopilot {
            autopilot.drive(&self.session, &self.bindings, &mut self.keyboard);
        }
        let input = self.keyboard.take_input(&self.bindings);

        let before = self.session.phase();
        let mut snapshot = self.controller.tick(&mut self.session, dt, &input);
        let after = snapshot.phase;

        if before != after {
            info!("Phase {} -> {}", before.display_name(), after.display_name());
            if after == Phase::Victory {
                self.wins += 1;
                info!(wins = self.wins, "{}", snapshot.hud_text);
            }
            if before == Phase::Victory && self.config.advance_roster_on_victory {
                self.controller.switch_opponent(&mut self.session);
                snapshot = self.controller.snapshot(&self.session);
            }
        }

        let commands: Vec<DrawCommand> =
            Presenter::new(self.controller.data(), &self.sprites, &self.measure).draw(&snapshot);
        self.last_draw_len = commands.len();
        snapshot
    }

    /// Run `frames` frames at the configured rate.
    pub fn run(&mut self, frames: u32) -> RunSummary {
        let frame_ms = self.config.frame_ms();
        for _ in 0..frames {
            self.frame(frame_ms);
        }
        debug!(frames = self.frames, draw_commands = self.last_draw_len, "run finished");
        self.summary()
    }

    /// Summary of the run so far.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let snapshot = self.controller.snapshot(&self.session);
        RunSummary {
            frames: self.frames,
            wins: self.wins,
            phase: snapshot.phase,
            selected_opponent: snapshot.selected_opponent,
            hud_text: snapshot.hud_text,
        }
    }
}

/// Load game data, falling back to the built-in defaults if the file is
/// missing.
///
/// # Errors
///
/// Any load failure other than a missing file.
pub fn load_data_or_default(config: &EngineConfig) -> RingsideResult<GameData> {
    match load_game_data(&config.data_path) {
        Ok(data) => Ok(data),
        Err(ConfigError::NotFound(path)) => {
            warn!("Game data {} not found, using built-in defaults", path.display());
            Ok(GameData::default())
        },
        Err(e) => Err(e.into()),
    }
}

/// Run the headless game for the configured number of frames.
///
/// # Errors
///
/// Returns an error if the game data exists but cannot be loaded.
pub fn run(config: EngineConfig) -> RingsideResult<RunSummary> {
    info!("Configuration loaded:");
    info!("  Data: {}", config.data_path.display());
    info!("  Rate: {} fps, {} frames", config.target_fps, config.max_frames);
    info!("  Autopilot: {}", config.autopilot);

    let data = load_data_or_default(&config)?;
    let frames = config.max_frames;
    let mut app = Headless::new(config, data);
    let summary = app.run(frames);

    info!(
        "Ran {} frames, {} wins, ended in {}",
        summary.frames,
        summary.wins,
        summary.phase.display_name()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_sprites_use_grid() {
        let mut data = GameData::default();
        data.player.grid = SpriteGrid { cols: 4, rows: 2 };
        let sprites = HeadlessSprites::from_data(&data);
        assert_eq!(sprites.image_size("player.png"), Some((256, 128)));
        assert_eq!(sprites.image_size("missing.png"), None);
    }

    #[test]
    fn test_manual_keyboard_starts_fight() {
        let config = EngineConfig {
            autopilot: false,
            ..EngineConfig::default()
        };
        let mut app = Headless::new(config, GameData::default());

        app.step(16.0);
        assert_eq!(app.session().phase(), Phase::Title);

        app.keyboard_mut().key_down("Enter");
        app.step(16.0);
        assert_eq!(app.session().phase(), Phase::Fighting);
        assert!(app.last_draw_len() > 0);
    }

    #[test]
    fn test_frame_with_no_full_step() {
        let mut app = Headless::new(EngineConfig::default(), GameData::default());
        assert!(app.frame(1.0).is_none());
        assert_eq!(app.summary().frames, 1);
    }
}
