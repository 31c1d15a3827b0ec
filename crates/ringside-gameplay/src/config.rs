//! Game data model.
//!
//! Static data describing tunable timings, the opponent roster, animation
//! frame sequences and text content. The document shape follows the JSON
//! data file shipped with the game; every section is `#[serde(default)]` so
//! a partial document still produces a playable fight.

use std::collections::HashMap;
use std::path::Path;

use ringside_common::{ConfigError, Size, Vec2};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::hitbox::HitboxLayout;

/// Animation frame-index sequences keyed by state name.
pub type AnimationSet = HashMap<String, Vec<u32>>;

/// Root of the game data document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameData {
    /// Canvas resolution.
    pub canvas: CanvasConfig,
    /// Player sprite and animations.
    pub player: PlayerConfig,
    /// Opponent roster, in selection order.
    pub opponents: Vec<OpponentConfig>,
    /// Actor placement and hit regions.
    pub arena: ArenaConfig,
    /// Titles, links and ticker lines.
    pub meta: MetaConfig,
    /// Palette.
    pub style: StyleConfig,
    /// Hearts, stars and knockout pause.
    pub hud: HudConfig,
    /// Attack and defense timings.
    pub tuning: TuningConfig,
}

impl GameData {
    /// Parse a game data document from JSON text.
    ///
    /// `origin` is only used to label parse errors.
    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self, ConfigError> {
        let mut data: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        data.sanitize();
        Ok(data)
    }

    /// Clamp values into usable ranges.
    ///
    /// Negative or NaN durations become zero, heart count is at least one and
    /// frame times are at least one millisecond.
    pub fn sanitize(&mut self) {
        let t = &mut self.tuning.player;
        for value in [
            &mut t.jab_startup_ms,
            &mut t.jab_active_ms,
            &mut t.jab_recovery_ms,
            &mut t.dodge_invuln_ms,
            &mut t.duck_invuln_ms,
            &mut t.evade_ms,
            &mut t.star_startup_ms,
            &mut t.star_active_ms,
            &mut t.star_recovery_ms,
            &mut self.tuning.opponent_idle_buffer_ms,
            &mut self.tuning.hit_invuln_ms,
            &mut self.hud.winded_ms,
        ] {
            *value = non_negative(*value);
        }
        self.tuning.player_damage = non_negative(self.tuning.player_damage);
        self.tuning.star_damage_multiplier = non_negative(self.tuning.star_damage_multiplier);

        if self.hud.hearts_start == 0 {
            warn!("hud.hearts_start is 0, using 1");
            self.hud.hearts_start = 1;
        }

        self.player.frame_ms = self.player.frame_ms.max(1.0);
        self.meta.ticker_interval_ms = self.meta.ticker_interval_ms.max(1.0);
        for opponent in &mut self.opponents {
            opponent.frame_ms = opponent.frame_ms.max(1.0);
        }
    }

    /// Number of roster entries that can be selected.
    ///
    /// An empty roster still yields one (fallback) opponent.
    #[must_use]
    pub fn roster_len(&self) -> usize {
        self.opponents.len().max(1)
    }

    /// Resolve the opponent at `index` into a fight-ready profile.
    ///
    /// Missing roster entries and missing attack timings are replaced with
    /// a fallback that idles forever.
    #[must_use]
    pub fn opponent_profile(&self, index: usize) -> OpponentProfile {
        let Some(entry) = self.opponents.get(index) else {
            warn!(index, roster = self.opponents.len(), "opponent missing from roster, using fallback");
            return OpponentProfile::fallback();
        };

        let timings = match entry.ai {
            Some(ai) => ai.sanitized(),
            None => {
                warn!(opponent = %entry.name, "opponent has no attack timings, it will never attack");
                AttackTimings::NEVER
            },
        };

        OpponentProfile {
            name: entry.name.clone(),
            timings,
        }
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Canvas resolution and on-screen scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Integer upscale applied by the host.
    pub scale: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 240,
            scale: 3,
        }
    }
}

/// Columns and rows of a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteGrid {
    /// Frames per row.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
}

impl Default for SpriteGrid {
    fn default() -> Self {
        Self { cols: 1, rows: 1 }
    }
}

/// Player sprite sheet and animations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Image key.
    pub image: String,
    /// Sheet layout.
    pub grid: SpriteGrid,
    /// Frame sequences keyed by state name.
    pub animations: AnimationSet,
    /// Milliseconds per animation frame.
    pub frame_ms: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            image: "player.png".to_string(),
            grid: SpriteGrid::default(),
            animations: AnimationSet::new(),
            frame_ms: 120.0,
        }
    }
}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    /// Display name.
    pub name: String,
    /// Image key.
    pub image: String,
    /// Sheet layout.
    pub grid: SpriteGrid,
    /// Frame sequences keyed by `idle`, `tell`, `punch`, `hit`.
    pub animations: AnimationSet,
    /// Attack cycle timings. `None` means the opponent never attacks.
    pub ai: Option<AttackTimings>,
    /// Milliseconds per animation frame.
    pub frame_ms: f32,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            name: "Opponent".to_string(),
            image: String::new(),
            grid: SpriteGrid::default(),
            animations: AnimationSet::new(),
            ai: None,
            frame_ms: 140.0,
        }
    }
}

/// Opponent attack cycle: telegraph, damage window, recovery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackTimings {
    /// Telegraph duration (ms).
    #[serde(default = "never_ms")]
    pub tell_ms: f32,
    /// Damage window duration (ms).
    #[serde(default = "never_ms")]
    pub active_ms: f32,
    /// Recovery duration (ms).
    #[serde(default = "never_ms")]
    pub recovery_ms: f32,
}

/// A timing left out of the document never elapses.
fn never_ms() -> f32 {
    f32::INFINITY
}

impl AttackTimings {
    /// Timings that never leave idle.
    pub const NEVER: Self = Self {
        tell_ms: f32::INFINITY,
        active_ms: f32::INFINITY,
        recovery_ms: f32::INFINITY,
    };

    /// Create new attack timings.
    #[must_use]
    pub const fn new(tell_ms: f32, active_ms: f32, recovery_ms: f32) -> Self {
        Self {
            tell_ms,
            active_ms,
            recovery_ms,
        }
    }

    /// Negative values clamp to zero; NaN never triggers.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let fix = |v: f32| if v.is_nan() { f32::INFINITY } else { v.max(0.0) };
        Self {
            tell_ms: fix(self.tell_ms),
            active_ms: fix(self.active_ms),
            recovery_ms: fix(self.recovery_ms),
        }
    }

    /// Whether this cycle ever reaches the attack window.
    #[must_use]
    pub fn ever_attacks(&self) -> bool {
        self.tell_ms.is_finite()
    }
}

/// Opponent data resolved for one fight.
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentProfile {
    /// Display name.
    pub name: String,
    /// Attack cycle.
    pub timings: AttackTimings,
}

impl OpponentProfile {
    /// Stand-in used when the roster cannot supply an opponent.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            name: "Sparring Bag".to_string(),
            timings: AttackTimings::NEVER,
        }
    }
}

/// Where an actor stands and how big its sprite is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Top-left corner of the sprite.
    pub position: Vec2,
    /// Sprite size.
    pub size: Size,
}

/// Actor placement and hit regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Player placement.
    pub player: Placement,
    /// Opponent placement.
    pub opponent: Placement,
    /// Hit regions relative to each actor's position.
    pub hitboxes: HitboxLayout,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            player: Placement {
                position: Vec2::new(110.0, 150.0),
                size: Size::new(36.0, 60.0),
            },
            opponent: Placement {
                position: Vec2::new(90.0, 50.0),
                size: Size::new(76.0, 90.0),
            },
            hitboxes: HitboxLayout::default(),
        }
    }
}

/// Text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
    /// Title screen heading.
    pub game_title: String,
    /// Featured title named in the title-screen tagline.
    #[serde(alias = "frus_title")]
    pub feature_title: String,
    /// Cover image key.
    #[serde(alias = "frus_cover")]
    pub cover: String,
    /// Link shown in the HUD and on the win screen.
    #[serde(alias = "frus_link")]
    pub link: String,
    /// Win screen heading.
    pub victory_text: String,
    /// Scrolling banner lines.
    pub ticker: Vec<String>,
    /// Time each banner line stays up (ms).
    pub ticker_interval_ms: f32,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            game_title: "RINGSIDE".to_string(),
            feature_title: String::new(),
            cover: String::new(),
            link: String::new(),
            victory_text: "TKO! YOU WIN".to_string(),
            ticker: Vec::new(),
            ticker_interval_ms: 3500.0,
        }
    }
}

/// Palette, as CSS colour strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Ring floor.
    pub ring_mat: String,
    /// Ring floor stripe.
    pub ring_mat_line: String,
    /// Banner background.
    pub banner_bg: String,
    /// Banner and prompt text.
    pub banner_fg: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            ring_mat: "#7a0f1c".to_string(),
            ring_mat_line: "#f2e6c9".to_string(),
            banner_bg: "#101010".to_string(),
            banner_fg: "#ffd54a".to_string(),
        }
    }
}

/// Hearts, stars and knockout pause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Hearts at the start of a fight and after recovering from a knockout.
    pub hearts_start: u32,
    /// Star charges at the start of a fight.
    pub stars_start: u32,
    /// Knockout pause before hearts are restored (ms).
    pub winded_ms: f32,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            hearts_start: 3,
            stars_start: 0,
            winded_ms: 1500.0,
        }
    }
}

/// Attack and defense tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Player action timings.
    pub player: PlayerTuning,
    /// Stamina removed per 100ms of jab overlap.
    pub player_damage: f32,
    /// Star damage relative to a jab.
    pub star_damage_multiplier: f32,
    /// Extra idle time before each opponent telegraph (ms).
    pub opponent_idle_buffer_ms: f32,
    /// Invulnerability granted to the player after taking a punch (ms).
    pub hit_invuln_ms: f32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            player_damage: 10.0,
            star_damage_multiplier: 2.0,
            opponent_idle_buffer_ms: 200.0,
            hit_invuln_ms: 400.0,
        }
    }
}

/// Player action timings (ms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Jab wind-up.
    pub jab_startup_ms: f32,
    /// Jab damage window.
    pub jab_active_ms: f32,
    /// Jab recovery.
    pub jab_recovery_ms: f32,
    /// Invulnerability granted by a dodge.
    pub dodge_invuln_ms: f32,
    /// Invulnerability granted by a duck.
    pub duck_invuln_ms: f32,
    /// How long a dodge or duck lasts.
    pub evade_ms: f32,
    /// Star wind-up.
    pub star_startup_ms: f32,
    /// Star damage window.
    pub star_active_ms: f32,
    /// Star recovery.
    pub star_recovery_ms: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            jab_startup_ms: 60.0,
            jab_active_ms: 100.0,
            jab_recovery_ms: 140.0,
            dodge_invuln_ms: 240.0,
            duck_invuln_ms: 180.0,
            evade_ms: 260.0,
            star_startup_ms: 200.0,
            star_active_ms: 120.0,
            star_recovery_ms: 480.0,
        }
    }
}
