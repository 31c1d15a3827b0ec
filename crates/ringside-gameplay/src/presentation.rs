//! Presentation adapter.
//!
//! Turns a [`FightSnapshot`] into a flat list of draw commands for the host
//! renderer: animation frame selection, sprite-sheet slicing and text layout.
//! Image decoding and the canvas itself belong to the host, reached through
//! the [`SpriteLookup`] and [`TextMeasure`] capabilities.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{GameData, SpriteGrid};
use crate::fight::FightSnapshot;
use crate::hitbox::Rect;
use crate::player::PlayerState;
use crate::session::Phase;

/// Player frame shown on the win screen when no `victory` sequence exists.
const DEFAULT_VICTORY_FRAME: u32 = 15;
/// Banner strip height.
const BANNER_HEIGHT: f32 = 18.0;
/// Y of the ring floor stripe.
const MAT_LINE_Y: f32 = 120.0;
const WHITE: &str = "#fff";
const SHADOW: &str = "#00000066";

/// Host capability: pixel size of a loaded image.
pub trait SpriteLookup {
    /// Width and height of `image`, `None` if it is not loaded.
    fn image_size(&self, image: &str) -> Option<(u32, u32)>;
}

/// Host capability: width of rendered text.
pub trait TextMeasure {
    /// Width in pixels of `text` at `font`.
    fn measure(&self, text: &str, font: Font) -> f32;
}

/// Fixed-advance measurement for monospace fonts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    /// Glyph advance as a fraction of the font size.
    pub advance_ratio: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, font: Font) -> f32 {
        text.chars().count() as f32 * font.px * self.advance_ratio
    }
}

/// Font size and weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Size in pixels.
    pub px: f32,
    /// Bold weight.
    pub bold: bool,
}

impl Font {
    /// Regular weight.
    #[must_use]
    pub const fn regular(px: f32) -> Self {
        Self { px, bold: false }
    }

    /// Bold weight.
    #[must_use]
    pub const fn bold(px: f32) -> Self {
        Self { px, bold: true }
    }
}

/// One drawing operation, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Solid rectangle.
    FillRect {
        /// Area to fill.
        rect: Rect,
        /// CSS colour.
        color: String,
    },
    /// A cell of a sprite sheet.
    Sprite {
        /// Image key.
        image: String,
        /// Cell within the sheet.
        source: Rect,
        /// Destination on the canvas.
        dest: Rect,
    },
    /// A whole image.
    Image {
        /// Image key.
        image: String,
        /// Destination on the canvas.
        dest: Rect,
    },
    /// Text, positioned by its baseline.
    Text {
        /// Text to draw.
        text: String,
        /// Left edge.
        x: f32,
        /// Baseline.
        y: f32,
        /// Font.
        font: Font,
        /// CSS colour.
        color: String,
    },
}

/// Frame index for an animation after `elapsed` ms.
///
/// A missing or empty sequence shows frame 0.
#[must_use]
pub fn animation_frame(sequence: Option<&[u32]>, elapsed: f32, frame_ms: f32) -> u32 {
    let Some(sequence) = sequence.filter(|s| !s.is_empty()) else {
        return 0;
    };
    let step = (elapsed.max(0.0) / frame_ms.max(1.0)).floor() as usize;
    sequence[step % sequence.len()]
}

/// Source rectangle of cell `index` in a sheet of `image_size` pixels.
#[must_use]
pub fn sprite_source(grid: SpriteGrid, index: u32, image_size: (u32, u32)) -> Rect {
    let cols = grid.cols.max(1);
    let rows = grid.rows.max(1);
    let fw = u64::from(image_size.0 / cols);
    let fh = u64::from(image_size.1 / rows);
    // Frames past the end of the sheet wrap around
    let index = u64::from(index) % (u64::from(cols) * u64::from(rows));
    let sx = (index % u64::from(cols)) * fw;
    let sy = (index / u64::from(cols)) * fh;
    Rect::new(sx as f32, sy as f32, (sx + fw) as f32, (sy + fh) as f32)
}

/// Greedy word wrap. Lines never break inside a word.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    text: &str,
    max_width: f32,
    font: Font,
    measure: &M,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split(' ') {
        let candidate = format!("{line}{word} ");
        if !line.is_empty() && measure.measure(&candidate, font) > max_width {
            lines.push(line.trim_end().to_string());
            line = format!("{word} ");
        } else {
            line = candidate;
        }
    }
    lines.push(line.trim_end().to_string());
    lines
}

/// Builds draw lists for each session phase.
pub struct Presenter<'a, S: ?Sized, M: ?Sized> {
    data: &'a GameData,
    sprites: &'a S,
    measure: &'a M,
}

impl<'a, S, M> Presenter<'a, S, M>
where
    S: SpriteLookup + ?Sized,
    M: TextMeasure + ?Sized,
{
    /// Create a presenter over the host capabilities.
    pub fn new(data: &'a GameData, sprites: &'a S, measure: &'a M) -> Self {
        Self {
            data,
            sprites,
            measure,
        }
    }

    /// Draw list for the current frame.
    #[must_use]
    pub fn draw(&self, snapshot: &FightSnapshot) -> Vec<DrawCommand> {
        let mut out = Vec::new();
        match snapshot.phase {
            Phase::Title => self.draw_title(&mut out),
            Phase::Fighting => self.draw_fight(snapshot, &mut out),
            Phase::Victory => self.draw_victory(&mut out),
        }
        out
    }

    fn canvas(&self) -> (f32, f32) {
        (self.data.canvas.width as f32, self.data.canvas.height as f32)
    }

    fn fill_canvas(&self, out: &mut Vec<DrawCommand>) {
        let (w, h) = self.canvas();
        fill(out, Rect::new(0.0, 0.0, w, h), &self.data.style.ring_mat);
    }

    fn draw_title(&self, out: &mut Vec<DrawCommand>) {
        let (width, _) = self.canvas();
        let meta = &self.data.meta;
        self.fill_canvas(out);

        let (cw, ch) = (110.0, 160.0);
        let cx = (width - cw) / 2.0;
        let cy = 28.0;
        fill(out, Rect::new(cx - 4.0, cy - 4.0, cx + cw + 4.0, cy + ch + 4.0), SHADOW);
        image(out, &meta.cover, Rect::new(cx, cy, cx + cw, cy + ch));

        text(out, &meta.game_title, 14.0, 18.0, Font::bold(14.0), WHITE);
        text(
            out,
            "Press ENTER to Start",
            58.0,
            206.0,
            Font::bold(10.0),
            &self.data.style.banner_fg,
        );

        if !meta.feature_title.is_empty() {
            let tagline = format!("Featuring the new {}.", meta.feature_title);
            let font = Font::regular(8.0);
            for (i, line) in wrap_text(&tagline, 232.0, font, self.measure).iter().enumerate() {
                text(out, line, 12.0, 196.0 + i as f32 * 9.0, font, WHITE);
            }
        }
    }

    fn draw_fight(&self, snapshot: &FightSnapshot, out: &mut Vec<DrawCommand>) {
        let (width, _) = self.canvas();
        let style = &self.data.style;
        self.fill_canvas(out);
        fill(out, Rect::new(0.0, MAT_LINE_Y, width, MAT_LINE_Y + 2.0), &style.ring_mat_line);

        fill(out, Rect::new(0.0, 0.0, width, BANNER_HEIGHT), &style.banner_bg);
        text(out, &snapshot.banner, 6.0, 12.0, Font::bold(8.0), &style.banner_fg);

        let arena = &self.data.arena;
        if let Some(opponent) = self.data.opponents.get(snapshot.selected_opponent) {
            let sequence = opponent
                .animations
                .get(snapshot.opponent_state.animation_key())
                .map(Vec::as_slice);
            let frame = animation_frame(sequence, snapshot.opponent_elapsed, opponent.frame_ms);
            self.sprite(
                out,
                &opponent.image,
                opponent.grid,
                frame,
                Rect::from_origin_size(arena.opponent.position, arena.opponent.size),
            );
        }

        let player = &self.data.player;
        let frame = if snapshot.player_state == PlayerState::Duck {
            0
        } else {
            let sequence = player
                .animations
                .get(snapshot.player_state.animation_key())
                .map(Vec::as_slice);
            animation_frame(sequence, snapshot.player_elapsed, player.frame_ms)
        };
        self.sprite(
            out,
            &player.image,
            player.grid,
            frame,
            Rect::from_origin_size(arena.player.position, arena.player.size),
        );
    }

    fn draw_victory(&self, out: &mut Vec<DrawCommand>) {
        let meta = &self.data.meta;
        let style = &self.data.style;
        self.fill_canvas(out);

        text(out, &meta.victory_text, 30.0, 24.0, Font::bold(14.0), WHITE);
        if !meta.link.is_empty() {
            text(out, "Read more now:", 66.0, 44.0, Font::regular(8.0), WHITE);
            text(out, &meta.link, 10.0, 58.0, Font::regular(8.0), &style.banner_fg);
        }

        let player = &self.data.player;
        let frame = player
            .animations
            .get("victory")
            .and_then(|s| s.first().copied())
            .unwrap_or(DEFAULT_VICTORY_FRAME);
        self.sprite(
            out,
            &player.image,
            player.grid,
            frame,
            Rect::new(108.0, 110.0, 148.0, 174.0),
        );

        image(out, &meta.cover, Rect::new(10.0, 80.0, 90.0, 192.0));
        text(out, "Press ENTER for Title", 60.0, 224.0, Font::bold(10.0), WHITE);
    }

    fn sprite(&self, out: &mut Vec<DrawCommand>, key: &str, grid: SpriteGrid, frame: u32, dest: Rect) {
        let Some(size) = self.sprites.image_size(key) else {
            trace!(image = key, "sprite not loaded, skipped");
            return;
        };
        out.push(DrawCommand::Sprite {
            image: key.to_string(),
            source: sprite_source(grid, frame, size),
            dest,
        });
    }
}

fn fill(out: &mut Vec<DrawCommand>, rect: Rect, color: &str) {
    out.push(DrawCommand::FillRect {
        rect,
        color: color.to_string(),
    });
}

fn image(out: &mut Vec<DrawCommand>, key: &str, dest: Rect) {
    if key.is_empty() {
        return;
    }
    out.push(DrawCommand::Image {
        image: key.to_string(),
        dest,
    });
}

fn text(out: &mut Vec<DrawCommand>, s: &str, x: f32, y: f32, font: Font, color: &str) {
    out.push(DrawCommand::Text {
        text: s.to_string(),
        x,
        y,
        font,
        color: color.to_string(),
    });
}
