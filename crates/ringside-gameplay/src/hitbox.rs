//! Hit region geometry.
//!
//! Regions are axis-aligned rectangles placed relative to an actor's
//! position. Attack regions exist only while the actor's damage window is
//! open; the player's vulnerable region disappears while invulnerable.
//!
//! Overlap uses strict inequalities: rectangles that only share an edge do
//! not overlap.

use ringside_common::{Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::opponent::Opponent;
use crate::player::Player;
use crate::timing::PhaseTable;

/// Axis-aligned rectangle stored as a corner pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl Rect {
    /// Creates a new rectangle from its corners.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub fn from_origin_size(origin: Vec2, size: Size) -> Self {
        Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x + size.w,
            max_y: origin.y + size.h,
        }
    }

    /// Returns the width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Checks if this rectangle overlaps with another.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }
}

/// A region relative to its owner's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionTemplate {
    /// Offset from the owner's position to the region's top-left corner.
    pub offset: Vec2,
    /// Region size.
    pub size: Size,
}

impl RegionTemplate {
    /// Creates a new region template.
    #[must_use]
    pub fn new(offset_x: f32, offset_y: f32, w: f32, h: f32) -> Self {
        Self {
            offset: Vec2::new(offset_x, offset_y),
            size: Size::new(w, h),
        }
    }

    /// Places the region for an owner standing at `position`.
    #[must_use]
    pub fn place(&self, position: Vec2) -> Rect {
        Rect::from_origin_size(position + self.offset, self.size)
    }
}

/// Hit regions for both actors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitboxLayout {
    /// Where the player can be punched.
    pub player_vulnerable: RegionTemplate,
    /// Reach of a jab.
    pub player_jab: RegionTemplate,
    /// Reach of a star punch.
    pub player_star: RegionTemplate,
    /// Where the opponent can be hit.
    pub opponent_vulnerable: RegionTemplate,
    /// Reach of the opponent's punch.
    pub opponent_punch: RegionTemplate,
}

impl Default for HitboxLayout {
    fn default() -> Self {
        Self {
            player_vulnerable: RegionTemplate::new(10.0, 0.0, 30.0, 50.0),
            player_jab: RegionTemplate::new(40.0, -20.0, 26.0, 50.0),
            player_star: RegionTemplate::new(30.0, -30.0, 50.0, 60.0),
            opponent_vulnerable: RegionTemplate::new(10.0, 20.0, 60.0, 70.0),
            opponent_punch: RegionTemplate::new(20.0, 80.0, 40.0, 60.0),
        }
    }
}

/// What a region does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    /// Deals damage to overlapping vulnerable regions.
    Attack,
    /// Receives damage from overlapping attack regions.
    Vulnerable,
}

/// A placed, tagged region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region role.
    pub kind: RegionKind,
    /// Placed rectangle.
    pub rect: Rect,
}

/// The regions an actor presents this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Regions(Vec<Region>);

impl Regions {
    fn push(&mut self, kind: RegionKind, rect: Rect) {
        self.0.push(Region { kind, rect });
    }

    /// All regions.
    #[must_use]
    pub fn as_slice(&self) -> &[Region] {
        &self.0
    }

    /// Regions of one kind.
    pub fn of_kind(&self, kind: RegionKind) -> impl Iterator<Item = &Rect> + '_ {
        self.0.iter().filter(move |r| r.kind == kind).map(|r| &r.rect)
    }

    /// Whether any attack region here overlaps any vulnerable region of `target`.
    #[must_use]
    pub fn strikes(&self, target: &Regions) -> bool {
        self.of_kind(RegionKind::Attack).any(|attack| {
            target
                .of_kind(RegionKind::Vulnerable)
                .any(|vulnerable| attack.overlaps(vulnerable))
        })
    }
}

/// Regions presented by the player.
#[must_use]
pub fn player_regions(player: &Player, table: &PhaseTable, layout: &HitboxLayout) -> Regions {
    let mut regions = Regions::default();
    if let Some(strike) = player.open_strike(table) {
        let template = match strike {
            crate::player::Strike::Jab => &layout.player_jab,
            crate::player::Strike::Star => &layout.player_star,
        };
        regions.push(RegionKind::Attack, template.place(player.position));
    }
    if !player.is_invulnerable() {
        regions.push(
            RegionKind::Vulnerable,
            layout.player_vulnerable.place(player.position),
        );
    }
    regions
}

/// Regions presented by the opponent.
#[must_use]
pub fn opponent_regions(opponent: &Opponent, layout: &HitboxLayout) -> Regions {
    let mut regions = Regions::default();
    if opponent.is_punching() {
        regions.push(
            RegionKind::Attack,
            layout.opponent_punch.place(opponent.position),
        );
    }
    regions.push(
        RegionKind::Vulnerable,
        layout.opponent_vulnerable.place(opponent.position),
    );
    regions
}
