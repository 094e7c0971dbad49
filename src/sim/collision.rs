//! Axis-separated box vs. grid collision
//!
//! Every actor moves through the same two phases: the horizontal displacement
//! is applied and corrected first, then the vertical one. Resolving X fully
//! before Y keeps a box sliding along a floor from catching on the seams
//! between floor tiles.
//!
//! Edges that lie exactly on a grid line are assigned to the cell before the
//! line when they are not the leading edge (`edge_epsilon`), so a box resting
//! on a floor never samples the floor row during its horizontal pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tile::{TileWorld, TriggerResult};
use crate::cell_index;

/// Axis-aligned box, top-left origin, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap; boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// A solid cell struck by a rising box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHit {
    pub col: i32,
    pub row: i32,
    pub result: TriggerResult,
}

/// Contacts reported by the vertical pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VerticalContact {
    /// Bottom edge rests on a solid cell
    pub grounded: bool,
    /// Cell struck from below, already triggered
    pub bumped: Option<BlockHit>,
}

/// Apply `vx` and push the box out of any solid cell its leading edge entered.
///
/// Returns `true` when the box was stopped by a wall; `vx` is zeroed in that case.
pub fn resolve_horizontal(world: &TileWorld, body: &mut Aabb, vx: &mut f32, edge_epsilon: f32) -> bool {
    body.x += *vx;

    let ts = world.tile_size();
    let top = cell_index(body.y, ts);
    let bottom = cell_index(body.bottom() - edge_epsilon, ts);

    if *vx > 0.0 {
        let col = cell_index(body.right(), ts);
        if (top..=bottom).any(|row| world.solid_at(col, row)) {
            body.x = col as f32 * ts - body.w;
            *vx = 0.0;
            return true;
        }
    } else if *vx < 0.0 {
        let col = cell_index(body.x, ts);
        if (top..=bottom).any(|row| world.solid_at(col, row)) {
            body.x = (col + 1) as f32 * ts;
            *vx = 0.0;
            return true;
        }
    }
    false
}

/// Apply `vy` and resolve against floors and ceilings.
///
/// A box moving down (or at rest) that ends with its bottom edge in a solid
/// row is lifted onto it and reported grounded. A box moving up that ends with
/// its top edge in a solid row is pushed below it and the struck cell is
/// triggered through [`TileWorld::trigger_from_below`].
pub fn resolve_vertical(
    world: &mut TileWorld,
    body: &mut Aabb,
    vy: &mut f32,
    edge_epsilon: f32,
) -> VerticalContact {
    body.y += *vy;

    let ts = world.tile_size();
    let left = cell_index(body.x, ts);
    let right = cell_index(body.right() - edge_epsilon, ts);
    let mut contact = VerticalContact::default();

    if *vy >= 0.0 {
        let row = cell_index(body.bottom(), ts);
        if (left..=right).any(|col| world.solid_at(col, row)) {
            body.y = row as f32 * ts - body.h;
            *vy = 0.0;
            contact.grounded = true;
        }
    } else {
        let row = cell_index(body.y, ts);
        // Bump the block above the box's center when it is solid, else the first solid one
        let center_col = cell_index(body.center().x, ts);
        let struck = if world.solid_at(center_col, row) {
            Some(center_col)
        } else {
            (left..=right).find(|&col| world.solid_at(col, row))
        };
        if let Some(col) = struck {
            body.y = (row + 1) as f32 * ts;
            *vy = 0.0;
            let result = world.trigger_from_below(col, row);
            contact.bumped = Some(BlockHit { col, row, result });
        }
    }
    contact
}
