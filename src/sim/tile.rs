//! Tile grid and the block mutation rules
//!
//! The grid is fixed in size at load. Spawn markers (coins, enemies, the player
//! start) are consumed when the world is built and read as `Empty` afterwards.
//! The only mutation allowed after load is [`TileWorld::trigger_from_below`].

use serde::{Deserialize, Serialize};

use crate::cell_index;

/// Kind of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Ground,
    Brick,
    /// Surprise block, pays out a bonus when bumped
    Question,
    Coin,
    Enemy,
    /// Goal marker, never mutated
    Flag,
    PlayerStart,
    /// Hazard cell (lava, spikes): lethal to touch, not solid
    DeathZone,
}

impl Tile {
    /// Parse a layout symbol. Unknown symbols yield `None`.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '.' | ' ' => Some(Tile::Empty),
            '#' => Some(Tile::Ground),
            'B' => Some(Tile::Brick),
            '?' => Some(Tile::Question),
            'C' => Some(Tile::Coin),
            'E' => Some(Tile::Enemy),
            'F' => Some(Tile::Flag),
            'S' => Some(Tile::PlayerStart),
            'X' => Some(Tile::DeathZone),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Ground => '#',
            Tile::Brick => 'B',
            Tile::Question => '?',
            Tile::Coin => 'C',
            Tile::Enemy => 'E',
            Tile::Flag => 'F',
            Tile::PlayerStart => 'S',
            Tile::DeathZone => 'X',
        }
    }

    /// Whether this kind blocks movement
    #[inline]
    pub fn is_solid(&self) -> bool {
        matches!(self, Tile::Ground | Tile::Brick | Tile::Question)
    }

    /// Whether this kind is consumed at load to create a dynamic entity
    #[inline]
    pub fn is_spawn_marker(&self) -> bool {
        matches!(self, Tile::Coin | Tile::Enemy | Tile::PlayerStart)
    }
}

/// Outcome of bumping a cell from below
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerResult {
    /// A question block was emptied
    SpawnedBonus,
    /// A brick was destroyed
    Broken,
    NoEffect,
}

/// Owned level grid, row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileWorld {
    width: usize,
    height: usize,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl TileWorld {
    /// Build a world from a rectangular row-major grid. Spawn markers are cleared to `Empty`.
    ///
    /// `tiles.len()` must equal `width * height`; callers validate before building.
    pub fn new(width: usize, height: usize, tile_size: f32, tiles: &[Tile]) -> Self {
        debug_assert_eq!(tiles.len(), width * height);
        let tiles = tiles
            .iter()
            .map(|t| if t.is_spawn_marker() { Tile::Empty } else { *t })
            .collect();
        Self {
            width,
            height,
            tile_size,
            tiles,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Level width in pixels
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    /// Level height in pixels
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(row * self.width + col)
    }

    /// Tile at a cell; out of bounds reads as `Empty`
    pub fn tile_at(&self, col: i32, row: i32) -> Tile {
        self.index(col, row)
            .map(|i| self.tiles[i])
            .unwrap_or(Tile::Empty)
    }

    /// Whether a cell blocks movement; out of bounds is never solid
    #[inline]
    pub fn solid_at(&self, col: i32, row: i32) -> bool {
        self.tile_at(col, row).is_solid()
    }

    /// Tile under a world-space point
    pub fn tile_at_point(&self, x: f32, y: f32) -> Tile {
        self.tile_at(cell_index(x, self.tile_size), cell_index(y, self.tile_size))
    }

    /// Bump a cell from below. Question blocks pay out, bricks break, anything else is untouched.
    pub fn trigger_from_below(&mut self, col: i32, row: i32) -> TriggerResult {
        let Some(i) = self.index(col, row) else {
            return TriggerResult::NoEffect;
        };
        match self.tiles[i] {
            Tile::Question => {
                self.tiles[i] = Tile::Empty;
                TriggerResult::SpawnedBonus
            }
            Tile::Brick => {
                self.tiles[i] = Tile::Empty;
                TriggerResult::Broken
            }
            _ => TriggerResult::NoEffect,
        }
    }

    /// Iterate cells as `(col, row, tile)`
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| (i % self.width, i / self.width, *t))
    }
}
