//! Level descriptors
//!
//! A level arrives as the JSON a level generator produces: a theme, the grid
//! dimensions and one string per row. [`Level`] is the validated, parsed form
//! a session is built from. Malformed input never reaches a session; the
//! caller falls back to [`Level::fallback`] instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_LEVEL_HEIGHT, MAX_LEVEL_HEIGHT, MAX_LEVEL_WIDTH};
use crate::sim::Tile;

/// Errors that make a level descriptor unusable
#[derive(Debug, Error)]
pub enum LevelError {
    /// JSON parsing failed
    #[error("level JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Width or height is zero or above the supported limits
    #[error("invalid level dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Number of layout rows does not match the declared height
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    /// A layout row does not match the declared width
    #[error("row {row} has {found} columns, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// No `S` marker anywhere in the grid
    #[error("level has no player start")]
    MissingPlayerStart,
}

/// Visual theme, passed through to presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Day,
    Night,
    Underground,
}

fn default_message() -> String {
    "Let's-a go!".to_string()
}

/// Level as produced by a generator (wire format)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    #[serde(default)]
    pub theme: Theme,
    pub width: usize,
    pub height: usize,
    /// One string per row, top to bottom
    pub layout: Vec<String>,
    #[serde(default = "default_message")]
    pub message: String,
}

/// A validated level grid.
///
/// Only [`Level::from_descriptor`] and [`Level::fallback`] build one, so the
/// grid is always `width * height` tiles with a player start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    theme: Theme,
    width: usize,
    height: usize,
    /// Row-major tiles, spawn markers included
    tiles: Vec<Tile>,
    message: String,
    /// `(col, row)` of the first player start in row-major order
    player_start: (usize, usize),
}

impl Level {
    /// Validate and parse a descriptor
    pub fn from_descriptor(desc: &LevelDescriptor) -> Result<Self, LevelError> {
        let (width, height) = (desc.width, desc.height);
        if width == 0 || height == 0 || width > MAX_LEVEL_WIDTH || height > MAX_LEVEL_HEIGHT {
            return Err(LevelError::InvalidDimensions { width, height });
        }
        if desc.layout.len() != height {
            return Err(LevelError::RowCount {
                expected: height,
                found: desc.layout.len(),
            });
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut unknown = 0usize;
        for (row, line) in desc.layout.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LevelError::RowWidth {
                    row,
                    expected: width,
                    found,
                });
            }
            tiles.extend(line.chars().map(|c| {
                Tile::from_symbol(c).unwrap_or_else(|| {
                    unknown += 1;
                    Tile::Empty
                })
            }));
        }
        if unknown > 0 {
            log::warn!("Level has {} unknown symbols, read as empty", unknown);
        }

        let mut starts = tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == Tile::PlayerStart)
            .map(|(i, _)| (i % width, i / width));
        let player_start = starts.next().ok_or(LevelError::MissingPlayerStart)?;
        let extra = starts.count();
        if extra > 0 {
            log::warn!(
                "Level has {} player starts, using the first at {:?}",
                extra + 1,
                player_start
            );
        }

        Ok(Self {
            theme: desc.theme,
            width,
            height,
            tiles,
            message: desc.message.clone(),
            player_start,
        })
    }

    /// Parse a descriptor from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let desc: LevelDescriptor = serde_json::from_str(json)?;
        Self::from_descriptor(&desc)
    }

    /// Validate a descriptor, substituting the built-in level when it is malformed
    pub fn load_or_default(desc: &LevelDescriptor) -> Self {
        Self::from_descriptor(desc).unwrap_or_else(|err| {
            log::warn!("Malformed level ({}), loading fallback level", err);
            Self::fallback()
        })
    }

    /// JSON variant of [`Level::load_or_default`]
    pub fn load_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|err| {
            log::warn!("Malformed level ({}), loading fallback level", err);
            Self::fallback()
        })
    }

    /// Built-in level used whenever a descriptor cannot be loaded
    pub fn fallback() -> Self {
        let width = 40;
        let height = DEFAULT_LEVEL_HEIGHT;
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let tile = match (x, y) {
                    (_, y) if y >= height - 2 => Tile::Ground,
                    (5, 9) => Tile::Question,
                    (10, 9) => Tile::Brick,
                    (15, 11) => Tile::Enemy,
                    (35, 10) => Tile::Flag,
                    (2, 10) => Tile::PlayerStart,
                    _ => Tile::Empty,
                };
                tiles.push(tile);
            }
        }
        Self {
            theme: Theme::Day,
            width,
            height,
            tiles,
            message: "Fallback Level loaded.".to_string(),
            player_start: (2, 10),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major tiles, spawn markers included
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn player_start(&self) -> (usize, usize) {
        self.player_start
    }

    /// Tile at a cell of the pristine grid; out of bounds reads as `Empty`
    pub fn tile(&self, col: usize, row: usize) -> Tile {
        if col >= self.width || row >= self.height {
            return Tile::Empty;
        }
        self.tiles[row * self.width + col]
    }

    /// Render back to layout rows
    pub fn layout(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width)
            .map(|row| row.iter().map(Tile::symbol).collect())
            .collect()
    }
}
