//! Tile Bros - simulation core for a 2D tile-grid platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile world, collisions, actors, session loop)
//! - `level`: Level descriptors, grid parsing and the built-in fallback level
//! - `tuning`: Data-driven physics constants
//!
//! Rendering, input mapping and level generation live outside this crate. A host
//! samples a [`sim::ControlIntent`] once per frame, calls [`sim::Simulation::advance`]
//! and draws from the returned events plus [`sim::Session::snapshot`].

pub mod level;
pub mod sim;
pub mod tuning;

pub use level::{Level, LevelDescriptor, LevelError, Theme};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Edge length of one grid cell in pixels
    pub const TILE_SIZE: f32 = 32.0;

    /// Conventional level height in rows
    pub const DEFAULT_LEVEL_HEIGHT: usize = 14;

    /// Level size limits accepted at load
    pub const MAX_LEVEL_WIDTH: usize = 1024;
    pub const MAX_LEVEL_HEIGHT: usize = 64;
}

/// Convert a world coordinate to the index of the cell containing it
#[inline]
pub fn cell_index(coord: f32, tile_size: f32) -> i32 {
    (coord / tile_size).floor() as i32
}
