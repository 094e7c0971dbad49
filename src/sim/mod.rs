//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `advance` call is one step; nothing here reads a clock
//! - No randomness
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod interaction;
pub mod kinematics;
pub mod state;
pub mod tick;
pub mod tile;

pub use camera::Camera;
pub use collision::{Aabb, BlockHit, VerticalContact, resolve_horizontal, resolve_vertical};
pub use interaction::{EnemyContact, classify_contact, collect_coins, fell_out, reached_goal, touched_hazard};
pub use kinematics::{integrate_player, move_player, step_enemy, wall_ahead};
pub use state::{
    Coin, CoinId, CoinView, Enemy, EnemyId, EnemyView, Facing, GamePhase, Player, PlayerView,
    Session, Snapshot,
};
pub use tick::{ControlIntent, DeathCause, Simulation, StepEvent, StepEvents};
pub use tile::{Tile, TileWorld, TriggerResult};
