//! Session state and core simulation types
//!
//! A [`Session`] owns everything one play-through mutates: the tile world,
//! the player, enemies and coins, and the camera. It is built from a pristine
//! [`Level`] and can be rebuilt from it at any time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::collision::Aabb;
use super::tile::{Tile, TileWorld};
use crate::level::{Level, Theme};
use crate::tuning::Tuning;

/// Phase of the simulation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No level loaded
    Idle,
    /// Stepping every frame
    Active,
    /// Goal reached (terminal until restart)
    Won,
    /// Player died (terminal until restart)
    Lost,
}

/// Stable enemy identity, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Stable coin identity, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoinId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Aabb,
    pub vel: Vec2,
    /// Set by the latest vertical resolution only
    pub grounded: bool,
    pub facing: Facing,
    /// Steps left during which side contact with enemies is ignored
    pub invulnerable_steps: u32,
    pub alive: bool,
    /// Top edge at the start of the current step
    pub prev_y: f32,
}

impl Player {
    pub fn new(body: Aabb) -> Self {
        Self {
            body,
            vel: Vec2::ZERO,
            grounded: false,
            facing: Facing::Right,
            invulnerable_steps: 0,
            alive: true,
            prev_y: body.y,
        }
    }

    /// Bottom edge before this step's velocity was applied
    #[inline]
    pub fn prev_bottom(&self) -> f32 {
        self.prev_y + self.body.h
    }
}

/// A walking enemy. Once dead it only falls until reaped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub body: Aabb,
    pub vel: Vec2,
    pub alive: bool,
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: CoinId,
    pub body: Aabb,
}

/// Box of size `w`x`h` centered horizontally in a cell and resting on its bottom edge
fn spawn_box(col: usize, row: usize, w: f32, h: f32, tile_size: f32) -> Aabb {
    Aabb::new(
        col as f32 * tile_size + (tile_size - w) * 0.5,
        (row + 1) as f32 * tile_size - h,
        w,
        h,
    )
}

/// One play-through of a level
#[derive(Debug, Clone)]
pub struct Session {
    /// Pristine level, kept for restarts
    level: Level,
    pub(crate) tuning: Tuning,
    pub(crate) world: TileWorld,
    pub player: Player,
    /// Sorted by id
    pub enemies: Vec<Enemy>,
    /// Remaining coins, sorted by id
    pub coins: Vec<Coin>,
    pub camera: Camera,
    pub phase: GamePhase,
    /// Steps advanced since (re)start
    pub step_count: u64,
    /// Coins picked up plus bonus blocks emptied
    pub coins_collected: u32,
    next_id: u32,
}

impl Session {
    /// Start a session on a validated level
    pub fn new(level: Level, tuning: Tuning) -> Self {
        let ts = tuning.tile_size;
        let mut session = Self {
            world: TileWorld::new(level.width(), level.height(), ts, level.tiles()),
            player: Player::new(Aabb::new(0.0, 0.0, tuning.player_width, tuning.player_height)),
            enemies: Vec::new(),
            coins: Vec::new(),
            camera: Camera::default(),
            phase: GamePhase::Active,
            step_count: 0,
            coins_collected: 0,
            next_id: 1,
            level,
            tuning,
        };
        session.spawn_entities();
        log::info!(
            "Level loaded: {}x{} {:?}, {} enemies, {} coins",
            session.level.width(),
            session.level.height(),
            session.level.theme(),
            session.enemies.len(),
            session.coins.len()
        );
        session
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create the player, enemies and coins from the level's spawn markers
    fn spawn_entities(&mut self) {
        let ts = self.tuning.tile_size;
        let (start_col, start_row) = self.level.player_start();
        self.player = Player::new(spawn_box(
            start_col,
            start_row,
            self.tuning.player_width,
            self.tuning.player_height,
            ts,
        ));

        self.enemies.clear();
        self.coins.clear();
        for row in 0..self.level.height() {
            for col in 0..self.level.width() {
                match self.level.tile(col, row) {
                    Tile::Enemy => {
                        let id = EnemyId(self.next_entity_id());
                        let body = spawn_box(
                            col,
                            row,
                            self.tuning.enemy_width,
                            self.tuning.enemy_height,
                            ts,
                        );
                        self.enemies.push(Enemy {
                            id,
                            body,
                            vel: Vec2::new(-self.tuning.enemy_speed, 0.0),
                            alive: true,
                        });
                    }
                    Tile::Coin => {
                        let id = CoinId(self.next_entity_id());
                        let size = self.tuning.coin_size;
                        let body = spawn_box(col, row, size, size, ts);
                        self.coins.push(Coin { id, body });
                    }
                    _ => {}
                }
            }
        }
    }

    /// Discard all dynamic state and rebuild it from the pristine level
    pub fn restart(&mut self) {
        self.world = TileWorld::new(
            self.level.width(),
            self.level.height(),
            self.tuning.tile_size,
            self.level.tiles(),
        );
        self.next_id = 1;
        self.spawn_entities();
        self.camera = Camera::default();
        self.phase = GamePhase::Active;
        self.step_count = 0;
        self.coins_collected = 0;
        log::info!("Session restarted");
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn world(&self) -> &TileWorld {
        &self.world
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Owned view of everything presentation needs this frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            step: self.step_count,
            theme: self.level.theme(),
            player: PlayerView {
                pos: Vec2::new(self.player.body.x, self.player.body.y),
                size: Vec2::new(self.player.body.w, self.player.body.h),
                vel: self.player.vel,
                grounded: self.player.grounded,
                facing: self.player.facing,
                invulnerable: self.player.invulnerable_steps > 0,
            },
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    pos: Vec2::new(e.body.x, e.body.y),
                    size: Vec2::new(e.body.w, e.body.h),
                    alive: e.alive,
                })
                .collect(),
            coins: self
                .coins
                .iter()
                .map(|c| CoinView {
                    id: c.id,
                    pos: Vec2::new(c.body.x, c.body.y),
                })
                .collect(),
            camera_x: self.camera.x,
            coins_collected: self.coins_collected,
        }
    }
}

/// Player pose for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    pub facing: Facing,
    pub invulnerable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinView {
    pub id: CoinId,
    pub pos: Vec2,
}

/// Read-only copy of the session for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub step: u64,
    pub theme: Theme,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub coins: Vec<CoinView>,
    pub camera_x: f32,
    pub coins_collected: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelDescriptor;

    fn session(rows: &[&str]) -> Session {
        let level = Level::from_descriptor(&LevelDescriptor {
            theme: Theme::Day,
            width: rows[0].len(),
            height: rows.len(),
            layout: rows.iter().map(|r| r.to_string()).collect(),
            message: String::new(),
        })
        .unwrap();
        Session::new(level, Tuning::default())
    }

    #[test]
    fn test_spawns_from_markers() {
        let s = session(&["C..C", ".S.E", "####"]);
        assert_eq!(s.phase, GamePhase::Active);
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.coins.len(), 2);
        // Player centered in its cell and resting on the cell's floor
        assert_eq!(s.player.body.x, 36.0);
        assert_eq!(s.player.body.bottom(), 64.0);
        assert_eq!(s.enemies[0].vel.x, -1.5);
        // Markers are no longer in the grid
        assert_eq!(s.world().tile_at(3, 1), Tile::Empty);
        assert_eq!(s.world().tile_at(0, 0), Tile::Empty);
    }

    #[test]
    fn test_ids_are_unique() {
        let s = session(&["CCEE", "S...", "####"]);
        let mut ids: Vec<u32> = s.enemies.iter().map(|e| e.id.0).collect();
        ids.extend(s.coins.iter().map(|c| c.id.0));
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_restart_restores_grid_and_entities() {
        let mut s = session(&["C?.", "S..", "###"]);
        s.world.trigger_from_below(1, 0);
        s.coins.clear();
        s.phase = GamePhase::Lost;
        s.step_count = 42;

        s.restart();
        assert_eq!(s.world().tile_at(1, 0), Tile::Question);
        assert_eq!(s.coins.len(), 1);
        assert_eq!(s.phase, GamePhase::Active);
        assert_eq!(s.step_count, 0);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let s = session(&["C..", "S.E", "###"]);
        let snap = s.snapshot();
        assert_eq!(snap.phase, GamePhase::Active);
        assert_eq!(snap.coins.len(), 1);
        assert_eq!(snap.enemies.len(), 1);
        assert!(snap.enemies[0].alive);
        assert_eq!(snap.player.size, Vec2::new(24.0, 28.0));
        assert_eq!(snap.camera_x, 0.0);
    }
}
