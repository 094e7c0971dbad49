//! Player interactions: enemies, coins, goal and hazards
//!
//! These run after every actor has been moved and corrected for the step.

use super::collision::Aabb;
use super::state::{Coin, CoinId, Enemy, Player};
use super::tile::{Tile, TileWorld};

/// How an overlapping player and enemy resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyContact {
    /// Player came down on top: the enemy dies
    Stomp,
    /// Any other touch: the player dies
    Hurt,
}

/// Classify contact between a live player and a live enemy.
///
/// A stomp needs the player moving down and the player's bottom edge, taken
/// before this step's motion, above the enemy's vertical midpoint. Using the
/// pre-step edge keeps a fast fall that clips an enemy's side from reading
/// as a stomp.
pub fn classify_contact(player: &Player, enemy: &Enemy) -> Option<EnemyContact> {
    if !player.alive || !enemy.alive || !player.body.overlaps(&enemy.body) {
        return None;
    }
    let enemy_mid = enemy.body.y + enemy.body.h * 0.5;
    if player.vel.y > 0.0 && player.prev_bottom() < enemy_mid {
        Some(EnemyContact::Stomp)
    } else {
        Some(EnemyContact::Hurt)
    }
}

/// Remove every coin touching `body`, returning their ids in collection order.
///
/// Removal happens as each coin is found, so a coin can be reported only once.
pub fn collect_coins(body: &Aabb, coins: &mut Vec<Coin>) -> Vec<CoinId> {
    let mut collected = Vec::new();
    coins.retain(|coin| {
        if body.overlaps(&coin.body) {
            collected.push(coin.id);
            false
        } else {
            true
        }
    });
    collected
}

/// Tile under the player's center point
#[inline]
fn tile_under_center(world: &TileWorld, body: &Aabb) -> Tile {
    let c = body.center();
    world.tile_at_point(c.x, c.y)
}

/// Player's center is on a flag tile
pub fn reached_goal(world: &TileWorld, body: &Aabb) -> bool {
    tile_under_center(world, body) == Tile::Flag
}

/// Player's center is inside a hazard tile
pub fn touched_hazard(world: &TileWorld, body: &Aabb) -> bool {
    tile_under_center(world, body) == Tile::DeathZone
}

/// Player has dropped below the level
pub fn fell_out(world: &TileWorld, body: &Aabb) -> bool {
    body.y > world.pixel_height()
}
