//! Velocity integration for the player and enemies
//!
//! Integration only decides velocities; positions move through the collision
//! resolver so both actor kinds share one solids-aware path.

use super::collision::{BlockHit, resolve_horizontal, resolve_vertical};
use super::state::{Enemy, Facing, Player};
use super::tick::ControlIntent;
use super::tile::TileWorld;
use crate::tuning::Tuning;

/// Update player velocity from input, friction and gravity
pub fn integrate_player(player: &mut Player, intent: &ControlIntent, tuning: &Tuning) {
    player.prev_y = player.body.y;

    // Both directions may be held; their accelerations cancel
    if intent.move_left {
        player.vel.x -= tuning.acceleration;
        player.facing = Facing::Left;
    }
    if intent.move_right {
        player.vel.x += tuning.acceleration;
        player.facing = Facing::Right;
    }

    player.vel.x *= tuning.friction;
    if player.vel.x.abs() < tuning.velocity_dead_zone {
        player.vel.x = 0.0;
    }
    player.vel.x = player.vel.x.clamp(-tuning.max_speed, tuning.max_speed);

    player.vel.y = (player.vel.y + tuning.gravity).min(tuning.max_fall_speed);

    // Grounded comes from the previous step's vertical pass
    if intent.jump && player.grounded {
        player.vel.y = -tuning.jump_impulse;
        player.grounded = false;
    }

    player.invulnerable_steps = player.invulnerable_steps.saturating_sub(1);
}

/// Move the player through the world, X then Y. Returns the block struck from below, if any.
pub fn move_player(world: &mut TileWorld, player: &mut Player, tuning: &Tuning) -> Option<BlockHit> {
    resolve_horizontal(world, &mut player.body, &mut player.vel.x, tuning.edge_epsilon);
    let contact = resolve_vertical(world, &mut player.body, &mut player.vel.y, tuning.edge_epsilon);
    player.grounded = contact.grounded;
    contact.bumped
}

/// Whether a solid cell sits just ahead of the enemy's leading edge, at mid-height
pub fn wall_ahead(world: &TileWorld, enemy: &Enemy) -> bool {
    let vx = enemy.vel.x;
    if vx == 0.0 {
        return false;
    }
    let lead = if vx > 0.0 { enemy.body.right() } else { enemy.body.x };
    let probe = enemy.body.center().with_x(lead + vx);
    world.tile_at_point(probe.x, probe.y).is_solid()
}

/// Advance one enemy. Live enemies patrol and turn at walls; corpses just fall.
///
/// Returns `true` if the enemy turned around this step.
pub fn step_enemy(world: &mut TileWorld, enemy: &mut Enemy, tuning: &Tuning) -> bool {
    if !enemy.alive {
        enemy.body.y += tuning.corpse_fall_speed;
        return false;
    }

    let turned = wall_ahead(world, enemy);
    if turned {
        enemy.vel.x = -enemy.vel.x;
    }
    enemy.vel.y = (enemy.vel.y + tuning.gravity).min(tuning.max_fall_speed);

    // Patrol speed survives a wall stop; only the probe changes direction
    let mut vx = enemy.vel.x;
    resolve_horizontal(world, &mut enemy.body, &mut vx, tuning.edge_epsilon);
    resolve_vertical(world, &mut enemy.body, &mut enemy.vel.y, tuning.edge_epsilon);
    turned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Aabb;
    use crate::sim::state::EnemyId;
    use crate::sim::tile::Tile;
    use glam::Vec2;

    fn world_from(rows: &[&str]) -> TileWorld {
        let width = rows[0].len();
        let tiles: Vec<Tile> = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| Tile::from_symbol(c).unwrap_or(Tile::Empty)))
            .collect();
        TileWorld::new(width, rows.len(), 32.0, &tiles)
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Aabb::new(x, y, 24.0, 28.0))
    }

    fn right() -> ControlIntent {
        ControlIntent {
            move_right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_acceleration_then_friction() {
        let tuning = Tuning::default();
        let mut player = player_at(0.0, 0.0);
        integrate_player(&mut player, &right(), &tuning);
        assert!((player.vel.x - 0.4).abs() < 1e-6);
        integrate_player(&mut player, &right(), &tuning);
        assert!((player.vel.x - 0.72).abs() < 1e-6);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_top_speed_clamp() {
        let tuning = Tuning {
            acceleration: 4.0,
            ..Tuning::default()
        };
        let mut player = player_at(0.0, 0.0);
        for _ in 0..20 {
            integrate_player(&mut player, &right(), &tuning);
        }
        assert_eq!(player.vel.x, tuning.max_speed);
    }

    #[test]
    fn test_friction_decays_to_exact_zero() {
        let tuning = Tuning::default();
        let mut player = player_at(0.0, 0.0);
        player.vel.x = 3.0;
        for _ in 0..30 {
            integrate_player(&mut player, &ControlIntent::default(), &tuning);
        }
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_opposite_intents_cancel() {
        let tuning = Tuning::default();
        let mut player = player_at(0.0, 0.0);
        let both = ControlIntent {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        integrate_player(&mut player, &both, &tuning);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_gravity_is_capped() {
        let tuning = Tuning::default();
        let mut player = player_at(0.0, 0.0);
        player.vel.y = tuning.max_fall_speed;
        integrate_player(&mut player, &ControlIntent::default(), &tuning);
        assert_eq!(player.vel.y, tuning.max_fall_speed);
    }

    #[test]
    fn test_jump_requires_grounded() {
        let tuning = Tuning::default();
        let jump = ControlIntent {
            jump: true,
            ..Default::default()
        };

        let mut airborne = player_at(0.0, 0.0);
        integrate_player(&mut airborne, &jump, &tuning);
        assert_eq!(airborne.vel.y, tuning.gravity);

        let mut grounded = player_at(0.0, 0.0);
        grounded.grounded = true;
        integrate_player(&mut grounded, &jump, &tuning);
        assert_eq!(grounded.vel.y, -tuning.jump_impulse);
        assert!(!grounded.grounded);

        // Held jump cannot fire again before the next landing
        integrate_player(&mut grounded, &jump, &tuning);
        assert_eq!(grounded.vel.y, -tuning.jump_impulse + tuning.gravity);
    }

    #[test]
    fn test_grounded_recomputed_each_step() {
        let tuning = Tuning::default();
        let mut world = world_from(&["...", "###"]);
        let mut player = player_at(4.0, 4.0);
        integrate_player(&mut player, &ControlIntent::default(), &tuning);
        move_player(&mut world, &mut player, &tuning);
        assert!(player.grounded);

        // Walk off into open space: the stale flag must not survive
        let mut world = world_from(&["...", "..."]);
        integrate_player(&mut player, &ControlIntent::default(), &tuning);
        move_player(&mut world, &mut player, &tuning);
        assert!(!player.grounded);
    }

    #[test]
    fn test_enemy_turns_at_wall() {
        let tuning = Tuning::default();
        let mut world = world_from(&["#...#", "#...#", "#####"]);
        let mut enemy = Enemy {
            id: EnemyId(1),
            body: Aabb::new(33.0, 32.0, 32.0, 32.0),
            vel: Vec2::new(-1.5, 0.0),
            alive: true,
        };
        assert!(wall_ahead(&world, &enemy));
        assert!(step_enemy(&mut world, &mut enemy, &tuning));
        assert_eq!(enemy.vel.x, 1.5);
        assert_eq!(enemy.body.x, 34.5);
    }

    #[test]
    fn test_enemy_patrol_stays_inside_walls() {
        let tuning = Tuning::default();
        let mut world = world_from(&["#...#", "#...#", "#####"]);
        let mut enemy = Enemy {
            id: EnemyId(1),
            body: Aabb::new(64.0, 32.0, 32.0, 32.0),
            vel: Vec2::new(-1.5, 0.0),
            alive: true,
        };
        let mut turns = 0;
        for _ in 0..400 {
            let before = enemy.vel.x;
            let turned = step_enemy(&mut world, &mut enemy, &tuning);
            // A flip happens only when the probe fired, and at most once
            assert_eq!(turned, before != enemy.vel.x);
            assert_eq!(enemy.vel.x.abs(), tuning.enemy_speed);
            assert!(enemy.body.x >= 32.0 && enemy.body.right() <= 128.0);
            assert_eq!(enemy.body.y, 32.0);
            turns += turned as u32;
        }
        assert!(turns >= 4);
    }

    #[test]
    fn test_enemy_falls_with_gravity() {
        let tuning = Tuning::default();
        let mut world = world_from(&["...", "...", "..."]);
        let mut enemy = Enemy {
            id: EnemyId(1),
            body: Aabb::new(32.0, 0.0, 32.0, 32.0),
            vel: Vec2::new(1.5, 0.0),
            alive: true,
        };
        step_enemy(&mut world, &mut enemy, &tuning);
        step_enemy(&mut world, &mut enemy, &tuning);
        assert_eq!(enemy.vel.y, 1.0);
        assert_eq!(enemy.body.y, 1.5);
    }

    #[test]
    fn test_dead_enemy_only_falls() {
        let tuning = Tuning::default();
        let mut world = world_from(&["...", "###"]);
        let mut enemy = Enemy {
            id: EnemyId(1),
            body: Aabb::new(32.0, 0.0, 32.0, 32.0),
            vel: Vec2::new(-1.5, 0.0),
            alive: false,
        };
        step_enemy(&mut world, &mut enemy, &tuning);
        assert_eq!(enemy.body.x, 32.0);
        // Corpses ignore the floor
        assert_eq!(enemy.body.y, tuning.corpse_fall_speed);
    }
}
