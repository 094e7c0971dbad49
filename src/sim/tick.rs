//! One simulation step
//!
//! A step runs to completion in a fixed order: player kinematics and
//! collision, enemies, interactions, then the camera. The host drives steps;
//! nothing here measures time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::interaction::{
    EnemyContact, classify_contact, collect_coins, fell_out, reached_goal, touched_hazard,
};
use super::kinematics::{integrate_player, move_player, step_enemy};
use super::state::{CoinId, EnemyId, GamePhase, Session};
use super::tile::TriggerResult;
use crate::level::{Level, LevelDescriptor};
use crate::tuning::Tuning;

/// Control intent for a single step, sampled by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlIntent {
    pub move_left: bool,
    pub move_right: bool,
    /// Only honored while grounded
    pub jump: bool,
    /// Reserved; physics ignores it
    pub run: bool,
}

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Enemy(EnemyId),
    Fell,
    Hazard,
}

/// Something that happened during a step, for presentation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepEvent {
    /// A coin was picked up (`Some`) or a bonus block paid out (`None`)
    CoinCollected { coin: Option<CoinId> },
    EnemyKilled { enemy: EnemyId, pos: Vec2 },
    PlayerDied { cause: DeathCause },
    LevelWon,
    BlockBroken { col: i32, row: i32 },
    BonusTriggered { col: i32, row: i32 },
}

/// Ordered events raised by one step
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepEvents {
    events: Vec<StepEvent>,
}

impl StepEvents {
    fn push(&mut self, event: StepEvent) {
        log::debug!("{:?}", event);
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[StepEvent] {
        &self.events
    }

    pub fn player_died(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, StepEvent::PlayerDied { .. }))
    }

    pub fn level_won(&self) -> bool {
        self.events.contains(&StepEvent::LevelWon)
    }
}

impl<'a> IntoIterator for &'a StepEvents {
    type Item = &'a StepEvent;
    type IntoIter = std::slice::Iter<'a, StepEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl Session {
    /// Advance the session by one step. Outside `Active` this does nothing.
    pub fn advance(&mut self, intent: &ControlIntent) -> StepEvents {
        let mut events = StepEvents::default();
        if self.phase != GamePhase::Active {
            return events;
        }
        self.step_count += 1;

        // --- Player ---
        integrate_player(&mut self.player, intent, &self.tuning);
        if let Some(hit) = move_player(&mut self.world, &mut self.player, &self.tuning) {
            match hit.result {
                TriggerResult::SpawnedBonus => {
                    events.push(StepEvent::BonusTriggered {
                        col: hit.col,
                        row: hit.row,
                    });
                    self.coins_collected += 1;
                    events.push(StepEvent::CoinCollected { coin: None });
                }
                TriggerResult::Broken => events.push(StepEvent::BlockBroken {
                    col: hit.col,
                    row: hit.row,
                }),
                TriggerResult::NoEffect => {}
            }
        }

        // --- Enemies ---
        for enemy in &mut self.enemies {
            step_enemy(&mut self.world, enemy, &self.tuning);
        }
        // Reap anything that has left the level, corpses and pit fallers alike
        let floor = self.world.pixel_height();
        self.enemies.retain(|e| e.body.y <= floor);

        // --- Player vs enemies ---
        for enemy in &mut self.enemies {
            match classify_contact(&self.player, enemy) {
                Some(EnemyContact::Stomp) => {
                    enemy.alive = false;
                    self.player.vel.y = -self.tuning.stomp_bounce;
                    self.player.invulnerable_steps = self.tuning.stomp_grace_steps;
                    events.push(StepEvent::EnemyKilled {
                        enemy: enemy.id,
                        pos: Vec2::new(enemy.body.x, enemy.body.y),
                    });
                }
                Some(EnemyContact::Hurt) if self.player.invulnerable_steps == 0 => {
                    self.player.alive = false;
                    self.phase = GamePhase::Lost;
                    events.push(StepEvent::PlayerDied {
                        cause: DeathCause::Enemy(enemy.id),
                    });
                    break;
                }
                _ => {}
            }
        }

        if self.phase == GamePhase::Active {
            // --- Coins ---
            for id in collect_coins(&self.player.body, &mut self.coins) {
                self.coins_collected += 1;
                events.push(StepEvent::CoinCollected { coin: Some(id) });
            }

            // --- Goal and death zones ---
            if reached_goal(&self.world, &self.player.body) {
                self.phase = GamePhase::Won;
                events.push(StepEvent::LevelWon);
            } else if touched_hazard(&self.world, &self.player.body) {
                self.player.alive = false;
                self.phase = GamePhase::Lost;
                events.push(StepEvent::PlayerDied {
                    cause: DeathCause::Hazard,
                });
            } else if fell_out(&self.world, &self.player.body) {
                self.player.alive = false;
                self.phase = GamePhase::Lost;
                events.push(StepEvent::PlayerDied {
                    cause: DeathCause::Fell,
                });
            }
        }

        // --- Camera ---
        self.camera
            .follow(self.player.body.x, self.world.pixel_width(), &self.tuning);

        if self.phase != GamePhase::Active {
            log::info!(
                "Session ended: {:?} after {} steps, {} coins",
                self.phase,
                self.step_count,
                self.coins_collected
            );
        }
        events
    }
}

/// The simulation loop: an optional session plus the tuning new sessions use
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    tuning: Tuning,
    session: Option<Session>,
}

impl Simulation {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            session: None,
        }
    }

    /// `Idle` when no level is loaded, otherwise the session's phase
    pub fn phase(&self) -> GamePhase {
        self.session
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or(GamePhase::Idle)
    }

    /// Start a session on a descriptor; a malformed one loads the fallback level
    pub fn load_level(&mut self, desc: &LevelDescriptor) -> &Session {
        self.load(Level::load_or_default(desc))
    }

    /// Start a session on an already validated level, replacing any current one
    pub fn load(&mut self, level: Level) -> &Session {
        self.session.insert(Session::new(level, self.tuning.clone()))
    }

    /// Advance the current session. Without an active session this is a no-op.
    pub fn advance(&mut self, intent: &ControlIntent) -> StepEvents {
        match self.session.as_mut() {
            Some(session) => session.advance(intent),
            None => StepEvents::default(),
        }
    }

    /// Restart the current level from its spawn markers. Returns `false` when idle.
    pub fn retry(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.restart();
                true
            }
            None => false,
        }
    }

    /// Drop the session and return to `Idle`
    pub fn unload(&mut self) {
        if self.session.take().is_some() {
            log::info!("Session discarded");
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}
