//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{EntityKind, FallingEntity, SpawnPolicy};
use crate::config::{GameConfig, PlayerConfig};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, waiting for the player to confirm
    Ready,
    /// Active gameplay
    Running,
    /// Between-level countdown; entities are frozen
    Transitioning { remaining: f32 },
    /// Out of lives; only a restart leaves this phase
    GameOver,
}

/// Player-requested horizontal step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// One column to the right
    Advance,
    /// One column to the left
    Retreat,
}

/// Things that happened during a tick, drained by the host for sound and HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Restarted,
    EnemyHit { lives_left: u32 },
    ItemCollected { points: u32 },
    LevelUp { level: u32 },
    LevelResumed { level: u32 },
    GameOver { points: u32, level: u32 },
}

/// The bin the player moves along the bottom row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub sprite: String,
    /// Column index times `CELL_WIDTH`
    pub x: i32,
    /// Fixed row offset
    pub y: f32,
    pub lives: u32,
    pub points: u32,
    /// Points at which the next level starts
    pub required_xp: u32,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let (x, y) = start_position(config);
        Self {
            sprite: config.player.sprite.clone(),
            x,
            y,
            lives: config.player.lives,
            points: config.player.points,
            required_xp: config.player.required_xp,
        }
    }

    /// Move one column, clamped to the grid
    pub fn step(&mut self, direction: Direction, column_count: u32) {
        let last_x = (column_count.max(1) as i32 - 1) * CELL_WIDTH;
        self.x = match direction {
            Direction::Advance => (self.x + CELL_WIDTH).min(last_x),
            Direction::Retreat => (self.x - CELL_WIDTH).max(0),
        };
    }

    /// Progress toward `required_xp`, 0-100
    pub fn progress_percent(&self) -> f32 {
        if self.required_xp == 0 {
            return 100.0;
        }
        (self.points as f32 * 100.0 / self.required_xp as f32).min(100.0)
    }

    /// Return to the start column and row
    pub fn back_to_start(&mut self, config: &GameConfig) {
        let (x, y) = start_position(config);
        self.x = x;
        self.y = y;
    }

    fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }
}

/// Player start: configured spawn, else middle column on the row above the last
fn start_position(config: &GameConfig) -> (i32, f32) {
    let PlayerConfig { spawn, .. } = &config.player;
    match spawn {
        Some(point) => (point.x, point.y),
        None => {
            let middle = (config.engine.column_count / 2) as i32 * CELL_WIDTH;
            let row = (config.engine.row_count() as i32 - 2) * CELL_WIDTH;
            (middle, row as f32)
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub spawn: SpawnPolicy,
    pub level: u32,
    pub phase: GamePhase,
    pub player: Player,
    /// Hazards, resolved first each tick
    pub enemies: Vec<FallingEntity>,
    /// Collectibles, resolved after enemies
    pub items: Vec<FallingEntity>,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
}

impl GameState {
    /// Build a game on the start screen, seeded from the config (or 0)
    pub fn new(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or(0);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawn = config.spawn_policy();
        let level = config.level;

        let enemies = config
            .enemies
            .iter()
            .map(|e| {
                let kind = EntityKind::Hazard {
                    penalty: config.enemy_penalty,
                };
                FallingEntity::spawn(kind, e.sprite.as_str(), &spawn, level, &mut rng)
            })
            .collect();
        let items = config
            .items
            .iter()
            .map(|i| {
                let kind = EntityKind::Collectible {
                    reward: config.item_reward,
                };
                FallingEntity::spawn(kind, i.sprite.as_str(), &spawn, level, &mut rng)
            })
            .collect();

        Self {
            player: Player::new(&config),
            spawn,
            level,
            phase: GamePhase::Ready,
            enemies,
            items,
            events: Vec::new(),
            rng,
            config,
        }
    }

    /// Back to the configured level and player stats; every entity respawns.
    /// The phase is left to the caller.
    pub fn reset(&mut self) {
        self.level = self.config.level;
        self.player.reset(&self.config);
        for entity in self.enemies.iter_mut().chain(self.items.iter_mut()) {
            entity.respawn(&self.spawn, self.level, &mut self.rng);
        }
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Seconds left on the level countdown, if one is running
    pub fn countdown(&self) -> Option<f32> {
        match self.phase {
            GamePhase::Transitioning { remaining } => Some(remaining),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
