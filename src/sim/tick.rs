//! Per-frame simulation step
//!
//! One call advances every falling entity by `dt`, then resolves collisions
//! against the player in list order (enemies first, then items). The level
//! countdown runs off the same `dt`, so there is a single timing source.

use super::collision::entity_hits_player;
use super::entity::EntityKind;
use super::state::{Direction, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// A discrete player command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Step one column
    Move(Direction),
    /// Start from the title screen, or restart after game over
    Confirm,
}

/// Input commands queued since the previous tick, applied in order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Advance the game by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    for command in &input.commands {
        apply_command(state, *command);
    }

    match state.phase {
        GamePhase::Running => {
            update_entities(state, dt);
            check_collisions(state);
        }

        GamePhase::Transitioning { remaining } => {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                state.phase = GamePhase::Transitioning { remaining };
            } else {
                resume_level(state);
            }
        }

        GamePhase::Ready | GamePhase::GameOver => {}
    }
}

fn apply_command(state: &mut GameState, command: Command) {
    match (command, state.phase) {
        (Command::Move(direction), GamePhase::Running | GamePhase::Transitioning { .. }) => {
            state.player.step(direction, state.spawn.column_count);
        }
        (Command::Confirm, GamePhase::Ready) => {
            state.phase = GamePhase::Running;
            state.events.push(GameEvent::Started);
            log::info!("Game started at level {}", state.level);
        }
        (Command::Confirm, GamePhase::GameOver) => {
            state.reset();
            state.phase = GamePhase::Running;
            state.events.push(GameEvent::Restarted);
            log::info!("Game restarted");
        }
        _ => {}
    }
}

fn update_entities(state: &mut GameState, dt: f32) {
    for entity in state.enemies.iter_mut().chain(state.items.iter_mut()) {
        entity.advance(dt, &state.spawn, &mut state.rng);
    }
}

fn check_collisions(state: &mut GameState) {
    for idx in 0..state.enemies.len() {
        if state.phase == GamePhase::GameOver {
            return;
        }
        if entity_hits_player(&state.enemies[idx], &state.player) {
            let kind = state.enemies[idx].kind;
            apply_contact(state, kind);
            state.enemies[idx].respawn(&state.spawn, state.level, &mut state.rng);
        }
    }

    for idx in 0..state.items.len() {
        if state.phase == GamePhase::GameOver {
            return;
        }
        if entity_hits_player(&state.items[idx], &state.player) {
            let kind = state.items[idx].kind;
            apply_contact(state, kind);
            // Respawn after a possible level-up so the new speed applies
            state.items[idx].respawn(&state.spawn, state.level, &mut state.rng);
        }
    }
}

fn apply_contact(state: &mut GameState, kind: EntityKind) {
    match kind {
        EntityKind::Hazard { penalty } => hit_player(state, penalty),
        EntityKind::Collectible { reward } => collect(state, reward),
    }
}

fn hit_player(state: &mut GameState, penalty: u32) {
    let player = &mut state.player;
    player.lives = player.lives.saturating_sub(penalty);
    state.events.push(GameEvent::EnemyHit {
        lives_left: player.lives,
    });

    if player.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            points: player.points,
            level: state.level,
        });
        log::info!(
            "Game over at level {} with {} points",
            state.level,
            player.points
        );
    }
}

fn collect(state: &mut GameState, reward: u32) {
    state.player.points = state.player.points.saturating_add(reward);
    state.events.push(GameEvent::ItemCollected {
        points: state.player.points,
    });

    // Only one level-advance per tick
    if state.phase == GamePhase::Running && state.player.points >= state.player.required_xp {
        advance_level(state);
    }
}

fn advance_level(state: &mut GameState) {
    let player = &mut state.player;
    player.required_xp = player.required_xp.saturating_add(player.points);
    player.back_to_start(&state.config);

    state.level = state.level.saturating_add(1);
    state.phase = GamePhase::Transitioning {
        remaining: LEVEL_COUNTDOWN_SECS,
    };
    state.events.push(GameEvent::LevelUp { level: state.level });
    log::info!(
        "Level {} reached, next level at {} points",
        state.level,
        player.required_xp
    );
}

fn resume_level(state: &mut GameState) {
    for enemy in &mut state.enemies {
        enemy.respawn(&state.spawn, state.level, &mut state.rng);
    }
    if state.config.resample_items_on_level_up {
        for item in &mut state.items {
            item.respawn(&state.spawn, state.level, &mut state.rng);
        }
    }

    state.phase = GamePhase::Running;
    state.events.push(GameEvent::LevelResumed { level: state.level });
    log::debug!("Level {} resumed", state.level);
}
