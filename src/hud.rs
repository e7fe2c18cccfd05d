//! Score panel and overlay state
//!
//! The browser host copies a snapshot into the DOM after every frame.

use serde::Serialize;

use crate::sim::{GamePhase, GameState};

/// Which overlay covers the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Overlay {
    None,
    StartScreen,
    Countdown,
    GameOverScreen,
}

/// Everything the side panel and overlays display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub level: u32,
    pub points: u32,
    pub lives: u32,
    /// Width of the progress bar, 0-100
    pub progress_percent: f32,
    /// Whole seconds shown on the level countdown
    pub countdown: Option<u32>,
    pub overlay: Overlay,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let overlay = match state.phase {
            GamePhase::Ready => Overlay::StartScreen,
            GamePhase::Running => Overlay::None,
            GamePhase::Transitioning { .. } => Overlay::Countdown,
            GamePhase::GameOver => Overlay::GameOverScreen,
        };

        Self {
            level: state.level,
            points: state.player.points,
            lives: state.player.lives,
            progress_percent: state.player.progress_percent(),
            countdown: state.countdown().map(|remaining| remaining.max(0.0).ceil() as u32),
            overlay,
        }
    }
}
