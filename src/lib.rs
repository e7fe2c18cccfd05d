//! Reciclus - a grid arcade game about sorting waste
//!
//! Core modules:
//! - `sim`: Simulation (falling entities, collisions, level state machine)
//! - `config`: Startup configuration with the stock game tuning as defaults
//! - `resources`: Image cache with one-shot readiness notification
//! - `renderer`: Scene drawing against an injected surface
//! - `audio`: Mapping of game events to sound cues
//! - `hud`: Score/lives/level panel state
//! - `platform`: Frame clock and input mapping

pub mod audio;
pub mod config;
pub mod error;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod resources;
pub mod sim;

pub use config::GameConfig;
pub use error::{AssetError, ConfigError};

/// Game configuration constants
pub mod consts {
    use std::ops::Range;

    /// Horizontal grid quantum; entity and player x are multiples of this
    pub const CELL_WIDTH: i32 = 100;
    /// Drawn tile width, also the entity bounding height used for collisions
    pub const TILE_WIDTH: i32 = 101;
    /// Vertical pitch of the background rows
    pub const ROW_HEIGHT: i32 = 83;

    /// Vertical offset entities (re)spawn at, above the visible area
    pub const SPAWN_OFFSET_Y: f32 = -180.0;
    /// One fall speed draw (pixels/s); a level sums `level` of these
    pub const FALL_SPEED_DRAW: Range<u32> = 100..200;

    /// Points awarded per collected item
    pub const ITEM_REWARD: u32 = 10;
    /// Lives lost per enemy hit
    pub const ENEMY_PENALTY: u32 = 1;

    /// Highest configurable starting level; each level adds one speed draw
    pub const MAX_LEVEL: u32 = 1_000;
    /// Ceiling for configured points, thresholds and rewards
    pub const MAX_POINTS: u32 = 1_000_000_000;

    /// Frozen countdown between levels
    pub const LEVEL_COUNTDOWN_SECS: f32 = 3.0;
    /// Largest elapsed step the frame clock hands to the simulation
    pub const MAX_FRAME_DT: f32 = 0.1;
}
