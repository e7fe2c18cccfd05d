//! Simulation module
//!
//! All gameplay logic lives here. No rendering, audio or platform
//! dependencies:
//! - Variable timestep supplied by the host's frame clock
//! - Seeded RNG only
//! - Stable iteration order (enemies, then items, in config order)

pub mod collision;
pub mod entity;
pub mod state;
pub mod tick;

pub use collision::{entity_hits_player, overlaps};
pub use entity::{EntityKind, FallingEntity, SpawnPolicy, random_column_x, sample_fall_speed};
pub use state::{Direction, GameEvent, GamePhase, GameState, Player};
pub use tick::{Command, TickInput, tick};
