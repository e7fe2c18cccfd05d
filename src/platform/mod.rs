//! Platform abstraction layer
//!
//! Host-side pieces that do not touch the DOM directly:
//! - Frame clock turning animation-frame timestamps into `dt`
//! - Key and button mapping to game commands

use crate::consts::MAX_FRAME_DT;
use crate::sim::{Command, Direction};

/// Turns animation-frame timestamps (ms) into simulation `dt` (s)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time_ms: Option<f64>,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed seconds since the previous frame, clamped to `MAX_FRAME_DT`.
    /// Zero on the first frame and while paused. The timestamp is always
    /// recorded, so resuming never replays the paused interval.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_time_ms {
            Some(last) if !self.paused => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            _ => 0.0,
        };
        self.last_time_ms = Some(now_ms);
        dt
    }

    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("Simulation paused");
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            log::info!("Simulation resumed");
        }
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// What a key press or button asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    /// Forward to the simulation
    Game(Command),
    /// Background music on/off
    ToggleMute,
}

/// Map a `KeyboardEvent.key` value; unmapped keys are ignored
pub fn map_key(key: &str) -> Option<HostAction> {
    match key {
        "ArrowRight" | "d" | "D" => Some(HostAction::Game(Command::Move(Direction::Advance))),
        "ArrowLeft" | "a" | "A" => Some(HostAction::Game(Command::Move(Direction::Retreat))),
        " " | "Enter" => Some(HostAction::Game(Command::Confirm)),
        "m" | "M" => Some(HostAction::ToggleMute),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), 0.0);
        assert!((clock.advance(1016.0) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_pause_freezes_without_stale_jump() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.pause();
        assert!(clock.is_paused());
        assert_eq!(clock.advance(50.0), 0.0);
        assert_eq!(clock.advance(5000.0), 0.0);

        clock.resume();
        // Measured from the last paused frame, not from before the pause
        assert!((clock.advance(5020.0) - 0.020).abs() < 1e-6);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        assert_eq!(clock.advance(3000.0), MAX_FRAME_DT);
    }

    #[test]
    fn test_clock_going_backwards_is_zero() {
        let mut clock = FrameClock::new();
        clock.advance(100.0);
        assert_eq!(clock.advance(90.0), 0.0);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            map_key("ArrowRight"),
            Some(HostAction::Game(Command::Move(Direction::Advance)))
        );
        assert_eq!(
            map_key("ArrowLeft"),
            Some(HostAction::Game(Command::Move(Direction::Retreat)))
        );
        assert_eq!(map_key(" "), Some(HostAction::Game(Command::Confirm)));
        assert_eq!(map_key("m"), Some(HostAction::ToggleMute));
        assert_eq!(map_key("ArrowUp"), None);
        assert_eq!(map_key("q"), None);
    }
}
