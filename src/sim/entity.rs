//! Falling entities
//!
//! Enemies and items share one implementation; the `EntityKind` tag decides
//! what a collision with the player does. Entities are pooled: they are built
//! once per game and respawned in place, never removed.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Where and how entities (re)appear. Immutable for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPolicy {
    /// Vertical start, above the visible area
    pub spawn_y: f32,
    /// Number of grid columns an entity can spawn in
    pub column_count: u32,
    /// An entity whose y exceeds this wraps back to the top
    pub playfield_height: f32,
}

/// What touching the player does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Costs the player `penalty` lives
    Hazard { penalty: u32 },
    /// Awards the player `reward` points
    Collectible { reward: u32 },
}

impl EntityKind {
    pub fn damages_player(&self) -> bool {
        matches!(self, EntityKind::Hazard { .. })
    }

    pub fn is_collectible(&self) -> bool {
        matches!(self, EntityKind::Collectible { .. })
    }
}

/// An enemy or item falling down one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingEntity {
    pub kind: EntityKind,
    /// Image id in the resource cache
    pub sprite: String,
    /// Column index times `CELL_WIDTH`
    pub x: i32,
    /// Top edge in pixels
    pub y: f32,
    /// Pixels per second
    pub fall_speed: f32,
}

impl FallingEntity {
    /// Create an entity at a random column above the playfield
    pub fn spawn(
        kind: EntityKind,
        sprite: impl Into<String>,
        policy: &SpawnPolicy,
        level: u32,
        rng: &mut Pcg32,
    ) -> Self {
        let mut entity = Self {
            kind,
            sprite: sprite.into(),
            x: 0,
            y: policy.spawn_y,
            fall_speed: 0.0,
        };
        entity.respawn(policy, level, rng);
        entity
    }

    /// Fall by `fall_speed * dt`. Past the bottom the entity wraps to a new
    /// column at the spawn offset, keeping its speed.
    pub fn advance(&mut self, dt: f32, policy: &SpawnPolicy, rng: &mut Pcg32) {
        self.y += self.fall_speed * dt;

        if self.y > policy.playfield_height {
            self.x = random_column_x(policy, rng);
            self.y = policy.spawn_y;
        }
    }

    /// New column, spawn offset and a speed drawn for `level`
    pub fn respawn(&mut self, policy: &SpawnPolicy, level: u32, rng: &mut Pcg32) {
        self.x = random_column_x(policy, rng);
        self.y = policy.spawn_y;
        self.fall_speed = sample_fall_speed(level, rng);
    }
}

/// Uniform column in `0..column_count`, as a pixel offset
pub fn random_column_x(policy: &SpawnPolicy, rng: &mut Pcg32) -> i32 {
    let column = rng.random_range(0..policy.column_count.max(1));
    column as i32 * CELL_WIDTH
}

/// Sum of `level` draws from `FALL_SPEED_DRAW`; higher levels fall faster
pub fn sample_fall_speed(level: u32, rng: &mut Pcg32) -> f32 {
    (0..level)
        .map(|_| rng.random_range(FALL_SPEED_DRAW))
        .fold(0u32, u32::saturating_add) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn policy() -> SpawnPolicy {
        SpawnPolicy {
            spawn_y: SPAWN_OFFSET_Y,
            column_count: 9,
            playfield_height: 505.0,
        }
    }

    fn hazard(rng: &mut Pcg32) -> FallingEntity {
        FallingEntity::spawn(EntityKind::Hazard { penalty: 1 }, "rock.png", &policy(), 1, rng)
    }

    #[test]
    fn test_spawn_above_playfield() {
        let mut rng = Pcg32::seed_from_u64(7);
        let entity = hazard(&mut rng);
        assert_eq!(entity.y, -180.0);
        assert_eq!(entity.x % CELL_WIDTH, 0);
        assert!((100.0..200.0).contains(&entity.fall_speed));
    }

    #[test]
    fn test_wrap_keeps_speed() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut entity = hazard(&mut rng);
        let speed = entity.fall_speed;
        entity.y = 500.0;

        entity.advance(1.0, &policy(), &mut rng);

        assert_eq!(entity.y, -180.0);
        assert_eq!(entity.fall_speed, speed);
        assert!((0..=800).contains(&entity.x));
    }

    #[test]
    fn test_exactly_at_bottom_does_not_wrap() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut entity = hazard(&mut rng);
        entity.fall_speed = 5.0;
        entity.y = 500.0;
        entity.advance(1.0, &policy(), &mut rng);
        assert_eq!(entity.y, 505.0);
    }

    #[test]
    fn test_respawn_resamples_speed_for_level() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut entity = hazard(&mut rng);
        entity.y = 250.0;
        entity.respawn(&policy(), 3, &mut rng);
        assert_eq!(entity.y, -180.0);
        assert!((300.0..600.0).contains(&entity.fall_speed));
    }

    #[test]
    fn test_speed_takes_one_draw_per_level() {
        let mut sampled = Pcg32::seed_from_u64(42);
        let mut manual = Pcg32::seed_from_u64(42);

        let speed = sample_fall_speed(3, &mut sampled);
        let draws: u32 = (0..3).map(|_| manual.random_range(FALL_SPEED_DRAW)).sum();

        assert_eq!(speed, draws as f32);
        // Both generators consumed the same number of draws
        assert_eq!(sampled.random::<u64>(), manual.random::<u64>());
    }

    #[test]
    fn test_every_column_is_reachable() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seen = [false; 9];
        for _ in 0..1000 {
            let x = random_column_x(&policy(), &mut rng);
            seen[(x / CELL_WIDTH) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "columns seen: {:?}", seen);
    }

    #[test]
    fn test_kind_capabilities() {
        assert!(EntityKind::Hazard { penalty: 1 }.damages_player());
        assert!(!EntityKind::Hazard { penalty: 1 }.is_collectible());
        assert!(EntityKind::Collectible { reward: 10 }.is_collectible());
    }

    proptest! {
        #[test]
        fn prop_fall_is_linear_until_wrap(
            seed in any::<u64>(),
            y in -180.0f32..400.0,
            dt in 0.0f32..0.1,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut entity = hazard(&mut rng);
            entity.y = y;
            let expected = y + entity.fall_speed * dt;

            entity.advance(dt, &policy(), &mut rng);

            if expected > 505.0 {
                prop_assert_eq!(entity.y, -180.0);
            } else {
                prop_assert!((entity.y - expected).abs() < 1e-3);
            }
            prop_assert!(entity.x >= 0 && entity.x <= 800 && entity.x % CELL_WIDTH == 0);
        }

        #[test]
        fn prop_speed_sums_one_draw_per_level(seed in any::<u64>(), level in 1u32..8) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let speed = sample_fall_speed(level, &mut rng);
            prop_assert!(speed >= (100 * level) as f32);
            prop_assert!(speed <= (199 * level) as f32);
        }
    }
}
