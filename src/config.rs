//! Startup configuration
//!
//! Supplied once when the game boots and never persisted. Every field
//! defaults to the stock game tuning, so a partial JSON document is valid.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::SpawnPolicy;

/// A sprite-only descriptor for an enemy or item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteConfig {
    pub sprite: String,
}

impl SpriteConfig {
    fn new(sprite: &str) -> Self {
        Self {
            sprite: sprite.to_string(),
        }
    }
}

/// One sound file and its playback volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    pub src: String,
    /// 0.0 - 1.0
    pub volume: f32,
}

impl SoundConfig {
    fn new(src: &str, volume: f32) -> Self {
        Self {
            src: src.to_string(),
            volume,
        }
    }
}

/// Named sounds used by the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundsConfig {
    /// Background music (loops)
    pub track: SoundConfig,
    pub start: SoundConfig,
    pub gameover: SoundConfig,
    pub levelup: SoundConfig,
    /// Item collected
    pub collect: SoundConfig,
    /// Hit by an enemy
    pub collision: SoundConfig,
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            track: SoundConfig::new("assets/audio/soundtrack.webm", 0.2),
            start: SoundConfig::new("assets/audio/effects/start.ogg", 0.5),
            gameover: SoundConfig::new("assets/audio/effects/gameover.ogg", 0.5),
            levelup: SoundConfig::new("assets/audio/effects/levelup.ogg", 0.5),
            collect: SoundConfig::new("assets/audio/effects/collect.ogg", 0.5),
            collision: SoundConfig::new("assets/audio/effects/collision.mp3", 1.0),
        }
    }
}

impl SoundsConfig {
    fn all(&self) -> [(&'static str, &SoundConfig); 6] {
        [
            ("track", &self.track),
            ("start", &self.start),
            ("gameover", &self.gameover),
            ("levelup", &self.levelup),
            ("collect", &self.collect),
            ("collision", &self.collision),
        ]
    }
}

/// Explicit player start position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Must be a multiple of `CELL_WIDTH`
    pub x: i32,
    pub y: f32,
}

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub sprite: String,
    pub lives: u32,
    pub points: u32,
    /// Points needed to leave the first level
    pub required_xp: u32,
    /// Overrides the middle-column, bottom-row start
    pub spawn: Option<SpawnPoint>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sprite: "assets/img/objects/lixeira.png".to_string(),
            lives: 5,
            points: 0,
            required_xp: 30,
            spawn: None,
        }
    }
}

/// Playfield grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// One background image per row, top to bottom
    pub row_images: Vec<String>,
    pub column_count: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let sky = "assets/img/sprites/sky.png".to_string();
        Self {
            row_images: vec![
                sky.clone(),
                sky.clone(),
                sky.clone(),
                sky,
                "assets/img/sprites/grass-block.png".to_string(),
            ],
            column_count: 9,
        }
    }
}

impl EngineConfig {
    pub fn row_count(&self) -> u32 {
        self.row_images.len() as u32
    }

    /// Canvas width in pixels
    pub fn playfield_width(&self) -> u32 {
        self.column_count * TILE_WIDTH as u32
    }

    /// Canvas height in pixels; entities past this respawn
    pub fn playfield_height(&self) -> u32 {
        self.row_count() * TILE_WIDTH as u32
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Initial level
    pub level: u32,
    /// One hazard per entry
    pub enemies: Vec<SpriteConfig>,
    /// One collectible per entry
    pub items: Vec<SpriteConfig>,
    pub sounds: SoundsConfig,
    pub player: PlayerConfig,
    pub engine: EngineConfig,
    /// Every image the game draws, loaded before the first frame
    pub resources: Vec<String>,
    /// Also respawn items with the new level's speed when a level starts
    pub resample_items_on_level_up: bool,
    pub item_reward: u32,
    pub enemy_penalty: u32,
    /// Give up waiting for images after this long
    pub asset_timeout_secs: f64,
    /// Reload attempts per failed image before giving up
    pub asset_max_retries: u32,
    /// Fixed RNG seed; the browser host seeds from the clock when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let plastic = "assets/img/objects/plastico.png";
        Self {
            level: 1,
            enemies: vec![
                SpriteConfig::new("assets/img/objects/radioativo.png"),
                SpriteConfig::new("assets/img/objects/hospitalar.png"),
                SpriteConfig::new("assets/img/objects/vidro.png"),
            ],
            items: vec![SpriteConfig::new(plastic), SpriteConfig::new(plastic)],
            sounds: SoundsConfig::default(),
            player: PlayerConfig::default(),
            engine: EngineConfig::default(),
            resources: [
                "assets/img/sprites/stone-block.png",
                "assets/img/sprites/sky.png",
                "assets/img/sprites/grass-block.png",
                "assets/img/objects/radioativo.png",
                "assets/img/objects/vidro.png",
                "assets/img/objects/nonrecy.png",
                "assets/img/objects/hospitalar.png",
                "assets/img/objects/madeira.png",
                "assets/img/objects/metal.png",
                "assets/img/objects/organico.png",
                "assets/img/objects/papel.png",
                "assets/img/objects/perigoso.png",
                "assets/img/objects/lixeira.png",
                plastic,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            resample_items_on_level_up: false,
            item_reward: ITEM_REWARD,
            enemy_penalty: ENEMY_PENALTY,
            asset_timeout_secs: 15.0,
            asset_max_retries: 2,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.engine.column_count == 0 {
            return invalid("engine.column_count must be at least 1".into());
        }
        if self.engine.row_images.is_empty() {
            return invalid("engine.row_images must list at least one row".into());
        }
        if !(1..=MAX_LEVEL).contains(&self.level) {
            return invalid(format!("level must be in 1..={}", MAX_LEVEL));
        }
        if self.player.spawn.is_none() && self.engine.row_count() < 2 {
            return invalid("engine.row_images needs two rows for the default player start".into());
        }
        if self.player.lives == 0 {
            return invalid("player.lives must be at least 1".into());
        }
        if self.player.required_xp == 0 {
            return invalid("player.required_xp must be at least 1".into());
        }
        let scores = [
            ("player.points", self.player.points),
            ("player.required_xp", self.player.required_xp),
            ("item_reward", self.item_reward),
        ];
        for (name, value) in scores {
            if value > MAX_POINTS {
                return invalid(format!("{} {} exceeds {}", name, value, MAX_POINTS));
            }
        }
        if let Some(spawn) = self.player.spawn {
            let last_x = (self.engine.column_count as i32 - 1) * CELL_WIDTH;
            if spawn.x % CELL_WIDTH != 0 || spawn.x < 0 || spawn.x > last_x {
                return invalid(format!(
                    "player.spawn.x {} is not a column in 0..={}",
                    spawn.x, last_x
                ));
            }
        }
        for (name, sound) in self.sounds.all() {
            if !(0.0..=1.0).contains(&sound.volume) {
                return invalid(format!(
                    "sounds.{}.volume {} outside 0.0-1.0",
                    name, sound.volume
                ));
            }
        }

        let sprites = self
            .enemies
            .iter()
            .chain(&self.items)
            .map(|e| e.sprite.as_str())
            .chain(std::iter::once(self.player.sprite.as_str()))
            .chain(self.engine.row_images.iter().map(String::as_str));
        for sprite in sprites {
            if !self.resources.iter().any(|r| r == sprite) {
                return invalid(format!("sprite {} is missing from resources", sprite));
            }
        }

        Ok(())
    }

    /// Deduplicated image list in declaration order
    pub fn asset_manifest(&self) -> Vec<String> {
        let mut manifest: Vec<String> = Vec::with_capacity(self.resources.len());
        for id in &self.resources {
            if !manifest.contains(id) {
                manifest.push(id.clone());
            }
        }
        manifest
    }

    /// Spawn rules shared by every falling entity
    pub fn spawn_policy(&self) -> SpawnPolicy {
        SpawnPolicy {
            spawn_y: SPAWN_OFFSET_Y,
            column_count: self.engine.column_count,
            playfield_height: self.engine.playfield_height() as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.playfield_width(), 909);
        assert_eq!(config.engine.playfield_height(), 505);
        assert_eq!(config.player.required_xp, 30);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "level": 2, "engine": { "column_count": 5 } }"#)
            .expect("valid config");
        assert_eq!(config.level, 2);
        assert_eq!(config.engine.column_count, 5);
        assert_eq!(config.engine.row_count(), 5);
        assert_eq!(config.player.lives, 5);
        assert_eq!(config.enemies.len(), 3);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = GameConfig::from_json("{ level: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_unlisted_sprite() {
        let err = GameConfig::from_json(r#"{ "items": [ { "sprite": "nope.png" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("nope.png")));
    }

    #[test]
    fn test_rejects_zero_columns_and_bad_volume() {
        let mut config = GameConfig::default();
        config.engine.column_count = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.sounds.collision.volume = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_off_grid_spawn() {
        let mut config = GameConfig::default();
        config.player.spawn = Some(SpawnPoint { x: 150, y: 300.0 });
        assert!(config.validate().is_err());

        config.player.spawn = Some(SpawnPoint { x: 800, y: 300.0 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_scores_and_level() {
        let err = GameConfig::from_json(
            r#"{ "player": { "points": 3000000000, "required_xp": 3000000000 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("player.points")));

        let mut config = GameConfig::default();
        config.item_reward = MAX_POINTS + 1;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.level = MAX_LEVEL + 1;
        assert!(config.validate().is_err());
        config.level = MAX_LEVEL;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_single_row_needs_explicit_spawn() {
        let mut config = GameConfig::default();
        config.engine.row_images.truncate(1);
        assert!(config.validate().is_err());

        config.player.spawn = Some(SpawnPoint { x: 0, y: 0.0 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_manifest_dedupes_in_order() {
        let mut config = GameConfig::default();
        config.resources = vec!["a.png".into(), "b.png".into(), "a.png".into()];
        assert_eq!(config.asset_manifest(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_spawn_policy_from_engine() {
        let policy = GameConfig::default().spawn_policy();
        assert_eq!(policy.spawn_y, -180.0);
        assert_eq!(policy.column_count, 9);
        assert_eq!(policy.playfield_height, 505.0);
    }
}
