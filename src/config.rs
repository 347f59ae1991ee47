//! Game configuration
//!
//! Every tunable constant the engine reads at initialization. Defaults match
//! the classic game; a JSON file may override any subset of fields.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Game constants table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub header_height: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_spawn_x: f32,
    pub ball_spawn_y: f32,
    pub damping: f32,
    pub speed_increment: f32,
    pub trail_length: usize,
    pub wall_hit_cooldown_ms: u64,

    // === Entities ===
    pub food_width: f32,
    pub food_height: f32,
    pub obstacle_base_size: f32,
    pub obstacle_max_multiplier: f32,
    pub obstacle_restitution: f32,
    pub obstacle_push: f32,
    pub placement_attempts: u32,

    // === Scoring ===
    pub regular_points: u64,
    pub bonus_points: u64,
    pub green_points: u64,
    pub max_green_foods: u32,
    pub powerup_size_multiplier: f32,
    pub powerup_time_threshold: u32,
    pub powerup_chance: f64,

    // === Timing ===
    pub initial_level: u32,
    pub initial_time: u32,
    pub min_level_time: u32,
    pub total_levels: u32,
    pub timer_interval_ms: u64,
    pub sticky_mine_duration_ms: u64,
    pub special_spawn_delay_ms: u64,

    // === Popups ===
    pub popup_duration: u32,
    pub popup_rise_speed: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            header_height: HEADER_HEIGHT,

            ball_radius: BALL_RADIUS,
            ball_spawn_x: BALL_SPAWN_X,
            ball_spawn_y: BALL_SPAWN_Y,
            damping: DAMPING,
            speed_increment: SPEED_INCREMENT,
            trail_length: TRAIL_LENGTH,
            wall_hit_cooldown_ms: WALL_HIT_COOLDOWN_MS,

            food_width: FOOD_WIDTH,
            food_height: FOOD_HEIGHT,
            obstacle_base_size: OBSTACLE_BASE_SIZE,
            obstacle_max_multiplier: OBSTACLE_MAX_MULTIPLIER,
            obstacle_restitution: OBSTACLE_RESTITUTION,
            obstacle_push: OBSTACLE_PUSH,
            placement_attempts: PLACEMENT_ATTEMPTS,

            regular_points: REGULAR_FOOD_POINTS,
            bonus_points: BONUS_FOOD_POINTS,
            green_points: GREEN_FOOD_POINTS,
            max_green_foods: MAX_GREEN_FOODS,
            powerup_size_multiplier: POWERUP_SIZE_MULTIPLIER,
            powerup_time_threshold: POWERUP_TIME_THRESHOLD,
            powerup_chance: POWERUP_CHANCE,

            initial_level: INITIAL_LEVEL,
            initial_time: INITIAL_TIME,
            min_level_time: MIN_LEVEL_TIME,
            total_levels: TOTAL_LEVELS,
            timer_interval_ms: TIMER_INTERVAL_MS,
            sticky_mine_duration_ms: STICKY_MINE_DURATION_MS,
            special_spawn_delay_ms: SPECIAL_SPAWN_DELAY_MS,

            popup_duration: POPUP_DURATION,
            popup_rise_speed: POPUP_RISE_SPEED,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(invalid("canvas_width", "canvas must have a positive size"));
        }
        if !(self.header_height >= 0.0 && self.header_height < self.canvas_height) {
            return Err(invalid("header_height", "header must fit inside the canvas"));
        }
        if !(self.ball_radius > 0.0) {
            return Err(invalid("ball_radius", "must be positive"));
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(invalid("damping", format!("{} is outside (0, 1)", self.damping)));
        }
        if !(self.food_width > 0.0 && self.food_height > 0.0) {
            return Err(invalid("food_width", "food must have a positive size"));
        }
        if self.food_width > self.canvas_width || self.food_height > self.playable_height() {
            return Err(invalid("food_width", "food does not fit in the playable area"));
        }
        if !(self.obstacle_base_size > 0.0 && self.obstacle_max_multiplier >= 1.0) {
            return Err(invalid(
                "obstacle_max_multiplier",
                "obstacles need a positive base size and a multiplier of at least 1",
            ));
        }
        let longest = self.obstacle_base_size * self.obstacle_max_multiplier;
        if longest > self.playable_height().min(self.canvas_width) {
            return Err(invalid("obstacle_base_size", "largest obstacle does not fit"));
        }
        if self.placement_attempts == 0 {
            return Err(invalid("placement_attempts", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.powerup_chance) {
            return Err(invalid("powerup_chance", "must be a probability"));
        }
        if self.total_levels == 0
            || self.initial_level == 0
            || self.initial_level > self.total_levels
        {
            return Err(invalid(
                "total_levels",
                "initial level must lie in 1..=total_levels",
            ));
        }
        if self.min_level_time == 0 {
            return Err(invalid("min_level_time", "levels must last at least a second"));
        }
        if self.timer_interval_ms == 0 {
            return Err(invalid("timer_interval_ms", "must be positive"));
        }
        Ok(())
    }

    /// Y coordinate of the top of the playable area
    pub fn playable_top(&self) -> f32 {
        self.header_height
    }

    /// Height of the playable area below the header band
    pub fn playable_height(&self) -> f32 {
        self.canvas_height - self.header_height
    }

    pub fn timer_interval(&self) -> Duration {
        Duration::from_millis(self.timer_interval_ms)
    }

    pub fn sticky_mine_duration(&self) -> Duration {
        Duration::from_millis(self.sticky_mine_duration_ms)
    }

    pub fn special_spawn_delay(&self) -> Duration {
        Duration::from_millis(self.special_spawn_delay_ms)
    }

    pub fn wall_hit_cooldown(&self) -> Duration {
        Duration::from_millis(self.wall_hit_cooldown_ms)
    }
}
