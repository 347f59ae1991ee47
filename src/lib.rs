//! Floater Ball - a drifting-ball arcade game
//!
//! Core modules:
//! - `sim`: Simulation (geometry, placement, physics, collisions, level flow)
//! - `scheduler`: Clock-driven frame loop, countdown and one-shot timers
//! - `game`: Game loop driver owning the session and its collaborators
//! - `renderer`: Renderer contract plus headless/ASCII implementations
//! - `highscores`: High score persistence
//! - `config`: Data-driven game constants

pub mod audio;
pub mod config;
pub mod error;
pub mod game;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod sim;

pub use config::GameConfig;
pub use error::GameError;
pub use game::{Command, Game};
pub use highscores::{FileStore, HighScoreStore, MemoryStore};

/// Game configuration constants (defaults for [`GameConfig`])
pub mod consts {
    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 600.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;
    /// Height of the score band at the top; the ball never enters it
    pub const HEADER_HEIGHT: f32 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_SPAWN_X: f32 = 300.0;
    pub const BALL_SPAWN_Y: f32 = 300.0;
    /// Velocity multiplier applied every tick (friction)
    pub const DAMPING: f32 = 0.97;
    /// Velocity added per tick per held direction
    pub const SPEED_INCREMENT: f32 = 0.5;
    pub const TRAIL_LENGTH: usize = 15;
    pub const WALL_HIT_COOLDOWN_MS: u64 = 150;

    /// Food and obstacle sizes
    pub const FOOD_WIDTH: f32 = 20.0;
    pub const FOOD_HEIGHT: f32 = 20.0;
    pub const OBSTACLE_BASE_SIZE: f32 = 20.0;
    pub const OBSTACLE_MAX_MULTIPLIER: f32 = 4.0;
    pub const OBSTACLE_RESTITUTION: f32 = 0.8;
    pub const OBSTACLE_PUSH: f32 = 2.0;
    pub const PLACEMENT_ATTEMPTS: u32 = 100;

    /// Scoring
    pub const REGULAR_FOOD_POINTS: u64 = 1;
    pub const BONUS_FOOD_POINTS: u64 = 10;
    pub const GREEN_FOOD_POINTS: u64 = 5;
    pub const MAX_GREEN_FOODS: u32 = 3;
    pub const POWERUP_SIZE_MULTIPLIER: f32 = 2.0;
    /// Powerup food may appear once this many seconds (or fewer) remain
    pub const POWERUP_TIME_THRESHOLD: u32 = 12;
    pub const POWERUP_CHANCE: f64 = 0.2;

    /// Level timing
    pub const INITIAL_LEVEL: u32 = 1;
    pub const INITIAL_TIME: u32 = 20;
    pub const MIN_LEVEL_TIME: u32 = 5;
    pub const TOTAL_LEVELS: u32 = 50;
    pub const TIMER_INTERVAL_MS: u64 = 1000;
    pub const STICKY_MINE_DURATION_MS: u64 = 5000;
    pub const SPECIAL_SPAWN_DELAY_MS: u64 = 5000;

    /// Score popups (in ticks)
    pub const POPUP_DURATION: u32 = 60;
    pub const POPUP_RISE_SPEED: f32 = 1.0;
}
