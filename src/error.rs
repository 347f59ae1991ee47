//! Error types
//!
//! Placement and persistence failures are non-fatal and only logged. Config
//! and render surface errors abort initialization. Simulation and draw
//! errors stop the frame loop at the frame boundary.

use std::path::PathBuf;

use thiserror::Error;

/// No free spot was found for an entity
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("no free position found after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Renderer failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no render surface available")]
    NoSurface,
}

/// Configuration could not be loaded or is unusable
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// High score storage failures
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("high score storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored high score is malformed: {0}")]
    Format(#[from] serde_json::Error),
    #[error("high score storage unavailable")]
    Unavailable,
}

/// Simulation reached a state it cannot continue from
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("ball {what} became non-finite ({x}, {y})")]
    NonFinite { what: &'static str, x: f32, y: f32 },
}

/// Umbrella error for the game driver
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Sim(#[from] SimError),
}
