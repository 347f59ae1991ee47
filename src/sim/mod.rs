//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (creation order for obstacles and food)
//! - No rendering, timer or platform dependencies

pub mod collision;
pub mod geometry;
pub mod level;
pub mod physics;
pub mod placement;
pub mod state;
pub mod tick;

pub use collision::{resolve_collisions, resolve_obstacles};
pub use geometry::{Rect, ball_overlaps_rectangle, ball_touches_food, rectangles_overlap};
pub use level::{
    advance_level, begin_transition, check_level_end, end_game, level_time, obstacle_count,
    reset_session, start_level, start_session, sticky_mine_count,
};
pub use placement::{generate_obstacles, generate_position, is_position_free, place_food};
pub use state::{
    Ball, Food, FoodKind, GameEvent, GameOverReason, GamePhase, GameState, ScorePopup,
};
pub use tick::{TickInput, tick};
