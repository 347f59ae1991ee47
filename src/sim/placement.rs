//! Procedural entity placement
//!
//! Rejection sampling inside the playable area: draw a candidate, reject it if
//! it touches anything it must not, give up after a fixed attempt budget.

use glam::Vec2;
use rand::Rng;

use super::geometry::{Rect, ball_overlaps_rectangle, rectangles_overlap};
use super::level::{obstacle_count, sticky_mine_count};
use super::state::{Food, FoodKind, GameState};
use crate::config::GameConfig;
use crate::error::PlacementError;

/// Whether a food-sized rect at `rect` is clear of obstacles and of every
/// food whose kind is not in `exclude`
pub fn is_position_free(state: &GameState, rect: &Rect, exclude: &[FoodKind]) -> bool {
    if state.obstacles.iter().any(|obs| rectangles_overlap(rect, obs)) {
        return false;
    }
    !state
        .foods
        .iter()
        .filter(|f| !exclude.contains(&f.kind))
        .any(|f| rectangles_overlap(rect, &f.rect))
}

/// Random food-sized rect snapped to whole pixels, below the header band
fn random_food_rect<R: Rng>(config: &GameConfig, rng: &mut R) -> Rect {
    let x = ((config.canvas_width - config.food_width) * rng.random::<f32>()).round();
    let y = (config.playable_top()
        + (config.playable_height() - config.food_height) * rng.random::<f32>())
    .round();
    Rect::new(x, y, config.food_width, config.food_height)
}

/// Find a free spot for a food item
///
/// Tries `config.placement_attempts` candidates before giving up.
pub fn generate_position<R: Rng>(
    state: &GameState,
    config: &GameConfig,
    rng: &mut R,
    exclude: &[FoodKind],
) -> Result<Rect, PlacementError> {
    let mut attempts = 0;
    while attempts < config.placement_attempts {
        attempts += 1;
        let candidate = random_food_rect(config, rng);
        if is_position_free(state, &candidate, exclude) {
            return Ok(candidate);
        }
    }
    Err(PlacementError::Exhausted { attempts })
}

/// Place (or move) a food of the given kind
///
/// Unique kinds ignore their own current instance while searching and replace
/// it on success. On failure nothing changes: a regular food stays where it
/// was, anything else simply does not appear.
pub fn place_food<R: Rng>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    kind: FoodKind,
) -> Result<(), PlacementError> {
    // Mines never ignore each other; greens may stack on greens
    let exclude: &[FoodKind] = match kind {
        FoodKind::StickyMine => &[],
        _ => std::slice::from_ref(&kind),
    };
    let rect = generate_position(state, config, rng, exclude)?;

    if kind.is_unique() {
        if let Some(existing) = state.foods.iter_mut().find(|f| f.kind == kind) {
            existing.rect = rect;
            return Ok(());
        }
    }
    state.foods.push(Food { kind, rect });
    Ok(())
}

/// Random obstacle: base square stretched 1x-4x along one axis
fn random_obstacle<R: Rng>(config: &GameConfig, rng: &mut R) -> Rect {
    let horizontal = rng.random_bool(0.5);
    let multiplier = 1.0 + rng.random::<f32>() * (config.obstacle_max_multiplier - 1.0);
    let base = config.obstacle_base_size;
    let size = if horizontal {
        Vec2::new(base * multiplier, base)
    } else {
        Vec2::new(base, base * multiplier)
    };
    let x = ((config.canvas_width - size.x) * rng.random::<f32>()).round();
    let y = (config.playable_top() + (config.playable_height() - size.y) * rng.random::<f32>())
        .round();
    Rect {
        pos: Vec2::new(x, y),
        size,
    }
}

/// Replace the obstacle set for the current level
///
/// Obstacles avoid each other, the ball (at its base radius) and the regular
/// food. An obstacle that cannot be placed is dropped, so fewer than
/// requested may exist. Returns the number placed.
pub fn generate_obstacles<R: Rng>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
) -> usize {
    state.obstacles.clear();
    let wanted = obstacle_count(state.level);
    let regular = state.regular_food().map(|f| f.rect);

    for _ in 0..wanted {
        let mut placed = None;
        for _ in 0..config.placement_attempts {
            let candidate = random_obstacle(config, rng);
            let blocked = state
                .obstacles
                .iter()
                .any(|obs| rectangles_overlap(&candidate, obs))
                || ball_overlaps_rectangle(state.ball.pos, config.ball_radius, &candidate)
                || regular.is_some_and(|food| rectangles_overlap(&food, &candidate));
            if !blocked {
                placed = Some(candidate);
                break;
            }
        }
        match placed {
            Some(obstacle) => state.obstacles.push(obstacle),
            None => log::debug!("Dropped obstacle: no free position"),
        }
    }

    if state.obstacles.len() < wanted {
        log::debug!(
            "Placed {} of {} obstacles on level {}",
            state.obstacles.len(),
            wanted,
            state.level
        );
    }
    state.obstacles.len()
}

/// Build the board for the current level
///
/// Order matters: obstacles first, then greens and mines, then the regular
/// food so it avoids everything else.
pub fn populate_level<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    state.clear_board();
    generate_obstacles(state, config, rng);

    let greens = if state.level >= 2 {
        rng.random_range(1..=config.max_green_foods.max(1))
    } else {
        0
    };
    for _ in 0..greens {
        if let Err(e) = place_food(state, config, rng, FoodKind::Green) {
            log::debug!("Green food skipped: {e}");
        }
    }

    for _ in 0..sticky_mine_count(state.level) {
        if let Err(e) = place_food(state, config, rng, FoodKind::StickyMine) {
            log::debug!("Sticky mine skipped: {e}");
        }
    }

    if let Err(e) = place_food(state, config, rng, FoodKind::Regular) {
        log::warn!("Regular food could not be placed: {e}");
    }
}
