//! Per-frame simulation tick
//!
//! Advances the game by one display frame: input, damping, wall bounces,
//! collisions, integration, popups and the level clock check.

use rand::Rng;

use super::collision::resolve_collisions;
use super::level::check_level_end;
use super::physics;
use super::state::{GameEvent, GamePhase, GameState};
use crate::config::GameConfig;
use crate::error::SimError;

/// Movement intents held during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Kill all velocity
    pub stop: bool,
}

/// Advance the game state by one tick
pub fn tick<R: Rng>(
    state: &mut GameState,
    input: &TickInput,
    config: &GameConfig,
    rng: &mut R,
) -> Result<(), SimError> {
    match state.phase {
        GamePhase::Running => {}
        GamePhase::StuckInMine => {
            // Frozen: the clock and popups keep going, nothing moves
            state.update_popups(config);
            check_level_end(state, config);
            return Ok(());
        }
        _ => return Ok(()),
    }

    physics::apply_input(&mut state.ball, input, config);
    physics::apply_damping(&mut state.ball, config);
    if physics::reflect_off_bounds(&mut state.ball, config) {
        state.push_event(GameEvent::WallHit);
    }

    resolve_collisions(state, config, rng);
    if state.phase.is_game_over() {
        return Ok(());
    }

    physics::commit(&mut state.ball, config);
    check_finite(state)?;

    state.update_popups(config);
    check_level_end(state, config);
    Ok(())
}

fn check_finite(state: &GameState) -> Result<(), SimError> {
    let ball = &state.ball;
    if !ball.pos.is_finite() {
        return Err(SimError::NonFinite {
            what: "position",
            x: ball.pos.x,
            y: ball.pos.y,
        });
    }
    if !ball.vel.is_finite() {
        return Err(SimError::NonFinite {
            what: "velocity",
            x: ball.vel.x,
            y: ball.vel.y,
        });
    }
    Ok(())
}
