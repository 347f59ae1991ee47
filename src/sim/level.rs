//! Level progression and session phase changes
//!
//! Only the simulation side lives here. Timers that go with each transition
//! are handled by the driver in `crate::game`.

use glam::Vec2;
use rand::Rng;

use super::placement::populate_level;
use super::state::{Ball, GameEvent, GameOverReason, GamePhase, GameState};
use crate::config::GameConfig;

/// Seconds on the clock for a level: one second less every three levels,
/// never below the configured minimum
pub fn level_time(config: &GameConfig, level: u32) -> u32 {
    let reduction = level.saturating_sub(1) / 3;
    config
        .initial_time
        .saturating_sub(reduction)
        .max(config.min_level_time)
}

/// Obstacles requested for a level
pub fn obstacle_count(level: u32) -> usize {
    if level < 2 {
        0
    } else {
        3 + (level as usize - 2)
    }
}

/// Sticky mines for a level: even levels past 5 only
pub fn sticky_mine_count(level: u32) -> usize {
    if level <= 5 || level % 2 != 0 {
        0
    } else {
        ((level as usize - 6) / 6) + 2
    }
}

/// Bonus food shows up a few seconds into every level from 2 on
pub fn bonus_scheduled(level: u32) -> bool {
    level >= 2
}

/// Forbidden food shows up on even levels from 2 on
pub fn forbidden_scheduled(level: u32) -> bool {
    level >= 2 && level % 2 == 0
}

/// Back to the start screen with a fresh session (high score kept)
pub fn reset_session(state: &mut GameState, config: &GameConfig) {
    state.level = config.initial_level;
    state.score = 0;
    state.time_left = level_time(config, config.initial_level);
    state.level_score_count = 0;
    state.ball = Ball::new(
        Vec2::new(config.ball_spawn_x, config.ball_spawn_y),
        config.ball_radius,
    );
    state.powerup_active = false;
    state.powerup_rolled = false;
    state.clear_board();
    state.popups.clear();
    state.exit_pending = false;
    state.phase = GamePhase::Ready;
}

/// Build the board for `state.level` and start playing it
pub fn start_level<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    populate_level(state, config, rng);
    state.phase = GamePhase::Running;
    state.push_event(GameEvent::LevelStarted { level: state.level });
    log::info!(
        "Level {} started ({}s, {} obstacles)",
        state.level,
        state.time_left,
        state.obstacles.len()
    );
}

/// Reset and start at the first level
pub fn start_session<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    reset_session(state, config);
    start_level(state, config, rng);
}

/// End the run
pub fn end_game(state: &mut GameState, reason: GameOverReason) {
    if state.phase.is_game_over() {
        return;
    }
    state.phase = GamePhase::GameOver { reason };
    state.push_event(GameEvent::GameOver { reason });
    log::info!(
        "Game over ({:?}) at level {} with score {}",
        reason,
        state.level,
        state.score
    );
}

/// Level finished with points: clear the board and wait for the player
pub fn begin_transition(state: &mut GameState) {
    state.phase = GamePhase::LevelTransition;
    state.clear_board();
    state.push_event(GameEvent::LevelCleared { level: state.level });
    log::info!("Level {} cleared", state.level);
}

/// Evaluate the level clock; called once per tick while live
pub fn check_level_end(state: &mut GameState, config: &GameConfig) {
    if !state.phase.is_live() || state.time_left > 0 {
        return;
    }
    if state.level_score_count == 0 {
        end_game(state, GameOverReason::NoPointsScored);
    } else if state.level < config.total_levels {
        begin_transition(state);
    } else {
        end_game(state, GameOverReason::AllLevelsCleared);
    }
}

/// Continue from a level transition into the next level
///
/// Returns false (and does nothing) outside `LevelTransition`.
pub fn advance_level<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) -> bool {
    if state.phase != GamePhase::LevelTransition {
        return false;
    }
    state.level += 1;
    state.time_left = level_time(config, state.level);
    state.level_score_count = 0;
    state.powerup_active = false;
    state.powerup_rolled = false;
    state.ball.radius = config.ball_radius;
    start_level(state, config, rng);
    true
}

/// Running or stuck -> Paused. Returns false if there was nothing to pause.
pub fn pause(state: &mut GameState) -> bool {
    let stuck = match state.phase {
        GamePhase::Running => false,
        GamePhase::StuckInMine => true,
        _ => return false,
    };
    state.phase = GamePhase::Paused { stuck };
    state.push_event(GameEvent::Paused);
    true
}

/// Paused -> Running or back into the freeze
///
/// `freeze_left` says whether an interrupted freeze still has time on it; a
/// freeze that ran out while paused resumes straight into `Running`.
pub fn resume(state: &mut GameState, freeze_left: bool) -> bool {
    let GamePhase::Paused { stuck } = state.phase else {
        return false;
    };
    state.phase = if stuck && freeze_left {
        GamePhase::StuckInMine
    } else {
        GamePhase::Running
    };
    state.exit_pending = false;
    state.push_event(GameEvent::Resumed);
    true
}

/// Freeze timer expired
pub fn release_from_mine(state: &mut GameState) {
    match state.phase {
        GamePhase::StuckInMine => state.phase = GamePhase::Running,
        GamePhase::Paused { stuck: true } => state.phase = GamePhase::Paused { stuck: false },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::FoodKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_level_time_formula() {
        let config = GameConfig::default();
        assert_eq!(level_time(&config, 1), 20);
        assert_eq!(level_time(&config, 3), 20);
        assert_eq!(level_time(&config, 4), 19);
        assert_eq!(level_time(&config, 10), 17);
        assert_eq!(level_time(&config, 46), 5);
        assert_eq!(level_time(&config, 50), 5);
    }

    #[test]
    fn test_obstacle_count() {
        assert_eq!(obstacle_count(1), 0);
        assert_eq!(obstacle_count(2), 3);
        assert_eq!(obstacle_count(5), 6);
    }

    #[test]
    fn test_sticky_mine_count() {
        assert_eq!(sticky_mine_count(5), 0);
        assert_eq!(sticky_mine_count(6), 2);
        assert_eq!(sticky_mine_count(7), 0);
        assert_eq!(sticky_mine_count(10), 2);
        assert_eq!(sticky_mine_count(12), 3);
        assert_eq!(sticky_mine_count(18), 4);
    }

    #[test]
    fn test_special_schedule() {
        assert!(!bonus_scheduled(1));
        assert!(bonus_scheduled(2));
        assert!(bonus_scheduled(37));
        assert!(!forbidden_scheduled(1));
        assert!(forbidden_scheduled(2));
        assert!(!forbidden_scheduled(3));
    }

    fn running_state(level: u32) -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.level = level;
        state.phase = GamePhase::Running;
        (state, config)
    }

    #[test]
    fn test_zero_points_always_game_over() {
        for level in 1..=50 {
            let (mut state, config) = running_state(level);
            state.time_left = 0;
            check_level_end(&mut state, &config);
            assert_eq!(
                state.phase,
                GamePhase::GameOver {
                    reason: GameOverReason::NoPointsScored
                },
                "level {level}"
            );
        }
    }

    #[test]
    fn test_points_lead_to_transition() {
        let (mut state, config) = running_state(3);
        state.level_score_count = 2;
        state.time_left = 0;
        state.foods.push(crate::sim::state::Food {
            kind: FoodKind::Regular,
            rect: crate::sim::Rect::new(10.0, 30.0, 20.0, 20.0),
        });
        check_level_end(&mut state, &config);
        assert_eq!(state.phase, GamePhase::LevelTransition);
        assert!(state.foods.is_empty());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.drain_events(), vec![GameEvent::LevelCleared { level: 3 }]);
    }

    #[test]
    fn test_final_level_is_victory() {
        let (mut state, config) = running_state(50);
        state.level_score_count = 1;
        state.time_left = 0;
        check_level_end(&mut state, &config);
        assert_eq!(
            state.phase,
            GamePhase::GameOver {
                reason: GameOverReason::AllLevelsCleared
            }
        );
    }

    #[test]
    fn test_clock_not_expired_is_noop() {
        let (mut state, config) = running_state(4);
        state.time_left = 3;
        check_level_end(&mut state, &config);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_advance_level_resets_per_level_state() {
        let (mut state, config) = running_state(3);
        let mut rng = Pcg32::seed_from_u64(3);
        state.phase = GamePhase::LevelTransition;
        state.level_score_count = 5;
        state.powerup_active = true;
        state.powerup_rolled = true;
        state.ball.radius = 20.0;

        assert!(advance_level(&mut state, &config, &mut rng));
        assert_eq!(state.level, 4);
        assert_eq!(state.time_left, 19);
        assert_eq!(state.level_score_count, 0);
        assert!(!state.powerup_active);
        assert!(!state.powerup_rolled);
        assert_eq!(state.ball.radius, config.ball_radius);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.food_count(FoodKind::Regular), 1);
    }

    #[test]
    fn test_continue_outside_transition_ignored() {
        let (mut state, config) = running_state(3);
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(!advance_level(&mut state, &config, &mut rng));
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_pause_resume_phases() {
        let (mut state, _) = running_state(1);
        assert!(pause(&mut state));
        assert_eq!(state.phase, GamePhase::Paused { stuck: false });
        assert!(!pause(&mut state));
        assert!(resume(&mut state, false));
        assert_eq!(state.phase, GamePhase::Running);

        state.phase = GamePhase::StuckInMine;
        assert!(pause(&mut state));
        assert!(resume(&mut state, true));
        assert_eq!(state.phase, GamePhase::StuckInMine);

        assert!(pause(&mut state));
        assert!(resume(&mut state, false));
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let (mut state, config) = running_state(9);
        state.high_score = 44;
        state.score = 30;
        state.ball.pos = Vec2::new(10.0, 10.0);
        reset_session(&mut state, &config);
        assert_eq!(state.high_score, 44);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.time_left, 20);
        assert_eq!(state.ball.pos, Vec2::new(300.0, 300.0));
        assert_eq!(state.phase, GamePhase::Ready);
    }
}
