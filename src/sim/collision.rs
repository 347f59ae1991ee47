//! Collision detection and response
//!
//! Obstacles deflect the ball; every food category applies its effect. Food
//! is one tagged list, scanned kind by kind in [`FoodKind::COLLISION_ORDER`]
//! and back to front so removals never skip an entry.

use glam::Vec2;
use rand::Rng;

use super::geometry::{ball_overlaps_rectangle, ball_touches_food};
use super::level::end_game;
use super::physics::clamp_inside_bounds;
use super::placement::place_food;
use super::state::{FoodKind, GameEvent, GameOverReason, GamePhase, GameState};
use crate::config::GameConfig;

/// What the scan should do after a food effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Keep scanning this kind
    Continue,
    /// Done with this kind, move to the next one
    NextKind,
    /// Stop all collision handling this tick
    Halt,
}

/// Bounce off the first obstacle the ball overlaps (creation order)
///
/// Velocity is reversed and scaled by the restitution, then the ball is
/// nudged away from the obstacle center. Returns true on a hit.
pub fn resolve_obstacles(state: &mut GameState, config: &GameConfig) -> bool {
    let ball = &mut state.ball;
    let Some(obstacle) = state
        .obstacles
        .iter()
        .find(|obs| ball_overlaps_rectangle(ball.pos, ball.radius, obs))
    else {
        return false;
    };

    ball.vel = -ball.vel * config.obstacle_restitution;
    let away = ball.pos - obstacle.center();
    let distance = away.length();
    if distance > 0.0 {
        ball.pos += away / distance * config.obstacle_push;
    }
    state.events.push(GameEvent::ObstacleHit);
    true
}

/// Run every collision check for one tick
pub fn resolve_collisions<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    resolve_obstacles(state, config);

    'kinds: for kind in FoodKind::COLLISION_ORDER {
        let mut i = state.foods.len();
        while i > 0 {
            i -= 1;
            let food = state.foods[i];
            let ball = &state.ball;
            if food.kind != kind || !ball_touches_food(ball.pos, ball.radius, &food.rect) {
                continue;
            }
            match apply_food(state, config, rng, i) {
                Flow::Continue => {}
                Flow::NextKind => continue 'kinds,
                Flow::Halt => break 'kinds,
            }
        }
    }
}

/// Apply the effect of the food at `index`
fn apply_food<R: Rng>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    index: usize,
) -> Flow {
    let food = state.foods[index];
    let popup_at = food.rect.top_center();

    match food.kind {
        FoodKind::Regular => {
            state.score += config.regular_points;
            state.level_score_count += 1;
            state.add_popup(popup_at, format!("+{}", config.regular_points), config);
            state.events.push(GameEvent::AteRegular);
            if let Err(e) = place_food(state, config, rng, FoodKind::Regular) {
                log::debug!("Regular food stays put: {e}");
            }
            maybe_spawn_powerup(state, config, rng);
            Flow::NextKind
        }
        FoodKind::Bonus => {
            state.score += config.bonus_points;
            state.level_score_count += 1;
            state.add_popup(popup_at, format!("+{}", config.bonus_points), config);
            state.events.push(GameEvent::AteBonus);
            state.foods.remove(index);
            Flow::NextKind
        }
        FoodKind::Powerup => {
            state.powerup_active = true;
            state.ball.radius = config.ball_radius * config.powerup_size_multiplier;
            clamp_inside_bounds(&mut state.ball, config);
            state.events.push(GameEvent::AtePowerup);
            state.foods.remove(index);
            Flow::NextKind
        }
        FoodKind::Green => {
            state.score += config.green_points;
            state.level_score_count += 1;
            state.add_popup(popup_at, format!("+{}", config.green_points), config);
            state.events.push(GameEvent::AteGreen);
            state.foods.remove(index);
            Flow::Continue
        }
        FoodKind::Forbidden => {
            state.events.push(GameEvent::ForbiddenDeath);
            end_game(state, GameOverReason::ForbiddenFruit);
            Flow::Halt
        }
        FoodKind::StickyMine => {
            state.ball.vel = Vec2::ZERO;
            state.phase = GamePhase::StuckInMine;
            state.add_popup(popup_at, "Stuck!", config);
            state.events.push(GameEvent::StuckInMine);
            state.foods.remove(index);
            log::debug!("Stuck in sticky mine");
            Flow::Halt
        }
    }
}

/// Late in a level, eating regular food may bring out the powerup food
///
/// One roll per level: the first regular collection at or below the time
/// threshold decides it.
fn maybe_spawn_powerup<R: Rng>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    if state.powerup_rolled
        || state.level < 2
        || state.time_left > config.powerup_time_threshold
        || state.has_food(FoodKind::Powerup)
    {
        return;
    }
    state.powerup_rolled = true;
    if !rng.random_bool(config.powerup_chance) {
        return;
    }
    match place_food(state, config, rng, FoodKind::Powerup) {
        Ok(()) => log::debug!("Powerup food spawned"),
        Err(e) => log::debug!("Powerup food skipped: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;
    use crate::sim::state::Food;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (GameState, GameConfig, Pcg32) {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.phase = GamePhase::Running;
        (state, config, Pcg32::seed_from_u64(11))
    }

    fn food(kind: FoodKind, x: f32, y: f32) -> Food {
        Food {
            kind,
            rect: Rect::new(x, y, 20.0, 20.0),
        }
    }

    #[test]
    fn test_obstacle_bounce_and_push() {
        let (mut state, config, _) = setup();
        state.ball.pos = Vec2::new(100.0, 100.0);
        state.ball.vel = Vec2::new(2.0, 1.0);
        // Obstacle centered at (115, 100), right of the ball
        state.obstacles.push(Rect::new(105.0, 90.0, 20.0, 20.0));

        assert!(resolve_obstacles(&mut state, &config));
        assert!((state.ball.vel.x + 1.6).abs() < 1e-5);
        assert!((state.ball.vel.y + 0.8).abs() < 1e-5);
        assert_eq!(state.ball.pos, Vec2::new(98.0, 100.0));
        assert_eq!(state.drain_events(), vec![GameEvent::ObstacleHit]);
    }

    #[test]
    fn test_obstacle_centered_ball_not_pushed() {
        let (mut state, config, _) = setup();
        state.ball.pos = Vec2::new(115.0, 100.0);
        state.ball.vel = Vec2::new(1.0, 0.0);
        state.obstacles.push(Rect::new(105.0, 90.0, 20.0, 20.0));

        assert!(resolve_obstacles(&mut state, &config));
        assert_eq!(state.ball.pos, Vec2::new(115.0, 100.0));
        assert!((state.ball.vel.x + 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_only_first_obstacle_counts() {
        let (mut state, config, _) = setup();
        state.ball.pos = Vec2::new(100.0, 100.0);
        state.ball.vel = Vec2::new(1.0, 0.0);
        state.obstacles.push(Rect::new(105.0, 90.0, 20.0, 20.0));
        state.obstacles.push(Rect::new(80.0, 95.0, 12.0, 10.0));

        resolve_obstacles(&mut state, &config);
        assert!((state.ball.vel.x + 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_regular_food_scores_and_moves() {
        let (mut state, config, mut rng) = setup();
        state.ball.pos = Vec2::new(100.0, 100.0);
        state.foods.push(food(FoodKind::Regular, 95.0, 95.0));

        resolve_collisions(&mut state, &config, &mut rng);
        assert_eq!(state.score, 1);
        assert_eq!(state.level_score_count, 1);
        assert_eq!(state.food_count(FoodKind::Regular), 1);
        assert_ne!(state.regular_food().unwrap().rect.pos, Vec2::new(95.0, 95.0));
        assert_eq!(state.popups[0].text, "+1");
        assert!(state.events.contains(&GameEvent::AteRegular));
    }

    #[test]
    fn test_regular_food_stays_put_when_board_full() {
        let (mut state, config, mut rng) = setup();
        state.ball.pos = Vec2::new(100.0, 100.0);
        state.foods.push(food(FoodKind::Regular, 95.0, 95.0));
        state
            .obstacles
            .push(Rect::new(0.0, 0.0, config.canvas_width, config.canvas_height));

        resolve_collisions(&mut state, &config, &mut rng);
        assert_eq!(state.score, 1);
        assert_eq!(state.level_score_count, 1);
        assert_eq!(state.food_count(FoodKind::Regular), 1);
        assert_eq!(state.regular_food().unwrap().rect.pos, Vec2::new(95.0, 95.0));
        assert!(state.events.contains(&GameEvent::AteRegular));
    }

    #[test]
    fn test_bonus_food_scores_ten_and_disappears() {
        let (mut state, config, mut rng) = setup();
        state.ball.pos = Vec2::new(100.0, 100.0);
        state.foods.push(food(FoodKind::Bonus, 95.0, 95.0));

        resolve_collisions(&mut state, &config, &mut rng);
        assert_eq!(state.score, 10);
        assert_eq!(state.level_score_count, 1);
        assert!(!state.has_food(FoodKind::Bonus));
    }

    #[test]
    fn test_green_removes_only_touched_instances() {
        let (mut state, config, mut rng) = setup();
        state.ball.pos = Vec2::new(100.0, 100.0);
        state.foods.push(food(FoodKind::Green, 300.0, 300.0));
        state.foods.push(food(FoodKind::Green, 95.0, 95.0));
        state.foods.push(food(FoodKind::Green, 85.0, 85.0));

        resolve_collisions(&mut state, &config, &mut rng);
        assert_eq!(state.score, 10);
        assert_eq!(state.level_score_count, 2);
        assert_eq!(state.food_count(FoodKind::Green), 1);
        assert_eq!(state.foods[0].rect.pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_powerup_grows_and_clamps() {
        let (mut state, config, mut rng) = setup();
        state.ball.pos = Vec2::new(12.0, 32.0);
        state.foods.push(food(FoodKind::Powerup, 10.0, 25.0));

        resolve_collisions(&mut state, &config, &mut rng);
        assert!(state.powerup_active);
        assert_eq!(state.ball.radius, 20.0);
        assert_eq!(state.ball.pos, Vec2::new(20.0, 40.0));
        assert!(!state.has_food(FoodKind::Powerup));
    }

    #[test]
    fn test_forbidden_ends_game_and_halts() {
        let (mut state, config, mut rng) = setup();
        state.ball.pos = Vec2::new(100.0, 100.0);
        state.foods.push(food(FoodKind::Forbidden, 95.0, 95.0));
        state.foods.push(food(FoodKind::StickyMine, 90.0, 90.0));

        resolve_collisions(&mut state, &config, &mut rng);
        assert_eq!(
            state.phase,
            GamePhase::GameOver {
                reason: GameOverReason::ForbiddenFruit
            }
        );
        // Mine check never ran
        assert!(state.has_food(FoodKind::StickyMine));
        assert!(state.events.contains(&GameEvent::ForbiddenDeath));
    }

    #[test]
    fn test_sticky_mine_freezes_and_is_consumed() {
        let (mut state, config, mut rng) = setup();
        state.ball.pos = Vec2::new(100.0, 100.0);
        state.ball.vel = Vec2::new(4.0, 4.0);
        state.foods.push(food(FoodKind::StickyMine, 95.0, 95.0));
        state.foods.push(food(FoodKind::StickyMine, 90.0, 90.0));

        resolve_collisions(&mut state, &config, &mut rng);
        assert_eq!(state.phase, GamePhase::StuckInMine);
        assert_eq!(state.ball.vel, Vec2::ZERO);
        // Back-to-front scan: the later mine is consumed, the earlier survives
        assert_eq!(state.food_count(FoodKind::StickyMine), 1);
        assert_eq!(state.foods[0].rect.pos, Vec2::new(95.0, 95.0));
    }

    #[test]
    fn test_powerup_rolled_once_per_level() {
        let (mut state, config, _) = setup();
        let config = GameConfig {
            powerup_chance: 0.0,
            ..config
        };
        let mut rng = Pcg32::seed_from_u64(1);
        state.level = 3;
        state.time_left = 12;

        maybe_spawn_powerup(&mut state, &config, &mut rng);
        assert!(state.powerup_rolled);
        assert!(!state.has_food(FoodKind::Powerup));

        let config = GameConfig {
            powerup_chance: 1.0,
            ..config
        };
        maybe_spawn_powerup(&mut state, &config, &mut rng);
        assert!(!state.has_food(FoodKind::Powerup));
    }

    #[test]
    fn test_powerup_spawns_when_eligible() {
        let (mut state, config, mut rng) = setup();
        let config = GameConfig {
            powerup_chance: 1.0,
            ..config
        };
        state.level = 2;
        state.time_left = 13;
        maybe_spawn_powerup(&mut state, &config, &mut rng);
        assert!(!state.powerup_rolled, "above the threshold nothing happens");

        state.time_left = 12;
        maybe_spawn_powerup(&mut state, &config, &mut rng);
        assert!(state.has_food(FoodKind::Powerup));

        state.level = 1;
        state.powerup_rolled = false;
        state.remove_food_kind(FoodKind::Powerup);
        maybe_spawn_powerup(&mut state, &config, &mut rng);
        assert!(!state.has_food(FoodKind::Powerup));
    }
}
