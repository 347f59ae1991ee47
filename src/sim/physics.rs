//! Ball motion: input impulses, damping, wall reflection, integration

use glam::Vec2;

use super::state::Ball;
use super::tick::TickInput;
use crate::config::GameConfig;

/// Apply held movement intents to the velocity
///
/// Stop wins over any direction held in the same tick.
pub fn apply_input(ball: &mut Ball, input: &TickInput, config: &GameConfig) {
    if input.stop {
        ball.vel = Vec2::ZERO;
        return;
    }
    let step = config.speed_increment;
    if input.left {
        ball.vel.x -= step;
    }
    if input.right {
        ball.vel.x += step;
    }
    if input.up {
        ball.vel.y -= step;
    }
    if input.down {
        ball.vel.y += step;
    }
}

/// Friction
pub fn apply_damping(ball: &mut Ball, config: &GameConfig) {
    ball.vel *= config.damping;
}

/// Reflect velocity if the next position would leave the board
///
/// The top edge is the bottom of the header band. Returns true when either
/// axis bounced.
pub fn reflect_off_bounds(ball: &mut Ball, config: &GameConfig) -> bool {
    let next = ball.pos + ball.vel;
    let r = ball.radius;
    let mut hit = false;

    if next.x - r <= 0.0 || next.x + r >= config.canvas_width {
        ball.vel.x = -ball.vel.x;
        hit = true;
    }
    if next.y - r < config.playable_top() || next.y + r >= config.canvas_height {
        ball.vel.y = -ball.vel.y;
        hit = true;
    }
    hit
}

/// Move by one tick of velocity and record the trail
pub fn commit(ball: &mut Ball, config: &GameConfig) {
    ball.pos += ball.vel;
    ball.record_trail(config.trail_length);
}

/// Push the ball back inside the board after it grew
pub fn clamp_inside_bounds(ball: &mut Ball, config: &GameConfig) {
    let r = ball.radius;
    if ball.pos.y - r < config.playable_top() {
        ball.pos.y = config.playable_top() + r;
    }
    if ball.pos.y + r > config.canvas_height {
        ball.pos.y = config.canvas_height - r;
    }
    if ball.pos.x - r < 0.0 {
        ball.pos.x = r;
    }
    if ball.pos.x + r > config.canvas_width {
        ball.pos.x = config.canvas_width - r;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ball_at(x: f32, y: f32) -> Ball {
        Ball::new(Vec2::new(x, y), 10.0)
    }

    #[test]
    fn test_input_impulses_per_axis() {
        let config = GameConfig::default();
        let mut ball = ball_at(300.0, 300.0);
        let input = TickInput {
            right: true,
            up: true,
            ..Default::default()
        };
        apply_input(&mut ball, &input, &config);
        assert_eq!(ball.vel, Vec2::new(0.5, -0.5));

        // Opposite directions cancel
        let input = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        apply_input(&mut ball, &input, &config);
        assert_eq!(ball.vel, Vec2::new(0.5, -0.5));
    }

    #[test]
    fn test_stop_takes_precedence() {
        let config = GameConfig::default();
        let mut ball = ball_at(300.0, 300.0);
        ball.vel = Vec2::new(3.0, -2.0);
        let input = TickInput {
            stop: true,
            left: true,
            down: true,
            ..Default::default()
        };
        apply_input(&mut ball, &input, &config);
        assert_eq!(ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_damping() {
        let config = GameConfig::default();
        let mut ball = ball_at(300.0, 300.0);
        ball.vel = Vec2::new(10.0, -10.0);
        apply_damping(&mut ball, &config);
        assert!((ball.vel.x - 9.7).abs() < 1e-5);
        assert!((ball.vel.y + 9.7).abs() < 1e-5);
    }

    #[test]
    fn test_reflects_off_right_wall() {
        let config = GameConfig::default();
        let mut ball = ball_at(588.0, 200.0);
        ball.vel = Vec2::new(3.0, 0.0);
        assert!(reflect_off_bounds(&mut ball, &config));
        assert_eq!(ball.vel, Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_header_is_top_wall() {
        let config = GameConfig::default();
        let mut ball = ball_at(300.0, 31.0);
        ball.vel = Vec2::new(0.0, -2.0);
        assert!(reflect_off_bounds(&mut ball, &config));
        assert_eq!(ball.vel.y, 2.0);

        // Exactly touching the header is allowed
        let mut ball = ball_at(300.0, 32.0);
        ball.vel = Vec2::new(0.0, -2.0);
        assert!(!reflect_off_bounds(&mut ball, &config));
    }

    #[test]
    fn test_commit_moves_and_records() {
        let config = GameConfig::default();
        let mut ball = ball_at(100.0, 100.0);
        ball.vel = Vec2::new(1.5, -2.0);
        commit(&mut ball, &config);
        assert_eq!(ball.pos, Vec2::new(101.5, 98.0));
        assert_eq!(ball.trail.back(), Some(&Vec2::new(101.5, 98.0)));
    }

    proptest! {
        #[test]
        fn prop_grown_ball_clamped_inside(
            x in 0.0f32..=600.0,
            y in 20.0f32..=400.0,
        ) {
            let config = GameConfig::default();
            let mut ball = ball_at(x, y);
            ball.radius = config.ball_radius * config.powerup_size_multiplier;
            clamp_inside_bounds(&mut ball, &config);
            let r = ball.radius;
            prop_assert!(ball.pos.x - r >= 0.0);
            prop_assert!(ball.pos.x + r <= config.canvas_width);
            prop_assert!(ball.pos.y - r >= config.header_height);
            prop_assert!(ball.pos.y + r <= config.canvas_height);
        }
    }
}
