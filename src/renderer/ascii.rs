//! Terminal renderer
//!
//! Draws the board as a character grid, one cell per 10x20 pixels. Used by
//! the native binary and handy when eyeballing test failures.

use std::fmt::Write as _;

use glam::Vec2;

use super::Renderer;
use crate::error::RenderError;
use crate::sim::{FoodKind, GamePhase, GameState, Rect};

const CELL_WIDTH: u32 = 10;
const CELL_HEIGHT: u32 = 20;

fn food_glyph(kind: FoodKind) -> char {
    match kind {
        FoodKind::Regular => 'o',
        FoodKind::Bonus => '$',
        FoodKind::Powerup => '+',
        FoodKind::Green => 'g',
        FoodKind::Forbidden => 'x',
        FoodKind::StickyMine => '*',
    }
}

/// Character-grid renderer; the last frame is kept as a string
#[derive(Debug, Clone, Default)]
pub struct AsciiRenderer {
    cols: usize,
    rows: usize,
    attached: bool,
    frame: String,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently drawn frame
    pub fn frame(&self) -> &str {
        &self.frame
    }

    fn cell_of(&self, p: Vec2) -> Option<(usize, usize)> {
        if !p.is_finite() || p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let col = (p.x / CELL_WIDTH as f32) as usize;
        let row = (p.y / CELL_HEIGHT as f32) as usize;
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    fn fill(&self, grid: &mut [Vec<char>], rect: &Rect, glyph: char) {
        let Some((c0, r0)) = self.cell_of(rect.pos) else {
            return;
        };
        let max = rect.max();
        let c1 = ((max.x / CELL_WIDTH as f32).ceil() as usize).clamp(c0 + 1, self.cols);
        let r1 = ((max.y / CELL_HEIGHT as f32).ceil() as usize).clamp(r0 + 1, self.rows);
        for row in grid.iter_mut().take(r1).skip(r0) {
            for cell in row.iter_mut().take(c1).skip(c0) {
                *cell = glyph;
            }
        }
    }

    fn plot(&self, grid: &mut [Vec<char>], p: Vec2, glyph: char) {
        if let Some((col, row)) = self.cell_of(p) {
            grid[row][col] = glyph;
        }
    }
}

impl Renderer for AsciiRenderer {
    fn attach(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::NoSurface);
        }
        self.cols = width.div_ceil(CELL_WIDTH) as usize;
        self.rows = height.div_ceil(CELL_HEIGHT) as usize;
        self.attached = true;
        log::debug!("ASCII surface {}x{} cells", self.cols, self.rows);
        Ok(())
    }

    fn draw(&mut self, state: &GameState) -> Result<(), RenderError> {
        if !self.attached {
            return Err(RenderError::NoSurface);
        }
        let mut grid = vec![vec![' '; self.cols]; self.rows];

        for obstacle in &state.obstacles {
            self.fill(&mut grid, obstacle, '#');
        }
        for food in &state.foods {
            self.fill(&mut grid, &food.rect, food_glyph(food.kind));
        }
        for p in &state.ball.trail {
            self.plot(&mut grid, *p, '.');
        }
        self.plot(&mut grid, state.ball.pos, '@');

        let status = match state.phase {
            GamePhase::Ready => "Press space to start".to_string(),
            GamePhase::Running => String::new(),
            GamePhase::Paused { .. } if state.exit_pending => "Exit to menu? (y/n)".to_string(),
            GamePhase::Paused { .. } => "PAUSED".to_string(),
            GamePhase::LevelTransition => {
                format!("Level {} complete! Press space", state.level)
            }
            GamePhase::StuckInMine => "Stuck!".to_string(),
            GamePhase::GameOver { reason } => format!("GAME OVER ({reason:?})"),
        };

        let mut frame = String::with_capacity((self.cols + 1) * (self.rows + 3));
        let _ = writeln!(
            frame,
            "Score: {}  Level: {}  Time: {}  High: {}",
            state.score, state.level, state.time_left, state.high_score
        );
        let border = "-".repeat(self.cols);
        let _ = writeln!(frame, "+{border}+");
        // Row 0 sits under the header band
        for row in grid.iter().skip(1) {
            frame.push('|');
            frame.extend(row.iter());
            frame.push_str("|\n");
        }
        let _ = writeln!(frame, "+{border}+");
        frame.push_str(&status);
        self.frame = frame;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::Food;

    #[test]
    fn test_zero_surface_is_rejected() {
        let mut r = AsciiRenderer::new();
        assert!(matches!(r.attach(0, 400), Err(RenderError::NoSurface)));
        let state = GameState::new(&GameConfig::default());
        assert!(matches!(r.draw(&state), Err(RenderError::NoSurface)));
    }

    #[test]
    fn test_draws_ball_and_food() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.foods.push(Food {
            kind: FoodKind::Regular,
            rect: Rect::new(100.0, 100.0, 20.0, 20.0),
        });
        state.obstacles.push(Rect::new(400.0, 200.0, 40.0, 20.0));

        let mut r = AsciiRenderer::new();
        r.attach(600, 400).unwrap();
        r.draw(&state).unwrap();

        let frame = r.frame();
        assert!(frame.starts_with("Score: 0  Level: 1  Time: 20  High: 0"));
        assert_eq!(frame.matches('@').count(), 1);
        assert!(frame.contains("oo"));
        assert!(frame.contains("####"));
        assert!(frame.ends_with("Press space to start"));
    }
}
