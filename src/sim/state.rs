//! Game state and core simulation types
//!
//! Everything the renderer needs to draw a frame lives in [`GameState`].

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::config::GameConfig;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Level timer ran out without a single collection
    NoPointsScored,
    /// Ball touched forbidden food
    ForbiddenFruit,
    /// Final level finished with points on the board
    AllLevelsCleared,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing simulated yet
    Ready,
    /// Active gameplay
    Running,
    /// Game is paused; `stuck` remembers an interrupted mine freeze
    Paused { stuck: bool },
    /// Level finished, waiting for the player to continue
    LevelTransition,
    /// Ball frozen by a sticky mine; the clock keeps running
    StuckInMine,
    /// Run ended
    GameOver { reason: GameOverReason },
}

impl GamePhase {
    /// Phases in which the frame loop and countdown run
    pub fn is_live(&self) -> bool {
        matches!(self, GamePhase::Running | GamePhase::StuckInMine)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GamePhase::GameOver { .. })
    }
}

/// The player's ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Past positions, oldest first
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            trail: VecDeque::new(),
        }
    }

    /// Append current position to the trail, evicting the oldest entries
    pub fn record_trail(&mut self, capacity: usize) {
        self.trail.push_back(self.pos);
        while self.trail.len() > capacity {
            self.trail.pop_front();
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

/// Food categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    /// +1, exactly one on the board while a level is live
    Regular,
    /// +10, appears a few seconds into level 2+
    Bonus,
    /// Doubles the ball radius for the rest of the level
    Powerup,
    /// +5, several may be on the board at once
    Green,
    /// Instant game over
    Forbidden,
    /// Freezes the ball for a while
    StickyMine,
}

impl FoodKind {
    /// Order in which categories are checked against the ball each tick
    pub const COLLISION_ORDER: [FoodKind; 6] = [
        FoodKind::Regular,
        FoodKind::Bonus,
        FoodKind::Powerup,
        FoodKind::Green,
        FoodKind::Forbidden,
        FoodKind::StickyMine,
    ];

    /// At most one instance of these kinds is active
    pub fn is_unique(&self) -> bool {
        matches!(
            self,
            FoodKind::Regular | FoodKind::Bonus | FoodKind::Powerup | FoodKind::Forbidden
        )
    }
}

/// A food (or mine) on the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub kind: FoodKind,
    pub rect: Rect,
}

/// Floating "+N" label shown where something was collected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePopup {
    pub pos: Vec2,
    pub text: String,
    /// Remaining ticks
    pub life: u32,
    /// 1.0 when spawned, fades to 0
    pub alpha: f32,
}

/// Signals for audio/visual collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    AteRegular,
    AteBonus,
    AtePowerup,
    AteGreen,
    ForbiddenDeath,
    StuckInMine,
    WallHit,
    ObstacleHit,
    LevelStarted { level: u32 },
    LevelCleared { level: u32 },
    GameOver { reason: GameOverReason },
    Paused,
    Resumed,
    NewHighScore { score: u64 },
}

impl GameEvent {
    /// Stable name for collaborators that key on strings
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::AteRegular => "ate-regular",
            GameEvent::AteBonus => "ate-bonus",
            GameEvent::AtePowerup => "ate-powerup",
            GameEvent::AteGreen => "ate-green",
            GameEvent::ForbiddenDeath => "forbidden-death",
            GameEvent::StuckInMine => "sticky-mine",
            GameEvent::WallHit => "wall-hit",
            GameEvent::ObstacleHit => "obstacle-hit",
            GameEvent::LevelStarted { .. } => "level-started",
            GameEvent::LevelCleared { .. } => "level-cleared",
            GameEvent::GameOver { .. } => "game-over",
            GameEvent::Paused => "paused",
            GameEvent::Resumed => "resumed",
            GameEvent::NewHighScore { .. } => "new-high-score",
        }
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    /// Seconds left on the level clock
    pub time_left: u32,
    /// Collections made during the current level
    pub level_score_count: u32,
    pub high_score: u64,
    pub phase: GamePhase,
    pub ball: Ball,
    /// Ball is enlarged until the level ends
    pub powerup_active: bool,
    /// Powerup food already had its chance to appear this level
    pub powerup_rolled: bool,
    /// Obstacles in creation order
    pub obstacles: Vec<Rect>,
    pub foods: Vec<Food>,
    pub popups: Vec<ScorePopup>,
    /// Exit confirmation is showing
    pub exit_pending: bool,
    /// Events raised since the driver last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh session on the start screen
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            level: config.initial_level,
            time_left: config.initial_time,
            level_score_count: 0,
            high_score: 0,
            phase: GamePhase::Ready,
            ball: Ball::new(
                Vec2::new(config.ball_spawn_x, config.ball_spawn_y),
                config.ball_radius,
            ),
            powerup_active: false,
            powerup_rolled: false,
            obstacles: Vec::new(),
            foods: Vec::new(),
            popups: Vec::new(),
            exit_pending: false,
            events: Vec::new(),
        }
    }

    /// The regular food, if one is on the board
    pub fn regular_food(&self) -> Option<&Food> {
        self.foods.iter().find(|f| f.kind == FoodKind::Regular)
    }

    pub fn has_food(&self, kind: FoodKind) -> bool {
        self.foods.iter().any(|f| f.kind == kind)
    }

    pub fn food_count(&self, kind: FoodKind) -> usize {
        self.foods.iter().filter(|f| f.kind == kind).count()
    }

    pub fn remove_food_kind(&mut self, kind: FoodKind) {
        self.foods.retain(|f| f.kind != kind);
    }

    /// Drop every food, mine and obstacle (level boundaries)
    pub fn clear_board(&mut self) {
        self.obstacles.clear();
        self.foods.clear();
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a floating label at `pos`
    pub fn add_popup(&mut self, pos: Vec2, text: impl Into<String>, config: &GameConfig) {
        self.popups.push(ScorePopup {
            pos,
            text: text.into(),
            life: config.popup_duration,
            alpha: 1.0,
        });
    }

    /// Rise and fade popups, dropping expired ones
    pub fn update_popups(&mut self, config: &GameConfig) {
        let duration = config.popup_duration.max(1) as f32;
        for popup in &mut self.popups {
            popup.pos.y -= config.popup_rise_speed;
            popup.life = popup.life.saturating_sub(1);
            popup.alpha = popup.life as f32 / duration;
        }
        self.popups.retain(|p| p.life > 0);
    }

    /// One second off the level clock (never below zero)
    pub fn countdown_tick(&mut self) {
        self.time_left = self.time_left.saturating_sub(1);
    }
}
