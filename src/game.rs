//! Game loop driver
//!
//! [`Game`] owns the session state and every collaborator: renderer, high
//! score store, event sink and timers. The host feeds it time and input:
//!
//! - `on_frame(now)` on each display refresh while [`Game::wants_frame`]
//! - `poll(now)` whenever it likes (timers also get polled by `on_frame`)
//! - `press`/`release` for keys, `handle_command` for buttons
//! - `visibility_changed`/`focus_lost` for auto-pause

use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::EventSink;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::highscores::HighScoreStore;
use crate::input::{Intent, InputState};
use crate::renderer::Renderer;
use crate::scheduler::{OneShot, Timers};
use crate::sim::level::{self, bonus_scheduled, forbidden_scheduled};
use crate::sim::{FoodKind, GameEvent, GamePhase, GameState, place_food, tick};

/// Player or UI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the start screen
    Start,
    /// Fresh session from level 1
    Reset,
    Pause,
    Resume,
    TogglePause,
    /// Next level after a transition
    Continue,
    RequestExit,
    ConfirmExit,
    CancelExit,
}

/// A running game session
pub struct Game {
    config: GameConfig,
    state: GameState,
    input: InputState,
    timers: Timers,
    rng: Pcg32,
    renderer: Box<dyn Renderer>,
    store: Box<dyn HighScoreStore>,
    sink: Box<dyn EventSink>,
    /// Frame loop stopped after a fault
    halted: bool,
}

impl Game {
    /// Validate the config, attach the renderer and load the high score
    ///
    /// Fails if the config is unusable or there is no surface to draw on.
    /// A high score that cannot be read is logged and treated as 0.
    pub fn new(
        config: GameConfig,
        seed: u64,
        mut renderer: Box<dyn Renderer>,
        store: Box<dyn HighScoreStore>,
        sink: Box<dyn EventSink>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        renderer.attach(config.canvas_width as u32, config.canvas_height as u32)?;

        let mut state = GameState::new(&config);
        state.high_score = store.load_high_score().unwrap_or_else(|e| {
            log::warn!("Could not load high score: {e}");
            0
        });

        log::info!(
            "Game initialized with seed {} (high score {})",
            seed,
            state.high_score
        );

        let mut game = Self {
            config,
            state,
            input: InputState::new(),
            timers: Timers::new(),
            rng: Pcg32::seed_from_u64(seed),
            renderer,
            store,
            sink,
            halted: false,
        };
        game.render_once();
        Ok(game)
    }

    // === Accessors ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// The host should schedule another `on_frame`
    pub fn wants_frame(&self) -> bool {
        self.timers.wants_frame()
    }

    /// The frame loop stopped because of a simulation or draw fault
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    // === Commands ===

    pub fn handle_command(&mut self, command: Command, now: Duration) {
        match command {
            Command::Start => self.start(now),
            Command::Reset => self.reset(now),
            Command::Pause => self.pause(now),
            Command::Resume => self.resume(now),
            Command::TogglePause => self.toggle_pause(now),
            Command::Continue => self.continue_level(now),
            Command::RequestExit => self.request_exit(now),
            Command::ConfirmExit => self.confirm_exit(now),
            Command::CancelExit => self.cancel_exit(now),
        }
    }

    /// Leave the start screen and play level 1
    pub fn start(&mut self, now: Duration) {
        if self.state.phase != GamePhase::Ready {
            log::debug!("Start ignored in {:?}", self.state.phase);
            return;
        }
        self.begin_session(now);
    }

    /// Throw the session away and start over at level 1
    pub fn reset(&mut self, now: Duration) {
        self.timers.stop_all();
        self.begin_session(now);
    }

    fn begin_session(&mut self, now: Duration) {
        self.halted = false;
        level::start_session(&mut self.state, &self.config, &mut self.rng);
        log::info!("Game started");
        self.begin_level_timers(now);
        self.dispatch_events(now);
    }

    pub fn pause(&mut self, now: Duration) {
        if !level::pause(&mut self.state) {
            log::debug!("Pause ignored in {:?}", self.state.phase);
            return;
        }
        self.timers.suspend_all(now);
        log::info!("Game paused");
        self.render_once();
        self.dispatch_events(now);
    }

    pub fn resume(&mut self, now: Duration) {
        let GamePhase::Paused { .. } = self.state.phase else {
            log::debug!("Resume ignored in {:?}", self.state.phase);
            return;
        };
        if self.halted {
            log::debug!("Resume ignored: frame loop halted, reset to play again");
            return;
        }

        // A freeze with nothing left ends right here
        let freeze_left = matches!(
            self.timers.freeze,
            OneShot::Suspended { remaining } if !remaining.is_zero()
        );
        if freeze_left {
            self.timers.freeze.resume(now);
        } else {
            self.timers.freeze.cancel();
        }

        level::resume(&mut self.state, freeze_left);
        self.timers.resume_spawns(now);
        self.timers.request_frame();
        self.timers.arm_countdown(now, self.config.timer_interval());
        log::info!("Game resumed");
        self.dispatch_events(now);
    }

    pub fn toggle_pause(&mut self, now: Duration) {
        match self.state.phase {
            GamePhase::Paused { .. } => self.resume(now),
            _ => self.pause(now),
        }
    }

    /// Move on from a level transition
    pub fn continue_level(&mut self, now: Duration) {
        if !level::advance_level(&mut self.state, &self.config, &mut self.rng) {
            log::debug!("Continue ignored in {:?}", self.state.phase);
            return;
        }
        self.begin_level_timers(now);
        self.dispatch_events(now);
    }

    /// Pause and ask for confirmation before leaving to the menu
    pub fn request_exit(&mut self, now: Duration) {
        if !self.state.phase.is_live() || !self.timers.has_countdown() {
            log::debug!("Exit request ignored in {:?}", self.state.phase);
            return;
        }
        self.pause(now);
        self.state.exit_pending = true;
        self.render_once();
    }

    pub fn cancel_exit(&mut self, now: Duration) {
        if !self.state.exit_pending {
            return;
        }
        self.resume(now);
    }

    /// Abandon the run and return to the start screen
    pub fn confirm_exit(&mut self, now: Duration) {
        if !self.state.exit_pending {
            log::debug!("Exit confirm without a pending request");
            return;
        }
        self.timers.stop_all();
        if let Some(score) = self.record_high_score() {
            self.sink.on_event(&GameEvent::NewHighScore { score });
        }
        level::reset_session(&mut self.state, &self.config);
        log::info!("Exited to menu");
        self.render_once();
        self.dispatch_events(now);
    }

    // === Input ===

    pub fn press(&mut self, intent: Intent, now: Duration) {
        if self.input.press(intent) {
            return;
        }
        match intent {
            Intent::Pause => self.toggle_pause(now),
            Intent::Exit if self.state.exit_pending => self.cancel_exit(now),
            Intent::Exit => self.request_exit(now),
            Intent::Continue => match self.state.phase {
                GamePhase::Ready => self.start(now),
                GamePhase::Paused { .. } => self.resume(now),
                GamePhase::LevelTransition => self.continue_level(now),
                GamePhase::GameOver { .. } => self.reset(now),
                _ => {}
            },
            _ => {}
        }
    }

    pub fn release(&mut self, intent: Intent) {
        self.input.release(intent);
    }

    /// Host page visibility changed
    pub fn visibility_changed(&mut self, hidden: bool, now: Duration) {
        if hidden {
            self.auto_pause(now, "tab hidden");
        }
    }

    /// Host window lost focus; held keys will never see their release
    pub fn focus_lost(&mut self, now: Duration) {
        self.input.clear();
        self.auto_pause(now, "window blurred");
    }

    fn auto_pause(&mut self, now: Duration, why: &str) {
        if self.state.phase.is_live() && self.timers.has_countdown() {
            log::info!("Auto-paused ({why})");
            self.pause(now);
        }
    }

    // === Loop ===

    /// Fire whatever timers are due
    pub fn poll(&mut self, now: Duration) {
        let seconds = self.timers.poll_countdown(now);
        for _ in 0..seconds {
            if !self.state.phase.is_live() {
                break;
            }
            self.state.countdown_tick();
        }

        if self.timers.freeze.poll(now) {
            level::release_from_mine(&mut self.state);
            log::debug!("Freeze over");
        }

        for kind in self.timers.poll_spawns(now) {
            self.spawn_special(kind);
        }

        self.dispatch_events(now);
    }

    /// One display frame: timers, draw, then simulate
    ///
    /// Returns whether another frame is wanted. A draw or simulation error
    /// is logged and stops the loop.
    pub fn on_frame(&mut self, now: Duration) -> bool {
        if !self.timers.take_frame() {
            return false;
        }
        self.poll(now);
        if !self.state.phase.is_live() {
            return false;
        }

        if let Err(e) = self.step() {
            log::error!("Frame failed, stopping loop: {e}");
            self.halted = true;
            self.timers.stop_all();
            self.dispatch_events(now);
            return false;
        }
        self.dispatch_events(now);

        if self.state.phase.is_live() {
            self.timers.request_frame();
        }
        self.timers.wants_frame()
    }

    fn step(&mut self) -> Result<(), GameError> {
        self.renderer.draw(&self.state)?;
        let input = self.input.snapshot();
        tick(&mut self.state, &input, &self.config, &mut self.rng)?;
        Ok(())
    }

    fn spawn_special(&mut self, kind: FoodKind) {
        if !self.state.phase.is_live() {
            return;
        }
        match place_food(&mut self.state, &self.config, &mut self.rng, kind) {
            Ok(()) => log::debug!("{kind:?} food spawned"),
            Err(e) => log::debug!("{kind:?} food skipped: {e}"),
        }
    }

    fn begin_level_timers(&mut self, now: Duration) {
        self.timers.stop_all();
        self.timers.request_frame();
        self.timers.arm_countdown(now, self.config.timer_interval());

        let delay = self.config.special_spawn_delay();
        if bonus_scheduled(self.state.level) {
            self.timers.arm_spawn(FoodKind::Bonus, now, delay);
        }
        if forbidden_scheduled(self.state.level) {
            self.timers.arm_spawn(FoodKind::Forbidden, now, delay);
        }
    }

    /// Route simulation events to timers and the sink
    fn dispatch_events(&mut self, now: Duration) {
        let mut queue: VecDeque<GameEvent> = self.state.drain_events().into();
        while let Some(event) = queue.pop_front() {
            match event {
                GameEvent::WallHit => {
                    if !self
                        .timers
                        .try_wall_hit(now, self.config.wall_hit_cooldown())
                    {
                        continue;
                    }
                }
                GameEvent::StuckInMine => {
                    self.timers
                        .freeze
                        .arm(now, self.config.sticky_mine_duration());
                }
                GameEvent::LevelCleared { .. } => {
                    self.timers.stop_all();
                    self.render_once();
                }
                GameEvent::GameOver { .. } => {
                    self.timers.stop_all();
                    if let Some(score) = self.record_high_score() {
                        queue.push_front(GameEvent::NewHighScore { score });
                    }
                    self.render_once();
                }
                _ => {}
            }
            self.sink.on_event(&event);
        }
    }

    /// Persist the score if it beats the high score
    fn record_high_score(&mut self) -> Option<u64> {
        let score = self.state.score;
        if score <= self.state.high_score {
            return None;
        }
        self.state.high_score = score;
        if let Err(e) = self.store.save_high_score(score) {
            log::warn!("Could not save high score: {e}");
        }
        log::info!("New high score: {score}");
        Some(score)
    }

    fn render_once(&mut self) {
        if let Err(e) = self.renderer.draw(&self.state) {
            log::error!("Render failed: {e}");
        }
    }
}
