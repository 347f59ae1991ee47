//! Floater Ball entry point
//!
//! Native builds run the engine headless against a simulated 60 Hz clock,
//! with an autopilot chasing the regular food. Handy for soak runs and for
//! eyeballing levels with `--ascii`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use glam::Vec2;

    use floater_ball::audio::LogSink;
    use floater_ball::input::Intent;
    use floater_ball::renderer::{AsciiRenderer, HeadlessRenderer, Renderer};
    use floater_ball::sim::GamePhase;
    use floater_ball::{FileStore, Game, GameConfig, HighScoreStore, MemoryStore};

    /// One display refresh at 60 Hz
    const FRAME: Duration = Duration::from_micros(16_667);

    #[derive(Parser, Debug)]
    #[command(about = "Run Floater Ball headless with an autopilot", version)]
    struct Args {
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,
        /// JSON file overriding game constants
        #[arg(long)]
        config: Option<PathBuf>,
        /// Where to keep the high score (in memory if omitted)
        #[arg(long)]
        high_score_file: Option<PathBuf>,
        /// Simulated seconds to run
        #[arg(long, default_value_t = 60)]
        seconds: u32,
        /// Print the board once per simulated second
        #[arg(long)]
        ascii: bool,
        /// Print the final state as JSON
        #[arg(long)]
        dump_state: bool,
    }

    /// -1, 0 or 1: which way to push one axis of velocity toward `desired`
    fn axis(vel: f32, desired: f32) -> i8 {
        if vel < desired - 0.2 {
            1
        } else if vel > desired + 0.2 {
            -1
        } else {
            0
        }
    }

    fn hold(game: &mut Game, intent: Intent, down: bool, now: Duration) {
        if down {
            game.press(intent, now);
        } else {
            game.release(intent);
        }
    }

    /// Steer toward the regular food, easing off as it gets close
    fn steer(game: &mut Game, now: Duration) {
        let state = game.state();
        let Some(target) = state.regular_food().map(|f| f.rect.center()) else {
            return;
        };
        let ball = &state.ball;
        let desired: Vec2 = ((target - ball.pos) * 0.05).clamp_length_max(3.0);
        let x = axis(ball.vel.x, desired.x);
        let y = axis(ball.vel.y, desired.y);

        hold(game, Intent::Right, x > 0, now);
        hold(game, Intent::Left, x < 0, now);
        hold(game, Intent::Down, y > 0, now);
        hold(game, Intent::Up, y < 0, now);
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        let config = match &args.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GameConfig::default(),
        };
        let seed = match args.seed {
            Some(seed) => seed,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
        };
        let store: Box<dyn HighScoreStore> = match &args.high_score_file {
            Some(path) => Box::new(FileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };

        let mut ascii = if args.ascii {
            let mut r = AsciiRenderer::new();
            r.attach(config.canvas_width as u32, config.canvas_height as u32)?;
            Some(r)
        } else {
            None
        };

        log::info!("Floater Ball (native) starting...");
        let mut game = Game::new(
            config,
            seed,
            Box::new(HeadlessRenderer::new()),
            store,
            Box::new(LogSink),
        )
        .context("initializing game")?;

        game.press(Intent::Continue, Duration::ZERO);
        let total_frames = args.seconds.saturating_mul(60);
        for frame in 0..total_frames {
            let now = FRAME * frame;
            match game.phase() {
                GamePhase::LevelTransition => game.press(Intent::Continue, now),
                GamePhase::GameOver { .. } => break,
                _ => {}
            }

            steer(&mut game, now);
            game.poll(now);
            game.on_frame(now);
            if game.is_halted() {
                bail!("frame loop halted at frame {frame}");
            }

            if let Some(r) = ascii.as_mut() {
                if frame % 60 == 0 {
                    r.draw(game.state())?;
                    println!("{}\n", r.frame());
                }
            }
        }

        let state = game.state();
        println!(
            "Finished in {:?}: level {}, score {}, high score {}",
            state.phase, state.level, state.score, state.high_score
        );
        if args.dump_state {
            println!("{}", serde_json::to_string_pretty(state)?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `floater_ball::Game` directly
}
