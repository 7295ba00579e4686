//! Asteroid Belt entry point
//!
//! The browser build is driven from JavaScript through `asteroid_belt::wasm`.
//! Natively this runs a headless session flown by the autopilot, which is
//! handy for soak-testing the simulation and the file store.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use asteroid_belt::autopilot::Autopilot;
    use asteroid_belt::persistence::{FileStore, StoreError};
    use asteroid_belt::sim::{GameEvent, GamePhase};
    use asteroid_belt::{QualityPreset, Session};
    use clap::Parser;

    fn parse_quality(value: &str) -> Result<QualityPreset, String> {
        QualityPreset::parse(value).ok_or_else(|| format!("unknown quality preset: {value}"))
    }

    #[derive(Parser, Debug)]
    #[command(name = "asteroid-belt", about = "Headless Asteroid Belt runner")]
    struct Args {
        /// Frames to simulate
        #[arg(long, default_value_t = 3_600)]
        frames: u32,

        /// Simulated milliseconds per frame
        #[arg(long, default_value_t = 16.67)]
        frame_ms: f64,

        /// RNG seed (entropy if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Quality preset (low, medium, high); saved with the settings
        #[arg(long, value_parser = parse_quality)]
        quality: Option<QualityPreset>,

        /// JSON file holding the high score and settings
        #[arg(long, default_value = "asteroid_belt.json")]
        store: PathBuf,
    }

    pub fn run() -> Result<(), StoreError> {
        env_logger::init();
        let args = Args::parse();
        log::info!("Asteroid Belt (headless) starting...");

        let store = FileStore::open(&args.store)?;
        let mut session = match args.seed {
            Some(seed) => Session::with_seed(store, seed),
            None => Session::new(store),
        };
        if let Some(quality) = args.quality {
            session.set_quality(quality);
        }
        let mut pilot = Autopilot::new();

        session.start(0.0);
        let mut frames_run = 0;
        for frame in 1..=args.frames {
            let input = pilot.steer(session.state());
            session.frame(f64::from(frame) * args.frame_ms, &input);
            frames_run = frame;

            for event in session.drain_events() {
                match event {
                    GameEvent::LevelCleared { level, .. } => {
                        log::info!("Frame {}: reached level {}", frame, level)
                    }
                    GameEvent::ShipDestroyed { lives_left, .. } => {
                        log::info!("Frame {}: ship lost, {} lives left", frame, lives_left)
                    }
                    _ => {}
                }
            }
            if session.state().phase == GamePhase::GameOver {
                break;
            }
        }

        let hud = session.hud();
        log::info!(
            "Finished after {} frames: score {}, level {}, lives {}, high score {} ({})",
            frames_run,
            hud.score,
            hud.level,
            hud.lives,
            hud.high_score,
            session.store().path().display()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), asteroid_belt::persistence::StoreError> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
