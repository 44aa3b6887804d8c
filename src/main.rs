//! Flappy Axolotl entry point
//!
//! Natively: a headless runner for soak tests and debugging. The browser
//! host lives in the library (`flappy_axolotl::web`) so wasm builds of the
//! lib start it on load.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Result, bail};
    use clap::Parser;

    use flappy_axolotl::audio::ToneRecorder;
    use flappy_axolotl::consts::TICK_HZ;
    use flappy_axolotl::persistence::{FileStorage, MemoryStorage, Storage};
    use flappy_axolotl::sim::GameMode;
    use flappy_axolotl::{App, InputEvent, QualityPreset, Settings};

    /// Run Flappy Axolotl without a display
    #[derive(Parser, Debug)]
    #[command(name = "flappy-axolotl", version, about)]
    pub struct Args {
        /// RNG seed (random when omitted)
        #[arg(long)]
        pub seed: Option<u64>,

        /// Ticks to simulate (60 per second of game time)
        #[arg(long, default_value_t = 36_000)]
        pub ticks: u64,

        /// JSON file for best score, leaderboard and settings
        #[arg(long)]
        pub save: Option<PathBuf>,

        /// Grant a power-up when the first run starts (worm, slow, small, star)
        #[arg(long = "power-up")]
        pub power_up: Option<String>,

        /// Leave the player undriven; runs end quickly
        #[arg(long)]
        pub no_autopilot: bool,

        /// Store a graphics preset (low, medium, high)
        #[arg(long, value_parser = parse_quality)]
        pub quality: Option<QualityPreset>,

        /// Store muted audio
        #[arg(long)]
        pub mute: bool,
    }

    fn parse_quality(s: &str) -> Result<QualityPreset, String> {
        QualityPreset::parse(s).ok_or_else(|| format!("unknown quality '{s}' (expected low, medium or high)"))
    }

    /// Settings with the command-line overrides applied, if any were given
    pub fn settings_override(current: &Settings, args: &Args) -> Option<Settings> {
        if args.quality.is_none() && !args.mute {
            return None;
        }
        let mut settings = current.clone();
        if let Some(preset) = args.quality {
            settings.apply_preset(preset);
        }
        if args.mute {
            settings.muted = true;
        }
        Some(settings)
    }

    pub fn run(args: Args) -> Result<()> {
        match &args.save {
            Some(path) => simulate(FileStorage::open(path)?, &args),
            None => simulate(MemoryStorage::new(), &args),
        }
    }

    fn simulate<S: Storage>(storage: S, args: &Args) -> Result<()> {
        let seed = args.seed.unwrap_or_else(rand::random);
        log::info!("Headless run: seed {}, {} ticks", seed, args.ticks);

        let mut app = App::new(seed, storage, ToneRecorder::default());
        if let Some(settings) = settings_override(app.settings(), args) {
            log::info!("Quality {}, muted {}", settings.quality.as_str(), settings.muted);
            app.set_settings(settings);
        }
        app.set_autopilot(!args.no_autopilot);
        if let Some(tag) = &args.power_up {
            app.grant_power_up(tag);
        }

        let mut runs = 0u32;
        let mut bosses = 0u32;
        let mut previous = app.state().mode;
        for i in 0..args.ticks {
            let now_ms = i as f64 * 1000.0 / TICK_HZ as f64;
            let cycle_before = app.state().boss_cycle;
            // Without the autopilot nobody clicks through the menus
            if args.no_autopilot {
                match app.state().mode {
                    GameMode::Playing => {}
                    GameMode::NameEntry => app.handle_input(InputEvent::Confirm),
                    _ => app.handle_input(InputEvent::Activate),
                }
            }
            app.step(now_ms);

            let state = app.state();
            if let Err(violation) = state.validate_invariants() {
                bail!("invariant violated at tick {}: {:?}", i, violation);
            }
            if state.boss_cycle > cycle_before {
                bosses += 1;
            }
            if previous == GameMode::Playing && state.mode == GameMode::GameOver {
                runs += 1;
                log::info!("Run {} over at tick {}: score {}", runs, i, state.score);
            }
            previous = state.mode;
        }

        let state = app.state();
        log::info!(
            "Done: {} runs, {} bosses beaten, best {}, {} leaderboard entries, {} tones",
            runs,
            bosses,
            state.best_score,
            state.high_scores.len(),
            app.audio().played.len()
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run(headless::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is flappy_axolotl::web::start
}
