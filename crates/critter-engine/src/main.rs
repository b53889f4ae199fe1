//! Engine binary for the Critter simulation.
//!
//! This is the headless entry point: it loads configuration, resumes the
//! saved critter (or hatches a new one), and drives it through the
//! cadence scheduler until interrupted or out of ticks, then saves.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `critter-config.yaml` (or `CRITTER_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Restore the critter from its save file, or create a new one
//! 4. Build the clock, the scheduler, and the random source
//! 5. Run the loop until Ctrl-C or `engine.max_ticks`
//! 6. Save the snapshot

mod error;
mod log_observer;

use std::path::PathBuf;
use std::time::Duration;

use critter_core::config::{CritterConfig, LoggingConfig};
use critter_core::{Critter, ScaledClock, Scheduler, SystemClock, TimeSource, snapshot};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::log_observer::LogObserver;

/// Environment variable naming an alternative config file.
const CONFIG_PATH_ENV: &str = "CRITTER_CONFIG";

/// Default config file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "critter-config.yaml";

/// Why the run loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    /// Ctrl-C.
    Interrupted,
    /// `engine.max_ticks` iterations completed.
    MaxTicksReached,
}

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, the save file, or the shutdown
/// signal fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so the outcome is
    //    reported right after it is.
    let (config, config_source) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        config = %config_source.display(),
        tick_interval_ms = config.engine.tick_interval_ms,
        time_scale = config.engine.time_scale,
        max_ticks = config.engine.max_ticks,
        save_path = %config.engine.save_path.display(),
        "critter-engine starting"
    );

    // 3. Restore or hatch.
    let mut critter = match snapshot::load(&config.engine.save_path)? {
        Some(saved) => Critter::restore(saved, config.vitals.clone()),
        None => {
            let critter = Critter::new(config.vitals.clone());
            info!(id = %critter.id(), "New critter hatched");
            critter
        }
    };
    critter.add_observer(Box::new(LogObserver::new(critter.id())));

    // 4. Clock, scheduler, randomness.
    let clock = ScaledClock::new(SystemClock, config.engine.time_scale);
    let mut scheduler = Scheduler::new(&config.schedule);
    let mut rng = match config.engine.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    };

    // Offline time since the last save is integrated here, in bounded steps.
    let resume = critter.advance_to(clock.now());
    if resume.ledger.elapsed_minutes > 0.0 {
        info!(
            offline_minutes = resume.ledger.elapsed_minutes,
            stage = %critter.stage(),
            "Caught up on time away"
        );
    }

    // 5. Run.
    let (reason, ticks) = run(&config, &clock, &mut scheduler, &mut critter, &mut rng).await?;

    // 6. Save.
    snapshot::save(&config.engine.save_path, &critter.snapshot())?;
    let stats = critter.stats();
    info!(
        reason = ?reason,
        ticks,
        stage = %critter.stage(),
        behavior = ?critter.behavior(),
        age_days = critter.age(),
        hunger = stats.hunger,
        health = stats.health,
        "critter-engine shutdown complete"
    );

    Ok(())
}

/// Drive the scheduler on the configured interval until a stop condition.
async fn run(
    config: &CritterConfig,
    clock: &impl TimeSource,
    scheduler: &mut Scheduler,
    critter: &mut Critter,
    rng: &mut SmallRng,
) -> Result<(StopReason, u64), EngineError> {
    let mut interval =
        tokio::time::interval(Duration::from_millis(config.engine.tick_interval_ms.max(1)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut ticks: u64 = 0;
    loop {
        tokio::select! {
            signal = &mut shutdown => {
                signal.map_err(|source| EngineError::Signal { source })?;
                info!(ticks, "Interrupted, shutting down");
                return Ok((StopReason::Interrupted, ticks));
            }
            _ = interval.tick() => {
                let _ = scheduler.run_due(critter, clock.now(), rng);
                ticks = ticks.saturating_add(1);

                let max_ticks = config.engine.max_ticks;
                if max_ticks > 0 && ticks >= max_ticks {
                    info!(ticks, max_ticks, "Tick limit reached");
                    return Ok((StopReason::MaxTicksReached, ticks));
                }
            }
        }
    }
}

/// Load configuration from `CRITTER_CONFIG` or `critter-config.yaml`.
///
/// A missing file means defaults; a file that exists but does not parse
/// is an error.
fn load_config() -> Result<(CritterConfig, PathBuf), EngineError> {
    let path = std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = CritterConfig::from_file(&path)?;
        Ok((config, path))
    } else {
        let mut config = CritterConfig::default();
        config.engine.apply_env_overrides();
        Ok((config, PathBuf::from("<defaults>")))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&logging.level).unwrap_or_else(|e| {
            eprintln!("invalid log level {:?} ({e}), using info", logging.level);
            EnvFilter::new("info")
        })
    });

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
