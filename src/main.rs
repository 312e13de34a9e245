//! Fillgate — host driver.
//!
//! Runs the storage-threshold controller against a JSON-described grid.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimulatedGrid       LogEventSink   JsonConfigStore            │
//! │  (Sensor+Actuator)   (EventSink)    (ConfigPort)               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            MonitorService (pure logic)                 │    │
//! │  │  aggregate · decide · dispatch · RetryController       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (base clock, management + fast cadences)            │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `fillgate <config.json> <grid.json> [--once] [--refresh]`
//!
//! - `--once` runs a single decision cycle, drives fast ticks until any
//!   retry settles, then exits.
//! - `--refresh` passes the `refresh` argument to the first invocation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{info, warn};

use fillgate::adapters::config_file::JsonConfigStore;
use fillgate::adapters::grid::{GridSpec, SimulatedGrid};
use fillgate::adapters::log_sink::LogEventSink;
use fillgate::adapters::logger;
use fillgate::app::commands::{Cadence, REFRESH_ARGUMENT, Trigger};
use fillgate::app::ports::{ConfigError, ConfigPort};
use fillgate::app::service::MonitorService;
use fillgate::config::MonitorConfig;
use fillgate::fsm::Phase;
use fillgate::scheduler::Scheduler;

/// Storage-threshold controller for remote actuators.
#[derive(Debug, Parser)]
#[command(name = "fillgate")]
#[command(about = "Suspend or resume actuators when tagged storage crosses a fill threshold")]
struct Args {
    /// Controller configuration (JSON). Defaults are used if the file is missing.
    config: PathBuf,

    /// Grid description (JSON): sensors and actuators. Re-read on every
    /// management tick.
    grid: PathBuf,

    /// Run a single decision cycle, settle any retry, then exit.
    #[arg(long)]
    once: bool,

    /// Force an immediate resample on the first invocation.
    #[arg(long)]
    refresh: bool,
}

fn load_config(store: &JsonConfigStore) -> Result<MonitorConfig> {
    match store.load() {
        Ok(cfg) => {
            info!("Config loaded from {}", store.path().display());
            Ok(cfg)
        }
        Err(ConfigError::NotFound) => {
            warn!("No config at {}, using defaults", store.path().display());
            Ok(MonitorConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("loading {}", store.path().display())),
    }
}

fn read_grid(path: &Path) -> Result<GridSpec> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    GridSpec::from_json(&text).with_context(|| format!("decoding {}", path.display()))
}

/// Re-read the grid description; a bad read keeps the previous grid.
fn reload_grid(grid: &mut SimulatedGrid, path: &Path) {
    match read_grid(path) {
        Ok(spec) => grid.reload(spec),
        Err(e) => warn!("Grid reload failed ({:#}), keeping previous state", e),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ── 1. Logging ────────────────────────────────────────────
    logger::init().map_err(|e| anyhow!("installing logger: {e}"))?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Fillgate v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let store = JsonConfigStore::new(&args.config);
    let config = load_config(&store)?;
    config.validate().context("validating config")?;

    // ── 3. Adapters ───────────────────────────────────────────
    let mut grid = SimulatedGrid::from_spec(read_grid(&args.grid)?);
    let mut sink = LogEventSink::new(&config.sensor_tag);
    let mut sched = Scheduler::from_config(&config);

    // ── 4. Service ────────────────────────────────────────────
    let mut app = MonitorService::new(config);
    app.start(&mut sink);

    let first_argument = if args.refresh { REFRESH_ARGUMENT } else { "" };
    let first = Trigger::from_invocation(Cadence::Management, first_argument);
    app.handle(first, &mut grid, &mut sched, &mut sink);

    if args.once {
        while app.phase() == Phase::RetryPending {
            app.handle(Trigger::Fast, &mut grid, &mut sched, &mut sink);
        }
        info!(
            "Done: {} attempts, last decision {:?}",
            app.attempts_total(),
            app.last_decision()
        );
        return Ok(());
    }

    // ── 5. Event loop ─────────────────────────────────────────
    info!("Entering event loop.");
    let period = sched.base_period();
    loop {
        std::thread::sleep(period);

        for cadence in sched.tick() {
            if cadence == Cadence::Management {
                reload_grid(&mut grid, &args.grid);
            }
            let trigger = Trigger::from_invocation(cadence, "");
            app.handle(trigger, &mut grid, &mut sched, &mut sink);
        }
    }
}
