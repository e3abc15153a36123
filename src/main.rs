//! Hotshot host simulator.
//!
//! Runs an autonomous route against the in-memory robot model and logs
//! every completion the control core reports.
//!
//! ```text
//!   hotshot-sim --route red-left --config robot.json -v
//!
//!   ┌──────────┐  tick(now)  ┌─────────────┐  advance(dt)  ┌────────┐
//!   │  clock   │ ──────────▶ │    Robot    │ ────────────▶ │  Sim   │
//!   └──────────┘             └─────────────┘ ◀──────────── └────────┘
//!                                   │        encoders / ADC
//!                                   ▼
//!                             LogEventSink
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};

use hotshot::Robot;
use hotshot::adapters::log_sink::LogEventSink;
use hotshot::adapters::sim::{DEFAULT_CLICKS_PER_MS, SimHardware};
use hotshot::app::commands::RobotCommand;
use hotshot::auton::routes;
use hotshot::config::RobotConfig;

/// Play an autonomous route on the simulated robot.
#[derive(Parser, Debug)]
#[command(name = "hotshot-sim", version, long_about = None)]
struct Args {
    /// JSON robot configuration (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Route to run
    #[arg(short, long, default_value = "blue-left")]
    route: String,

    /// Give up after this many scheduler ticks
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,

    /// Encoder clicks per millisecond at full power
    #[arg(long, default_value_t = DEFAULT_CLICKS_PER_MS)]
    clicks_per_ms: f32,

    /// Print the effective configuration as JSON and exit
    #[arg(long, default_value_t = false)]
    print_config: bool,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<RobotConfig> {
    let Some(path) = path else {
        return Ok(RobotConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: RobotConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    // ── 1. Configuration ──────────────────────────────────────
    let config = load_config(args.config.as_ref())?;
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let Some(routine) = routes::by_name(&args.route) else {
        let known: Vec<_> = routes::ALL.iter().map(|r| r.name).collect();
        bail!("unknown route '{}' (known: {})", args.route, known.join(", "));
    };

    info!("hotshot-sim v{}", env!("CARGO_PKG_VERSION"));
    info!("Route '{}' ({} steps), tick {} ms", routine.name, routine.len(), config.tick_period_ms);

    // ── 2. Robot and simulated hardware ───────────────────────
    let mut hw = SimHardware::new(args.clicks_per_ms);
    let mut sink = LogEventSink::new();
    let mut robot = Robot::new(&config)?;

    let mut now_ms: u32 = 0;
    robot.reset(now_ms, &mut hw);
    robot.handle_command(RobotCommand::StartAutonomous(routine), now_ms, &mut hw);

    // ── 3. Scheduler loop ─────────────────────────────────────
    while robot.is_autonomous() {
        if robot.tick_count() >= args.max_ticks {
            warn!("Route '{}' still on state {} at tick limit", routine.name, robot.sequencer().current_state());
            bail!("route '{}' did not finish within {} ticks", routine.name, args.max_ticks);
        }
        robot.tick(now_ms, &mut hw, &mut sink);
        hw.advance(config.tick_period_ms);
        now_ms = now_ms.wrapping_add(config.tick_period_ms);
    }

    // ── 4. Summary ────────────────────────────────────────────
    let (drive, shooter, sensor) = sink.counts();
    info!(
        "Route '{}' finished at {} ms after {} ticks",
        routine.name,
        now_ms,
        robot.tick_count()
    );
    info!("Events: {} drive, {} shooter, {} sensor", drive, shooter, sensor);
    Ok(())
}
