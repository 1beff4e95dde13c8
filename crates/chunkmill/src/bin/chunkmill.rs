//! # CHUNKMILL Runner
//!
//! Builds a world and ticks it forever (or `--ticks N` times), logging the
//! load time and the average tick time.
//!
//! ## Usage
//!
//! ```bash
//! chunkmill --config world.toml --ticks 10000 --report-every 1000
//! ```

use std::process::ExitCode;
use std::time::Instant;

use chunkmill::core::{World, WorldConfig, WorldError};
use chunkmill::TickLoop;
use tracing_subscriber::EnvFilter;

struct Args {
    config: Option<String>,
    ticks: Option<u64>,
    report_every: u64,
}

fn parse_args() -> Option<Args> {
    // Simple parsing, no external deps
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        config: None,
        ticks: None,
        report_every: 1000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--ticks" | "-n" => {
                if i + 1 < args.len() {
                    parsed.ticks = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--report-every" | "-r" => {
                if i + 1 < args.len() {
                    parsed.report_every = args[i + 1].parse().unwrap_or(1000).max(1);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: chunkmill [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>        World config TOML (default: built-in sizes)");
                println!("  -n, --ticks <N>            Stop after N ticks (default: run forever)");
                println!("  -r, --report-every <N>     Log average tick time every N ticks (default: 1000)");
                println!("  -h, --help                 Show this help");
                return None;
            }
            other => {
                tracing::warn!(argument = other, "ignoring unknown argument");
            }
        }
        i += 1;
    }

    Some(parsed)
}

fn run(args: &Args) -> Result<(), WorldError> {
    let config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };

    let mut world = World::with_config(config)?;

    tracing::info!("loading world...");
    let load_start = Instant::now();
    world.build_initial()?;
    tracing::info!(load_ms = load_start.elapsed().as_secs_f64() * 1000.0, "world loaded");

    let mut tick_loop = TickLoop::default();
    loop {
        if args.ticks.is_some_and(|limit| tick_loop.tick_count() >= limit) {
            break;
        }

        tick_loop.begin_tick();
        world.tick()?;
        let elapsed = tick_loop.end_tick();

        if tick_loop.tick_count() % args.report_every == 0 {
            let stats = tick_loop.stats();
            tracing::info!(
                tick = tick_loop.tick_count(),
                mean_ms = stats.mean_tick_us / 1000.0,
                max_us = stats.max_tick_us,
                late = stats.late_ticks,
                "tick timing"
            );
        }

        tick_loop.wait_remaining(elapsed);
    }

    let stats = tick_loop.stats();
    tracing::info!(
        ticks = stats.total_ticks,
        mean_ms = stats.mean_tick_us / 1000.0,
        min_us = stats.min_tick_us,
        max_us = stats.max_tick_us,
        late = stats.late_ticks,
        "run complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let Some(args) = parse_args() else {
        return ExitCode::SUCCESS;
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "chunkmill stopped");
            ExitCode::FAILURE
        }
    }
}
