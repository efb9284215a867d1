//! devstone — DEVStone benchmark harness.
//!
//! Builds one LI / HI / HO / HOmod tower, runs it to completion and prints
//! the transition counts against their closed forms, the time spent in each
//! phase and the resident memory at the end of the run.
//!
//! Run with:
//!   cargo run -p devstone --release -- -b HI -w 5 -d 4 -m 1

use anyhow::Result;
use clap::Parser;
use memory_stats::memory_stats;
use tracing::info;

use devs_devstone::{BenchKind, DevStoneParams, run_benchmark};
use devs_sim::{DispatchOrder, SimConfig};

const USAGE: &str = "devstone [-w width] [-d depth] [-m max_events] [-b {LI|HI|HO|HOmod}]\nwith w>=2, d>=2, m>=1";

#[derive(Parser)]
#[command(name = "devstone")]
#[command(about = "DEVStone benchmark for the devs simulation kernel", long_about = None)]
#[command(override_usage = USAGE)]
struct Cli {
    /// Atomic models per level, plus one
    #[arg(short = 'w', long, default_value_t = 5)]
    width: u32,

    /// Nested coupled levels
    #[arg(short = 'd', long, default_value_t = 4)]
    depth: u32,

    /// Events emitted by the generator
    #[arg(short = 'm', long = "max-events", default_value_t = 1)]
    max_events: u64,

    /// Benchmark structure
    #[arg(short = 'b', long = "bench", default_value_t = BenchKind::Hi)]
    kind: BenchKind,

    /// Delay before the first event and hold time after an external transition
    #[arg(long, default_value_t = 0.0)]
    preparation_time: f64,

    /// Gap between generator events
    #[arg(long, default_value_t = 1.0)]
    period: f64,

    /// Busy work per internal transition, in milliseconds
    #[arg(long, default_value_t = 0.0)]
    int_delay: f64,

    /// Busy work per external transition, in milliseconds
    #[arg(long, default_value_t = 0.0)]
    ext_delay: f64,

    /// Shuffle the dispatch order with this seed
    #[arg(long)]
    shuffle: Option<u64>,
}

/// Resident set size now, not the peak.
fn mem_mb() -> f64 {
    memory_stats()
        .map(|s| s.physical_mem as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => {
            e.print()?;
            return Ok(());
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let params = DevStoneParams {
        kind:             cli.kind,
        width:            cli.width,
        depth:            cli.depth,
        max_events:       cli.max_events,
        preparation_time: cli.preparation_time,
        period:           cli.period,
        int_delay_ms:     cli.int_delay,
        ext_delay_ms:     cli.ext_delay,
    };
    if let Err(e) = params.validate() {
        eprintln!("{e}");
        eprintln!("Usage: {USAGE}");
        std::process::exit(1);
    }

    let config = SimConfig {
        dispatch_order: cli.shuffle.map_or(DispatchOrder::Declaration, |seed| DispatchOrder::Shuffled { seed }),
        ..SimConfig::default()
    };

    info!(kind = %params.kind, width = params.width, depth = params.depth, "starting benchmark");
    let report = run_benchmark(&params, config)?;

    println!("STATS");
    println!("{report}");
    println!("Current memory (MB):     {:.1}", mem_mb());
    if !report.counts_match() {
        eprintln!("warning: transition counts differ from the closed form");
    }
    Ok(())
}
