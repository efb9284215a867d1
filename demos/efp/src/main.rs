//! efp — generator / processor / transducer scenario.
//!
//! Jobs arrive every `period`; the processor needs `3 × period` per job and
//! drops whatever arrives while it is busy.  After `observation` time units
//! the transducer reports throughput and turnaround and stops the generator.
//!
//! Run with:
//!   cargo run -p efp -- --period 1 --observation 100 --trace output/efp

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use devs_efp::{Transducer, build_gpt};
use devs_output::{CsvWriter, TraceObserver};
use devs_sim::{Coordinator, DispatchOrder, SimConfig, SimStats};

#[derive(Parser)]
#[command(name = "efp")]
#[command(about = "Experimental frame / processor scenario", long_about = None)]
struct Cli {
    /// Time between generated jobs
    #[arg(short, long, default_value_t = 1.0)]
    period: f64,

    /// Length of the transducer's observation window
    #[arg(short, long, default_value_t = 100.0)]
    observation: f64,

    /// Write transitions.csv and cycles.csv into this directory
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Shuffle the dispatch order with this seed
    #[arg(long)]
    shuffle: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    if !(cli.period > 0.0 && cli.observation >= 0.0) {
        anyhow::bail!("period must be > 0 and observation >= 0");
    }

    println!("=== efp — generator / processor / transducer ===");
    println!("Period: {}  |  Observation: {}", cli.period, cli.observation);
    println!();

    let config = SimConfig {
        dispatch_order: cli.shuffle.map_or(DispatchOrder::Declaration, |seed| DispatchOrder::Shuffled { seed }),
        ..SimConfig::default()
    };

    let gpt = build_gpt(cli.period, cli.observation)?;
    let t0 = Instant::now();
    let (report, stats) = match &cli.trace {
        None => gpt.run(config)?,
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let transducer = gpt.transducer;
            let mut obs = TraceObserver::new(CsvWriter::new(dir)?);
            let mut coord = Coordinator::with_config(gpt.tree, config)?;
            coord.initialize_with(&mut obs)?;
            let stats = coord.simulate_with(f64::INFINITY, &mut obs)?;
            coord.exit()?;
            if let Some(e) = obs.take_error() {
                eprintln!("output error: {e}");
            }
            let report = coord
                .tree()
                .atomic::<Transducer>(transducer)
                .map(|t| t.report().copied().unwrap_or_else(|| t.snapshot()))
                .unwrap_or_default();
            println!("Trace written to {}", dir.display());
            (report, stats)
        }
    };
    let elapsed = t0.elapsed();

    println!("Simulation complete in {:.3} ms", elapsed.as_secs_f64() * 1_000.0);
    println!();
    println!("{:<22} {}", "End time", report.end_time);
    println!("{:<22} {}", "Jobs arrived", report.jobs_arrived);
    println!("{:<22} {}", "Jobs solved", report.jobs_solved);
    println!("{:<22} {:.4}", "Avg turnaround", report.avg_turnaround);
    println!("{:<22} {:.4}", "Throughput", report.throughput);
    println!();
    print_stats(&stats);
    Ok(())
}

fn print_stats(stats: &SimStats) {
    let t = &stats.totals;
    println!("{:<22} {}", "Cycles", stats.cycles);
    println!("{:<22} {}", "Internal", t.internal);
    println!("{:<22} {}", "External", t.external);
    println!("{:<22} {}", "Confluent", t.confluent);
    println!("{:<22} {} delivered, {} dropped", "Values", stats.delivered, stats.dropped);
}
