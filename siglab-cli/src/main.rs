//! SigLab CLI — inspect strategies, evaluate signals, sample search spaces.
//!
//! Commands:
//! - `list` — registered strategy modules with timeframe and stoploss
//! - `run` — evaluate a strategy's fixed rules over a CSV bar file
//! - `sweep` — draw random assignments from a strategy's declared spaces
//!   and evaluate them in parallel, ranked by entry count

mod load;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use siglab_core::params::Assignment;
use siglab_strategies::{all_strategies, find_hyperoptable, find_strategy};

use load::load_bars;

#[derive(Parser)]
#[command(name = "siglab", about = "SigLab CLI — signal-rule laboratory")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered strategy modules.
    List,
    /// Evaluate a strategy's fixed entry/exit rules over a CSV bar file.
    Run {
        /// Strategy name (see `list`).
        #[arg(long)]
        strategy: String,

        /// CSV bar file: timestamp,open,high,low,close,volume.
        #[arg(long)]
        bars: PathBuf,

        /// Write an annotated CSV (timestamp,close,entry,exit) here.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Randomly sample a strategy's search spaces and rank assignments.
    Sweep {
        /// Strategy name; must have a hyperopt surface.
        #[arg(long)]
        strategy: String,

        /// CSV bar file: timestamp,open,high,low,close,volume.
        #[arg(long)]
        bars: PathBuf,

        /// Number of assignments to draw.
        #[arg(long, default_value_t = 100)]
        samples: usize,

        /// RNG seed for reproducible draws.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// How many top assignments to print.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::List => cmd_list(),
        Commands::Run {
            strategy,
            bars,
            export,
        } => cmd_run(&strategy, &bars, export.as_deref()),
        Commands::Sweep {
            strategy,
            bars,
            samples,
            seed,
            top,
        } => cmd_sweep(&strategy, &bars, samples, seed, top),
    }
}

fn cmd_list() -> Result<()> {
    println!("{:<16} {:<6} {:>9}  hyperopt", "name", "tf", "stoploss");
    for strategy in all_strategies() {
        let hyperopt = if find_hyperoptable(strategy.name()).is_some() {
            "yes"
        } else {
            "no"
        };
        println!(
            "{:<16} {:<6} {:>9.3}  {hyperopt}",
            strategy.name(),
            strategy.timeframe(),
            strategy.stoploss(),
        );
    }
    Ok(())
}

fn cmd_run(name: &str, bars_path: &std::path::Path, export: Option<&std::path::Path>) -> Result<()> {
    let Some(strategy) = find_strategy(name) else {
        bail!("unknown strategy '{name}' (try `siglab list`)");
    };

    let bars = load_bars(bars_path).with_context(|| format!("loading {}", bars_path.display()))?;
    let rows = bars.len();
    let frame = strategy.populate_indicators(bars);
    let entry = strategy.entry_signal(&frame)?;
    let exit = strategy.exit_signal(&frame)?;

    println!(
        "{name}: {rows} bars, {} entry signals, {} exit signals",
        entry.count(),
        exit.count()
    );

    if let Some(path) = export {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        writer.write_record(["timestamp", "close", "entry", "exit"])?;
        for (i, bar) in frame.bars().iter().enumerate() {
            writer.write_record([
                bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                bar.close.to_string(),
                u8::from(entry.get(i)).to_string(),
                u8::from(exit.get(i)).to_string(),
            ])?;
        }
        writer.flush()?;
        println!("annotated bars written to {}", path.display());
    }
    Ok(())
}

struct SweepRow {
    entry_count: usize,
    exit_count: usize,
    entry: Assignment,
    exit: Assignment,
}

fn cmd_sweep(
    name: &str,
    bars_path: &std::path::Path,
    samples: usize,
    seed: u64,
    top: usize,
) -> Result<()> {
    let Some(strategy) = find_hyperoptable(name) else {
        bail!("strategy '{name}' has no hyperopt surface (try `siglab list`)");
    };

    let bars = load_bars(bars_path).with_context(|| format!("loading {}", bars_path.display()))?;
    let frame = strategy.populate_indicators(bars);

    // One deterministic RNG stream per sample index keeps draws reproducible
    // regardless of rayon's scheduling.
    let rows: Vec<SweepRow> = (0..samples)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            let entry = strategy.entry_space().sample(&mut rng);
            let exit = strategy.exit_space().sample(&mut rng);
            let entry_mask = strategy.entry_mask(&frame, &entry)?;
            let exit_mask = strategy.exit_mask(&frame, &exit)?;
            Ok(SweepRow {
                entry_count: entry_mask.count(),
                exit_count: exit_mask.count(),
                entry,
                exit,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut ranked = rows;
    ranked.sort_by(|a, b| b.entry_count.cmp(&a.entry_count));

    println!(
        "{name}: {samples} assignments over {} bars (seed {seed})",
        frame.len()
    );
    for (rank, row) in ranked.iter().take(top).enumerate() {
        println!(
            "#{:<3} entries={:<5} exits={:<5} entry={} exit={}",
            rank + 1,
            row.entry_count,
            row.exit_count,
            serde_json::to_string(&row.entry)?,
            serde_json::to_string(&row.exit)?,
        );
    }
    Ok(())
}
