//! Tournament CLI
//!
//! Run a double-elimination tournament from a config file using the simulated
//! game player.

use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tournament::{CancelFlag, RunOutcome, SimulatedPlayer, TournamentConfig, TournamentDriver};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("ML-chess Tournament Runner");
    println!();
    println!("Usage:");
    println!("  tournament run <config.toml> [--json <path>] [--seed N]");
    println!("  tournament help");
    println!();
    println!("Options:");
    println!("  --json, -j    Also write the tournament summary as JSON");
    println!("  --seed, -s    Seed for shuffling the field (overrides the config)");
    println!();
    println!("Examples:");
    println!("  tournament run tournament.toml");
    println!("  RUST_LOG=debug tournament run tournament.toml --json summary.json");
}

fn run_tournament(args: &[String]) -> Result<()> {
    let Some(config_path) = args.first() else {
        print_usage();
        bail!("run requires a config file");
    };

    // Parse optional arguments
    let mut json_path: Option<PathBuf> = None;
    let mut seed: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--json" | "-j" => {
                if i + 1 < args.len() {
                    json_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--seed" | "-s" => {
                if i + 1 < args.len() {
                    seed = Some(
                        args[i + 1]
                            .parse()
                            .with_context(|| format!("invalid seed '{}'", args[i + 1]))?,
                    );
                    i += 1;
                }
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let mut config = TournamentConfig::load(Path::new(config_path))
        .with_context(|| format!("failed to load {}", config_path))?;
    if seed.is_some() {
        config.seed = seed;
    }
    let competitors = config.competitors.clone();
    let player = SimulatedPlayer::new(config.simulation.clone());

    println!("=== {} ===", config.name);
    println!(
        "Competitors: {}, Time limit: {}ms/move",
        competitors.len(),
        config.time_limit_ms
    );
    println!();

    let mut driver = TournamentDriver::new(config, player);
    driver.start(competitors)?;
    let outcome = driver.run(&CancelFlag::new())?;
    if outcome == RunOutcome::Cancelled {
        println!("Tournament cancelled");
    }

    let summary = driver.summary()?;
    summary.print_report();

    if let Some(path) = json_path {
        summary
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    match args[1].as_str() {
        "run" => run_tournament(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage();
            Ok(())
        }
    }
}
