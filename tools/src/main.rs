//! complexity-runner: headless runner for the simulation kernels.
//!
//! Usage:
//!   complexity-runner                         # every experiment, default parameters
//!   complexity-runner --config runs.json --db cache.db
//!   complexity-runner --seed 7 --only ising_2d --only sandpile --json

use anyhow::{Context, Result};
use complexity_core::{
    config::RunnerConfig, engine::SimEngine, report::ExperimentReport, store::SimStore,
};
use std::env;
use std::io::{self, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = config_from_args(&args)?;
    let json_mode = args.iter().any(|a| a == "--json");

    if !json_mode {
        println!("complexity-runner");
        println!("  seed:        {}", config.seed);
        println!("  db:          {}", config.db_path);
        println!("  experiments: {}", config.experiments.len());
        println!();
    }

    let store = SimStore::open(&config.db_path)?;
    store.migrate()?;

    let run_id = format!("run-{}-{}", config.seed, uuid::Uuid::new_v4().simple());
    store.insert_run(&run_id, config.seed, env!("CARGO_PKG_VERSION"))?;
    log::info!("Starting {run_id}");

    let engine = SimEngine::new(run_id.clone(), config.seed, store);
    let reports = engine.run_all(&config.experiments)?;

    if json_mode {
        let mut stdout = io::stdout();
        serde_json::to_writer(&mut stdout, &reports)?;
        writeln!(stdout)?;
    } else {
        print_summary(&run_id, &reports);
    }
    Ok(())
}

fn print_summary(run_id: &str, reports: &[ExperimentReport]) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id: {run_id}");
    for report in reports {
        println!("  {}", report.summary());
    }

    if let Some(ExperimentReport::Ising2d { susceptibility, .. }) = reports
        .iter()
        .rev()
        .find(|r| matches!(r, ExperimentReport::Ising2d { .. }))
    {
        println!();
        println!("=== SUSCEPTIBILITY CACHE ===");
        for rec in susceptibility {
            println!(
                "  beta={:.3} | chi={:.3} | size={} | nsteps={}",
                rec.beta, rec.susceptibility, rec.size, rec.nsteps
            );
        }
    }
}

/// `--config` (or the demo set), then `--seed`, `--db` and `--only` on top.
fn config_from_args(args: &[String]) -> Result<RunnerConfig> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => {
            RunnerConfig::load(path).with_context(|| format!("Cannot load config {path}"))?
        }
        None => RunnerConfig::default_demo(),
    };
    config.seed = parse_arg(args, "--seed", config.seed);
    if let Some(db) = flag_value(args, "--db") {
        config.db_path = db.to_string();
    }
    let only: Vec<String> = args
        .windows(2)
        .filter(|w| w[0] == "--only")
        .map(|w| w[1].clone())
        .collect();
    if !only.is_empty() {
        config.retain_named(&only)?;
    }
    Ok(config)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
