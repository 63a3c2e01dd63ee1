mod commands;
mod logging;

use std::path::Path;
use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use starlog_core::{Dataset, PipelineEngine};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match starlog_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Process { from, to }) => {
            if let Err(err) = run_process(&config, from.as_deref(), to.as_deref()) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::MergeSnapshots) => {
            if let Err(err) = run_merge_snapshots(&config) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::Stats) => {
            if let Err(err) = run_stats(&config) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_process(
    config: &starlog_core::AppConfig,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = PipelineEngine::new(config.clone());
    if let Some(from) = from {
        engine = engine.with_window_start(starlog_core::calendar::parse_iso_date(from)?);
    }
    if let Some(to) = to {
        engine = engine.with_window_end(starlog_core::calendar::parse_iso_date(to)?);
    }
    let result = engine.run()?;

    println!();
    info!(
        "Merge: {}, Derive: {}, Detect: {}, Write: {}",
        format!("{:.2}s", result.merge_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.derive_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.detect_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.write_duration.as_secs_f64()).green(),
    );
    info!(
        "{} users ({} new), {} sessions, {} entries, {} files",
        format!("{}", result.users_total).cyan(),
        format!("{}", result.users_added).cyan(),
        format!("{}", result.sessions).cyan(),
        format!("{}", result.entries).cyan(),
        format!("{}", result.files).cyan(),
    );
    info!(
        "{} dates flagged as missing data",
        format!("{}", result.missing_dates).red(),
    );

    Ok(())
}

fn run_merge_snapshots(
    config: &starlog_core::AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = starlog_core::registry::merge_snapshot_dir(
        &config.registry_path(),
        Path::new(&config.users_csv_dir),
    )?;
    info!(
        "{} of {} snapshots merged, {} users added",
        outcome.snapshots_merged, outcome.snapshots_seen, outcome.users_added,
    );
    Ok(())
}

fn run_stats(config: &starlog_core::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::load(Path::new(&config.processed_file_dir))?;

    println!("users:         {}", dataset.users.len());
    println!("sessions:      {}", dataset.sessions.len());
    println!("entries:       {}", dataset.entries.len());
    println!("files:         {}", dataset.files.len());
    println!("missing dates: {}", dataset.missing_dates.len());
    match dataset.opt_in_fraction() {
        Some(frac) => println!("opt-in rate:   {:.1}%", frac * 100.0),
        None => println!("opt-in rate:   n/a (no consent entries)"),
    }

    Ok(())
}
