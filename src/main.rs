mod config;
mod engine;
mod geo;
mod manager;
mod ode;
mod patients;
mod report;
mod seir;
mod stats;
mod weather;

use crate::manager::Manager;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// Scenario directory containing `config.toml`.
    #[arg(long)]
    sim_dir: PathBuf,

    /// Seed for the random number generator; omit for an OS-drawn seed.
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the SEIR model and expand the synthetic patient line-list.
    Outbreak,

    /// Synthesize the hourly monsoon weather records.
    Weather,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.sim_dir, args.seed).context("failed to construct mgr")?;

    match args.command {
        Command::Outbreak => mgr.run_outbreak()?,
        Command::Weather => mgr.run_weather()?,
    }

    Ok(())
}
