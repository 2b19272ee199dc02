mod app;
mod catalog;
mod catch;
mod config;
mod duel;
mod input;
mod legacy;
mod model;
mod render;
mod schedule;
mod sim;
mod sound;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs::OpenOptions, path::PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "A pocket virtual pet for the terminal")]
pub(crate) struct Cli {
    /// save file to use instead of the one in the data dir
    #[arg(long)]
    save: Option<PathBuf>,

    /// fixed RNG seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// discard the save and start from a new egg
    #[arg(long)]
    reset: bool,

    /// draw without color
    #[arg(long)]
    mono: bool,

    /// never ring the terminal bell
    #[arg(long)]
    no_bell: bool,

    /// log file (filter with RUST_LOG)
    #[arg(long)]
    log: Option<PathBuf>,
}

fn init_logging(path: &std::path::Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log {}", path.display()))?;
    // stdout belongs to the game screen, so logs go to a file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = config::project_paths()?;
    let log_path = cli.log.clone().unwrap_or_else(|| paths.log_path.clone());
    init_logging(&log_path)?;
    log::info!("pocketpet {} starting", env!("CARGO_PKG_VERSION"));
    app::run(cli, paths)
}
