//! tuneline - terminal remote for MPRIS media players.
//!
//! Draws the selected player's status below the prompt and forwards keys
//! to it until Ctrl-C. Fatal errors are printed to stderr after the terminal
//! is restored and the process exits with status 1.

use std::{path::PathBuf, process};

use clap::Parser;
use tracing::info;
use tuneline::{
    app,
    config::{Config, LogLevel},
    tracing_config,
};

/// Command-line options. Each one overrides the matching config entry.
#[derive(Debug, Parser)]
#[command(name = "tuneline", version, about)]
struct Args {
    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log file verbosity
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// playerctl executable to run
    #[arg(long, value_name = "BIN")]
    playerctl: Option<String>,
}

impl Args {
    fn load_config(&self) -> tuneline::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        if let Some(level) = self.log_level {
            config.general.log_level = level;
        }
        if let Some(binary) = &self.playerctl {
            config.player.binary.clone_from(binary);
        }

        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args).await {
        eprintln!("tuneline: {e}");
        process::exit(1);
    }
}

async fn run(args: &Args) -> tuneline::Result<()> {
    let config = args.load_config()?;
    let _log_guard = tracing_config::init_with_file(config.general.log_level)?;
    info!(player = %config.player.binary, "Starting tuneline");

    app::run(config).await
}
