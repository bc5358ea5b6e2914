mod cli;
mod commands;
mod config;
mod logging;
mod model;
mod shell;
mod storage;
mod tree;
mod viewer;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.command.unwrap_or(cli::Command::Shell);
    if let cli::Command::Init = command {
        let config = commands::init_config(&args.global);
        logging::init_logging(&config.log_level)?;
        return commands::init(&config);
    }
    let (config, location) = commands::load_effective_config(&args.global)?;
    logging::init_logging(&config.log_level)?;
    log::debug!("config from {}", location.path.display());
    match command {
        cli::Command::Config => commands::show_config(&config, &location),
        _ => commands::shell(&config),
    }
}
