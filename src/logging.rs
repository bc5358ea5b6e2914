use anyhow::{Context, Result};
use env_logger::{Builder, Env};

/// Installs the stderr logger. `RUST_LOG` overrides the configured level.
pub fn init_logging(level: &str) -> Result<()> {
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .try_init()
        .context("initializing logger")
}
