use crate::cli::GlobalArgs;
use crate::config::{Config, Overrides};
use crate::shell::Session;
use crate::storage::{
    init_project_config, load_config, locate_config, ConfigLocation, ConfigScope, FsNoteStore,
};
use crate::viewer::CommandViewer;
use anyhow::{Context, Result};
use std::env;
use std::io;
use std::path::Path;

/// Defaults plus command-line overrides; what `init` writes.
pub fn init_config(global: &GlobalArgs) -> Config {
    let mut config = Config::default();
    config.apply(&overrides(global));
    config
}

pub fn init(config: &Config) -> Result<()> {
    let cwd = env::current_dir()?;
    println!("{}", init_in(&cwd, config)?);
    Ok(())
}

fn init_in(dir: &Path, config: &Config) -> Result<String> {
    let (location, created) = init_project_config(dir, config)?;
    if created {
        log::info!("wrote {}", location.path.display());
        Ok(format!("Initialized config at {}", location.path.display()))
    } else {
        log::debug!("left {} untouched", location.path.display());
        Ok(format!("Config already exists at {}", location.path.display()))
    }
}

pub fn show_config(config: &Config, location: &ConfigLocation) -> Result<()> {
    let source = match location.scope {
        ConfigScope::Explicit => "explicit",
        ConfigScope::Project => "project",
        ConfigScope::Global => "global",
    };
    let found = if location.path.exists() { "" } else { ", not present" };
    println!("# {} ({}{})", location.path.display(), source, found);
    print!("{}", serde_yaml::to_string(config).context("serializing config")?);
    Ok(())
}

pub fn shell(config: &Config) -> Result<()> {
    let notes_dir = config.notes_dir_or(env::current_dir()?);
    log::info!("notes resolve against {}", notes_dir.display());
    let stdin = io::stdin();
    let mut session = Session::new(
        &config.root_name,
        stdin.lock(),
        io::stdout(),
        Box::new(CommandViewer::from_config(&config.viewer)),
        Box::new(FsNoteStore::new(notes_dir)),
        config.color,
    );
    session.run()?;
    let summary = session.teardown();
    log::info!(
        "session closed: dropped {} folder(s), {} note(s), {} task(s)",
        summary.folders,
        summary.notes,
        summary.tasks
    );
    Ok(())
}

/// Config file plus command-line overrides, and where the file was looked for.
pub fn load_effective_config(global: &GlobalArgs) -> Result<(Config, ConfigLocation)> {
    let cwd = env::current_dir()?;
    let location = locate_config(&cwd, global.config.as_deref())?;
    let mut config = load_config(&location)?;
    config.apply(&overrides(global));
    Ok((config, location))
}

fn overrides(global: &GlobalArgs) -> Overrides {
    Overrides {
        notes_dir: global.notes_dir.clone(),
        viewer: global.viewer.clone(),
        no_color: global.no_color,
        log_level: global.log_level.clone(),
    }
}
