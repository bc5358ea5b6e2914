use crate::config::ViewerConfig;
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// Opens a note for the user. The menu does not depend on the outcome.
pub trait Viewer {
    fn open(&mut self, path: &Path) -> Result<()>;

    /// Collects viewers that were started without waiting and have exited.
    fn poll(&mut self) {}
}

/// Runs an external program with the note path as its last argument.
#[derive(Debug)]
pub struct CommandViewer {
    program: String,
    args: Vec<String>,
    wait: bool,
    running: Vec<Child>,
}

impl CommandViewer {
    pub fn from_config(config: &ViewerConfig) -> Self {
        CommandViewer {
            program: config.program.clone(),
            args: config.args.clone(),
            wait: config.wait,
            running: Vec::new(),
        }
    }

    #[cfg(test)]
    fn running(&self) -> usize {
        self.running.len()
    }

    fn command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }
}

impl Viewer for CommandViewer {
    fn open(&mut self, path: &Path) -> Result<()> {
        log::debug!("launching {} for {}", self.program, path.display());
        let mut command = self.command(path);
        if !self.wait {
            let child = command
                .spawn()
                .with_context(|| format!("launching viewer `{}`", self.program))?;
            self.running.push(child);
            return Ok(());
        }
        let status = command
            .status()
            .with_context(|| format!("launching viewer `{}`", self.program))?;
        if !status.success() {
            bail!("viewer `{}` exited with {}", self.program, status);
        }
        Ok(())
    }

    fn poll(&mut self) {
        let program = &self.program;
        self.running.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                log::debug!("viewer `{}` finished with {}", program, status);
                false
            }
            Ok(None) => true,
            Err(err) => {
                log::warn!("could not check viewer `{}`: {}", program, err);
                false
            }
        });
    }
}
