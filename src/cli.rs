use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "notemaker",
    version,
    about = "Topic folders for notes and a priority task list"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Read configuration from this file instead of searching for one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory note names are resolved against
    #[arg(long, global = true)]
    pub notes_dir: Option<PathBuf>,
    /// Program used to open notes
    #[arg(long, global = true)]
    pub viewer: Option<String>,
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
    /// Log filter, e.g. `info` or `debug` (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a project config in the current directory
    Init,
    /// Print the effective configuration
    Config,
    /// Run the interactive menu
    Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_shell_later() {
        let cli = Cli::try_parse_from(["notemaker"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.global.no_color);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "notemaker",
            "init",
            "--viewer",
            "nano",
            "--notes-dir",
            "notes",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Command::Init)));
        assert_eq!(cli.global.viewer.as_deref(), Some("nano"));
        assert_eq!(cli.global.notes_dir, Some(PathBuf::from("notes")));
    }
}
