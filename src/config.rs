use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub root_name: String,
    pub notes_dir: Option<PathBuf>,
    pub viewer: ViewerConfig,
    pub color: bool,
    pub log_level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ViewerConfig {
    pub program: String,
    /// Placed before the note path.
    pub args: Vec<String>,
    /// Block the menu until the viewer exits.
    pub wait: bool,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub notes_dir: Option<PathBuf>,
    pub viewer: Option<String>,
    pub no_color: bool,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root_name: "Root".into(),
            notes_dir: None,
            viewer: ViewerConfig::default(),
            color: true,
            log_level: "warn".into(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let program = if cfg!(windows) { "notepad" } else { "vi" };
        ViewerConfig {
            program: program.into(),
            args: Vec::new(),
            wait: true,
        }
    }
}

impl Config {
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(dir) = &overrides.notes_dir {
            self.notes_dir = Some(dir.clone());
        }
        if let Some(program) = &overrides.viewer {
            self.viewer.program = program.clone();
        }
        if overrides.no_color {
            self.color = false;
        }
        if let Some(level) = &overrides.log_level {
            self.log_level = level.clone();
        }
    }

    /// Directory note names are resolved against.
    pub fn notes_dir_or(&self, fallback: PathBuf) -> PathBuf {
        self.notes_dir.clone().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let config: Config = serde_yaml::from_str("viewer:\n  program: less\n").unwrap();
        assert_eq!(config.viewer.program, "less");
        assert!(config.viewer.wait);
        assert!(config.viewer.args.is_empty());
        assert_eq!(config.root_name, "Root");
        assert_eq!(config.log_level, "warn");
        assert!(config.color);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config: Config =
            serde_yaml::from_str("notes_dir: /tmp/a\ncolor: true\nlog_level: info\n").unwrap();
        config.apply(&Overrides {
            notes_dir: Some(PathBuf::from("/tmp/b")),
            viewer: Some("nano".into()),
            no_color: true,
            log_level: None,
        });
        assert_eq!(config.notes_dir, Some(PathBuf::from("/tmp/b")));
        assert_eq!(config.viewer.program, "nano");
        assert!(!config.color);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn notes_dir_falls_back_when_unset() {
        let config = Config::default();
        assert_eq!(
            config.notes_dir_or(PathBuf::from("here")),
            PathBuf::from("here")
        );
    }
}
