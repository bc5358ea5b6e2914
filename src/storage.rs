use crate::config::Config;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const PROJECT_CONFIG: &str = ".notemaker/config.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Explicit,
    Project,
    Global,
}

#[derive(Debug, Clone)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub scope: ConfigScope,
}

/// Filesystem side of notes: where a note name lives and how it is removed.
pub trait NoteStore {
    fn resolve(&self, name: &str) -> PathBuf;
    fn remove(&self, name: &str) -> io::Result<()>;
}

/// Notes are plain files under a base directory.
#[derive(Debug, Clone)]
pub struct FsNoteStore {
    root: PathBuf,
}

impl FsNoteStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsNoteStore { root: root.into() }
    }
}

impl NoteStore for FsNoteStore {
    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.resolve(name))
    }
}

/// Writes a project config under `dir` unless one is already there. The flag
/// tells whether a file was written.
pub fn init_project_config(dir: &Path, config: &Config) -> Result<(ConfigLocation, bool)> {
    let location = ConfigLocation {
        path: dir.join(PROJECT_CONFIG),
        scope: ConfigScope::Project,
    };
    if location.path.exists() {
        return Ok((location, false));
    }
    save_config(&location, config)?;
    Ok((location, true))
}

pub fn locate_config(start: &Path, explicit: Option<&Path>) -> Result<ConfigLocation> {
    if let Some(path) = explicit {
        return Ok(ConfigLocation {
            path: path.to_path_buf(),
            scope: ConfigScope::Explicit,
        });
    }
    if let Some(project_path) = find_project_config(start) {
        return Ok(ConfigLocation {
            path: project_path,
            scope: ConfigScope::Project,
        });
    }
    Ok(ConfigLocation {
        path: global_config_path()?,
        scope: ConfigScope::Global,
    })
}

/// A missing file means defaults, except when the path was given explicitly.
pub fn load_config(location: &ConfigLocation) -> Result<Config> {
    if !location.path.exists() && location.scope != ConfigScope::Explicit {
        return Ok(Config::default());
    }
    let data = fs::read_to_string(&location.path)
        .with_context(|| format!("reading {:?}", location.path))?;
    if data.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(&data).context("parsing config file")?;
    Ok(config)
}

pub fn save_config(location: &ConfigLocation, config: &Config) -> Result<()> {
    if let Some(parent) = location.path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let serialized = serde_yaml::to_string(config).context("serializing config")?;
    fs::write(&location.path, serialized)
        .with_context(|| format!("writing {:?}", location.path))?;
    Ok(())
}

fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(PROJECT_CONFIG);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

fn global_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "notemaker").context("locating config directory")?;
    Ok(dirs.config_dir().join("config.yml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_writes_once_and_is_found_from_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.viewer.program = "less".into();
        let (location, created) = init_project_config(tmp.path(), &config).unwrap();
        assert!(created);
        assert!(location.path.ends_with(".notemaker/config.yml"));

        // a second init leaves the existing file alone
        let (again, created) = init_project_config(tmp.path(), &Config::default()).unwrap();
        assert!(!created);
        assert_eq!(again.path, location.path);

        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        let found = locate_config(&nested, None).unwrap();
        assert_eq!(found.scope, ConfigScope::Project);
        assert_eq!(found.path, location.path);
        assert_eq!(load_config(&found).unwrap().viewer.program, "less");
    }

    #[test]
    fn explicit_path_takes_precedence() {
        let tmp = TempDir::new().unwrap();
        init_project_config(tmp.path(), &Config::default()).unwrap();
        let explicit = tmp.path().join("other.yml");
        fs::write(&explicit, "root_name: Home\n").unwrap();

        let location = locate_config(tmp.path(), Some(&explicit)).unwrap();
        assert_eq!(location.scope, ConfigScope::Explicit);
        assert_eq!(load_config(&location).unwrap().root_name, "Home");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let location = ConfigLocation {
            path: tmp.path().join("absent.yml"),
            scope: ConfigScope::Explicit,
        };
        assert!(load_config(&location).is_err());
    }

    #[test]
    fn missing_project_config_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let location = ConfigLocation {
            path: tmp.path().join(PROJECT_CONFIG),
            scope: ConfigScope::Project,
        };
        assert_eq!(load_config(&location).unwrap(), Config::default());
        assert!(!location.path.exists());
    }

    #[test]
    fn malformed_config_is_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.yml");
        fs::write(&path, "color: [not, a, bool]\n").unwrap();
        let location = ConfigLocation {
            path,
            scope: ConfigScope::Explicit,
        };
        let err = load_config(&location).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
    }

    #[test]
    fn fs_store_resolves_and_removes_files() {
        let tmp = TempDir::new().unwrap();
        let store = FsNoteStore::new(tmp.path());
        let path = store.resolve("todo.txt");
        assert_eq!(path, tmp.path().join("todo.txt"));
        fs::write(&path, "buy milk").unwrap();

        store.remove("todo.txt").unwrap();
        assert!(!path.exists());
        assert!(store.remove("todo.txt").is_err());
    }
}
