//! Runtime configuration resolved from command-line flags.
//!
//! # Invariants
//! - Every returned path is absolute.
//! - The database parent directory exists after `AppConfig::resolve`.

use crate::cli::Cli;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use tasklist_core::default_log_level;

const APP_DIR_NAME: &str = "tasklist";
const DB_FILE_NAME: &str = "tasklist.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    CurrentDir(std::io::Error),
    CreateDataDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
            Self::CreateDataDir { path, source } => write!(
                f,
                "failed to create data directory `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            Self::CreateDataDir { source, .. } => Some(source),
        }
    }
}

impl AppConfig {
    /// Resolves flags against the platform data directory and creates the
    /// directory that will hold the database.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        let data_root = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR_NAME);
        let config = Self::resolve_with(cli, &data_root, &cwd);

        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        Ok(config)
    }

    fn resolve_with(cli: &Cli, data_root: &Path, cwd: &Path) -> Self {
        let db_path = cli
            .db
            .as_deref()
            .map(|path| absolutize(path, cwd))
            .unwrap_or_else(|| data_root.join(DB_FILE_NAME));
        let log_dir = cli
            .log_dir
            .as_deref()
            .map(|path| absolutize(path, cwd))
            .unwrap_or_else(|| data_root.join(LOG_DIR_NAME));
        let log_level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());

        Self {
            db_path,
            log_dir,
            log_level,
        }
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use crate::cli::Cli;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn defaults_live_under_data_root() {
        let cli = Cli::try_parse_from(["tasklist"]).unwrap();
        let config = AppConfig::resolve_with(&cli, Path::new("/data/tasklist"), Path::new("/cwd"));

        assert_eq!(config.db_path, Path::new("/data/tasklist/tasklist.sqlite3"));
        assert_eq!(config.log_dir, Path::new("/data/tasklist/logs"));
        assert_eq!(config.log_level, tasklist_core::default_log_level());
    }

    #[test]
    fn relative_flags_resolve_against_cwd() {
        let cli = Cli::try_parse_from([
            "tasklist",
            "--db",
            "work/tasks.sqlite3",
            "--log-dir",
            "/var/log/tasklist",
            "--log-level",
            "warn",
        ])
        .unwrap();
        let config = AppConfig::resolve_with(&cli, Path::new("/data/tasklist"), Path::new("/cwd"));

        assert_eq!(config.db_path, Path::new("/cwd/work/tasks.sqlite3"));
        assert_eq!(config.log_dir, Path::new("/var/log/tasklist"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn resolve_creates_database_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("tasks.sqlite3");
        let cli = Cli::try_parse_from(["tasklist", "--db", db_path.to_str().unwrap()]).unwrap();

        let config = AppConfig::resolve(&cli).unwrap();

        assert_eq!(config.db_path, db_path);
        assert!(dir.path().join("nested").is_dir());
    }
}
