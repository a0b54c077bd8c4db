//! Configuration loading and root folder resolution
//!
//! Each setting resolves independently, first match wins:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_ROOT_FOLDER: &str = "BIZCARD_ROOT_FOLDER";
pub const ENV_HOST: &str = "BIZCARD_HOST";
pub const ENV_PORT: &str = "BIZCARD_PORT";
pub const ENV_PASSWORD: &str = "BIZCARD_PASSWORD";
pub const ENV_INACTIVITY_DAYS: &str = "BIZCARD_INACTIVITY_DAYS";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5740;

const DATABASE_FILE: &str = "bizcard.db";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub password: Option<String>,
    pub inactivity_days: Option<i64>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Explicit config file; replaces the platform default location
    pub config_file: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Clone)]
pub struct AppConfig {
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub password: String,
    pub inactivity_days: i64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("root_folder", &self.root_folder)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &"<redacted>")
            .field("inactivity_days", &self.inactivity_days)
            .finish()
    }
}

impl AppConfig {
    /// Resolve configuration from CLI, environment, TOML file and defaults
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let toml = match &cli.config_file {
            Some(path) => load_toml(path)?,
            None => match default_config_path() {
                Some(path) => load_toml(&path)?,
                None => TomlConfig::default(),
            },
        };

        let root_folder = cli
            .root_folder
            .clone()
            .or_else(|| env_var(ENV_ROOT_FOLDER).map(PathBuf::from))
            .or(toml.root_folder)
            .unwrap_or_else(default_root_folder);

        let host = cli
            .host
            .clone()
            .or_else(|| env_var(ENV_HOST))
            .or(toml.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match cli.port {
            Some(port) => port,
            None => match env_parsed::<u16>(ENV_PORT)? {
                Some(port) => port,
                None => toml.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let password = env_var(ENV_PASSWORD).or(toml.password).ok_or_else(|| {
            Error::Config(format!(
                "No password configured. Set {} or `password` in config.toml",
                ENV_PASSWORD
            ))
        })?;

        let inactivity_days = env_parsed::<i64>(ENV_INACTIVITY_DAYS)?
            .or(toml.inactivity_days)
            .unwrap_or(crate::time::DEFAULT_INACTIVITY_DAYS);

        if inactivity_days < 1 {
            return Err(Error::Config(format!(
                "inactivity_days must be at least 1, got {}",
                inactivity_days
            )));
        }
        if !crate::time::days_in_range(inactivity_days) {
            return Err(Error::Config(format!(
                "inactivity_days is out of range, got {}",
                inactivity_days
            )));
        }

        Ok(Self {
            root_folder,
            host,
            port,
            password,
            inactivity_days,
        })
    }

    /// SQLite database location inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Idle period after which the directory is wiped
    pub fn inactivity_threshold(&self) -> chrono::Duration {
        crate::time::days(self.inactivity_days)
    }
}

/// Load a TOML config file
///
/// A missing file yields defaults; an unreadable or malformed one is an error.
pub fn load_toml(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Platform config file location, if one exists
fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("bizcard").join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/bizcard/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("bizcard"))
        .unwrap_or_else(|| PathBuf::from("./bizcard_data"))
}

/// Non-empty environment variable
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_var(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| Error::Config(format!("{}={:?} is invalid: {}", name, raw, e)))
        })
        .transpose()
}
