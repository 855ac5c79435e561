use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sunburst::{WheelConfig, WheelConfigError};
use thiserror::Error;

const DATA_FILE: &str = "data.json";
const ENV_PREFIX: &str = "SUNWHEEL";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Wheel dataset; relative paths resolve against the config directory.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default)]
    pub wheel: WheelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            wheel: WheelConfig::default(),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DATA_FILE)
}

impl Config {
    pub fn data_path(&self) -> PathBuf {
        if self.data_file.is_absolute() {
            return self.data_file.clone();
        }
        match get_config_path() {
            Ok(path) => path
                .parent()
                .map_or_else(|| self.data_file.clone(), |dir| dir.join(&self.data_file)),
            Err(_) => self.data_file.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid wheel geometry: {0}")]
    Wheel(#[from] WheelConfigError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "sunwheel", "sunwheel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path()?)
}

/// Reads `path` (optional) overlaid by `SUNWHEEL_*` variables, e.g.
/// `SUNWHEEL_WHEEL__OUTER_RADIUS`. Unusable ring radii fall back to the defaults.
fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut config: Config = s.try_deserialize()?;
    if let Err(e) = config.wheel.validate() {
        log::warn!("{}, using default wheel geometry", ConfigError::from(e));
        config.wheel = WheelConfig::default();
    }
    Ok(config)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            Config::default()
        }
    }
}

/// Creates the config file with the defaults unless it already exists.
pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    write_default_config_to(&path)?;
    Ok(path)
}

fn write_default_config_to(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Sends `event` whenever `path` is created, modified or removed.
pub async fn watch_file(path: PathBuf, tx: Sender<AppEvent>, event: AppEvent) {
    let Some(dir) = path.parent().map(Path::to_path_buf) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&dir) {
        log::error!("Failed to create {} for watching: {}", dir.display(), e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch {}: {}", dir.display(), e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(change) => {
                let meaningful_event = matches!(
                    change.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && change.paths.iter().any(|p| p == &path)
                    && tx.send(event.clone()).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
