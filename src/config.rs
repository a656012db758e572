use crate::events::AppEvent;
use crate::menu::{DEFAULT_RADIUS, DEFAULT_SIZE, ExecCommand, IconName, ItemId, MenuItem};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::rc::Rc;
use thiserror::Error;

/// One node of the configured item tree. `items` nests arbitrarily; an empty
/// list is equivalent to a leaf.
#[skip_serializing_none]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemConfig {
    pub id: ItemId,
    pub title: Option<String>,
    pub icon: Option<IconName>,
    pub exec: Option<ExecCommand>,
    pub items: Option<Vec<ItemConfig>>,
}

impl ItemConfig {
    fn build(&self) -> Rc<MenuItem> {
        Rc::new(MenuItem {
            id: self.id.clone(),
            title: self.title.clone(),
            icon: self.icon.clone(),
            exec: self.exec.clone(),
            children: self
                .items
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(ItemConfig::build)
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// On-screen diameter of the menu, in pixels.
    #[serde(default = "default_size")]
    pub size: f64,
    /// Logical ring radius used by the geometry math.
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Whether activating a leaf closes the menu.
    #[serde(default = "default_close_on_click")]
    pub close_on_click: bool,
    /// Transition duration in milliseconds; 0 disables animation.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

fn default_size() -> f64 {
    DEFAULT_SIZE
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS
}

fn default_close_on_click() -> bool {
    true
}

fn default_transition_ms() -> u64 {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: default_size(),
            radius: default_radius(),
            close_on_click: default_close_on_click(),
            transition_ms: default_transition_ms(),
            items: Vec::new(),
        }
    }
}

impl Config {
    /// Materializes the immutable item tree the menu core works on.
    pub fn build_items(&self) -> Vec<Rc<MenuItem>> {
        self.items.iter().map(ItemConfig::build).collect()
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
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "rondel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("RONDEL"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the user config, seeding the config file with the embedded default
/// tree on first run. A broken config falls back to the embedded default so
/// the menu always has something to show.
pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
        && let Err(e) = write_default_config()
    {
        log::warn!("Could not write default config: {}", e);
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using built-in default: {}", e);
            embedded_default()
        }
    }
}

fn embedded_default() -> Config {
    config::Config::builder()
        .add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ))
        .build()
        .and_then(config::Config::try_deserialize)
        .unwrap_or_default()
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Watches the config directory and emits a reload event whenever
/// `config.toml` changes.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(|p| p.to_path_buf()) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
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

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_items_deserialize_from_json() {
        let json = r#"{
            "id": "wall",
            "title": "Wall",
            "items": [
                { "id": "paint" },
                { "id": "strip", "icon": "edit-clear", "exec": "true" }
            ]
        }"#;
        let cfg: ItemConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.id.as_ref(), "wall");
        let children = cfg.items.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert!(children[0].icon.is_none());
        assert_eq!(children[1].exec.as_ref().unwrap().as_ref(), "true");
    }

    #[test]
    fn build_items_treats_empty_child_list_as_leaf() {
        let json = r#"{ "id": "a", "items": [] }"#;
        let cfg: ItemConfig = serde_json::from_str(json).unwrap();
        let item = cfg.build();
        assert!(!item.has_children());
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.size, DEFAULT_SIZE);
        assert_eq!(cfg.radius, DEFAULT_RADIUS);
        assert!(cfg.close_on_click);
        assert_eq!(cfg.transition_ms, 200);
        assert!(cfg.items.is_empty());
    }

    #[test]
    fn embedded_default_config_parses() {
        let cfg = embedded_default();
        assert!(!cfg.items.is_empty());
        // the sample tree has at least one drill-down target
        assert!(cfg.build_items().iter().any(|i| i.has_children()));
    }
}
