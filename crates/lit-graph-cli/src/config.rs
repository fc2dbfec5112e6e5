//! CLI configuration management.
//!
//! Defaults, then the JSON config file, then environment variables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use lit_graph_layout::LayoutConfig;
use serde::{Deserialize, Serialize};

/// Overrides the directory holding `config.json`.
pub const CONFIG_DIR_ENV: &str = "LIT_GRAPH_CONFIG_DIR";

/// Overrides the directory holding saved filter presets.
pub const PRESETS_DIR_ENV: &str = "LIT_GRAPH_PRESETS_DIR";

/// Keys accepted by `lg config get/set`.
pub const KEYS: &[&str] = &[
    "presets-dir",
    "max-ticks",
    "width",
    "height",
    "node-radius",
    "link-distance",
    "charge-strength",
    "collision",
    "cluster-by-type",
    "release-pin-on-drag-end",
];

/// Application-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Directory of the file-backed preset store.
    pub presets_dir: PathBuf,

    /// Upper bound on simulation steps for `lg layout`.
    pub max_ticks: usize,

    /// Layout defaults applied before command-line overrides.
    pub layout: LayoutConfig,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "lit-graph", "lg")
}

impl Default for Config {
    fn default() -> Self {
        let presets_dir = project_dirs()
            .map(|dirs| dirs.data_dir().join("presets"))
            .unwrap_or_else(|| std::env::temp_dir().join("lit-graph").join("presets"));

        Self {
            presets_dir,
            max_ticks: 1_000,
            layout: LayoutConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config from {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            _ => Self::default(),
        };

        // Environment takes precedence over the file.
        if let Ok(dir) = std::env::var(PRESETS_DIR_ENV) {
            config.presets_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Save current configuration to the config file.
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&config_path, contents)
                .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        }
        Ok(())
    }

    /// Get the path to the config file.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir).join("config.json"));
        }
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Read a value by key.
    pub fn get(&self, key: &str) -> Result<String> {
        let layout = &self.layout;
        let value = match key {
            "presets-dir" => self.presets_dir.display().to_string(),
            "max-ticks" => self.max_ticks.to_string(),
            "width" => layout.width.to_string(),
            "height" => layout.height.to_string(),
            "node-radius" => layout.node_radius.to_string(),
            "link-distance" => layout.link_distance.to_string(),
            "charge-strength" => layout.charge_strength.to_string(),
            "collision" => layout.enable_collision.to_string(),
            "cluster-by-type" => layout.cluster_by_type.to_string(),
            "release-pin-on-drag-end" => layout.release_pin_on_drag_end.to_string(),
            _ => anyhow::bail!("Unknown config key: {}. Valid keys: {}", key, KEYS.join(", ")),
        };
        Ok(value)
    }

    /// Parse and assign a value by key. Does not persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let layout = &mut self.layout;
        let invalid = || format!("Invalid value for {key}: {value}");
        match key {
            "presets-dir" => self.presets_dir = PathBuf::from(value),
            "max-ticks" => self.max_ticks = value.parse().with_context(invalid)?,
            "width" => layout.width = value.parse().with_context(invalid)?,
            "height" => layout.height = value.parse().with_context(invalid)?,
            "node-radius" => layout.node_radius = value.parse().with_context(invalid)?,
            "link-distance" => layout.link_distance = value.parse().with_context(invalid)?,
            "charge-strength" => layout.charge_strength = value.parse().with_context(invalid)?,
            "collision" => layout.enable_collision = value.parse().with_context(invalid)?,
            "cluster-by-type" => layout.cluster_by_type = value.parse().with_context(invalid)?,
            "release-pin-on-drag-end" => {
                layout.release_pin_on_drag_end = value.parse().with_context(invalid)?
            }
            _ => anyhow::bail!("Unknown config key: {}. Valid keys: {}", key, KEYS.join(", ")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_round_trip() {
        let mut config = Config::default();
        for (key, value) in [
            ("max-ticks", "250"),
            ("width", "1024"),
            ("charge-strength", "-120.5"),
            ("cluster-by-type", "true"),
            ("presets-dir", "/tmp/presets"),
        ] {
            config.set(key, value).unwrap();
            assert_eq!(config.get(key).unwrap(), value);
        }
        assert!(config.layout.cluster_by_type);
    }

    #[test]
    fn test_every_key_is_readable() {
        let config = Config::default();
        for key in KEYS {
            assert!(config.get(key).is_ok(), "{key}");
        }
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let mut config = Config::default();
        assert!(config.set("width", "wide").is_err());
        assert!(config.set("collision", "maybe").is_err());
        assert!(config.set("colour", "red").is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"maxTicks": 42}"#).unwrap();
        assert_eq!(config.max_ticks, 42);
        assert_eq!(config.layout, LayoutConfig::default());
    }
}
