//! Simulation settings for the `walkbox` binary.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use walkbox_actor::WalkConfig;
use walkbox_nav::SearchConfig;

/// Top-level YAML configuration (`.walkbox/config.yaml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Walk policy, speed and scan order for simulated actors.
    #[serde(default)]
    pub walk: WalkConfig,

    /// Closest-box search thresholds.
    #[serde(default)]
    pub search: SearchConfig,

    /// Hard stop for `walk` so an unfinished walk cannot run forever.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Simulate the player (player-only boxes are open to it).
    #[serde(default)]
    pub player: bool,
}

fn default_max_ticks() -> u64 {
    10_000
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            walk: WalkConfig::default(),
            search: SearchConfig::default(),
            max_ticks: default_max_ticks(),
            player: false,
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Load from a directory (looks for .walkbox/config.yaml)
    pub fn load_from_dir(root: &Path) -> Result<Self> {
        let config_path = root.join(".walkbox/config.yaml");
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkbox_actor::PolicyKind;
    use walkbox_nav::ScanOrder;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = SimConfig::load_from_dir(dir.path()).expect("defaults");
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join(".walkbox")).expect("mkdir");
        std::fs::write(
            dir.path().join(".walkbox/config.yaml"),
            "walk:\n  policy: legacy_counter\n  scan_order: prioritize_low_id\nplayer: true\n",
        )
        .expect("write config");

        let config = SimConfig::load_from_dir(dir.path()).expect("parse config");
        assert_eq!(config.walk.policy, PolicyKind::LegacyCounter);
        assert_eq!(config.walk.scan_order, ScanOrder::PrioritizeLowId);
        assert_eq!(config.walk.max_resolve_iterations, 64);
        assert_eq!(config.search, SearchConfig::default());
        assert_eq!(config.max_ticks, 10_000);
        assert!(config.player);
    }

    #[test]
    fn bad_yaml_names_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "max_ticks: [").expect("write config");

        let err = SimConfig::load(&path).expect_err("invalid yaml");
        assert!(format!("{err}").contains("broken.yaml"));
    }
}
