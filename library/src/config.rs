use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::NodeError;
use crate::nodes::prompt_selector::{IdentifierPolicy, SelectionPolicy};

const CONFIG_FILE_NAME: &str = "nodes.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    /// Where the save node writes files.
    pub output_dir: PathBuf,
    /// zlib level for PNG output, 0..=9.
    pub compress_level: u8,
    /// Searched before the OS font directories.
    pub extra_font_dirs: Vec<PathBuf>,
    pub selection_policy: SelectionPolicy,
    pub identifier_policy: IdentifierPolicy,
    pub font_cache_size: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            compress_level: 4,
            extra_font_dirs: Vec::new(),
            selection_policy: SelectionPolicy::default(),
            identifier_policy: IdentifierPolicy::default(),
            font_cache_size: 16,
        }
    }
}

impl NodeConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, NodeError> {
        let mut config: NodeConfig = toml::from_str(toml_str)?;
        config.compress_level = config.compress_level.min(9);
        config.font_cache_size = config.font_cache_size.max(1);
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, NodeError> {
        let toml_str = fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("me", "mistermr", "nodes")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Loads the user config, falling back to defaults when missing or invalid.
pub fn load_config() -> NodeConfig {
    if let Some(path) = config_path() {
        if path.exists() {
            match NodeConfig::load_from(&path) {
                Ok(config) => {
                    info!("Loaded node config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config file, using defaults: {}", e);
                }
            }
        }
    }
    NodeConfig::default()
}
