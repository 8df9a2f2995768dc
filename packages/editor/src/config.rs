use mina_model::NodeId;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "mina.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo levels (0 = unlimited)
    #[serde(default)]
    pub history_limit: usize,

    /// Prefix for generated ids; defaults to a hash of the root id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_seed: Option<String>,

    /// Node selected when the editor opens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_active_node: Option<NodeId>,
}

impl EditorConfig {
    /// Load config from a directory
    pub fn load(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(Self::from_json(&content)?)
        } else {
            Ok(EditorConfig::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_id_seed(mut self, seed: impl Into<String>) -> Self {
        self.id_seed = Some(seed.into());
        self
    }
}
