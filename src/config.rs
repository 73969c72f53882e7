use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{GraphScoutError, Result};

/// Name of the configuration file stored inside the `.graphscout` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory holding graphscout data for a project.
pub const GRAPHSCOUT_DIR: &str = ".graphscout";

/// Configuration for a graphscout project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Active project id; node ids may be prefixed with `"{project_id}:"`.
    #[serde(default)]
    pub project_id: String,
    /// Graph snapshot file, relative to the `.graphscout` directory.
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
    /// Precomputed vectors file, relative to the `.graphscout` directory.
    #[serde(default = "default_vectors_file")]
    pub vectors_file: String,
    /// Embeddings endpoint used to embed queries. Without it, similarity
    /// search is unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<EmbeddingConfig>,
}

/// Settings for the HTTP embeddings client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `http://localhost:11434/v1`.
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key, if the endpoint needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_snapshot_file() -> String {
    "graph.json".to_string()
}

fn default_vectors_file() -> String {
    "vectors.json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            version: 1,
            project_id: String::new(),
            snapshot_file: default_snapshot_file(),
            vectors_file: default_vectors_file(),
            embedding: None,
        }
    }
}

impl ScoutConfig {
    /// Absolute path of the graph snapshot for the given project root.
    pub fn snapshot_path(&self, project_root: &Path) -> PathBuf {
        get_graphscout_dir(project_root).join(&self.snapshot_file)
    }

    /// Absolute path of the vectors file for the given project root.
    pub fn vectors_path(&self, project_root: &Path) -> PathBuf {
        get_graphscout_dir(project_root).join(&self.vectors_file)
    }
}

/// Returns the path to the `.graphscout` directory within the given project root.
pub fn get_graphscout_dir(project_root: &Path) -> PathBuf {
    project_root.join(GRAPHSCOUT_DIR)
}

/// Returns the path to the configuration file within the `.graphscout` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_graphscout_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default configuration.
pub fn load_config(project_root: &Path) -> Result<ScoutConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(ScoutConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| GraphScoutError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    serde_json::from_str(&contents).map_err(|e| GraphScoutError::Config {
        message: format!(
            "failed to parse config file '{}': {}",
            config_path.display(),
            e
        ),
    })
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it into place, so a
/// partial write never corrupts the configuration.
pub fn save_config(project_root: &Path, config: &ScoutConfig) -> Result<()> {
    let scout_dir = get_graphscout_dir(project_root);
    fs::create_dir_all(&scout_dir).map_err(|e| GraphScoutError::Config {
        message: format!(
            "failed to create graphscout directory '{}': {}",
            scout_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| GraphScoutError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| GraphScoutError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| GraphScoutError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}
