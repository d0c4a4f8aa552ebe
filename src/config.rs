use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::classifier::ModelInputType;
use crate::error::{Result, SpamError};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub resources: ResourceConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where linguistic resources (WordNet, stopwords) are looked up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// NLTK-style data roots, searched in order
    #[serde(default = "default_search_paths")]
    pub search_paths: Vec<PathBuf>,
    /// Use the built-in English stopword list instead of `corpora/stopwords/english`
    #[serde(default = "default_bundled_stopwords")]
    pub bundled_stopwords: bool,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            search_paths: default_search_paths(),
            bundled_stopwords: default_bundled_stopwords(),
        }
    }
}

/// Trained vocabulary and model files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    #[serde(default = "default_vocabulary_path")]
    pub vocabulary_path: PathBuf,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default)]
    pub model_input_type: ModelInputType,
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            vocabulary_path: default_vocabulary_path(),
            model_path: default_model_path(),
            model_input_type: ModelInputType::default(),
            intra_threads: default_intra_threads(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Directory with the browser frontend, served at `/` when set
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            static_dir: None,
        }
    }
}

fn default_search_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("nltk_data"),
        PathBuf::from("/usr/local/nltk_data"),
        PathBuf::from("/usr/share/nltk_data"),
    ]
}

fn default_bundled_stopwords() -> bool {
    true
}

fn default_vocabulary_path() -> PathBuf {
    PathBuf::from("tokenizer_email.json")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("EmailClassifier.onnx")
}

fn default_intra_threads() -> usize {
    1
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        // If file doesn't exist, return default config with warning
        if !path.exists() {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SpamError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| SpamError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    SpamError::ConfigError(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SpamError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        tokio::fs::write(path, content)
            .await
            .map_err(|e| SpamError::ConfigError(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.resources.search_paths.is_empty() {
            return Err(SpamError::ConfigError(
                "resources.search_paths must list at least one directory".to_string(),
            ));
        }

        if self.artifacts.intra_threads == 0 {
            return Err(SpamError::ConfigError(
                "artifacts.intra_threads must be at least 1".to_string(),
            ));
        }

        if self.artifacts.vocabulary_path.as_os_str().is_empty() {
            return Err(SpamError::ConfigError(
                "artifacts.vocabulary_path must not be empty".to_string(),
            ));
        }

        if self.artifacts.model_path.as_os_str().is_empty() {
            return Err(SpamError::ConfigError(
                "artifacts.model_path must not be empty".to_string(),
            ));
        }

        self.server.socket_addr()?;
        Ok(())
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr.parse().map_err(|e| {
            SpamError::ConfigError(format!(
                "Invalid server.bind_addr '{}': {}",
                self.bind_addr, e
            ))
        })
    }
}
