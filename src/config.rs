//! Configuration for the retrieval core.
//!
//! Loaded from `~/.clinirag/config.toml`, created with defaults on first
//! run. Remote API keys are never stored in the file; each service names an
//! environment variable and the key is read at call time.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Directory holding `index.bin` and `chunks.json`
    pub dir: PathBuf,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("vector_store"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window length in characters
    pub size: usize,
    /// Characters shared between consecutive chunks; must be < size
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            size: 500,
            overlap: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum number of chunks returned by a local search
    pub top_k: usize,
    /// Optional squared-L2 cutoff; results beyond it are treated as misses.
    /// Unset preserves the any-result-is-a-hit behavior.
    pub distance_threshold: Option<f32>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            distance_threshold: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of an Ollama-compatible embeddings endpoint
    pub url: String,
    /// Embedding model name
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434".to_string(),
            model: "nomic-embed-text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RemoteConfig {
    /// First remote answer tier, tried when local search misses
    pub primary: Option<RemoteServiceConfig>,
    /// Second remote answer tier, tried when the primary fails
    pub secondary: Option<RemoteServiceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteServiceConfig {
    pub url: String,
    /// Name of the environment variable holding the bearer token
    pub api_key_env: String,
}

impl RemoteServiceConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        if !config_path.exists() {
            let config = Config::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(config_path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;

        Ok(home.join(".clinirag").join("config.toml"))
    }

    /// Path of the persisted vector index
    pub fn index_path(&self) -> PathBuf {
        self.vector_store.dir.join("index.bin")
    }

    /// Path of the persisted chunk store
    pub fn chunks_path(&self) -> PathBuf {
        self.vector_store.dir.join("chunks.json")
    }
}
