//! Deepbrief config - serde structs for ~/.deepbrief/deepbrief.json
//!
//! Pure types and parsing only. API keys may live here or in the
//! environment (`GROQ_API_KEY`, `TAVILY_API_KEY`); the environment wins.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeepbriefConfig {
    pub gateway: DbGateway,
    pub models: DbModels,
    pub search: DbSearch,
    pub store: DbStore,
    pub pipeline: DbPipeline,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DbGateway {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DbModels {
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    pub fast: Option<String>,
    pub smart: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DbSearch {
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    #[serde(rename = "maxResults")]
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DbStore {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DbPipeline {
    #[serde(rename = "retryBudget")]
    pub retry_budget: u32,
    #[serde(rename = "callTimeoutSecs")]
    pub call_timeout_secs: u64,
    #[serde(rename = "summarizeWorkers")]
    pub summarize_workers: usize,
}

impl Default for DbPipeline {
    fn default() -> Self {
        Self {
            retry_budget: 3,
            call_timeout_secs: 60,
            summarize_workers: 4,
        }
    }
}

impl DeepbriefConfig {
    /// Load from a specific path. Missing or malformed files fall back to
    /// defaults rather than failing startup.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Default config path: ~/.deepbrief/deepbrief.json
    pub fn default_path() -> PathBuf {
        dirs_home().join(".deepbrief").join("deepbrief.json")
    }

    /// Default state directory for the file-backed context store.
    pub fn default_store_dir() -> PathBuf {
        dirs_home().join(".deepbrief").join("briefs")
    }
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}
