use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HybridConfig {
    /// Minimum per-edge hybrid score kept from the exploratory fallback.
    #[serde(default = "default_semantic_threshold")]
    pub semantic_threshold: f32,
    #[serde(default = "default_max_exploratory_steps")]
    pub max_exploratory_steps: u32,
    /// Minimum mean edge score for the weighted path to be accepted as-is.
    #[serde(default = "default_min_semantic_score")]
    pub min_semantic_score: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NavigationConfig {
    /// Deadline applied to every store call of a single query.
    #[serde(default)]
    pub query_timeout_ms: Option<u64>,
    #[serde(default = "default_metrics_history")]
    pub metrics_history: usize,
    #[serde(default)]
    pub hybrid: HybridConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    pub contexts_path: String,
    pub links_path: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    pub storage: StorageConfig,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            semantic_threshold: default_semantic_threshold(),
            max_exploratory_steps: default_max_exploratory_steps(),
            min_semantic_score: default_min_semantic_score(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: None,
            metrics_history: default_metrics_history(),
            hybrid: HybridConfig::default(),
        }
    }
}

const fn default_semantic_threshold() -> f32 {
    0.5
}

const fn default_max_exploratory_steps() -> u32 {
    3
}

const fn default_min_semantic_score() -> f32 {
    0.6
}

const fn default_metrics_history() -> usize {
    1_024
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("CTXNAV").separator("__"));

        builder.build()?.try_deserialize()
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
