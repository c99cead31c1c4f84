//! Configuration for the claim evaluator.
//!
//! Supports both environment variables and a YAML config file.
//! Environment variables take precedence over config file values.
//!
//! All judge state (endpoint, key, model, retry ceiling) lives in an
//! explicit config object handed to the client constructor; there is no
//! process-wide singleton.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Judge model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Base URL for the judge API (e.g., "https://api.openai.com")
    pub api_base: String,

    /// API key for authentication
    pub api_key: String,

    /// Model name (e.g., "gpt-4o", "gemini-1.5-pro")
    pub model: String,

    /// Maximum tokens for a judge response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature; judgments should be deterministic
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum attempts per example before it is skipped
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_max_tokens() -> u32 {
    3000
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_retries() -> u32 {
    10
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_retries: default_max_retries(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Judge model settings
    pub judge: JudgeConfig,

    /// Recall cutoffs for the judged (fact-level) score
    #[serde(default = "default_judged_thresholds")]
    pub judged_thresholds: Vec<f64>,

    /// Coverage cutoffs for the offline (matcher) score
    #[serde(default = "default_coverage_thresholds")]
    pub coverage_thresholds: Vec<f64>,
}

fn default_judged_thresholds() -> Vec<f64> {
    vec![0.46]
}

fn default_coverage_thresholds() -> Vec<f64> {
    vec![0.25]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            judge: JudgeConfig::default(),
            judged_thresholds: default_judged_thresholds(),
            coverage_thresholds: default_coverage_thresholds(),
        }
    }
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    judge: Option<JudgeFileSection>,
    judged_thresholds: Option<Vec<f64>>,
    coverage_thresholds: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct JudgeFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    max_retries: Option<u32>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JUDGE_API_BASE, JUDGE_API_KEY, JUDGE_MODEL)
    /// 2. Config file (~/.config/claim-eval/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        if let Ok(api_base) = env::var("JUDGE_API_BASE") {
            config.judge.api_base = api_base;
        }

        if let Ok(api_key) = env::var("JUDGE_API_KEY") {
            config.judge.api_key = api_key;
        }

        if let Ok(model) = env::var("JUDGE_MODEL") {
            config.judge.model = model;
        }

        if let Ok(max_tokens) = env::var("JUDGE_MAX_TOKENS") {
            if let Ok(tokens) = max_tokens.parse() {
                config.judge.max_tokens = tokens;
            }
        }

        if let Ok(max_retries) = env::var("JUDGE_MAX_RETRIES") {
            if let Ok(retries) = max_retries.parse() {
                config.judge.max_retries = retries;
            }
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;

        let file_config: ConfigFile = serde_yaml::from_str(&content)
            .map_err(|e| EvalError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(judge) = file_config.judge {
            if let Some(api_base) = judge.api_base {
                config.judge.api_base = api_base;
            }
            if let Some(api_key) = judge.api_key {
                config.judge.api_key = api_key;
            }
            if let Some(model) = judge.model {
                config.judge.model = model;
            }
            if let Some(max_tokens) = judge.max_tokens {
                config.judge.max_tokens = max_tokens;
            }
            if let Some(temperature) = judge.temperature {
                config.judge.temperature = temperature;
            }
            if let Some(max_retries) = judge.max_retries {
                config.judge.max_retries = max_retries;
            }
        }

        if let Some(levels) = file_config.judged_thresholds {
            config.judged_thresholds = levels;
        }
        if let Some(levels) = file_config.coverage_thresholds {
            config.coverage_thresholds = levels;
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "claim-eval")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that required configuration is present.
    pub fn validate(&self) -> Result<()> {
        if self.judge.api_base.is_empty() {
            return Err(EvalError::Config(
                "Judge API base URL is required. Set JUDGE_API_BASE environment variable or add to config file.".to_string()
            ));
        }

        if self.judge.api_key.is_empty() {
            return Err(EvalError::Config(
                "Judge API key is required. Set JUDGE_API_KEY environment variable or add to config file.".to_string()
            ));
        }

        if self.judge.model.is_empty() {
            return Err(EvalError::Config(
                "Judge model is required. Set JUDGE_MODEL environment variable or add to config file."
                    .to_string(),
            ));
        }

        if self.judged_thresholds.is_empty() || self.coverage_thresholds.is_empty() {
            return Err(EvalError::Config(
                "At least one reporting threshold is required.".to_string(),
            ));
        }

        Ok(())
    }

    /// Create a config from explicit values (useful for testing).
    pub fn with_judge(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            judge: JudgeConfig {
                api_base: api_base.into(),
                api_key: api_key.into(),
                model: model.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
