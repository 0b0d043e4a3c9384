//! Configuration for Storyloom.
//!
//! Loaded from `.storyloom.yml` in the current directory or
//! `~/.config/storyloom/storyloom.yml`, with defaults for everything.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::RefinementConfig;

/// Default LLM model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Global configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider settings
    pub llm: LlmSettings,

    /// Refinement loop settings
    pub pipeline: PipelineSettings,

    /// Preference/feedback store locations
    pub storage: StorageSettings,
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .storyloom.yml in current directory
    /// 3. ~/.config/storyloom/storyloom.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_config = PathBuf::from(".storyloom.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .storyloom.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .storyloom.yml: {}", e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("storyloom").join("storyloom.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.max_iterations == 0 {
            eyre::bail!("pipeline.max-iterations must be > 0");
        }
        if self.llm.timeout_ms == 0 {
            eyre::bail!("llm.timeout-ms must be > 0");
        }
        Ok(())
    }

    /// Refinement loop configuration derived from the pipeline settings
    pub fn refinement(&self) -> RefinementConfig {
        RefinementConfig {
            max_iterations: self.pipeline.max_iterations,
        }
    }
}

/// LLM provider settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name
    pub model: String,

    /// Timeout per LLM call in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Max tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            timeout_ms: 300_000, // 5 minutes
            max_tokens: 8192,
        }
    }
}

/// Refinement loop settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Iteration cap for the critique/refine loop
    #[serde(rename = "max-iterations")]
    pub max_iterations: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_iterations: crate::pipeline::refinement::DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Store locations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory for per-user preference files
    #[serde(rename = "preferences-dir")]
    pub preferences_dir: PathBuf,

    /// Directory for per-user feedback history files
    #[serde(rename = "feedback-dir")]
    pub feedback_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            preferences_dir: PathBuf::from("./user_preferences"),
            feedback_dir: PathBuf::from("./user_feedback"),
        }
    }
}
