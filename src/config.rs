//! Configuration management for the disease prediction front-end

use crate::types::disease::Disease;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Directory containing the serialized models
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
    /// Diabetes classifier file name
    #[serde(default = "default_diabetes_file")]
    pub diabetes_file: String,
    /// Heart disease classifier file name
    #[serde(default = "default_heart_file")]
    pub heart_file: String,
    /// Parkinson's classifier file name
    #[serde(default = "default_parkinsons_file")]
    pub parkinsons_file: String,
    /// Number of threads for ONNX inference per model (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_models_dir() -> String {
    "saved_models".to_string()
}

fn default_diabetes_file() -> String {
    "diabetes_model.json".to_string()
}

fn default_heart_file() -> String {
    "heart_disease_model.json".to_string()
}

fn default_parkinsons_file() -> String {
    "parkinsons_model.json".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

impl ModelsConfig {
    /// Artifact file name configured for a disease
    pub fn file_for(&self, disease: Disease) -> &str {
        match disease {
            Disease::Diabetes => &self.diabetes_file,
            Disease::Heart => &self.heart_file,
            Disease::Parkinsons => &self.parkinsons_file,
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            diabetes_file: default_diabetes_file(),
            heart_file: default_heart_file(),
            parkinsons_file: default_parkinsons_file(),
            onnx_threads: default_onnx_threads(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Default configuration file location
    pub const DEFAULT_PATH: &'static str = "config/config.toml";

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path(Self::DEFAULT_PATH)
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            models: ModelsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
