// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading
//! user preferences from a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - UI language
//! - `[model]` - Model archive source, unpack location and tensor layout
//! - `[output]` - Suggested name of the downloaded result
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()` with explicit path
//! 2. Set `ICED_LUMEN_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use iced_lumen::app::config;
//!
//! let (config, warning) = config::load();
//! if let Some(key) = warning {
//!     eprintln!("settings ignored: {key}");
//! }
//! println!("model from {}", config.model.url);
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::Result;
use crate::media::enhance::{TensorLayout, TensorOptions};
use crate::media::model_archive::ModelSource;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default)]
    pub language: Option<String>,
}

/// Model provisioning and tensor settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Share or direct link to the zipped model.
    #[serde(default = "default_model_url")]
    pub url: String,

    /// BLAKE3 hash of the archive. Verification is skipped when absent.
    #[serde(default)]
    pub checksum: Option<String>,

    /// Directory produced by unpacking the archive.
    #[serde(default = "default_model_directory")]
    pub directory: String,

    /// File name of the downloaded archive.
    #[serde(default = "default_model_archive")]
    pub archive: String,

    /// Tensor layout expected by the model.
    #[serde(default)]
    pub layout: TensorLayout,

    /// Input width and height are padded up to a multiple of this value.
    #[serde(default = "default_pad_multiple")]
    pub pad_multiple: Option<u32>,

    /// Longest accepted input side in pixels. Unlimited when absent.
    #[serde(default)]
    pub max_input_side: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            url: default_model_url(),
            checksum: None,
            directory: default_model_directory(),
            archive: default_model_archive(),
            layout: TensorLayout::default(),
            pad_multiple: default_pad_multiple(),
            max_input_side: None,
        }
    }
}

impl ModelConfig {
    /// Returns where the model is fetched from and unpacked to.
    pub fn source(&self) -> ModelSource {
        ModelSource {
            url: self.url.clone(),
            checksum: self.checksum.clone(),
            directory: self.directory.clone(),
            archive: self.archive.clone(),
        }
    }

    /// Returns the tensor conversion options, with the padding multiple
    /// clamped to a sane range.
    pub fn tensor_options(&self) -> TensorOptions {
        TensorOptions {
            layout: self.layout,
            pad_multiple: self
                .pad_multiple
                .unwrap_or(DEFAULT_PAD_MULTIPLE)
                .clamp(1, MAX_PAD_MULTIPLE),
        }
    }
}

/// Settings for the downloadable result.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// File name suggested by the save dialog.
    #[serde(default = "default_output_file_name")]
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_output_file_name(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Model provisioning and tensor settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Result download settings.
    #[serde(default)]
    pub output: OutputConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_model_url() -> String {
    DEFAULT_MODEL_URL.to_string()
}

fn default_model_directory() -> String {
    DEFAULT_MODEL_DIRECTORY.to_string()
}

fn default_model_archive() -> String {
    DEFAULT_MODEL_ARCHIVE.to_string()
}

fn default_pad_multiple() -> Option<u32> {
    Some(DEFAULT_PAD_MULTIPLE)
}

fn default_output_file_name() -> String {
    DEFAULT_OUTPUT_FILE_NAME.to_string()
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with the i18n key of a warning explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
                    return (
                        Config::default(),
                        Some("warning-config-load".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Tests
// =============================================================================
