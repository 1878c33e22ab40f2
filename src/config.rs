/// Application configuration
///
/// Stored as JSON at `$CROP_ML_CONFIG`, or in the user's config directory:
/// - Linux: ~/.config/crop-ml/config.json
/// - macOS: ~/Library/Application Support/crop-ml/config.json
/// - Windows: %APPDATA%\crop-ml\config.json
///
/// Every field has a default, so a partial (or missing) file is fine.
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable pointing at an alternate config file
pub const CONFIG_ENV: &str = "CROP_ML_CONFIG";
/// Environment variable overriding `model_path`
pub const MODEL_ENV: &str = "CROP_ML_MODEL";

const APP_DIR: &str = "crop-ml";

/// How the model's output scores should be read
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputScale {
    /// Scores are already probabilities in [0, 1]
    #[default]
    Probabilities,
    /// Raw logits; softmax is applied before picking the top class
    Logits,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Path to the ONNX classification model
    pub model_path: PathBuf,
    /// Path to the labels file (one label per line, in output order)
    pub labels_path: PathBuf,
    /// Model input width in pixels
    pub input_width: u32,
    /// Model input height in pixels
    pub input_height: u32,
    /// Per-channel mean (R, G, B) subtracted after scaling to [0, 1]
    pub mean: [f32; 3],
    /// Per-channel standard deviation (R, G, B)
    pub std: [f32; 3],
    pub output: OutputScale,
    /// Intra-op threads for ONNX Runtime
    pub intra_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        let models = models_dir();
        Self {
            model_path: models.join("classifier.onnx"),
            labels_path: models.join("labels.txt"),
            input_width: 224,
            input_height: 224,
            // ImageNet statistics
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
            output: OutputScale::Probabilities,
            intra_threads: 1,
        }
    }
}

impl Config {
    /// Load the config from the default location, honoring env overrides.
    ///
    /// A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(std::env::var_os(CONFIG_ENV), std::env::var_os(MODEL_ENV))
    }

    /// Load with explicit values for `$CROP_ML_CONFIG` and `$CROP_ML_MODEL`
    pub fn load_with(
        config_env: Option<OsString>,
        model_env: Option<OsString>,
    ) -> Result<Self, ConfigError> {
        let path = config_env
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);

        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Self::default()
        };

        if let Some(model) = model_env {
            config.model_path = PathBuf::from(model);
        }

        Ok(config)
    }

    /// Parse a config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("📁 Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push("config.json");
    path
}

/// Directory where the model and labels are expected by default
fn models_dir() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push("models");
    path
}
