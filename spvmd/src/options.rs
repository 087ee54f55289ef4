use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, magic::ENV_OPTIONS_PATH};

/// Options controlling a transcoding run.
///
/// ```toml
/// # options.toml
/// erase_legacy_metadata = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeOptions {
    /// Erase the legacy OpenCL lists (`opencl.used.extensions`,
    /// `opencl.used.optional.core.features`, `opencl.enable.FP_CONTRACT`)
    /// once they have been consumed.
    pub erase_legacy_metadata: bool,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            erase_legacy_metadata: true,
        }
    }
}

impl TranscodeOptions {
    pub fn with_erase_legacy_metadata(mut self, erase: bool) -> Self {
        self.erase_legacy_metadata = erase;
        self
    }

    /// Get the default path to the options file.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(ENV_OPTIONS_PATH) {
            return path.into();
        }

        let mut path = PathBuf::new();
        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            path.push(xdg_config_home);
        } else if let Ok(home) = std::env::var("HOME") {
            path.push(home);
            path.push(".config");
        }

        path.push("spvmd");
        path.push("options.toml");
        path
    }

    /// Parse options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(toml_str: &str, file: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|source| ConfigError::Parse {
            source,
            file: file.to_string(),
        })
    }

    /// Load options from a TOML file.
    pub fn load_from_toml(path: &Path) -> Result<Self, ConfigError> {
        let toml_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            source,
            file: path.display().to_string(),
        })?;
        Self::from_toml_str(&toml_str, &path.display().to_string())
    }

    /// Load options from [`Self::default_path`], falling back to the defaults
    /// when no file exists there.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.is_file() {
            Self::load_from_toml(&path)
        } else {
            Ok(Self::default())
        }
    }
}
