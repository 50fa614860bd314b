//! `dieline.toml` loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use dieline_compiler::CompileSettings;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "dieline.toml";

/// Top-level config file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[compile]` table.
    pub compile: CompileSettings,
}

impl Config {
    /// Parse and validate a config document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("invalid config")?;
        config.compile.validate()?;
        Ok(config)
    }

    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("loading {}", path.display()))
    }

    /// Load `explicit` if given, else `./dieline.toml` if present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if path.exists() {
            log::debug!("using {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
