//! Run settings
//!
//! Settings are read from TOML; every field has a default so an empty file
//! (or no file at all) reproduces the stock behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use secdok_ooxml::{SectionExtractor, StyleProfile, TocField, DEFAULT_TARGET_HEADER};

/// Config files looked up in the working directory when none is given
pub const CONFIG_CANDIDATES: [&str; 2] = ["secdok.toml", ".secdok.toml"];

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory tree to read documents from
    pub input_root: PathBuf,
    /// Directory tree the trimmed documents are written to
    pub output_root: PathBuf,
    /// Header text of the section to keep
    pub target_header: String,
    /// Apply the style profile to the kept paragraphs
    pub restyle: bool,
    /// Table of contents settings
    pub toc: TocSettings,
    /// Style profile used when `restyle` is on
    pub style: StyleProfile,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from("input"),
            output_root: PathBuf::from("output"),
            target_header: DEFAULT_TARGET_HEADER.to_string(),
            restyle: true,
            toc: TocSettings::default(),
            style: StyleProfile::default(),
        }
    }
}

/// Table of contents configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocSettings {
    /// Prepend a TOC field to every output document
    pub enabled: bool,
    /// Outline levels collected by the field
    pub levels: String,
}

impl Default for TocSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            levels: "1-3".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from `config_path`, or from the first config file
    /// found in the working directory, or fall back to the defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::read(path)
            }
            None => Self::discover(Path::new(".")),
        }
    }

    /// Look for a config file in `dir`
    pub fn discover(dir: &Path) -> Result<Self> {
        for candidate in CONFIG_CANDIDATES {
            let path = dir.join(candidate);
            if !path.exists() {
                continue;
            }
            match Self::read(&path) {
                Ok(settings) => {
                    debug!(path = %path.display(), "loaded settings");
                    return Ok(settings);
                }
                Err(e) => warn!(path = %path.display(), "ignoring config file: {e:#}"),
            }
        }
        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// The extractor these settings describe
    pub fn extractor(&self) -> SectionExtractor {
        let toc = self.toc.enabled.then(|| TocField {
            levels: self.toc.levels.clone(),
            ..TocField::default()
        });
        SectionExtractor::new(self.target_header.as_str())
            .with_style(self.restyle.then(|| self.style.clone()))
            .with_toc(toc)
    }
}
