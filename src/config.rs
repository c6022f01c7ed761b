//! Optional TOML configuration.
//!
//! apidocs runs without any configuration. A file is read only when
//! `--config <PATH>` is passed:
//!
//! ```toml
//! [corpus]
//! path = "./data/corpus.json"
//!
//! [output]
//! language = "cpp"
//! width = 100
//! ```
//!
//! Command-line flags always win over the file; the file wins over the
//! corpus default.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::SampleLanguage;

/// Narrowest wrap width accepted for `output.width`.
pub const MIN_WRAP_WIDTH: usize = 20;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
    /// Read the corpus from this file instead of the bundled data.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Preferred sample language (`python`, `cpp`, or `c++`).
    #[serde(default)]
    pub language: Option<String>,
    /// Wrap prose at this many columns; `0` disables wrapping.
    #[serde(default)]
    pub width: usize,
}

impl OutputConfig {
    pub fn sample_language(&self) -> Result<Option<SampleLanguage>> {
        self.language
            .as_deref()
            .map(|s| s.parse::<SampleLanguage>().map_err(anyhow::Error::msg))
            .transpose()
            .context("output.language")
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.output.width != 0 && config.output.width < MIN_WRAP_WIDTH {
        anyhow::bail!(
            "output.width must be 0 (no wrapping) or >= {}",
            MIN_WRAP_WIDTH
        );
    }

    config.output.sample_language()?;

    // Relative corpus paths are relative to the config file, not the cwd.
    if let Some(corpus_path) = config.corpus.path.take() {
        let resolved = if corpus_path.is_relative() {
            path.parent()
                .map(|dir| dir.join(&corpus_path))
                .unwrap_or(corpus_path)
        } else {
            corpus_path
        };
        config.corpus.path = Some(resolved);
    }

    Ok(config)
}
