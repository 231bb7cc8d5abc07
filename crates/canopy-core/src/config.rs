use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

/// Top-level configuration from `.canopy.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print interchange JSON written by extract/batch.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Glob patterns excluded from batch extraction.
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_exclude_patterns() -> Vec<String> {
    // Hidden files and Office lock files (~$report.docx).
    vec!["**/.*".to_string(), "**/~$*".to_string()]
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl BatchConfig {
    /// Compile the exclude patterns; invalid globs are skipped with a warning.
    pub fn exclude_set(&self) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => eprintln!("Warning: ignoring invalid exclude pattern '{pattern}': {e}"),
            }
        }
        builder.build().unwrap_or_else(|e| {
            eprintln!("Warning: exclude patterns disabled: {e}");
            GlobSet::empty()
        })
    }
}

impl Config {
    /// Load configuration from a `.canopy.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `canopy init` to create a valid config file",
                path.display()
            )
        })?;
        Ok(config)
    }

    /// Load from `.canopy.toml` in the given directory or any ancestor, or
    /// return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(".canopy.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!(
                            "Warning: failed to load config from '{}': {e:#}. Using defaults.",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Generate default TOML content for `canopy init`.
    pub fn default_toml() -> String {
        r#"# Canopy - document normalization and comparison configuration

[output]
# Pretty-print interchange JSON written by `extract` and `batch`
pretty = true

[batch]
# Glob patterns skipped during batch extraction
exclude_patterns = ["**/.*", "**/~$*"]
"#
        .to_string()
    }
}
