//! Generator configuration.
//!
//! Everything the aggregator needs to know about the outside world lives in
//! [`GeneratorConfig`]: which endpoints to fetch, which bots to fall back to,
//! and how to name the generated file. `Default` is the real provider table;
//! tests build their own with fake endpoints.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bots::{default_bots, BotGroup, ADDITIONAL_BOTS_FILE};
use crate::error::{GoodBotsError, Result};
use crate::sources::{default_sources, SourceConfig};

/// Default name of the generated file.
pub const OUTPUT_FILENAME: &str = "bot_ips_config.py";

/// Default name of the generated list constant.
pub const CONSTANT_NAME: &str = "GOOD_BOTS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Crawler endpoints, fetched in this order
    pub sources: Vec<SourceConfig>,

    /// Bots used when no additional bots file exists
    pub default_bots: Vec<BotGroup>,

    /// Additional bots file, relative to the working directory
    pub additional_bots_file: PathBuf,

    /// Name of the generated file
    pub output_filename: String,

    /// Name of the list constant in the generated file
    pub constant_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            default_bots: default_bots(),
            additional_bots_file: PathBuf::from(ADDITIONAL_BOTS_FILE),
            output_filename: OUTPUT_FILENAME.to_string(),
            constant_name: CONSTANT_NAME.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration overrides from a YAML file.
    ///
    /// Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GoodBotsError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        let config: GeneratorConfig = serde_yaml::from_str(&content).map_err(|e| {
            GoodBotsError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for source in &self.sources {
            if source.provider.trim().is_empty() || source.bot.trim().is_empty() {
                return Err(GoodBotsError::Config(format!(
                    "Source with URL {} needs a provider and bot name",
                    source.url
                )));
            }
            if !source.url.starts_with("https://") {
                return Err(GoodBotsError::Config(format!(
                    "Source '{}' URL must use HTTPS: {}",
                    source.display_name(),
                    source.url
                )));
            }
        }

        if !is_valid_identifier(&self.constant_name) {
            return Err(GoodBotsError::Config(format!(
                "Invalid constant name '{}'",
                self.constant_name
            )));
        }

        let filename = Path::new(&self.output_filename);
        if self.output_filename.is_empty()
            || filename.components().count() != 1
            || filename.file_name().is_none()
        {
            return Err(GoodBotsError::Config(format!(
                "Output filename must be a plain file name: '{}'",
                self.output_filename
            )));
        }

        Ok(())
    }
}

/// Python reserved words; the generated module would not import with one of
/// these as the constant name.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// ASCII identifier check for the generated constant.
fn is_valid_identifier(name: &str) -> bool {
    if PYTHON_KEYWORDS.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
