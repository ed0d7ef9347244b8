//! Additional bot groups supplied by the user.
//!
//! The file is optional. Without it the built-in defaults apply; with it,
//! its groups replace the defaults. A file that exists but cannot be parsed
//! aborts the run so intended exclusions are never silently lost.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{GoodBotsError, Result};
use crate::fs_abstraction::FileSystem;

/// Default name of the additional bots file, looked up in the working directory.
pub const ADDITIONAL_BOTS_FILE: &str = "additional_bots.json";

/// A named collection of IP specifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotGroup {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ip_ranges: Vec<String>,
}

impl BotGroup {
    pub fn new(name: &str, description: &str, ip_ranges: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            ip_ranges: ip_ranges.iter().map(|r| r.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AdditionalBotsFile {
    additional_bots: Vec<BotGroup>,
}

/// Built-in groups used when no additional bots file exists.
pub fn default_bots() -> Vec<BotGroup> {
    vec![BotGroup::new(
        "Archive-It Bot",
        "Internet Archive's Archive-It web crawler",
        &["207.241.224.0/20", "208.70.24.0/21"],
    )]
}

/// Load bot groups from `path`, falling back to `defaults` when it is absent.
pub fn load_additional_bots(
    fs: &dyn FileSystem,
    path: &Path,
    defaults: &[BotGroup],
) -> Result<Vec<BotGroup>> {
    if !fs.exists(path) {
        debug!("No {} found, using built-in bots", path.display());
        return Ok(defaults.to_vec());
    }

    let content = fs.read_to_string(path).map_err(|e| {
        GoodBotsError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let groups = parse_additional_bots(&content)
        .map_err(|e| GoodBotsError::Config(format!("Invalid {}: {}", path.display(), e)))?;

    info!(
        "Loaded {} additional bots from {}",
        groups.len(),
        path.display()
    );

    Ok(groups)
}

fn parse_additional_bots(content: &str) -> std::result::Result<Vec<BotGroup>, String> {
    let file: AdditionalBotsFile = serde_json::from_str(content).map_err(|e| e.to_string())?;

    if let Some(bot) = file.additional_bots.iter().find(|b| b.name.trim().is_empty()) {
        return Err(format!(
            "bot with ip_ranges {:?} has an empty name",
            bot.ip_ranges
        ));
    }

    Ok(file.additional_bots)
}
