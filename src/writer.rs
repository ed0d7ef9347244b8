//! Generation of the Python settings module consumed by
//! django-turnstile-site-protect.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::aggregator::AggregatedOutput;
use crate::config::GeneratorConfig;
use crate::error::{GoodBotsError, Result};
use crate::fs_abstraction::FileSystem;

/// Reject any output directory whose path contains `..`, including names
/// such as `settings..bak`.
pub fn validate_output_dir(dir: &Path) -> Result<()> {
    if dir.to_string_lossy().contains("..") {
        return Err(GoodBotsError::PathSecurity(dir.display().to_string()));
    }
    Ok(())
}

/// Render the module text. Output depends only on `output`, so identical
/// inputs give byte-identical files.
pub fn render(output: &AggregatedOutput, constant_name: &str) -> String {
    let mut content = String::new();
    content.push_str("# Bot IP addresses for django-turnstile-site-protect\n");
    content.push_str("# Generated by good-bots\n\n");
    content.push_str(&format!("{} = [\n", constant_name));

    for group in output.groups().iter().filter(|g| !g.ranges.is_empty()) {
        content.push_str(&format!("    # {}\n", comment_safe(&group.name)));
        for range in &group.ranges {
            content.push_str(&format!("    '{}',\n", range));
        }
        content.push('\n');
    }

    content.push_str("]\n\n");
    content.push_str(&format!("# Total IP ranges: {}\n", output.len()));
    content
}

/// Bot names come from user files; keep them on one comment line.
fn comment_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Writes the aggregated list into the output directory.
pub struct ConfigWriter<'a> {
    fs: &'a dyn FileSystem,
    filename: &'a str,
    constant_name: &'a str,
}

impl<'a> ConfigWriter<'a> {
    pub fn new(fs: &'a dyn FileSystem, config: &'a GeneratorConfig) -> Self {
        Self {
            fs,
            filename: &config.output_filename,
            constant_name: &config.constant_name,
        }
    }

    /// Validate `dir`, create it if needed and replace the output file.
    ///
    /// Returns the path of the written file.
    pub fn write(&self, dir: &Path, output: &AggregatedOutput) -> Result<PathBuf> {
        validate_output_dir(dir)?;

        if !self.fs.exists(dir) {
            debug!("Creating output directory {}", dir.display());
            self.fs.create_dir_all(dir).map_err(|e| {
                GoodBotsError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }

        let path = dir.join(self.filename);
        let content = render(output, self.constant_name);

        self.fs
            .write_atomic(&path, content.as_bytes())
            .map_err(|e| GoodBotsError::Io(format!("Error writing to {}: {}", path.display(), e)))?;

        info!("Generated {} with {} IP ranges", path.display(), output.len());

        Ok(path)
    }

    /// Import hint for the downstream settings module.
    pub fn import_hint(&self) -> String {
        let module = Path::new(self.filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(
            "from .{} import {}\nTURNSTILE_EXCLUDED_IPS = TURNSTILE_EXCLUDED_IPS + {}",
            module, self.constant_name, self.constant_name
        )
    }
}
