//! Generate command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::aggregator::{AggregatedOutput, Aggregator};
use crate::cli::expand_home;
use crate::config::GeneratorConfig;
use crate::fetcher::Fetcher;
use crate::fs_abstraction::{real_fs, FileSystem};
use crate::writer::{validate_output_dir, ConfigWriter};

/// Summary of a completed generation
#[derive(Debug)]
pub struct Generated {
    pub path: PathBuf,
    pub output: AggregatedOutput,
    pub import_hint: String,
}

/// Fetch, aggregate and write with explicit collaborators.
///
/// The output directory is checked before anything else runs, so an unsafe
/// path never costs a network round trip and never touches the filesystem.
pub async fn generate(
    config: &GeneratorConfig,
    fs: &dyn FileSystem,
    fetcher: &Fetcher,
    output_dir: &Path,
) -> crate::error::Result<Generated> {
    validate_output_dir(output_dir)?;

    let output = Aggregator::new(config, fs).run(fetcher).await?;

    let writer = ConfigWriter::new(fs, config);
    let path = writer.write(output_dir, &output)?;

    Ok(Generated {
        path,
        output,
        import_hint: writer.import_hint(),
    })
}

impl Generated {
    /// Human-readable result for the terminal.
    pub fn summary(&self) -> String {
        format!(
            "\n[OK] Generated {} with {} IP ranges\n\
             You can now import this in your Django settings:\n{}\n",
            self.path.display(),
            self.output.len(),
            self.import_hint
        )
    }
}

/// Run the generate command
///
/// `~` in `output_dir` is expanded only after the traversal check. In quiet
/// mode nothing is printed on success.
pub async fn run(output_dir: &Path, config_path: Option<&Path>, quiet: bool) -> Result<()> {
    validate_output_dir(output_dir)?;
    let output_dir = expand_home(output_dir);

    let config = match config_path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => GeneratorConfig::default(),
    };

    info!("Generating bot IP configuration...");

    let fetcher = Fetcher::new()?;
    let generated = generate(&config, real_fs(), &fetcher, &output_dir)
        .await
        .context("Failed to generate configuration")?;

    if !generated.output.failed_sources().is_empty() {
        warn!(
            "No ranges from: {}",
            generated.output.failed_sources().join(", ")
        );
    }

    if !quiet {
        print!("{}", generated.summary());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::RangeGroup;
    use crate::range::normalize;

    #[test]
    fn test_summary() {
        let generated = Generated {
            path: PathBuf::from("settings/bot_ips_config.py"),
            output: AggregatedOutput::from_groups(vec![RangeGroup {
                name: "Archive-It Bot".to_string(),
                description: String::new(),
                ranges: vec![normalize("207.241.224.0/20").unwrap()],
            }]),
            import_hint: "from .bot_ips_config import GOOD_BOTS".to_string(),
        };

        assert_eq!(
            generated.summary(),
            "\n[OK] Generated settings/bot_ips_config.py with 1 IP ranges\n\
             You can now import this in your Django settings:\n\
             from .bot_ips_config import GOOD_BOTS\n"
        );
    }

    #[tokio::test]
    async fn test_run_rejects_traversal_before_expansion() {
        let err = run(Path::new("~/../etc"), None, true).await.unwrap_err();
        assert!(err.to_string().contains("Path traversal detected"));
    }
}
