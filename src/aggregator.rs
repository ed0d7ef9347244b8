//! Aggregation of all sources into the ordered output list.

use tracing::{info, warn};

use crate::bots::{load_additional_bots, BotGroup};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::fs_abstraction::FileSystem;
use crate::range::{normalize, NormalizedRange};
use crate::utils::{format_count, pluralize};

/// Normalized ranges contributed by one bot group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeGroup {
    pub name: String,
    pub description: String,
    pub ranges: Vec<NormalizedRange>,
}

/// Everything one run produced, in output order.
///
/// Groups keep their attribution for comments in the generated file, but the
/// consumer only ever sees the flat list from [`AggregatedOutput::ranges`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedOutput {
    groups: Vec<RangeGroup>,
    failed_sources: Vec<String>,
    dropped: usize,
}

impl AggregatedOutput {
    /// Build an output from already normalized groups.
    pub fn from_groups(groups: Vec<RangeGroup>) -> Self {
        Self {
            groups,
            ..Self::default()
        }
    }

    pub fn groups(&self) -> &[RangeGroup] {
        &self.groups
    }

    /// All ranges in provider order, then additional bots.
    pub fn ranges(&self) -> impl Iterator<Item = &NormalizedRange> {
        self.groups.iter().flat_map(|g| g.ranges.iter())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.ranges.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sources that failed to fetch or decode.
    pub fn failed_sources(&self) -> &[String] {
        &self.failed_sources
    }

    /// Number of specifications dropped because they failed to parse.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn push_group(&mut self, name: String, description: String, specs: &[String]) {
        let (ranges, dropped) = normalize_all(&name, specs);
        self.dropped += dropped;
        self.groups.push(RangeGroup {
            name,
            description,
            ranges,
        });
    }
}

/// Normalize every specification, dropping the ones that fail with a warning.
///
/// Returns the ranges in input order and the number dropped.
pub fn normalize_all(group: &str, specs: &[String]) -> (Vec<NormalizedRange>, usize) {
    let mut ranges = Vec::with_capacity(specs.len());
    let mut dropped = 0;

    for spec in specs {
        match normalize(spec) {
            Ok(range) => ranges.push(range),
            Err(e) => {
                warn!("{}: {}", group, e);
                dropped += 1;
            }
        }
    }

    (ranges, dropped)
}

/// Runs every source and the additional bots loader.
pub struct Aggregator<'a> {
    config: &'a GeneratorConfig,
    fs: &'a dyn FileSystem,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a GeneratorConfig, fs: &'a dyn FileSystem) -> Self {
        Self { config, fs }
    }

    /// Collect and normalize ranges from all sources.
    ///
    /// The additional bots file is loaded first so a broken file aborts the
    /// run before any network traffic. Provider failures are logged and
    /// skipped; only the loader can fail this call.
    pub async fn run(&self, fetcher: &Fetcher) -> Result<AggregatedOutput> {
        let additional = load_additional_bots(
            self.fs,
            &self.config.additional_bots_file,
            &self.config.default_bots,
        )?;

        let mut output = AggregatedOutput::default();

        for source in &self.config.sources {
            match fetcher.fetch_source(source).await {
                Ok(result) => {
                    output.push_group(result.name, String::new(), &result.specs);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", source.display_name(), e);
                    output.failed_sources.push(source.display_name());
                }
            }
        }

        self.push_additional(&mut output, &additional);

        info!(
            "Collected {} from {} groups ({} dropped, {} failed)",
            pluralize(output.len(), "range", "ranges"),
            format_count(output.groups.len()),
            output.dropped,
            pluralize(output.failed_sources.len(), "source", "sources"),
        );

        Ok(output)
    }

    fn push_additional(&self, output: &mut AggregatedOutput, bots: &[BotGroup]) {
        for bot in bots {
            output.push_group(bot.name.clone(), bot.description.clone(), &bot.ip_ranges);
            info!(
                "Additional bot {} - {}",
                bot.name,
                pluralize(bot.ip_ranges.len(), "range", "ranges")
            );
        }
    }
}
