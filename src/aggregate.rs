//! Cross-source deduplication with per-source import limits.
//!
//! Sources are merged strictly in descriptor order and components in
//! payload order, so the result is first-seen order and stable across runs.
//! Names are compared exactly: `Goblin` and `goblin` are different entries.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::config::SourceDescriptor;
use crate::error::{CompendiumError, Result};
use crate::types::{GameComponent, LicenseInfo};

/// How much one source contributed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTally {
    pub source: String,
    /// New components appended to the aggregate.
    pub accepted: usize,
    /// Components dropped because an earlier one had the same name.
    pub duplicates: usize,
    /// Components discarded after the import limit was reached.
    pub truncated: usize,
}

/// A source or component left out of the output, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub source: String,
    /// Component name, when the skip is scoped to one component.
    pub component: Option<String>,
    pub reason: String,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.component {
            Some(component) => write!(f, "{} / {}: {}", self.source, component, self.reason),
            None => write!(f, "{}: {}", self.source, self.reason),
        }
    }
}

/// Result of merging all sources.
#[derive(Debug, Default)]
pub struct Aggregate {
    pub components: Vec<GameComponent>,
    pub tallies: Vec<SourceTally>,
    pub skips: Vec<Skip>,
}

/// Accumulates unique components across sources.
#[derive(Debug, Default)]
pub struct Aggregator {
    seen: HashSet<String>,
    aggregate: Aggregate,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one source's decoded components.
    ///
    /// Every component gets the source license attached. Unseen names are
    /// appended until the source's import limit is reached; the rest of the
    /// source is discarded.
    pub fn add_source(
        &mut self,
        source: &SourceDescriptor,
        license: Arc<LicenseInfo>,
        components: Vec<GameComponent>,
    ) -> &SourceTally {
        let mut tally = SourceTally {
            source: source.name.clone(),
            ..Default::default()
        };

        let total = components.len();
        for (index, mut component) in components.into_iter().enumerate() {
            if source.limit_reached(tally.accepted) {
                tally.truncated = total - index;
                tracing::info!(
                    source = %source.name,
                    limit = ?source.import_limit,
                    discarded = tally.truncated,
                    "import limit reached"
                );
                break;
            }

            component.attach_license(&license);

            if self.seen.contains(&component.name) {
                tracing::debug!(source = %source.name, name = %component.name, "duplicate");
                tally.duplicates += 1;
                continue;
            }

            self.seen.insert(component.name.clone());
            self.aggregate.components.push(component);
            tally.accepted += 1;
        }

        self.aggregate.tallies.push(tally);
        &self.aggregate.tallies[self.aggregate.tallies.len() - 1]
    }

    /// Record that a source contributed nothing because of `error`.
    pub fn skip_source(&mut self, source: &SourceDescriptor, error: &CompendiumError) {
        tracing::warn!(source = %source.name, error = %error, "skipping source");
        self.aggregate.skips.push(Skip {
            source: source.name.clone(),
            component: None,
            reason: error.to_string(),
        });
        self.aggregate.tallies.push(SourceTally {
            source: source.name.clone(),
            ..Default::default()
        });
    }

    /// Number of unique components so far.
    pub fn len(&self) -> usize {
        self.aggregate.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregate.components.is_empty()
    }

    pub fn finish(self) -> Aggregate {
        self.aggregate
    }
}

/// Merge every source in order, loading each through `load`.
///
/// `load` returns the source's license and decoded components. A failing
/// load skips that source only; the error is logged and recorded.
pub fn aggregate<F>(sources: &[SourceDescriptor], mut load: F) -> Aggregate
where
    F: FnMut(&SourceDescriptor) -> Result<(LicenseInfo, Vec<GameComponent>)>,
{
    let mut aggregator = Aggregator::new();

    for source in sources {
        match load(source) {
            Ok((license, components)) => {
                let tally = aggregator.add_source(source, Arc::new(license), components);
                tracing::info!(
                    source = %tally.source,
                    accepted = tally.accepted,
                    duplicates = tally.duplicates,
                    "merged source"
                );
            }
            Err(error) => aggregator.skip_source(source, &error),
        }
    }

    aggregator.finish()
}
