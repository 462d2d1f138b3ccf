//! End-to-end compendium build.
//!
//! 1. Plan: map every data and license URI to its cache path, rejecting
//!    distinct URIs that would share a path.
//! 2. Fetch: download all planned URIs concurrently, one scoped thread each.
//! 3. Merge: decode and deduplicate sources sequentially, in manifest order.
//! 4. Emit: build campaign entries and write the output file atomically.
//!
//! Per-source failures (download, unknown parser, malformed payload) and
//! per-component failures are recorded in the `BuildReport` and do not stop
//! the build. Only configuration errors and the final write are fatal.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::{aggregate, Skip, SourceTally};
use crate::config::{Manifest, SourceDescriptor};
use crate::emit::{compendium_file, write_compendium, EntryEmitter};
use crate::error::{CompendiumError, Result};
use crate::fetch::{cache_location, Cache, Fetcher};
use crate::parser::{parse_license, ParserRegistry};
use crate::types::{GameComponent, LicenseInfo};

/// One URI to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub uri: String,
    /// Path relative to the cache root.
    pub path: PathBuf,
    /// Re-download even if cached. True if any source using this URI asks.
    pub overwrite: bool,
}

/// Deduplicated download plan for a manifest.
#[derive(Debug, Default)]
pub struct FetchPlan {
    pub targets: Vec<FetchTarget>,
    /// URIs that cannot be cached at all (no file name, not a URI).
    pub invalid: Vec<(String, CompendiumError)>,
}

/// Plan downloads for `sources`.
///
/// Identical URIs are fetched once. Two different URIs deriving the same
/// cache path would overwrite each other, so that is a configuration error.
pub fn plan_fetches(sources: &[SourceDescriptor], overwrite_all: bool) -> Result<FetchPlan> {
    let mut plan = FetchPlan::default();
    let mut by_uri: HashMap<String, usize> = HashMap::new();
    let mut by_path: HashMap<PathBuf, String> = HashMap::new();

    for source in sources {
        for uri in [&source.license_uri, &source.data_uri] {
            let overwrite = overwrite_all || source.overwrite;

            if let Some(&index) = by_uri.get(uri.as_str()) {
                plan.targets[index].overwrite |= overwrite;
                continue;
            }
            if plan.invalid.iter().any(|(u, _)| u == uri) {
                continue;
            }

            let path = match cache_location(uri) {
                Ok(location) => location.relative_path(),
                Err(error) => {
                    plan.invalid.push((uri.clone(), error));
                    continue;
                }
            };

            if let Some(other) = by_path.get(&path) {
                return Err(CompendiumError::Config {
                    message: format!(
                        "{} and {} both cache to {}",
                        other,
                        uri,
                        path.display()
                    ),
                    help: Some("Cache paths come from the URI path; give each file a distinct path".to_string()),
                });
            }

            by_path.insert(path.clone(), uri.clone());
            by_uri.insert(uri.clone(), plan.targets.len());
            plan.targets.push(FetchTarget {
                uri: uri.clone(),
                path,
                overwrite,
            });
        }
    }

    Ok(plan)
}

/// Summary of a finished build.
#[derive(Debug)]
pub struct BuildReport {
    /// Where the compendium was written.
    pub output: PathBuf,
    /// Number of entries written.
    pub entries: usize,
    /// Per-source contribution, in manifest order.
    pub tallies: Vec<SourceTally>,
    /// Sources and components left out, with reasons.
    pub skips: Vec<Skip>,
}

/// A configured build.
pub struct Pipeline<'f> {
    fetcher: &'f dyn Fetcher,
    registry: ParserRegistry,
    overwrite_all: bool,
}

impl<'f> Pipeline<'f> {
    /// Create a pipeline with the built-in parsers.
    pub fn new(fetcher: &'f dyn Fetcher) -> Self {
        Self {
            fetcher,
            registry: ParserRegistry::with_builtins(),
            overwrite_all: false,
        }
    }

    /// Use a custom parser registry.
    pub fn with_registry(mut self, registry: ParserRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Re-download every source regardless of its `overwrite` setting.
    pub fn overwrite_all(mut self, overwrite: bool) -> Self {
        self.overwrite_all = overwrite;
        self
    }

    /// Run the build and write the compendium to `output`.
    pub fn run(&self, manifest: &Manifest, output: &Path) -> Result<BuildReport> {
        let plan = plan_fetches(&manifest.sources, self.overwrite_all)?;
        let cache = Cache::new(&manifest.cache_dir, self.fetcher);

        tracing::info!(
            sources = manifest.sources.len(),
            downloads = plan.targets.len(),
            cache = %cache.root().display(),
            "fetching sources"
        );
        let fetched = fetch_all(&cache, plan);

        let merged = aggregate(&manifest.sources, |source| {
            self.load_source(manifest, source, &fetched)
        });

        let emitter = EntryEmitter::from_manifest(manifest);
        let emitted = emitter.emit(&merged.components);

        let entries = emitted.entries.len();
        let file = compendium_file(manifest, emitted.entries);
        write_compendium(output, &file)?;
        tracing::info!(output = %output.display(), entries, "wrote compendium");

        let mut skips = merged.skips;
        skips.extend(emitted.skips);

        Ok(BuildReport {
            output: output.to_path_buf(),
            entries,
            tallies: merged.tallies,
            skips,
        })
    }

    /// Read, decode and stamp one source from the fetched cache files.
    fn load_source(
        &self,
        manifest: &Manifest,
        source: &SourceDescriptor,
        fetched: &HashMap<String, Result<PathBuf>>,
    ) -> Result<(LicenseInfo, Vec<GameComponent>)> {
        let license_path = fetched_path(fetched, &source.license_uri)?;
        let data_path = fetched_path(fetched, &source.data_uri)?;

        let license = parse_license(&read_text(&license_path)?)?;
        let mut components = self.registry.decode(&read_text(&data_path)?, source)?;

        tracing::debug!(source = %source.name, decoded = components.len(), "decoded");
        stamp_source(manifest, source, &mut components);

        Ok((license, components))
    }
}

/// Build a compendium with the built-in parsers.
pub fn build_compendium(manifest: &Manifest, output: &Path, fetcher: &dyn Fetcher) -> Result<BuildReport> {
    Pipeline::new(fetcher).run(manifest, output)
}

/// Download every planned target concurrently.
fn fetch_all(cache: &Cache<'_>, plan: FetchPlan) -> HashMap<String, Result<PathBuf>> {
    let mut fetched: HashMap<String, Result<PathBuf>> = HashMap::new();

    for (uri, error) in plan.invalid {
        fetched.insert(uri, Err(error));
    }

    let results: Vec<(String, Result<PathBuf>)> = std::thread::scope(|scope| {
        let handles: Vec<_> = plan
            .targets
            .iter()
            .map(|target| {
                let handle = scope.spawn(move || cache.fetch(&target.uri, target.overwrite));
                (target.uri.clone(), handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(uri, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(CompendiumError::Fetch {
                        uri: uri.clone(),
                        message: "download thread panicked".to_string(),
                    })
                });
                (uri, result)
            })
            .collect()
    });

    for (uri, result) in results {
        if let Err(error) = &result {
            tracing::warn!(uri = %uri, error = %error, "download failed");
        }
        fetched.insert(uri, result);
    }

    fetched
}

/// Look up the cached path for a URI, cloning its failure for this source.
fn fetched_path(fetched: &HashMap<String, Result<PathBuf>>, uri: &str) -> Result<PathBuf> {
    match fetched.get(uri) {
        Some(Ok(path)) => Ok(path.clone()),
        Some(Err(CompendiumError::Fetch { uri, message })) => Err(CompendiumError::Fetch {
            uri: uri.clone(),
            message: message.clone(),
        }),
        Some(Err(other)) => Err(CompendiumError::Fetch {
            uri: uri.to_string(),
            message: other.to_string(),
        }),
        None => Err(CompendiumError::Fetch {
            uri: uri.to_string(),
            message: "URI was not planned for download".to_string(),
        }),
    }
}

/// Read a cached file as UTF-8 text.
fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| CompendiumError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read cached file: {}", e),
    })?;

    String::from_utf8(bytes).map_err(|e| {
        let valid = e.utf8_error().valid_up_to();
        let line = e.as_bytes()[..valid].iter().filter(|b| **b == b'\n').count() + 1;
        CompendiumError::malformed_at(line, format!("{} is not valid UTF-8", path.display()))
    })
}

/// Stamp source metadata onto decoded components.
///
/// Source labels go in front of decoder-derived labels.
fn stamp_source(manifest: &Manifest, source: &SourceDescriptor, components: &mut [GameComponent]) {
    let tag_symbol = manifest.tag_symbol_for(source);
    let tag_value_prefix = manifest.tag_value_prefix_for(source);

    for component in components {
        component.source_title = source.display_title().to_string();
        component.tag_symbol = tag_symbol.to_string();
        component.tag_value_prefix = tag_value_prefix.to_string();

        if !source.labels.is_empty() {
            let mut labels = source.labels.clone();
            labels.append(&mut component.labels);
            component.labels = labels;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, data: &str, license: &str) -> SourceDescriptor {
        SourceDescriptor::new(name, data, license, "markdown-sections")
    }

    #[test]
    fn test_plan_shares_identical_uris() {
        let sources = vec![
            source("a", "https://x.example/a/monsters.md", "https://x.example/license.yaml"),
            source("b", "https://x.example/b/monsters.md", "https://x.example/license.yaml"),
        ];

        let plan = plan_fetches(&sources, false).unwrap();

        let uris: Vec<&str> = plan.targets.iter().map(|t| t.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec![
                "https://x.example/license.yaml",
                "https://x.example/a/monsters.md",
                "https://x.example/b/monsters.md",
            ]
        );
    }

    #[test]
    fn test_plan_rejects_path_collisions() {
        let sources = vec![
            source("a", "https://one.example/data/monsters.md", "https://one.example/l.yaml"),
            source("b", "https://two.example/data/monsters.md", "https://two.example/l2.yaml"),
        ];

        let result = plan_fetches(&sources, false);

        assert!(matches!(result, Err(CompendiumError::Config { .. })));
    }

    #[test]
    fn test_plan_overwrite_is_sticky() {
        let mut eager = source("b", "https://x.example/b.md", "https://x.example/license.yaml");
        eager.overwrite = true;
        let sources = vec![
            source("a", "https://x.example/a.md", "https://x.example/license.yaml"),
            eager,
        ];

        let plan = plan_fetches(&sources, false).unwrap();

        assert!(plan.targets[0].overwrite);
        assert!(!plan.targets[1].overwrite);
        assert!(plan.targets[2].overwrite);
    }

    #[test]
    fn test_plan_records_invalid_uris() {
        let sources = vec![source("a", "https://x.example/", "https://x.example/license.yaml")];

        let plan = plan_fetches(&sources, false).unwrap();

        assert_eq!(plan.targets.len(), 1);
        assert_eq!(plan.invalid.len(), 1);
        assert_eq!(plan.invalid[0].0, "https://x.example/");
    }

    #[test]
    fn test_stamp_source() {
        let manifest = Manifest {
            tag_value_prefix: "M_".to_string(),
            ..Default::default()
        };
        let mut descriptor = source("osr", "https://x/m.md", "https://x/l.yaml");
        descriptor.title = Some("OSR Bestiary".to_string());
        descriptor.labels = vec!["OSR".to_string()];
        descriptor.tag_symbol = Some("@".to_string());

        let mut component = GameComponent::new("Goblin", "", crate::types::ComponentKind::Creature);
        component.labels = vec!["Monster".to_string()];
        let mut components = vec![component];

        stamp_source(&manifest, &descriptor, &mut components);

        assert_eq!(components[0].source_title, "OSR Bestiary");
        assert_eq!(components[0].tag_symbol, "@");
        assert_eq!(components[0].tag_value(), "M_Goblin");
        assert_eq!(components[0].labels, vec!["OSR", "Monster"]);
    }
}
