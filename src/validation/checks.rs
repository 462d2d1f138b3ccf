//! Manifest checks.
//!
//! Each check takes the manifest (and the parser registry where needed) and
//! returns a `ValidationResult`.

use std::collections::HashSet;

use url::Url;

use crate::config::Manifest;
use crate::parser::ParserRegistry;
use crate::pipeline::plan_fetches;

use super::warning::{Diagnostic, ValidationResult};

/// Warn about metadata the output file will be missing.
pub fn check_metadata(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();

    if manifest.title.trim().is_empty() {
        result.push(
            Diagnostic::warning("compendium::validate::missing-title", "Compendium has no title")
                .with_help("Set `title` in compendium.yaml"),
        );
    }
    if manifest.sources.is_empty() {
        result.push(
            Diagnostic::warning("compendium::validate::no-sources", "No sources configured")
                .with_help("Add entries under `sources` in compendium.yaml"),
        );
    }

    result
}

/// Source names identify skips and tallies, so they must be unique.
pub fn check_duplicate_sources(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut seen = HashSet::new();

    for source in &manifest.sources {
        if source.name.trim().is_empty() {
            result.push(Diagnostic::error(
                "compendium::validate::unnamed-source",
                format!("Source for {} has no name", source.data_uri),
            ));
        } else if !seen.insert(source.name.as_str()) {
            result.push(
                Diagnostic::error(
                    "compendium::validate::duplicate-source",
                    format!("Source '{}' is defined more than once", source.name),
                )
                .for_source(&source.name),
            );
        }
    }

    result
}

/// Every source must name a registered parser.
pub fn check_parsers(manifest: &Manifest, registry: &ParserRegistry) -> ValidationResult {
    let mut result = ValidationResult::new();

    for source in &manifest.sources {
        if !registry.contains(&source.parser) {
            result.push(
                Diagnostic::error(
                    "compendium::validate::unknown-parser",
                    format!("Unknown parser '{}'", source.parser),
                )
                .for_source(&source.name)
                .with_help(format!(
                    "Available parsers: {}",
                    registry.ids().collect::<Vec<_>>().join(", ")
                )),
            );
        }
    }

    result
}

/// Data and license URIs must be absolute http(s) URLs.
pub fn check_uris(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();

    for source in &manifest.sources {
        for (field, uri) in [("data_uri", &source.data_uri), ("license_uri", &source.license_uri)] {
            let problem = match Url::parse(uri) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => continue,
                Ok(url) => format!("unsupported scheme '{}'", url.scheme()),
                Err(e) => e.to_string(),
            };
            result.push(
                Diagnostic::error(
                    "compendium::validate::invalid-uri",
                    format!("{} '{}': {}", field, uri, problem),
                )
                .for_source(&source.name),
            );
        }
    }

    result
}

/// Distinct URIs must map to distinct cache files.
pub fn check_cache_paths(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();

    match plan_fetches(&manifest.sources, false) {
        Ok(plan) => {
            for (uri, error) in plan.invalid {
                result.push(Diagnostic::error(
                    "compendium::validate::uncacheable-uri",
                    format!("{}: {}", uri, error),
                ));
            }
        }
        Err(error) => result.push(
            Diagnostic::error("compendium::validate::cache-collision", error.to_string())
                .with_help("Cache paths come from the URI path; give each file a distinct path"),
        ),
    }

    result
}

/// Import limits and stat-block categories that make a source contribute nothing.
pub fn check_source_settings(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();

    for source in &manifest.sources {
        if source.import_limit == Some(0) {
            result.push(
                Diagnostic::warning(
                    "compendium::validate::zero-limit",
                    "import_limit is 0, no components will be imported",
                )
                .for_source(&source.name),
            );
        }

        let missing_category = source.category.as_deref().map_or(true, |c| c.trim().is_empty());
        if source.parser == "markdown-stat-blocks" && missing_category {
            result.push(
                Diagnostic::warning(
                    "compendium::validate::missing-category",
                    "Stat-block source has no category, every block will be skipped",
                )
                .for_source(&source.name)
                .with_help("Set `category` (e.g. Monster) on the source"),
            );
        }
    }

    result
}
