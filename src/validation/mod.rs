//! Manifest validation.
//!
//! Runs a suite of checks against a loaded manifest and reports errors and
//! warnings without fetching anything. Used by `compendium validate` and
//! before every `compendium build`.

mod checks;
mod warning;

pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::config::Manifest;
use crate::output::{plural, Printer};
use crate::parser::ParserRegistry;

/// Run all validation checks against the manifest.
pub fn validate_manifest(manifest: &Manifest, registry: &ParserRegistry) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_metadata(manifest));
    result.merge(checks::check_duplicate_sources(manifest));
    result.merge(checks::check_parsers(manifest, registry));
    result.merge(checks::check_uris(manifest));
    result.merge(checks::check_cache_paths(manifest));
    result.merge(checks::check_source_settings(manifest));

    result
}

/// Print diagnostics and a summary line.
pub fn print_diagnostics(result: &ValidationResult, printer: &Printer) {
    for d in result.iter() {
        let label = printer.severity(&d.severity.to_string(), d.severity == Severity::Error);
        let scope = d
            .source
            .as_deref()
            .map(|s| format!("{}: ", printer.bold(s)))
            .unwrap_or_default();
        eprintln!("{}{}: {}{}", label, printer.dim(&format!("[{}]", d.code)), scope, d.message);
        if let Some(help) = &d.help {
            eprintln!("  {} {}", printer.cyan("help:"), help);
        }
    }

    let errors = plural(result.error_count(), "error", "errors");
    let warnings = plural(result.warning_count(), "warning", "warnings");

    if result.has_errors() {
        printer.error("Failed", &format!("validation: {}, {}", errors, warnings));
    } else if result.warning_count() > 0 {
        printer.warning("Validated", &format!("with {}", warnings));
    } else {
        printer.success("Validated", "no problems found");
    }
}
