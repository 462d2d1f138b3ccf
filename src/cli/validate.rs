use std::path::PathBuf;

use clap::Args;

use crate::config::{Manifest, MANIFEST_FILENAME};
use crate::error::{CompendiumError, Result};
use crate::output::{display_path, plural, Printer};
use crate::parser::ParserRegistry;
use crate::validation::print_diagnostics;

/// Check compendium.yaml without fetching anything
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest to check
    #[arg(long, short, default_value = MANIFEST_FILENAME)]
    pub manifest: PathBuf,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)?;

    printer.status(
        "Checking",
        &format!(
            "{} ({})",
            display_path(&args.manifest),
            plural(manifest.sources.len(), "source", "sources")
        ),
    );

    let result = manifest.validate(&ParserRegistry::with_builtins());
    print_diagnostics(&result, printer);

    if result.has_errors() {
        return Err(CompendiumError::Config {
            message: format!(
                "{} has {}",
                display_path(&args.manifest),
                plural(result.error_count(), "error", "errors")
            ),
            help: None,
        });
    }

    Ok(())
}
