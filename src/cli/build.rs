//! Build command implementation.
//!
//! Loads the manifest, fetches every source over HTTP(S) into the cache and
//! writes the merged compendium file.

use std::path::PathBuf;

use clap::Args;

use crate::config::{Manifest, MANIFEST_FILENAME};
use crate::error::Result;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::output::{display_path, plural, Printer};
use crate::parser::ParserRegistry;
use crate::pipeline::{BuildReport, Pipeline};
use crate::validation::print_diagnostics;

/// Fetch every source and write the compendium file
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Manifest to build
    #[arg(long, short, default_value = MANIFEST_FILENAME)]
    pub manifest: PathBuf,

    /// Output file (default: `output` from the manifest)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Re-download every source even if it is cached
    #[arg(long)]
    pub overwrite: bool,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)?;
    let fetcher = HttpFetcher::new(manifest.fetch_timeout());
    build(&args, manifest, printer, &fetcher).map(|_| ())
}

/// Run a build with an explicit fetcher.
pub fn build(
    args: &BuildArgs,
    manifest: Manifest,
    printer: &Printer,
    fetcher: &dyn Fetcher,
) -> Result<BuildReport> {
    let registry = ParserRegistry::with_builtins();

    // Source-scoped problems are reported here and skipped during the build.
    let validation = manifest.validate(&registry);
    if !validation.is_ok() {
        print_diagnostics(&validation, printer);
    }

    let output = args.output.clone().unwrap_or_else(|| manifest.output.clone());

    printer.status(
        "Fetching",
        &format!(
            "{} into {}",
            plural(manifest.sources.len(), "source", "sources"),
            display_path(&manifest.cache_dir)
        ),
    );

    let report = Pipeline::new(fetcher)
        .with_registry(registry)
        .overwrite_all(args.overwrite)
        .run(&manifest, &output)?;

    for tally in &report.tallies {
        printer.tally(tally);
    }
    for skip in &report.skips {
        printer.skip(skip);
    }

    printer.success(
        "Finished",
        &format!(
            "{} to {}",
            plural(report.entries, "entry", "entries"),
            printer.cyan(&display_path(&report.output))
        ),
    );

    Ok(report)
}
