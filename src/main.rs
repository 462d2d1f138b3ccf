use clap::Parser;
use compendium::cli::{Cli, Commands};
use compendium::output::Printer;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => compendium::cli::build::run(args, &printer)?,
        Commands::Validate(args) => compendium::cli::validate::run(args, &printer)?,
        Commands::Parsers(args) => compendium::cli::parsers::run(args, &printer)?,
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `compendium=warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("compendium=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
