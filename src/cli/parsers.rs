//! Parsers command implementation.
//!
//! Prints registered parser ids to stdout, one per line.

use clap::Args;

use crate::error::Result;
use crate::output::{plural, Printer};
use crate::parser::ParserRegistry;

/// List the available source parsers
#[derive(Args, Debug)]
pub struct ParsersArgs {}

pub fn run(_args: ParsersArgs, printer: &Printer) -> Result<()> {
    let registry = ParserRegistry::with_builtins();
    let ids: Vec<&str> = registry.ids().collect();

    printer.info("Available", &plural(ids.len(), "parser", "parsers"));
    for id in ids {
        println!("{}", id);
    }

    Ok(())
}
