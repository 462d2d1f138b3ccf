//! Source decoders.
//!
//! Every source names a parser id; the `ParserRegistry` maps ids to
//! `Decoder` implementations that turn a raw payload into normalized
//! `GameComponent`s. The format of a payload is decided by its parser id
//! alone, never sniffed from content.
//!
//! # Built-in parsers
//!
//! | id | payload |
//! |----|---------|
//! | `json-creatures` | JSON list (or `results` page) of creatures |
//! | `json-spells` | JSON list (or `results` page) of spells |
//! | `json-items` | JSON list (or `results` page) of magic items |
//! | `markdown-sections` | one text entry per `# Heading` |
//! | `markdown-stat-blocks` | one stat block per `# Heading` |
//! | `html-sections` | one text entry per `<h1>`-`<h3>` heading |
//!
//! # Usage
//!
//! ```ignore
//! use compendium::parser::ParserRegistry;
//!
//! let registry = ParserRegistry::with_builtins();
//! let components = registry.decode(&source_text, &descriptor)?;
//! ```

pub mod html;
pub mod json;
mod license;
pub mod markdown;
mod registry;

pub use license::parse_license;
pub use markdown::{split_sections, MarkdownSection};
pub use registry::ParserRegistry;

use crate::config::SourceDescriptor;
use crate::error::Result;
use crate::types::GameComponent;

/// Decodes one source payload into components, in payload order.
///
/// Decoders fill in name, description, kind and any labels they can derive
/// from the payload. Source metadata (title, tags, license) is stamped on
/// afterwards by the pipeline.
pub trait Decoder: Send + Sync {
    fn decode(&self, raw: &str, source: &SourceDescriptor) -> Result<Vec<GameComponent>>;
}

/// Convert a byte offset into a 1-based line number.
pub(crate) fn line_of_offset(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}
