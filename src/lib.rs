//! compendium - TTRPG source ingestion pipeline
//!
//! A library for fetching open tabletop RPG content (creatures, spells,
//! items, stat blocks) from many sources, normalizing it into one component
//! model, de-duplicating it, and emitting a compendium file for a campaign
//! logging tool.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod statblock;
pub mod types;
pub mod validation;

pub use aggregate::{aggregate, Aggregate, Aggregator, Skip, SourceTally};
pub use config::{Manifest, SourceDescriptor, MANIFEST_FILENAME};
pub use emit::{compendium_file, to_json, write_compendium, EntryEmitter};
pub use error::{CompendiumError, Result};
pub use fetch::{Cache, Fetcher, HttpFetcher, MemoryFetcher};
pub use parser::{Decoder, ParserRegistry};
pub use pipeline::{build_compendium, plan_fetches, BuildReport, Pipeline};
pub use statblock::{ReconstructedBlock, StatBlockReconstructor};
pub use types::{CampaignEntry, CompendiumFile, ComponentKind, GameComponent, LicenseInfo};
pub use validation::{validate_manifest, Diagnostic, Severity, ValidationResult};
