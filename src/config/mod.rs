//! Compendium configuration.
//!
//! A compendium is described by a `compendium.yaml` manifest holding the
//! output metadata and an ordered list of source descriptors.

mod manifest;
mod source;

pub use manifest::Manifest;
pub use source::SourceDescriptor;

/// The default name of the manifest file.
pub const MANIFEST_FILENAME: &str = "compendium.yaml";
