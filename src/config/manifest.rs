//! Compendium manifest (compendium.yaml) parsing.
//!
//! The manifest names the compendium, its output metadata, and the ordered
//! list of sources to merge.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CompendiumError, Result};
use crate::parser::ParserRegistry;
use crate::validation::{validate_manifest, ValidationResult};

use super::SourceDescriptor;

/// Compendium manifest loaded from compendium.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Compendium title written to the output file.
    pub title: String,

    /// Compendium description written to the output file.
    pub description: String,

    /// Cover image URL written to the output file.
    pub image_url: String,

    /// Game system id used in stat-block templates (`stat-block.<system>`).
    #[serde(default = "default_system")]
    pub system: String,

    /// Labels prepended to every entry, in this order.
    pub default_labels: Vec<String>,

    /// Tag symbol for sources that do not override it.
    #[serde(default = "default_tag_symbol")]
    pub tag_symbol: String,

    /// Tag value prefix for sources that do not override it.
    pub tag_value_prefix: String,

    /// Directory raw downloads are cached in.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Output file for the compendium.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Per-request timeout for downloads.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Sources in merge order. Earlier sources win name collisions.
    pub sources: Vec<SourceDescriptor>,
}

fn default_system() -> String {
    "bx".to_string()
}

fn default_tag_symbol() -> String {
    "~".to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_output() -> PathBuf {
    PathBuf::from("compendium.json")
}

fn default_fetch_timeout() -> u64 {
    30
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            image_url: String::new(),
            system: default_system(),
            default_labels: vec![],
            tag_symbol: default_tag_symbol(),
            tag_value_prefix: String::new(),
            cache_dir: default_cache_dir(),
            output: default_output(),
            fetch_timeout_secs: default_fetch_timeout(),
            sources: vec![],
        }
    }
}

impl Manifest {
    /// Load manifest from a compendium.yaml file.
    ///
    /// Relative `cache_dir` and `output` paths are resolved against the
    /// manifest's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CompendiumError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        let mut manifest = Self::parse(&content)?;
        if let Some(base) = path.parent() {
            manifest.resolve_paths(base);
        }
        Ok(manifest)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| CompendiumError::Config {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check compendium.yaml syntax".to_string()),
        })
    }

    fn resolve_paths(&mut self, base: &Path) {
        if self.cache_dir.is_relative() {
            self.cache_dir = base.join(&self.cache_dir);
        }
        if self.output.is_relative() {
            self.output = base.join(&self.output);
        }
    }

    /// Request timeout for downloads.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Tag symbol for a source, falling back to the compendium default.
    pub fn tag_symbol_for<'a>(&'a self, source: &'a SourceDescriptor) -> &'a str {
        source.tag_symbol.as_deref().unwrap_or(&self.tag_symbol)
    }

    /// Tag value prefix for a source, falling back to the compendium default.
    pub fn tag_value_prefix_for<'a>(&'a self, source: &'a SourceDescriptor) -> &'a str {
        source
            .tag_value_prefix
            .as_deref()
            .unwrap_or(&self.tag_value_prefix)
    }

    /// Check the manifest against a parser registry without fetching.
    pub fn validate(&self, registry: &ParserRegistry) -> ValidationResult {
        validate_manifest(self, registry)
    }

    /// Look up a source by name.
    pub fn source(&self, name: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| s.name == name)
    }
}
