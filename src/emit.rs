//! Campaign entry emission and compendium serialization.

use std::path::Path;

use crate::aggregate::Skip;
use crate::config::Manifest;
use crate::error::{CompendiumError, Result};
use crate::fetch::write_atomic;
use crate::statblock::StatBlockReconstructor;
use crate::types::{CampaignEntry, CompendiumFile, ComponentKind, GameComponent};

/// Entries produced from a component list, plus the components left out.
#[derive(Debug, Default)]
pub struct Emitted {
    pub entries: Vec<CampaignEntry>,
    pub skips: Vec<Skip>,
}

/// Converts components into campaign entries.
#[derive(Debug, Clone)]
pub struct EntryEmitter {
    default_labels: Vec<String>,
    reconstructor: StatBlockReconstructor,
}

impl EntryEmitter {
    /// Create an emitter that prepends `default_labels` to every entry and
    /// renders stat blocks for `system`.
    pub fn new(default_labels: Vec<String>, system: impl Into<String>) -> Self {
        Self {
            default_labels,
            reconstructor: StatBlockReconstructor::new(system),
        }
    }

    /// Create an emitter from manifest settings.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self::new(manifest.default_labels.clone(), manifest.system.clone())
    }

    /// Convert one component.
    pub fn entry(&self, component: &GameComponent) -> Result<CampaignEntry> {
        if component.name.trim().is_empty() {
            return Err(CompendiumError::invalid_component(
                &component.name,
                "component has no name",
            ));
        }

        let mut labels = self.default_labels.clone();
        labels.extend(component.labels.iter().cloned());

        let raw_text = match component.kind {
            ComponentKind::StatBlock { .. } => {
                let block = self.reconstructor.reconstruct(component)?;
                labels.extend(block.labels);
                block.body
            }
            _ => generic_text(component),
        };

        Ok(CampaignEntry {
            raw_text,
            raw_public: String::new(),
            labels,
            tag_symbol: component.tag_symbol.clone(),
            tag_value: component.tag_value(),
        })
    }

    /// Convert every component, skipping (and recording) invalid ones.
    pub fn emit(&self, components: &[GameComponent]) -> Emitted {
        let mut emitted = Emitted::default();

        for component in components {
            match self.entry(component) {
                Ok(entry) => emitted.entries.push(entry),
                Err(error) => {
                    tracing::warn!(
                        source = %component.source_title,
                        component = %component.name,
                        error = %error,
                        "skipping component"
                    );
                    emitted.skips.push(Skip {
                        source: component.source_title.clone(),
                        component: Some(component.name.clone()),
                        reason: error.to_string(),
                    });
                }
            }
        }

        emitted
    }
}

/// Heading, description and attribution.
fn generic_text(component: &GameComponent) -> String {
    let mut parts = vec![format!("# {}", component.name)];
    if !component.description.trim().is_empty() {
        parts.push(component.description.clone());
    }
    parts.push(component.attribution());
    parts.join("\n\n")
}

/// Wrap entries with the manifest's compendium metadata.
pub fn compendium_file(manifest: &Manifest, entries: Vec<CampaignEntry>) -> CompendiumFile {
    CompendiumFile::new(
        manifest.title.clone(),
        manifest.description.clone(),
        manifest.image_url.clone(),
        entries,
    )
}

/// Serialize a compendium as pretty-printed JSON with a trailing newline.
///
/// Field order follows the struct definitions, so unchanged input always
/// produces identical bytes.
pub fn to_json(file: &CompendiumFile) -> Result<String> {
    let mut json = serde_json::to_string_pretty(file).map_err(|e| CompendiumError::Serialization {
        path: Default::default(),
        message: e.to_string(),
    })?;
    json.push('\n');
    Ok(json)
}

/// Serialize and write a compendium atomically.
///
/// Content goes to a temporary file in the target directory and is renamed
/// over `path` only once fully written.
pub fn write_compendium(path: &Path, file: &CompendiumFile) -> Result<()> {
    let json = to_json(file).map_err(|e| match e {
        CompendiumError::Serialization { message, .. } => CompendiumError::Serialization {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CompendiumError::Serialization {
            path: path.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    write_atomic(path, json.as_bytes()).map_err(|e| CompendiumError::Serialization {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
