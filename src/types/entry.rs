//! Output records consumed by the campaign logging tool.

use serde::{Deserialize, Serialize};

/// One canonical campaign log entry.
///
/// Field order here is the serialized field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignEntry {
    /// Full Markdown text of the entry.
    pub raw_text: String,

    /// Player-visible text. Generated entries are GM-only, so this is empty.
    pub raw_public: String,

    pub labels: Vec<String>,

    pub tag_symbol: String,

    pub tag_value: String,
}

/// A log section entry. Generated compendiums never carry any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub title: String,
    pub raw_text: String,
}

/// A complete compendium file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompendiumFile {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub entries: Vec<CampaignEntry>,
    pub logs: Vec<LogRecord>,
}

impl CompendiumFile {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
        entries: Vec<CampaignEntry>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image_url: image_url.into(),
            entries,
            logs: Vec::new(),
        }
    }
}
