//! Source descriptors: one data feed and how to decode it.

use serde::{Deserialize, Serialize};

/// Configuration for one data source within a compendium.
///
/// Read-only for the duration of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Short identifier used in logs and reports.
    pub name: String,

    /// Human-readable source title used in attributions. Defaults to `name`.
    #[serde(default)]
    pub title: Option<String>,

    /// Where the content lives.
    pub data_uri: String,

    /// Where the license document (YAML or JSON `organization`/`url`) lives.
    pub license_uri: String,

    /// Registered parser id, e.g. `json-creatures` or `markdown-stat-blocks`.
    pub parser: String,

    /// Maximum number of new (non-duplicate) components taken from this source.
    #[serde(default)]
    pub import_limit: Option<usize>,

    /// Re-download even when a cached copy exists.
    #[serde(default)]
    pub overwrite: bool,

    /// Base category label for stat blocks, e.g. `Monster`.
    #[serde(default)]
    pub category: Option<String>,

    /// Extra labels added to every component of this source.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Tag symbol override for this source.
    #[serde(default)]
    pub tag_symbol: Option<String>,

    /// Tag value prefix for this source.
    #[serde(default)]
    pub tag_value_prefix: Option<String>,
}

impl SourceDescriptor {
    /// Create a descriptor with only the required fields set.
    pub fn new(
        name: impl Into<String>,
        data_uri: impl Into<String>,
        license_uri: impl Into<String>,
        parser: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: None,
            data_uri: data_uri.into(),
            license_uri: license_uri.into(),
            parser: parser.into(),
            import_limit: None,
            overwrite: false,
            category: None,
            labels: Vec::new(),
            tag_symbol: None,
            tag_value_prefix: None,
        }
    }

    /// Set the import limit.
    pub fn with_import_limit(mut self, limit: usize) -> Self {
        self.import_limit = Some(limit);
        self
    }

    /// Set the stat-block category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Title used in attribution lines.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// True when `count` accepted components exhaust the import limit.
    pub fn limit_reached(&self, count: usize) -> bool {
        self.import_limit.is_some_and(|limit| count >= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_defaults_to_name() {
        let mut source = SourceDescriptor::new("srd", "https://a/b.json", "https://a/l.json", "json-creatures");
        assert_eq!(source.display_title(), "srd");

        source.title = Some("System Reference Document".to_string());
        assert_eq!(source.display_title(), "System Reference Document");
    }

    #[test]
    fn test_limit_reached() {
        let unlimited = SourceDescriptor::new("a", "u", "l", "p");
        assert!(!unlimited.limit_reached(10_000));

        let limited = unlimited.with_import_limit(2);
        assert!(!limited.limit_reached(1));
        assert!(limited.limit_reached(2));
    }

    #[test]
    fn test_deserialize_minimal() {
        let yaml = r#"
name: bestiary
data_uri: https://example.com/data/bestiary.md
license_uri: https://example.com/data/license.yaml
parser: markdown-stat-blocks
"#;
        let source: SourceDescriptor = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(source.name, "bestiary");
        assert_eq!(source.import_limit, None);
        assert!(!source.overwrite);
        assert!(source.labels.is_empty());
    }
}
