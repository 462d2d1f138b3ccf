//! Canonical game component produced by every decoder.
//!
//! Decoders normalize their source schema straight into `GameComponent`;
//! the only per-format information that survives is the `ComponentKind`
//! tag, which selects the emit rule.

use std::fmt;
use std::sync::Arc;

use super::LicenseInfo;

/// What a component describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    Creature,
    Spell,
    Item,
    /// Free text under a heading.
    Text,
    /// Markdown stat block that is re-parsed at emit time.
    ///
    /// `category` is the base label (e.g. `Monster`) the reconstructor
    /// requires; it comes from the source descriptor.
    StatBlock { category: Option<String> },
}

impl ComponentKind {
    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Creature => "creature",
            ComponentKind::Spell => "spell",
            ComponentKind::Item => "item",
            ComponentKind::Text => "text",
            ComponentKind::StatBlock { .. } => "stat-block",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single piece of game content (creature, spell, item or text block).
///
/// Two components are duplicates when their names are equal; no other
/// field takes part in identity.
#[derive(Debug, Clone)]
pub struct GameComponent {
    /// Unique key within a compendium (case-sensitive).
    pub name: String,

    /// Markdown description. For stat blocks this is the raw block body.
    pub description: String,

    /// Human-readable title of the source this came from.
    pub source_title: String,

    /// Ordered labels; duplicates allowed.
    pub labels: Vec<String>,

    /// Campaign log tag symbol (e.g. `@`, `~`).
    pub tag_symbol: String,

    /// Prefix prepended to the name to form the tag value.
    pub tag_value_prefix: String,

    /// License attached by the aggregator.
    pub license: Option<Arc<LicenseInfo>>,

    pub kind: ComponentKind,
}

impl GameComponent {
    /// Create a component with empty source metadata.
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            source_title: String::new(),
            labels: Vec::new(),
            tag_symbol: String::new(),
            tag_value_prefix: String::new(),
            license: None,
            kind,
        }
    }

    /// Append a label, skipping labels whose value part is empty.
    pub fn push_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !label.trim().is_empty() {
            self.labels.push(label);
        }
    }

    /// Append `"<key>: <value>"` when the value is non-empty.
    pub fn push_keyed_label(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.labels.push(format!("{}: {}", key, value));
        }
    }

    /// Attach license fields, replacing any earlier license.
    pub fn attach_license(&mut self, license: &Arc<LicenseInfo>) {
        self.license = Some(Arc::clone(license));
    }

    /// Publisher name from the attached license.
    pub fn publisher_name(&self) -> Option<&str> {
        self.license.as_deref().map(|l| l.organization.as_str())
    }

    /// License URL from the attached license.
    pub fn license_url(&self) -> Option<&str> {
        self.license.as_deref().map(|l| l.url.as_str())
    }

    /// Tag value used by the campaign log (`prefix + name`).
    pub fn tag_value(&self) -> String {
        format!("{}{}", self.tag_value_prefix, self.name)
    }

    /// One-line attribution: `Source: <title> (<publisher>) - <license url>`.
    pub fn attribution(&self) -> String {
        let mut line = format!("Source: {}", self.source_title);
        if let Some(publisher) = self.publisher_name().filter(|p| !p.is_empty()) {
            line.push_str(&format!(" ({})", publisher));
        }
        if let Some(url) = self.license_url().filter(|u| !u.is_empty()) {
            line.push_str(&format!(" - {}", url));
        }
        line
    }
}

impl PartialEq for GameComponent {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for GameComponent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_name_only() {
        let a = GameComponent::new("Goblin", "small", ComponentKind::Creature);
        let b = GameComponent::new("Goblin", "different text", ComponentKind::Text);
        let c = GameComponent::new("goblin", "small", ComponentKind::Creature);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_attach_license_overwrites() {
        let mut component = GameComponent::new("Goblin", "", ComponentKind::Creature);
        component.attach_license(&Arc::new(LicenseInfo::new("Old", "https://old")));
        component.attach_license(&Arc::new(LicenseInfo::new("New", "https://new")));

        assert_eq!(component.publisher_name(), Some("New"));
        assert_eq!(component.license_url(), Some("https://new"));
    }

    #[test]
    fn test_attribution() {
        let mut component = GameComponent::new("Goblin", "", ComponentKind::Creature);
        component.source_title = "SRD 5.1".to_string();
        assert_eq!(component.attribution(), "Source: SRD 5.1");

        component.attach_license(&Arc::new(LicenseInfo::new(
            "Wizards of the Coast",
            "https://creativecommons.org/licenses/by/4.0/",
        )));
        assert_eq!(
            component.attribution(),
            "Source: SRD 5.1 (Wizards of the Coast) - https://creativecommons.org/licenses/by/4.0/"
        );
    }

    #[test]
    fn test_keyed_label_skips_empty_values() {
        let mut component = GameComponent::new("Goblin", "", ComponentKind::Creature);
        component.push_keyed_label("CR", "1/4");
        component.push_keyed_label("Type", "  ");
        component.push_label("");

        assert_eq!(component.labels, vec!["CR: 1/4"]);
    }

    #[test]
    fn test_tag_value() {
        let mut component = GameComponent::new("Goblin", "", ComponentKind::Creature);
        component.tag_value_prefix = "Monster_".to_string();
        assert_eq!(component.tag_value(), "Monster_Goblin");
    }
}
