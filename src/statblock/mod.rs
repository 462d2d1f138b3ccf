//! Stat-block reconstruction.
//!
//! Markdown sources carry creature stat blocks as loosely structured text:
//! `title:`/`description:` lines, a `stats:` list, a `traits:` list and
//! free prose. The reconstructor re-parses that text, rewrites it into a
//! templated block for the campaign log, and derives labels (treasure type,
//! alignment, hit dice) from the recovered fields.
//!
//! # Example
//!
//! ```ignore
//! use compendium::statblock::StatBlockReconstructor;
//!
//! let reconstructor = StatBlockReconstructor::new("bx");
//! let block = reconstructor.reconstruct(&component)?;
//! println!("{}", block.body);
//! ```

mod labels;
mod sections;

pub use labels::{derive_labels, hit_dice_numbers};
pub use sections::{parse_sections, split_key_value, Section, StatBlockSections};

use crate::error::{CompendiumError, Result};
use crate::types::{ComponentKind, GameComponent};

/// A rebuilt stat block ready to become a campaign entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructedBlock {
    /// Templated Markdown body.
    pub body: String,
    /// Category plus derived labels.
    pub labels: Vec<String>,
}

/// Rebuilds stat-block components for one game system.
#[derive(Debug, Clone)]
pub struct StatBlockReconstructor {
    system: String,
}

impl StatBlockReconstructor {
    /// Create a reconstructor emitting `template: stat-block.<system>`.
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    /// Reconstruct one stat-block component.
    ///
    /// Fails with `ComponentValidation` when the component has no category
    /// or an empty body.
    pub fn reconstruct(&self, component: &GameComponent) -> Result<ReconstructedBlock> {
        let category = match &component.kind {
            ComponentKind::StatBlock { category } => category.as_deref().unwrap_or("").trim(),
            other => {
                return Err(CompendiumError::invalid_component(
                    &component.name,
                    format!("expected a stat block, found {}", other),
                ))
            }
        };

        if category.is_empty() {
            return Err(CompendiumError::invalid_component(
                &component.name,
                "stat block has no category label",
            ));
        }
        if component.description.trim().is_empty() {
            return Err(CompendiumError::invalid_component(
                &component.name,
                "stat block body is empty",
            ));
        }

        let mut sections = parse_sections(&component.description);
        if sections.title.is_empty() {
            sections.title = component.name.clone();
        }

        Ok(ReconstructedBlock {
            body: self.render(&sections, &component.attribution()),
            labels: derive_labels(category, &sections),
        })
    }

    /// Render the templated block followed by free text and attribution.
    pub fn render(&self, sections: &StatBlockSections, attribution: &str) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push("```".to_string());
        lines.push(format!("template: stat-block.{}", self.system));
        lines.push(key_line("title", &sections.title));
        lines.push(key_line("description", &sections.description));
        lines.push("stats:".to_string());
        lines.extend(sections.stat_lines.iter().cloned());
        lines.push("traits:".to_string());
        lines.extend(sections.trait_lines.iter().cloned());
        lines.push("```".to_string());
        lines.extend(sections.free_text_lines.iter().cloned());
        lines.push(attribution.to_string());

        lines.join("\n")
    }
}

fn key_line(key: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{}:", key)
    } else {
        format!("{}: {}", key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LicenseInfo;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn stat_block(name: &str, body: &str, category: Option<&str>) -> GameComponent {
        let mut component = GameComponent::new(
            name,
            body,
            ComponentKind::StatBlock {
                category: category.map(str::to_string),
            },
        );
        component.source_title = "Old School Bestiary".to_string();
        component.attach_license(&Arc::new(LicenseInfo::new(
            "Necrotic Gnome",
            "https://example.com/ogl",
        )));
        component
    }

    #[test]
    fn test_reconstruct_labels() {
        let body = "stats:\n- Treasure Type: None\n- Alignment: Chaotic\n- Hit Dice: 3*/4";
        let component = stat_block("Gargoyle", body, Some("Monster"));

        let block = StatBlockReconstructor::new("bx").reconstruct(&component).unwrap();

        assert_eq!(
            block.labels,
            vec![
                "Monster",
                "Treasure Type: None",
                "Alignment: Chaotic",
                "Special Abilities",
                "HD: 3",
                "HD: 4",
            ]
        );
    }

    #[test]
    fn test_reconstruct_body() {
        let body = "\
title: Goblin
description: Small humanoids.
Level: 1
stats:
- Hit Dice: 1-1 (3hp)
traits:
- Infravision: 90'
```
Goblins hate dwarves.";
        let component = stat_block("Goblin", body, Some("Monster"));

        let block = StatBlockReconstructor::new("bx").reconstruct(&component).unwrap();

        assert_eq!(
            block.body,
            "\
```
template: stat-block.bx
title: Goblin
description: Small humanoids.
stats:
- Hit Dice: 1-1 (3hp)
traits:
- Infravision: 90'
```
Goblins hate dwarves.
Source: Old School Bestiary (Necrotic Gnome) - https://example.com/ogl"
        );
        assert_eq!(block.labels, vec!["Monster", "HD: 1", "HD: 1"]);
    }

    #[test]
    fn test_missing_title_uses_component_name() {
        let component = stat_block("Ghoul", "stats:\n- Hit Dice: 2*", Some("Undead"));

        let block = StatBlockReconstructor::new("ose").reconstruct(&component).unwrap();

        assert!(block.body.contains("\ntitle: Ghoul\n"));
        assert!(block.body.contains("\ndescription:\n"));
        assert!(block.body.starts_with("```\ntemplate: stat-block.ose\n"));
    }

    #[test]
    fn test_missing_category_is_invalid() {
        let component = stat_block("Ghoul", "stats:\n- Hit Dice: 2", None);

        let result = StatBlockReconstructor::new("bx").reconstruct(&component);

        assert!(matches!(
            result,
            Err(CompendiumError::ComponentValidation { ref component, .. }) if component == "Ghoul"
        ));
    }

    #[test]
    fn test_empty_body_is_invalid() {
        let component = stat_block("Ghoul", "  \n ", Some("Monster"));

        let result = StatBlockReconstructor::new("bx").reconstruct(&component);

        assert!(matches!(result, Err(CompendiumError::ComponentValidation { .. })));
    }

    #[test]
    fn test_non_stat_block_is_invalid() {
        let component = GameComponent::new("Fireball", "Boom.", ComponentKind::Spell);

        let result = StatBlockReconstructor::new("bx").reconstruct(&component);

        assert!(result.is_err());
    }
}
