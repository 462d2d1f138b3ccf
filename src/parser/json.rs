//! Structured JSON decoders for creature, spell and item lists.
//!
//! Accepts either a bare JSON array or an API page of the form
//! `{ "results": [...] }`. Field shapes vary between public APIs (numbers
//! vs strings, nested `{ "name": ... }` objects, arrays of paragraphs), so
//! loosely-typed fields are read as `serde_json::Value` and flattened to text.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::config::SourceDescriptor;
use crate::error::{CompendiumError, Result};
use crate::types::{ComponentKind, GameComponent};

use super::Decoder;

/// Parse a JSON payload into typed records.
fn parse_records<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(raw).map_err(|e| CompendiumError::MalformedSource {
        message: format!("Invalid JSON: {}", e),
        line: Some(e.line()),
        help: None,
    })?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(CompendiumError::MalformedSource {
                    message: "Expected a JSON array or an object with a `results` array".to_string(),
                    line: None,
                    help: Some("Point data_uri at a list endpoint".to_string()),
                });
            }
        },
        _ => {
            return Err(CompendiumError::malformed(
                "Expected a JSON array or an object with a `results` array",
            ));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if let Some(name) = item.get("name").and_then(Value::as_str) {
                if name.trim().is_empty() {
                    return Err(CompendiumError::malformed(format!("Record {}: empty name", index)));
                }
            }
            serde_json::from_value(item).map_err(|e| {
                CompendiumError::malformed(format!("Record {}: {}", index, e))
            })
        })
        .collect()
}

/// Flatten a loosely-typed JSON value to display text.
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => {
            if let Some(name) = map.get("name") {
                return text(name);
            }
            map.iter()
                .map(|(key, value)| format!("{} {}", key, text(value)))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Flatten a description that may be a string or an array of paragraphs.
fn paragraphs(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n"),
        other => text(other),
    }
}

/// Named block such as a special ability or action.
#[derive(Debug, Deserialize)]
struct NamedBlock {
    name: String,
    #[serde(default)]
    desc: Value,
}

#[derive(Debug, Deserialize)]
struct CreatureRecord {
    name: String,
    #[serde(default)]
    size: Value,
    #[serde(default, rename = "type")]
    creature_type: Value,
    #[serde(default)]
    subtype: Value,
    #[serde(default)]
    alignment: Value,
    #[serde(default)]
    armor_class: Value,
    #[serde(default)]
    hit_points: Value,
    #[serde(default)]
    hit_dice: Value,
    #[serde(default)]
    speed: Value,
    #[serde(default)]
    challenge_rating: Value,
    #[serde(default)]
    strength: Value,
    #[serde(default)]
    dexterity: Value,
    #[serde(default)]
    constitution: Value,
    #[serde(default)]
    intelligence: Value,
    #[serde(default)]
    wisdom: Value,
    #[serde(default)]
    charisma: Value,
    #[serde(default)]
    desc: Value,
    #[serde(default)]
    special_abilities: Vec<NamedBlock>,
    #[serde(default)]
    actions: Vec<NamedBlock>,
}

impl CreatureRecord {
    fn into_component(self) -> GameComponent {
        let mut lines = Vec::new();

        let mut kind_line = [text(&self.size), text(&self.creature_type)]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let subtype = text(&self.subtype);
        if !subtype.is_empty() {
            kind_line.push_str(&format!(" ({})", subtype));
        }
        let alignment = text(&self.alignment);
        if !alignment.is_empty() {
            if kind_line.is_empty() {
                kind_line = alignment.clone();
            } else {
                kind_line.push_str(&format!(", {}", alignment));
            }
        }
        if !kind_line.is_empty() {
            lines.push(format!("*{}*", kind_line));
            lines.push(String::new());
        }

        let hit_points = text(&self.hit_points);
        let hit_dice = text(&self.hit_dice);
        let stats = [
            ("Armor Class", text(&self.armor_class)),
            (
                "Hit Points",
                match (hit_points.is_empty(), hit_dice.is_empty()) {
                    (false, false) => format!("{} ({})", hit_points, hit_dice),
                    (false, true) => hit_points,
                    _ => hit_dice,
                },
            ),
            ("Speed", text(&self.speed)),
            ("Challenge", text(&self.challenge_rating)),
        ];
        for (key, value) in &stats {
            if !value.is_empty() {
                lines.push(format!("- **{}** {}", key, value));
            }
        }

        let scores = [
            ("STR", &self.strength),
            ("DEX", &self.dexterity),
            ("CON", &self.constitution),
            ("INT", &self.intelligence),
            ("WIS", &self.wisdom),
            ("CHA", &self.charisma),
        ];
        if scores.iter().any(|(_, v)| !v.is_null()) {
            lines.push(String::new());
            lines.push(
                scores
                    .iter()
                    .map(|(key, value)| format!("{} {}", key, text(value)))
                    .collect::<Vec<_>>()
                    .join(" | "),
            );
        }

        let desc = paragraphs(&self.desc);
        if !desc.is_empty() {
            lines.push(String::new());
            lines.push(desc);
        }

        push_blocks(&mut lines, "Special Abilities", &self.special_abilities);
        push_blocks(&mut lines, "Actions", &self.actions);

        let description = lines.join("\n").trim().to_string();
        let mut component = GameComponent::new(self.name, description, ComponentKind::Creature);
        component.push_label("Monster");
        component.push_keyed_label("CR", &text(&self.challenge_rating));
        component.push_keyed_label("Type", &text(&self.creature_type));
        component
    }
}

fn push_blocks(lines: &mut Vec<String>, title: &str, blocks: &[NamedBlock]) {
    if blocks.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("**{}**", title));
    for block in blocks {
        lines.push(format!("- ***{}.*** {}", block.name.trim(), paragraphs(&block.desc)));
    }
}

#[derive(Debug, Deserialize)]
struct SpellRecord {
    name: String,
    #[serde(default)]
    level: Value,
    #[serde(default)]
    level_int: Value,
    #[serde(default)]
    school: Value,
    #[serde(default)]
    casting_time: Value,
    #[serde(default)]
    range: Value,
    #[serde(default)]
    components: Value,
    #[serde(default)]
    duration: Value,
    #[serde(default)]
    desc: Value,
    #[serde(default)]
    higher_level: Value,
}

impl SpellRecord {
    fn into_component(self) -> GameComponent {
        // Open5e sends `level: "1st-level"` plus `level_int`; the SRD API sends a number.
        let level = if self.level_int.is_null() {
            text(&self.level)
        } else {
            text(&self.level_int)
        };
        let school = text(&self.school);

        let mut lines = Vec::new();
        let fields = [
            ("Level", level.clone()),
            ("School", school.clone()),
            ("Casting Time", text(&self.casting_time)),
            ("Range", text(&self.range)),
            ("Components", text(&self.components)),
            ("Duration", text(&self.duration)),
        ];
        for (key, value) in &fields {
            if !value.is_empty() {
                lines.push(format!("- **{}** {}", key, value));
            }
        }

        let desc = paragraphs(&self.desc);
        if !desc.is_empty() {
            lines.push(String::new());
            lines.push(desc);
        }
        let higher = paragraphs(&self.higher_level);
        if !higher.is_empty() {
            lines.push(String::new());
            lines.push(format!("**At Higher Levels.** {}", higher));
        }

        let description = lines.join("\n").trim().to_string();
        let mut component = GameComponent::new(self.name, description, ComponentKind::Spell);
        component.push_label("Spell");
        component.push_keyed_label("Level", &level);
        component.push_keyed_label("School", &school);
        component
    }
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    name: String,
    #[serde(default, rename = "type")]
    item_type: Value,
    #[serde(default)]
    equipment_category: Value,
    #[serde(default)]
    rarity: Value,
    #[serde(default)]
    requires_attunement: Value,
    #[serde(default)]
    desc: Value,
}

impl ItemRecord {
    fn into_component(self) -> GameComponent {
        let item_type = match text(&self.item_type) {
            t if t.is_empty() => text(&self.equipment_category),
            t => t,
        };
        let rarity = text(&self.rarity);
        let attunement = text(&self.requires_attunement);

        let mut summary = [item_type.as_str(), rarity.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        if !attunement.is_empty() && attunement != "false" {
            summary.push_str(&format!(" ({})", attunement));
        }

        let mut lines = Vec::new();
        if !summary.trim().is_empty() {
            lines.push(format!("*{}*", summary.trim()));
            lines.push(String::new());
        }
        lines.push(paragraphs(&self.desc));

        let description = lines.join("\n").trim().to_string();
        let mut component = GameComponent::new(self.name, description, ComponentKind::Item);
        component.push_label("Item");
        component.push_keyed_label("Rarity", &rarity);
        component
    }
}

/// `json-creatures`
pub struct JsonCreatures;

impl Decoder for JsonCreatures {
    fn decode(&self, raw: &str, _source: &SourceDescriptor) -> Result<Vec<GameComponent>> {
        Ok(parse_records::<CreatureRecord>(raw)?
            .into_iter()
            .map(CreatureRecord::into_component)
            .collect())
    }
}

/// `json-spells`
pub struct JsonSpells;

impl Decoder for JsonSpells {
    fn decode(&self, raw: &str, _source: &SourceDescriptor) -> Result<Vec<GameComponent>> {
        Ok(parse_records::<SpellRecord>(raw)?
            .into_iter()
            .map(SpellRecord::into_component)
            .collect())
    }
}

/// `json-items`
pub struct JsonItems;

impl Decoder for JsonItems {
    fn decode(&self, raw: &str, _source: &SourceDescriptor) -> Result<Vec<GameComponent>> {
        Ok(parse_records::<ItemRecord>(raw)?
            .into_iter()
            .map(ItemRecord::into_component)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source(parser: &str) -> SourceDescriptor {
        SourceDescriptor::new("api", "https://api.example.com/v1/list.json", "https://api.example.com/license.json", parser)
    }

    #[test]
    fn test_creatures_from_results_page() {
        let raw = r#"{
  "count": 2,
  "results": [
    {
      "name": "Goblin",
      "size": "Small",
      "type": "humanoid",
      "subtype": "goblinoid",
      "alignment": "neutral evil",
      "armor_class": 15,
      "hit_points": 7,
      "hit_dice": "2d6",
      "speed": {"walk": 30},
      "challenge_rating": "1/4",
      "strength": 8, "dexterity": 14, "constitution": 10,
      "intelligence": 10, "wisdom": 8, "charisma": 8,
      "actions": [{"name": "Scimitar", "desc": "Melee Weapon Attack: +4 to hit."}]
    },
    { "name": "Wolf", "type": "beast", "challenge_rating": 0.25 }
  ]
}"#;

        let components = JsonCreatures.decode(raw, &source("json-creatures")).unwrap();

        assert_eq!(components.len(), 2);
        let goblin = &components[0];
        assert_eq!(goblin.name, "Goblin");
        assert_eq!(goblin.kind, ComponentKind::Creature);
        assert_eq!(goblin.labels, vec!["Monster", "CR: 1/4", "Type: humanoid"]);
        assert_eq!(
            goblin.description,
            "*Small humanoid (goblinoid), neutral evil*\n\
             \n\
             - **Armor Class** 15\n\
             - **Hit Points** 7 (2d6)\n\
             - **Speed** walk 30\n\
             - **Challenge** 1/4\n\
             \n\
             STR 8 | DEX 14 | CON 10 | INT 10 | WIS 8 | CHA 8\n\
             \n\
             **Actions**\n\
             - ***Scimitar.*** Melee Weapon Attack: +4 to hit."
        );

        assert_eq!(components[1].labels, vec!["Monster", "CR: 0.25", "Type: beast"]);
    }

    #[test]
    fn test_spells_from_array() {
        let raw = r#"[{
  "name": "Magic Missile",
  "level": 1,
  "school": {"name": "Evocation"},
  "casting_time": "1 action",
  "range": "120 feet",
  "components": ["V", "S"],
  "duration": "Instantaneous",
  "desc": ["You create three glowing darts.", "Each dart hits."]
}]"#;

        let components = JsonSpells.decode(raw, &source("json-spells")).unwrap();

        assert_eq!(components[0].labels, vec!["Spell", "Level: 1", "School: Evocation"]);
        assert!(components[0].description.contains("- **Components** V, S"));
        assert!(components[0]
            .description
            .ends_with("You create three glowing darts.\n\nEach dart hits."));
    }

    #[test]
    fn test_items_with_rarity() {
        let raw = r#"[{"name": "Bag of Holding", "type": "Wondrous item", "rarity": "uncommon", "requires_attunement": "", "desc": "Roomy."}]"#;

        let components = JsonItems.decode(raw, &source("json-items")).unwrap();

        assert_eq!(components[0].labels, vec!["Item", "Rarity: uncommon"]);
        assert_eq!(components[0].description, "*Wondrous item, uncommon*\n\nRoomy.");
    }

    #[test]
    fn test_invalid_json_reports_line() {
        let raw = "[\n{\"name\": \"Goblin\",\n\"size\": }\n]";

        let result = JsonCreatures.decode(raw, &source("json-creatures"));

        assert!(matches!(
            result,
            Err(CompendiumError::MalformedSource { line: Some(3), .. })
        ));
    }

    #[test]
    fn test_missing_name_is_malformed() {
        let raw = r#"[{"size": "Large"}]"#;

        let result = JsonCreatures.decode(raw, &source("json-creatures"));

        assert!(matches!(result, Err(CompendiumError::MalformedSource { .. })));
    }

    #[test]
    fn test_empty_name_is_malformed() {
        let raw = r#"[{"name": "Goblin"}, {"name": ""}, {"name": "Orc"}]"#;

        let result = JsonCreatures.decode(raw, &source("json-creatures"));

        match result {
            Err(CompendiumError::MalformedSource { message, .. }) => {
                assert_eq!(message, "Record 1: empty name");
            }
            other => panic!("expected MalformedSource, got {:?}", other.map(|c| c.len())),
        }

        let blank = JsonSpells.decode(r#"{"results": [{"name": "  "}]}"#, &source("json-spells"));
        assert!(matches!(blank, Err(CompendiumError::MalformedSource { .. })));
    }

    #[test]
    fn test_scalar_payload_is_malformed() {
        let result = JsonSpells.decode("42", &source("json-spells"));
        assert!(result.is_err());

        let result = JsonSpells.decode(r#"{"count": 0}"#, &source("json-spells"));
        assert!(result.is_err());
    }
}
