//! Line-oriented stat-block section parser.
//!
//! A single pass over trimmed lines with one piece of state, the section the
//! parser is currently in. `key: value` lines are dispatched by key; other
//! lines are free text.

/// Fenced code block marker.
const FENCE: &str = "```";

/// The section the parser is currently collecting lines for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    None,
    Stats,
    Traits,
}

/// Everything recovered from one stat-block body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatBlockSections {
    pub title: String,
    pub description: String,
    pub treasure_type: String,
    pub alignment: String,
    pub hit_dice: String,
    /// Full lines seen under `stats:`, in order.
    pub stat_lines: Vec<String>,
    /// Full lines seen under `traits:`, in order.
    pub trait_lines: Vec<String>,
    /// Lines that are not `key: value`, in order.
    pub free_text_lines: Vec<String>,
}

/// Split a trimmed line into `(key, value)` at the first colon.
pub fn split_key_value(line: &str) -> Option<(&str, &str)> {
    line.split_once(':')
        .map(|(key, value)| (key.trim(), value.trim()))
}

/// Parse a stat-block body.
///
/// `key: value` lines outside `stats:`/`traits:` whose key is not `title`
/// or `description` are dropped.
pub fn parse_sections(body: &str) -> StatBlockSections {
    let mut sections = StatBlockSections::default();
    let mut current = Section::None;

    for raw in body.lines() {
        let line = raw.trim();

        let Some((key, value)) = split_key_value(line) else {
            if !line.starts_with(FENCE) {
                sections.free_text_lines.push(line.to_string());
            }
            current = Section::None;
            continue;
        };

        match key {
            "title" => {
                sections.title = value.to_string();
                current = Section::None;
            }
            "description" => {
                sections.description = value.to_string();
                current = Section::None;
            }
            "stats" => current = Section::Stats,
            "traits" => current = Section::Traits,
            _ => match current {
                Section::Stats => {
                    sections.stat_lines.push(line.to_string());
                    match key {
                        "- Treasure Type" => sections.treasure_type = value.to_string(),
                        "- Alignment" => sections.alignment = value.to_string(),
                        "- Hit Dice" => sections.hit_dice = value.to_string(),
                        _ => {}
                    }
                }
                Section::Traits => sections.trait_lines.push(line.to_string()),
                Section::None => {}
            },
        }
    }

    sections
}
