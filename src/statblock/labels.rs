//! Labels derived from reconstructed stat-block fields.

use std::sync::LazyLock;

use regex::Regex;

use super::StatBlockSections;

static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Hit-dice numbers: every ASCII digit run before the first `(`.
///
/// `3*/4` yields `["3", "4"]`; `1+1 (5hp)` yields `["1", "1"]`.
pub fn hit_dice_numbers(hit_dice: &str) -> Vec<&str> {
    let head = match hit_dice.find('(') {
        Some(paren) => &hit_dice[..paren],
        None => hit_dice,
    };
    DIGIT_RUN_RE.find_iter(head).map(|m| m.as_str()).collect()
}

/// Build the label list for a stat block.
///
/// Order: category, treasure type, alignment, special abilities, hit dice.
pub fn derive_labels(category: &str, sections: &StatBlockSections) -> Vec<String> {
    let mut labels = vec![category.to_string()];

    if !sections.treasure_type.is_empty() {
        labels.push(format!("Treasure Type: {}", sections.treasure_type));
    }
    if !sections.alignment.is_empty() {
        labels.push(format!("Alignment: {}", sections.alignment));
    }
    if !sections.hit_dice.is_empty() {
        // An asterisk on the hit dice marks special abilities (B/X convention).
        if sections.hit_dice.contains('*') {
            labels.push("Special Abilities".to_string());
        }
        for hd in hit_dice_numbers(&sections.hit_dice) {
            labels.push(format!("HD: {}", hd));
        }
    }

    labels
}
