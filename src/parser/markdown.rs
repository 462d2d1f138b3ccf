//! Markdown section splitting.
//!
//! A Markdown source holds one entry per top-level `# Heading`. Everything
//! before the first heading (front matter, a table of contents) is ignored.
//! Headings inside fenced code blocks do not split.

use crate::config::SourceDescriptor;
use crate::error::{CompendiumError, Result};
use crate::types::{ComponentKind, GameComponent};

use super::Decoder;

/// One `# Heading` and the lines beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownSection {
    /// Heading text without the `# ` marker.
    pub heading: String,
    /// Lines under the heading, leading and trailing blank lines removed.
    pub body: String,
    /// 1-based line of the heading.
    pub line: usize,
}

/// Split Markdown into sections at each top-level heading.
pub fn split_sections(source: &str) -> Result<Vec<MarkdownSection>> {
    let mut sections = Vec::new();
    let mut current: Option<(String, usize, Vec<&str>)> = None;
    let mut in_code_block = false;

    for (i, line) in source.lines().enumerate() {
        let trimmed = line.trim();

        // Track code blocks to avoid splitting inside them
        if trimmed.starts_with("```") {
            in_code_block = !in_code_block;
        }

        let heading = if in_code_block {
            None
        } else {
            heading_text(line)
        };

        match heading {
            Some(text) => {
                if text.is_empty() {
                    return Err(CompendiumError::MalformedSource {
                        message: "Heading has no text".to_string(),
                        line: Some(i + 1),
                        help: Some("Give every `# ` heading an entry name".to_string()),
                    });
                }
                if let Some((heading, line, lines)) = current.take() {
                    sections.push(finish_section(heading, line, &lines));
                }
                current = Some((text.to_string(), i + 1, Vec::new()));
            }
            None => {
                if let Some((_, _, lines)) = current.as_mut() {
                    lines.push(line);
                }
            }
        }
    }

    if let Some((heading, line, lines)) = current.take() {
        sections.push(finish_section(heading, line, &lines));
    }

    Ok(sections)
}

/// Return the heading text if `line` is a top-level heading.
fn heading_text(line: &str) -> Option<&str> {
    let line = line.trim_end();
    if line == "#" {
        return Some("");
    }
    line.strip_prefix("# ").map(str::trim)
}

fn finish_section(heading: String, line: usize, lines: &[&str]) -> MarkdownSection {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(start);

    MarkdownSection {
        heading,
        body: lines[start..end.max(start)].join("\n"),
        line,
    }
}

/// `markdown-sections`: one free-text component per heading.
pub struct MarkdownSections;

impl Decoder for MarkdownSections {
    fn decode(&self, raw: &str, _source: &SourceDescriptor) -> Result<Vec<GameComponent>> {
        Ok(split_sections(raw)?
            .into_iter()
            .map(|section| GameComponent::new(section.heading, section.body, ComponentKind::Text))
            .collect())
    }
}

/// `markdown-stat-blocks`: one stat-block component per heading.
///
/// The section body is kept verbatim; it is re-parsed by the stat-block
/// reconstructor when entries are emitted.
pub struct MarkdownStatBlocks;

impl Decoder for MarkdownStatBlocks {
    fn decode(&self, raw: &str, source: &SourceDescriptor) -> Result<Vec<GameComponent>> {
        Ok(split_sections(raw)?
            .into_iter()
            .map(|section| {
                GameComponent::new(
                    section.heading,
                    section.body,
                    ComponentKind::StatBlock {
                        category: source.category.clone(),
                    },
                )
            })
            .collect())
    }
}
