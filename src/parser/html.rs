//! HTML section scraping.
//!
//! Pages are split at every `<h1>`, `<h2>` or `<h3>` heading. The heading
//! text becomes the entry name and everything up to the next heading becomes
//! its description, with block-level tags turned into line breaks and all
//! other markup stripped.
//!
//! There is no DOM; tags are found by ASCII case-insensitive scanning.

use crate::config::SourceDescriptor;
use crate::error::{CompendiumError, Result};
use crate::types::{ComponentKind, GameComponent};

use super::{line_of_offset, Decoder};

/// Fast ASCII-only lowercasing for tag matching. Byte offsets are preserved.
pub fn to_lowercase_fast(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Decode the handful of entities reference pages actually use.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&rsquo;", "'")
        .replace("&mdash;", "-")
        .replace("&amp;", "&")
}

/// Collapse sequences of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Remove all tags, decode entities and collapse whitespace.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&normalize_entities(&out))
}

/// Convert an HTML fragment to plain text lines.
///
/// `<br>`, `<p>`, `<div>`, `<tr>` and headings break lines; `<li>` starts a
/// `- ` bullet. Blank lines are dropped.
pub fn fragment_to_text(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut chars = fragment.chars();

    while let Some(ch) = chars.next() {
        if ch != '<' {
            out.push(ch);
            continue;
        }

        let mut tag = String::new();
        for c in chars.by_ref() {
            if c == '>' {
                break;
            }
            tag.push(c);
        }

        let name: String = to_lowercase_fast(tag.trim_start_matches('/'))
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();

        match name.as_str() {
            "li" if !tag.starts_with('/') => out.push_str("\n- "),
            "br" | "p" | "div" | "tr" | "li" | "ul" | "ol" | "h4" | "h5" | "h6" => out.push('\n'),
            _ => {}
        }
    }

    normalize_entities(&out)
        .lines()
        .map(normalize_ws)
        .filter(|line| !line.is_empty() && line != "-")
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte ranges of one heading element and of its inner content.
struct Heading {
    start: usize,
    end: usize,
    inner_start: usize,
    inner_end: usize,
}

/// Find every `<h1>`..`<h3>` element in document order.
fn find_headings(html: &str) -> Result<Vec<Heading>> {
    let lc = to_lowercase_fast(html);
    let bytes = lc.as_bytes();
    let mut headings = Vec::new();
    let mut from = 0;

    while let Some(rel) = lc[from..].find("<h") {
        let start = from + rel;
        let level = bytes.get(start + 2).copied();
        let after = bytes.get(start + 3).copied();
        from = start + 2;

        let is_heading = matches!(level, Some(b'1'..=b'3'))
            && matches!(after, Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r'));
        if !is_heading {
            continue;
        }

        let open_end = match lc[start..].find('>') {
            Some(i) => start + i + 1,
            None => {
                return Err(CompendiumError::malformed_at(
                    line_of_offset(html, start),
                    "Unterminated heading tag",
                ))
            }
        };

        let close = format!("</h{}", (level.unwrap_or(b'1') - b'0'));
        let close_start = match lc[open_end..].find(&close) {
            Some(i) => open_end + i,
            None => {
                return Err(CompendiumError::malformed_at(
                    line_of_offset(html, start),
                    format!("Heading is never closed with {}>", close),
                ))
            }
        };
        let end = lc[close_start..]
            .find('>')
            .map(|i| close_start + i + 1)
            .unwrap_or(lc.len());

        headings.push(Heading {
            start,
            end,
            inner_start: open_end,
            inner_end: close_start,
        });
        from = end;
    }

    Ok(headings)
}

/// Split a page into `(name, text)` sections.
pub fn split_html_sections(html: &str) -> Result<Vec<(String, String)>> {
    let headings = find_headings(html)?;
    let lc = to_lowercase_fast(html);
    let page_end = lc.rfind("</body").unwrap_or(html.len());

    let mut sections = Vec::with_capacity(headings.len());
    for (i, heading) in headings.iter().enumerate() {
        let name = strip_tags(&html[heading.inner_start..heading.inner_end]);
        if name.is_empty() {
            return Err(CompendiumError::malformed_at(
                line_of_offset(html, heading.start),
                "Heading has no text",
            ));
        }

        let content_end = headings
            .get(i + 1)
            .map(|next| next.start)
            .unwrap_or(page_end)
            .max(heading.end);
        let text = fragment_to_text(&html[heading.end..content_end]);

        sections.push((name, text));
    }

    Ok(sections)
}

/// `html-sections`: one free-text component per heading.
pub struct HtmlSections;

impl Decoder for HtmlSections {
    fn decode(&self, raw: &str, _source: &SourceDescriptor) -> Result<Vec<GameComponent>> {
        Ok(split_html_sections(raw)?
            .into_iter()
            .map(|(name, text)| GameComponent::new(name, text, ComponentKind::Text))
            .collect())
    }
}
