//! Parser id → decoder lookup.

use std::collections::BTreeMap;

use crate::config::SourceDescriptor;
use crate::error::{CompendiumError, Result};
use crate::types::GameComponent;

use super::html::HtmlSections;
use super::json::{JsonCreatures, JsonItems, JsonSpells};
use super::markdown::{MarkdownSections, MarkdownStatBlocks};
use super::Decoder;

/// Registry of decoders keyed by parser id.
///
/// Populated once at startup; adding a format is a `register` call and
/// touches nothing downstream.
#[derive(Default)]
pub struct ParserRegistry {
    decoders: BTreeMap<String, Box<dyn Decoder>>,
}

impl ParserRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in parser registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register("json-creatures", JsonCreatures)
            .register("json-spells", JsonSpells)
            .register("json-items", JsonItems)
            .register("markdown-sections", MarkdownSections)
            .register("markdown-stat-blocks", MarkdownStatBlocks)
            .register("html-sections", HtmlSections);
        registry
    }

    /// Register (or replace) a decoder under `id`.
    pub fn register(&mut self, id: impl Into<String>, decoder: impl Decoder + 'static) -> &mut Self {
        self.decoders.insert(id.into(), Box::new(decoder));
        self
    }

    /// Look up the decoder for a parser id.
    pub fn resolve(&self, id: &str) -> Result<&dyn Decoder> {
        self.decoders
            .get(id)
            .map(|d| d.as_ref())
            .ok_or_else(|| CompendiumError::UnknownParser {
                parser: id.to_string(),
            })
    }

    /// Check whether a parser id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.decoders.contains_key(id)
    }

    /// Registered parser ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.decoders.keys().map(|s| s.as_str())
    }

    /// Resolve the source's parser and decode `raw` with it.
    pub fn decode(&self, raw: &str, source: &SourceDescriptor) -> Result<Vec<GameComponent>> {
        let decoder = self.resolve(&source.parser)?;
        decoder.decode(raw, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComponentKind;

    struct LineDecoder;

    impl Decoder for LineDecoder {
        fn decode(&self, raw: &str, _source: &SourceDescriptor) -> Result<Vec<GameComponent>> {
            Ok(raw
                .lines()
                .map(|l| GameComponent::new(l, "", ComponentKind::Text))
                .collect())
        }
    }

    #[test]
    fn test_builtin_ids() {
        let registry = ParserRegistry::with_builtins();
        let ids: Vec<&str> = registry.ids().collect();

        assert_eq!(
            ids,
            vec![
                "html-sections",
                "json-creatures",
                "json-items",
                "json-spells",
                "markdown-sections",
                "markdown-stat-blocks",
            ]
        );
    }

    #[test]
    fn test_resolve_unknown_parser() {
        let registry = ParserRegistry::with_builtins();

        let result = registry.resolve("xml-creatures");

        assert!(matches!(
            result,
            Err(CompendiumError::UnknownParser { ref parser }) if parser == "xml-creatures"
        ));
    }

    #[test]
    fn test_register_custom_decoder() {
        let mut registry = ParserRegistry::new();
        registry.register("lines", LineDecoder);

        let source = SourceDescriptor::new("list", "https://a/list.txt", "https://a/l.yaml", "lines");
        let components = registry.decode("Goblin\nOrc\n", &source).unwrap();

        assert!(registry.contains("lines"));
        assert_eq!(components.len(), 2);
        assert_eq!(components[1].name, "Orc");
    }
}
