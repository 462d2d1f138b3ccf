use std::fs;
use std::path::Path;

use compendium::{build_compendium, CompendiumFile, Manifest, MemoryFetcher, Pipeline, SourceDescriptor};
use pretty_assertions::assert_eq;

const BESTIARY_URI: &str = "https://osr.example/bestiary/monsters.md";
const BESTIARY_LICENSE_URI: &str = "https://osr.example/bestiary/license.yaml";
const SRD_URI: &str = "https://api.example.com/v1/monsters/page.json";
const SRD_LICENSE_URI: &str = "https://api.example.com/v1/license.json";

fn fetcher() -> MemoryFetcher {
    MemoryFetcher::new()
        .with(BESTIARY_URI, include_str!("fixtures/bestiary.md"))
        .with(BESTIARY_LICENSE_URI, include_str!("fixtures/license.yaml"))
        .with(SRD_URI, include_str!("fixtures/monsters.json"))
        .with(SRD_LICENSE_URI, include_str!("fixtures/srd-license.json"))
}

fn bestiary() -> SourceDescriptor {
    let mut source = SourceDescriptor::new("osr", BESTIARY_URI, BESTIARY_LICENSE_URI, "markdown-stat-blocks")
        .with_category("Monster");
    source.title = Some("OSR Bestiary".to_string());
    source
}

fn srd() -> SourceDescriptor {
    let mut source = SourceDescriptor::new("srd", SRD_URI, SRD_LICENSE_URI, "json-creatures");
    source.title = Some("SRD 5.1".to_string());
    source
}

fn manifest(root: &Path, sources: Vec<SourceDescriptor>) -> Manifest {
    Manifest {
        title: "Old School Bestiary".to_string(),
        description: "Open monsters".to_string(),
        image_url: "https://osr.example/cover.png".to_string(),
        default_labels: vec!["Compendium".to_string(), "OSR".to_string()],
        cache_dir: root.join("cache"),
        output: root.join("compendium.json"),
        sources,
        ..Default::default()
    }
}

fn read_output(path: &Path) -> CompendiumFile {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_stat_block_compendium_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = manifest(dir.path(), vec![bestiary()]);

    let report = build_compendium(&manifest, &manifest.output, &fetcher()).unwrap();

    assert_eq!(report.entries, 2);
    assert!(report.skips.is_empty());
    let json = fs::read_to_string(&manifest.output).unwrap();
    insta::assert_snapshot!("osr_bestiary", json.trim_end());
}

#[test]
fn test_two_headings_get_default_labels_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MemoryFetcher::new()
        .with("https://notes.example/rules/conditions.md", "# Blinded\nCannot see.\n\n# Charmed\nFriendly.\n")
        .with("https://notes.example/rules/license.yaml", include_str!("fixtures/license.yaml"));
    let source = SourceDescriptor::new(
        "conditions",
        "https://notes.example/rules/conditions.md",
        "https://notes.example/rules/license.yaml",
        "markdown-sections",
    )
    .with_import_limit(100);
    let manifest = manifest(dir.path(), vec![source]);

    let report = build_compendium(&manifest, &manifest.output, &fetcher).unwrap();

    assert_eq!(report.entries, 2);
    let file = read_output(&manifest.output);
    assert_eq!(file.entries[0].labels, vec!["Compendium", "OSR"]);
    assert_eq!(file.entries[1].labels, vec!["Compendium", "OSR"]);
    assert_eq!(
        file.entries[0].raw_text,
        "# Blinded\n\nCannot see.\n\nSource: conditions (Necrotic Gnome) - https://osr.example/ogl"
    );
    assert_eq!(file.entries[1].tag_value, "Charmed");
}

#[test]
fn test_missing_source_does_not_block_others() {
    let dir = tempfile::tempdir().unwrap();
    let mut missing = SourceDescriptor::new(
        "gone",
        "https://gone.example/data/spells.json",
        SRD_LICENSE_URI,
        "json-spells",
    );
    missing.title = Some("Gone".to_string());
    let manifest = manifest(dir.path(), vec![missing, bestiary()]);

    let report = build_compendium(&manifest, &manifest.output, &fetcher()).unwrap();

    assert_eq!(report.entries, 2);
    assert_eq!(report.skips.len(), 1);
    assert_eq!(report.skips[0].source, "gone");
    assert!(report.skips[0].reason.contains("404"));
    assert_eq!(report.tallies[0].accepted, 0);
    assert_eq!(report.tallies[1].accepted, 2);
    assert!(!dir.path().join("cache/data/spells.json").exists());
}

#[test]
fn test_duplicates_across_sources_keep_first() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = manifest(dir.path(), vec![bestiary(), srd()]);

    let report = build_compendium(&manifest, &manifest.output, &fetcher()).unwrap();

    let file = read_output(&manifest.output);
    let names: Vec<&str> = file.entries.iter().map(|e| e.tag_value.as_str()).collect();
    assert_eq!(names, vec!["Goblin", "Gargoyle", "Owlbear"]);
    assert!(file.entries[0].raw_text.starts_with("```\ntemplate: stat-block.bx"));
    assert!(file.entries[2].labels.contains(&"CR: 3".to_string()));
    assert!(file.entries[2]
        .raw_text
        .ends_with("Source: SRD 5.1 (Wizards of the Coast) - https://creativecommons.org/licenses/by/4.0/"));
    assert_eq!(report.tallies[1].accepted, 1);
    assert_eq!(report.tallies[1].duplicates, 2);
}

#[test]
fn test_import_limit_bounds_new_entries() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = manifest(dir.path(), vec![srd().with_import_limit(2)]);

    let report = build_compendium(&manifest, &manifest.output, &fetcher()).unwrap();

    assert_eq!(report.entries, 2);
    assert_eq!(report.tallies[0].truncated, 1);
}

#[test]
fn test_rebuild_is_byte_identical_and_cached() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = manifest(dir.path(), vec![bestiary(), srd()]);
    let fetcher = fetcher();

    build_compendium(&manifest, &manifest.output, &fetcher).unwrap();
    let first = fs::read(&manifest.output).unwrap();
    let requests = fetcher.request_count();

    build_compendium(&manifest, &manifest.output, &fetcher).unwrap();
    let second = fs::read(&manifest.output).unwrap();

    assert_eq!(requests, 4);
    assert_eq!(fetcher.request_count(), 4);
    assert_eq!(first, second);
}

#[test]
fn test_overwrite_all_refetches() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = manifest(dir.path(), vec![bestiary()]);
    let fetcher = fetcher();

    build_compendium(&manifest, &manifest.output, &fetcher).unwrap();
    Pipeline::new(&fetcher)
        .overwrite_all(true)
        .run(&manifest, &manifest.output)
        .unwrap();

    assert_eq!(fetcher.request_count(), 4);
}

#[test]
fn test_unknown_parser_skips_source() {
    let dir = tempfile::tempdir().unwrap();
    let mut odd = srd();
    odd.parser = "csv-creatures".to_string();
    let manifest = manifest(dir.path(), vec![odd, bestiary()]);

    let report = build_compendium(&manifest, &manifest.output, &fetcher()).unwrap();

    assert_eq!(report.entries, 2);
    assert_eq!(report.skips[0].source, "srd");
    assert!(report.skips[0].reason.contains("csv-creatures"));
}

#[test]
fn test_uncategorized_stat_blocks_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = bestiary();
    source.category = None;
    let manifest = manifest(dir.path(), vec![source]);

    let report = build_compendium(&manifest, &manifest.output, &fetcher()).unwrap();

    assert_eq!(report.entries, 0);
    assert_eq!(report.skips.len(), 2);
    assert_eq!(report.skips[0].component.as_deref(), Some("Goblin"));
    assert_eq!(read_output(&manifest.output).entries.len(), 0);
}
