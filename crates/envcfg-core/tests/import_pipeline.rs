use std::fs;

use envcfg_core::fs::{DepthRange, DiscoveryQuery};
use envcfg_core::import::{ImportPipeline, LineLevel, MemoryReporter};
use envcfg_core::reader::reader_for_format;
use envcfg_core::scope::{ScopeCatalog, ScopeResolver, ScopeValidator};
use envcfg_core::sink::MemorySink;
use envcfg_core::transform::{DirectiveRegistry, ValueTransformer};
use envcfg_core::types::FileFormat;
use tempfile::TempDir;

/// Accepts anything, resolves ids to themselves.
struct Permissive;

impl ScopeValidator for Permissive {
    fn validate(&self, _scope: &str, _scope_id: &str) -> bool {
        true
    }
}

impl ScopeResolver for Permissive {
    fn resolve(&self, scope_id: &str, _scope: &str) -> anyhow::Result<String> {
        Ok(scope_id.to_string())
    }
}

#[test]
fn host_directives_apply_and_unknown_ones_pass_through() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("values.yaml"),
        "a/upper:\n  default:\n    0: '!upper shout'\na/unknown:\n  default:\n    0: '!nope keep me'\n",
    )
    .unwrap();

    let mut registry = DirectiveRegistry::new();
    registry.register("upper", |payload: &str| -> anyhow::Result<String> {
        Ok(payload.to_uppercase())
    });
    let transformer = ValueTransformer::new(registry);
    let reader = reader_for_format(FileFormat::Yaml);
    let mut sink = MemorySink::new();
    let query = DiscoveryQuery::new(tmp.path(), FileFormat::Yaml, None).unwrap();

    ImportPipeline::new(reader.as_ref(), &mut sink, &Permissive, &Permissive, &transformer)
        .run(&query, &mut MemoryReporter::new())
        .unwrap();

    assert_eq!(sink.get("default", "0", "a/upper"), Some("SHOUT"));
    assert_eq!(sink.get("default", "0", "a/unknown"), Some("!nope keep me"));
}

#[test]
fn values_are_coerced_to_strings() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("values.json"),
        r#"{
            "a/flag_on": {"default": {"0": true}},
            "a/flag_off": {"default": {"0": false}},
            "a/nothing": {"default": {"0": null}},
            "a/number": {"default": {"0": 1.5}},
            "a/list": {"default": {"0": ["x", 2]}}
        }"#,
    )
    .unwrap();

    let reader = reader_for_format(FileFormat::Json);
    let transformer = ValueTransformer::default();
    let mut sink = MemorySink::new();
    let query = DiscoveryQuery::new(tmp.path(), FileFormat::Json, None).unwrap();

    let report = ImportPipeline::new(reader.as_ref(), &mut sink, &Permissive, &Permissive, &transformer)
        .run(&query, &mut MemoryReporter::new())
        .unwrap();

    assert_eq!(report.total_written(), 5);
    assert_eq!(sink.get("default", "0", "a/flag_on"), Some("1"));
    assert_eq!(sink.get("default", "0", "a/flag_off"), Some(""));
    assert_eq!(sink.get("default", "0", "a/nothing"), Some(""));
    assert_eq!(sink.get("default", "0", "a/number"), Some("1.5"));
    assert_eq!(sink.get("default", "0", "a/list"), Some(r#"["x",2]"#));
}

#[test]
fn files_are_processed_in_name_order_with_one_summary_each() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("b")).unwrap();
    fs::write(tmp.path().join("b/later.yml"), "x/y:\n  default:\n    0: second\n").unwrap();
    fs::write(tmp.path().join("a.yml"), "x/y:\n  default:\n    0: first\n").unwrap();
    fs::write(tmp.path().join("ignored.yaml"), "x/y:\n  default:\n    0: wrong\n").unwrap();

    let reader = reader_for_format(FileFormat::Yml);
    let transformer = ValueTransformer::default();
    let mut sink = MemorySink::new();
    let query = DiscoveryQuery::new(tmp.path(), FileFormat::Yml, None).unwrap();
    let mut reporter = MemoryReporter::new();

    ImportPipeline::new(reader.as_ref(), &mut sink, &Permissive, &Permissive, &transformer)
        .run(&query, &mut reporter)
        .unwrap();

    // The later file wins for the same key.
    assert_eq!(sink.get("default", "0", "x/y"), Some("second"));
    assert_eq!(sink.writes(), 2);
    let infos = reporter.texts(LineLevel::Info);
    assert_eq!(infos.len(), 2);
    assert!(infos[0].ends_with("a.yml with 1 value(s)."));
    assert!(infos[1].ends_with("later.yml with 1 value(s)."));
}

#[test]
fn catalog_rejects_non_zero_default_id() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("values.yaml"),
        "a/b:\n  default:\n    1: wrong\n    0: right\n",
    )
    .unwrap();

    let catalog = ScopeCatalog::new();
    let reader = reader_for_format(FileFormat::Yaml);
    let transformer = ValueTransformer::default();
    let mut sink = MemorySink::new();
    let depth = DepthRange::parse(["== 0"]).unwrap();
    let query = DiscoveryQuery::new(tmp.path(), FileFormat::Yaml, Some(depth)).unwrap();

    let report = ImportPipeline::new(reader.as_ref(), &mut sink, &catalog, &catalog, &transformer)
        .run(&query, &mut MemoryReporter::new())
        .unwrap();

    assert_eq!(report.total_written(), 1);
    assert_eq!(report.diagnostics().count(), 1);
    assert_eq!(sink.get("default", "0", "a/b"), Some("right"));
}
