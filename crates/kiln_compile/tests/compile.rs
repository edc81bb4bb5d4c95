//! End-to-end compile tests.

use kiln_cache::{CacheStore, DirStore, MemoryStore};
use kiln_compile::{compile, CompileOutcome, MapResolver, NoIncludes};

const CONFIG_RECIPE: &str = "struct Config { width: u32, height: u32, fullscreen: bool }";
const CONFIG_DATA: &str = "width: 1024, height: 768, fullscreen: true";

fn config_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1024u32.to_le_bytes());
    bytes.extend_from_slice(&768u32.to_le_bytes());
    bytes.push(1);
    bytes
}

#[test]
fn end_to_end_config() {
    let store = MemoryStore::new();
    let result = compile(CONFIG_RECIPE, CONFIG_DATA, &NoIncludes, &store);
    assert!(result.log.good(), "errors: {}", result.render_log());
    assert_eq!(result.outcome, CompileOutcome::Recompiled);
    assert_eq!(result.binary.unwrap(), config_bytes());
}

#[test]
fn caching_is_idempotent() {
    let store = MemoryStore::new();
    let first = compile(CONFIG_RECIPE, CONFIG_DATA, &NoIncludes, &store);
    let second = compile(CONFIG_RECIPE, CONFIG_DATA, &NoIncludes, &store);
    assert_eq!(first.outcome, CompileOutcome::Recompiled);
    assert_eq!(second.outcome, CompileOutcome::CacheHit);
    assert!(second.log.is_empty());
    assert_eq!(first.binary, second.binary);
}

#[test]
fn changed_data_recompiles() {
    let store = MemoryStore::new();
    compile(CONFIG_RECIPE, CONFIG_DATA, &NoIncludes, &store);
    let changed = compile(
        CONFIG_RECIPE,
        "width: 640, height: 480, fullscreen: false",
        &NoIncludes,
        &store,
    );
    assert_eq!(changed.outcome, CompileOutcome::Recompiled);
    assert!(changed.log.good());
}

#[test]
fn missing_field_fails_and_leaves_cache_untouched() {
    let store = MemoryStore::new();
    let result = compile(CONFIG_RECIPE, "width: 1024, height: 768", &NoIncludes, &store);
    assert!(!result.log.good());
    assert_eq!(result.log.error_count(), 1);
    assert!(result.render_log().contains("fullscreen"));
    assert!(result.binary.is_none());
    assert!(store.is_empty());

    // Still a miss next time: failed compiles are never cached.
    let again = compile(CONFIG_RECIPE, "width: 1024, height: 768", &NoIncludes, &store);
    assert_eq!(again.outcome, CompileOutcome::Recompiled);
}

#[test]
fn unexpected_field_is_reported() {
    let store = MemoryStore::new();
    let result = compile(
        CONFIG_RECIPE,
        "width: 1024, height: 768, fullscreen: true, depth: 32",
        &NoIncludes,
        &store,
    );
    assert_eq!(result.log.error_count(), 1);
    assert!(result.render_log().contains("depth"));
}

#[test]
fn enum_payload_end_to_end() {
    let store = MemoryStore::new();
    let result = compile(
        "enum Shape { Circle(radius: f32), Square(side: f32) }",
        "Circle(radius: 2.5)",
        &NoIncludes,
        &store,
    );
    assert!(result.log.good(), "errors: {}", result.render_log());
    let mut expected = vec![0u8];
    expected.extend_from_slice(&2.5f32.to_le_bytes());
    assert_eq!(result.binary.unwrap(), expected);
}

#[test]
fn generic_arity_end_to_end() {
    let store = MemoryStore::new();
    let good = compile(
        "struct Box<T> { value: T }, b: Box<u32>",
        "b: { value: 9 }",
        &NoIncludes,
        &store,
    );
    assert!(good.log.good(), "errors: {}", good.render_log());

    let bad = compile(
        "struct Box<T> { value: T }, b: Box<u32, i32>",
        "b: { value: 9 }",
        &NoIncludes,
        &store,
    );
    assert!(!bad.log.good());
    assert_eq!(bad.log.error_count(), 1);
}

#[test]
fn syntax_error_fails_compile() {
    let store = MemoryStore::new();
    let result = compile("width u32", "width: 1", &NoIncludes, &store);
    assert!(!result.log.good());
    assert!(result.binary.is_none());
}

#[test]
fn includes_merge_into_scope() {
    let mut resolver = MapResolver::new();
    resolver.insert("colors", "struct Color { r: u8, g: u8, b: u8 }");
    let store = MemoryStore::new();
    let result = compile(
        "include colors; background: Color",
        "background: { r: 10, g: 20, b: 30 }",
        &resolver,
        &store,
    );
    assert!(result.log.good(), "errors: {}", result.render_log());
    assert_eq!(result.binary.unwrap(), vec![10, 20, 30]);
}

#[test]
fn changed_include_invalidates_cache() {
    let store = MemoryStore::new();
    let entry = "include geometry; p: Point";
    let data = "p: { x: 1, y: 2 }";

    let mut resolver = MapResolver::new();
    resolver.insert("geometry", "struct Point { x: u8, y: u8 }");
    let first = compile(entry, data, &resolver, &store);
    assert_eq!(first.outcome, CompileOutcome::Recompiled);

    // Entry and data unchanged; only the included text differs.
    resolver.insert("geometry", "struct Point { x: u16, y: u16 }");
    let second = compile(entry, data, &resolver, &store);
    assert_eq!(second.outcome, CompileOutcome::Recompiled);
    assert_ne!(first.binary, second.binary);
}

#[test]
fn missing_include_is_fatal() {
    let store = MemoryStore::new();
    let result = compile("include ghost; x: u8", "x: 1", &NoIncludes, &store);
    assert!(!result.log.good());
    assert!(result.binary.is_none());
    assert!(result.render_log().contains("ghost"));
    assert!(store.is_empty());
}

#[test]
fn cyclic_include_is_fatal() {
    let mut resolver = MapResolver::new();
    resolver.insert("a", "include b; s1: u8");
    resolver.insert("b", "include a; s2: u8");
    let store = MemoryStore::new();
    let result = compile("include a; x: u8", "x: 1", &resolver, &store);
    assert!(!result.log.good());
    assert!(result.binary.is_none());
    assert!(result.render_log().contains("cycle"));
}

#[test]
fn transitive_includes_resolve() {
    let mut resolver = MapResolver::new();
    resolver.insert("outer", "include inner;");
    resolver.insert("inner", "struct Leaf { v: u8 }");
    let store = MemoryStore::new();
    let result = compile("include outer; leaf: Leaf", "leaf: { v: 5 }", &resolver, &store);
    assert!(result.log.good(), "errors: {}", result.render_log());
    assert_eq!(result.binary.unwrap(), vec![5]);
}

#[test]
fn duplicate_map_key_is_error() {
    let store = MemoryStore::new();
    let result = compile("a: u32", "a: 1, a: 2", &NoIncludes, &store);
    assert!(!result.log.good());
    assert!(result.render_log().contains("duplicate"));
}

#[test]
fn diagnostics_carry_locations() {
    let store = MemoryStore::new();
    let result = compile(CONFIG_RECIPE, "width: true, height: 768, fullscreen: true", &NoIncludes, &store);
    assert!(!result.log.good());
    // The bad value sits on line 1 of the data source.
    assert!(result.render_log().contains("<data>:1:"));
}

#[test]
fn dir_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();

    let store = DirStore::new(dir.path());
    let first = compile(CONFIG_RECIPE, CONFIG_DATA, &NoIncludes, &store);
    assert_eq!(first.outcome, CompileOutcome::Recompiled);

    // A fresh store over the same directory sees the artifact.
    let store = DirStore::new(dir.path());
    let second = compile(CONFIG_RECIPE, CONFIG_DATA, &NoIncludes, &store);
    assert_eq!(second.outcome, CompileOutcome::CacheHit);
    assert_eq!(first.binary, second.binary);
}

#[test]
fn concurrent_compiles_share_a_store() {
    use std::sync::Arc;
    use std::thread;

    let store = Arc::new(MemoryStore::new());
    let mut handles = Vec::new();
    for i in 0..4u32 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            let data = format!("width: {i}, height: {i}, fullscreen: false");
            let result = compile(CONFIG_RECIPE, &data, &NoIncludes, &*store);
            assert!(result.log.good());
            result.binary.unwrap()
        }));
    }
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.len(), 4);
}
