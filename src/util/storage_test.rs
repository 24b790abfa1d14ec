use super::*;
use serde::Deserialize;

fn store_with(backend: &MemoryStorage) -> PersistentStore {
    PersistentStore::new(Rc::new(backend.clone()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Prefs {
    theme: String,
    tags: Vec<String>,
    nested: Option<Box<Prefs>>,
}

// =============================================================
// Round trips
// =============================================================

#[test]
fn set_then_get_returns_equal_values() {
    let store = store_with(&MemoryStorage::new());
    let prefs = Prefs {
        theme: "dark".to_owned(),
        tags: vec!["a".to_owned(), "b".to_owned()],
        nested: Some(Box::new(Prefs { theme: "light".to_owned(), tags: vec![], nested: None })),
    };
    store.set("prefs", &prefs);
    assert_eq!(store.get_opt::<Prefs>("prefs"), Some(prefs));

    store.set("count", &42_u32);
    assert_eq!(store.get("count", 0_u32), 42);

    let value = serde_json::json!({"a": [1, 2, {"b": null}], "c": "x"});
    store.set("blob", &value);
    assert_eq!(store.get("blob", serde_json::Value::Null), value);
}

#[test]
fn values_written_are_visible_to_a_fresh_store_over_the_same_backend() {
    let backend = MemoryStorage::new();
    store_with(&backend).set("token", "abc");
    assert_eq!(store_with(&backend).get_opt::<String>("token"), Some("abc".to_owned()));
    assert_eq!(backend.raw("token").as_deref(), Some("\"abc\""));
}

// =============================================================
// Fallbacks
// =============================================================

#[test]
fn missing_key_returns_fallback() {
    let store = store_with(&MemoryStorage::new());
    assert_eq!(store.get("nope", 7_i32), 7);
    assert!(!store.contains("nope"));
}

#[test]
fn unparseable_value_returns_fallback() {
    let backend = MemoryStorage::new();
    backend.write("broken", "{not json").unwrap();
    let store = store_with(&backend);
    assert_eq!(store.get("broken", String::from("fallback")), "fallback");
}

#[test]
fn wrong_shape_returns_fallback() {
    let store = store_with(&MemoryStorage::new());
    store.set("n", "text");
    assert_eq!(store.get("n", 5_u8), 5);
}

#[test]
fn unavailable_backend_reads_fall_back() {
    let store = PersistentStore::new(Rc::new(BrowserStorage));
    assert_eq!(store.get("anything", 3_u8), 3);
}

// =============================================================
// Write failures
// =============================================================

#[test]
fn quota_failure_still_updates_in_memory_value() {
    let backend = MemoryStorage::with_quota(8);
    let store = store_with(&backend);
    store.set("key", "a value far larger than eight bytes");
    assert_eq!(backend.raw("key"), None);
    assert_eq!(
        store.get_opt::<String>("key").as_deref(),
        Some("a value far larger than eight bytes")
    );
}

#[test]
fn unavailable_backend_writes_are_kept_in_memory() {
    let store = PersistentStore::new(Rc::new(BrowserStorage));
    store.set("theme", "dark");
    assert_eq!(store.get_opt::<String>("theme").as_deref(), Some("dark"));
    store.remove("theme");
    assert_eq!(store.get_opt::<String>("theme"), None);
}

#[test]
fn remove_clears_backend_and_overlay() {
    let backend = MemoryStorage::new();
    let store = store_with(&backend);
    store.set("user", &serde_json::json!({"id": "1"}));
    store.remove("user");
    assert!(!store.contains("user"));
    assert_eq!(backend.raw("user"), None);
}

#[test]
fn quota_counts_existing_entries_but_not_the_replaced_key() {
    let backend = MemoryStorage::with_quota(20);
    backend.write("a", "12345").unwrap();
    assert!(backend.write("a", "1234567890").is_ok());
    assert_eq!(
        backend.write("b", "1234567890"),
        Err(StorageError::QuotaExceeded { key: "b".to_owned() })
    );
}
