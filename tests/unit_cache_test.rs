use dispatchd::core::cache::{ResponseCache, persistence};
use dispatchd::core::envelope::Envelope;
use dispatchd::core::Params;
use serde_json::Value;
use std::time::Duration;

fn envelope(response: &str) -> Envelope {
    Envelope::success(
        "echo",
        Params::new(),
        Value::String(response.to_string()),
    )
}

#[tokio::test]
async fn test_get_on_empty_cache_is_a_miss() {
    let cache = ResponseCache::new(Duration::from_secs(3600));
    assert!(cache.get("/echo/say").is_none());
    assert!(!cache.contains("/echo/say"));
    assert_eq!(cache.misses(), 1);
}

#[tokio::test]
async fn test_put_then_get_returns_the_envelope() {
    let cache = ResponseCache::new(Duration::from_secs(3600));
    cache.put("/echo/say?text=bye", envelope("bye"));

    assert!(cache.contains("/echo/say?text=bye"));
    let cached = cache.get("/echo/say?text=bye").unwrap();
    assert_eq!(cached, envelope("bye"));
    assert_eq!(cache.hits(), 1);
}

#[tokio::test]
async fn test_entry_expires_and_is_lazily_evicted() {
    let cache = ResponseCache::new(Duration::from_millis(50));
    cache.put("/ping", envelope("pong"));

    assert!(cache.get("/ping").is_some());

    tokio::time::sleep(Duration::from_millis(60)).await;

    assert!(cache.get("/ping").is_none());
    // The expired entry was removed by the lookup itself.
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_contains_mirrors_freshness() {
    let cache = ResponseCache::new(Duration::from_millis(50));
    cache.put("/ping", envelope("pong"));

    assert!(cache.contains("/ping"));
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(!cache.contains("/ping"));
}

#[tokio::test]
async fn test_overwrite_resets_the_timestamp() {
    let cache = ResponseCache::new(Duration::from_millis(80));
    cache.put("/ping", envelope("old"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    cache.put("/ping", envelope("new"));

    // Past the first entry's expiry, but fresh relative to the overwrite.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let cached = cache.get("/ping").unwrap();
    assert_eq!(cached, envelope("new"));
}

#[tokio::test]
async fn test_take_dirty_counts_puts_since_last_flush() {
    let cache = ResponseCache::new(Duration::from_secs(3600));
    cache.put("/a", envelope("a"));
    cache.put("/b", envelope("b"));

    assert_eq!(cache.take_dirty(), 2);
    assert_eq!(cache.take_dirty(), 0);
}

#[tokio::test]
async fn test_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    let cache = ResponseCache::new(Duration::from_secs(3600));
    cache.put("/echo/say?text=bye", envelope("bye"));
    cache.put("/ping", envelope("pong"));

    let written = persistence::save(&cache, &path).unwrap();
    assert_eq!(written, 2);

    let restored = ResponseCache::new(Duration::from_secs(3600));
    let loaded = persistence::load(&restored, &path).unwrap();
    assert_eq!(loaded, 2);
    assert_eq!(restored.get("/ping").unwrap(), envelope("pong"));
    assert_eq!(
        restored.get("/echo/say?text=bye").unwrap(),
        envelope("bye")
    );
}

#[tokio::test]
async fn test_loading_a_missing_snapshot_is_an_empty_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ResponseCache::new(Duration::from_secs(3600));

    let loaded = persistence::load(&cache, &dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, 0);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_loading_a_corrupt_snapshot_fails_without_touching_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    std::fs::write(&path, "{not json").unwrap();

    let cache = ResponseCache::new(Duration::from_secs(3600));
    assert!(persistence::load(&cache, &path).is_err());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_save_overwrites_the_previous_snapshot_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    let cache = ResponseCache::new(Duration::from_secs(3600));
    cache.put("/ping", envelope("pong"));
    persistence::save(&cache, &path).unwrap();

    cache.put("/echo/say", envelope("hi"));
    persistence::save(&cache, &path).unwrap();

    // The snapshot is a single valid JSON document and no temp files linger.
    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed.as_object().unwrap().len(), 2);
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_stale_entries_in_a_snapshot_are_misses_after_restore() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    let cache = ResponseCache::new(Duration::from_millis(40));
    cache.put("/ping", envelope("pong"));
    persistence::save(&cache, &path).unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;

    let restored = ResponseCache::new(Duration::from_millis(40));
    assert_eq!(persistence::load(&restored, &path).unwrap(), 1);
    assert!(restored.get("/ping").is_none());
}
