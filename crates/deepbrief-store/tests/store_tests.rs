//! Tests for deepbrief-store: memory and file stores, upsert semantics

use deepbrief_core::{FinalBrief, Identity, SourceSummary};
use deepbrief_store::{ContextStore, FileContextStore, MemoryContextStore};
use std::path::PathBuf;

fn brief(topic: &str) -> FinalBrief {
    FinalBrief {
        topic: topic.into(),
        introduction: "intro".into(),
        synthesis: "synthesis".into(),
        references: vec![SourceSummary {
            url: "https://a.test".into(),
            title: "A".into(),
            key_points: vec!["point".into()],
            relevance_to_topic: "relevant".into(),
            degraded: false,
        }],
        potential_follow_ups: vec!["next?".into()],
    }
}

/// Scratch dir that cleans up after itself.
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("deepbrief-store-test-{}", uuid::Uuid::new_v4()));
        Self(dir)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

// ===========================================================================
// MemoryContextStore
// ===========================================================================

#[tokio::test]
async fn memory_get_absent_is_none() {
    let store = MemoryContextStore::new();
    let record = store.get(&Identity::new("nobody")).await.unwrap();
    assert!(record.is_none());
    assert!(store.is_empty());
}

#[tokio::test]
async fn memory_put_then_get() {
    let store = MemoryContextStore::new();
    let id = Identity::new("user-1");
    store.put(&id, &brief("rust")).await.unwrap();

    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.identity, id);
    assert_eq!(record.last_brief.topic, "rust");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn memory_put_is_idempotent() {
    let store = MemoryContextStore::new();
    let id = Identity::new("user-1");
    let b = brief("rust");
    store.put(&id, &b).await.unwrap();
    store.put(&id, &b).await.unwrap();

    assert_eq!(store.len(), 1);
    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.last_brief.topic, "rust");
    assert_eq!(record.last_brief.references.len(), 1);
}

#[tokio::test]
async fn memory_last_write_wins() {
    let store = MemoryContextStore::new();
    let id = Identity::new("user-1");
    store.put(&id, &brief("first")).await.unwrap();
    store.put(&id, &brief("second")).await.unwrap();

    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.last_brief.topic, "second");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn memory_identities_are_independent() {
    let store = MemoryContextStore::new();
    store.put(&Identity::new("a"), &brief("alpha")).await.unwrap();
    store.put(&Identity::new("b"), &brief("beta")).await.unwrap();

    assert_eq!(store.len(), 2);
    let a = store.get(&Identity::new("a")).await.unwrap().unwrap();
    assert_eq!(a.last_brief.topic, "alpha");
}

// ===========================================================================
// FileContextStore
// ===========================================================================

#[tokio::test]
async fn file_get_absent_is_none() {
    let scratch = ScratchDir::new();
    let store = FileContextStore::open(&scratch.0).unwrap();
    let record = store.get(&Identity::new("nobody")).await.unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn file_put_then_get_roundtrip() {
    let scratch = ScratchDir::new();
    let store = FileContextStore::open(&scratch.0).unwrap();
    let id = Identity::new("user-1");
    store.put(&id, &brief("rust")).await.unwrap();

    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.identity.as_str(), "user-1");
    assert_eq!(record.last_brief.topic, "rust");
    assert_eq!(record.last_brief.references[0].url, "https://a.test");
}

#[tokio::test]
async fn file_put_is_idempotent() {
    let scratch = ScratchDir::new();
    let store = FileContextStore::open(&scratch.0).unwrap();
    let id = Identity::new("user-1");
    let b = brief("rust");
    store.put(&id, &b).await.unwrap();
    store.put(&id, &b).await.unwrap();

    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.last_brief.topic, "rust");

    // Exactly one record file, no leftover temp files
    let files: Vec<_> = std::fs::read_dir(&scratch.0).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn file_last_write_wins() {
    let scratch = ScratchDir::new();
    let store = FileContextStore::open(&scratch.0).unwrap();
    let id = Identity::new("user-1");
    store.put(&id, &brief("first")).await.unwrap();
    store.put(&id, &brief("second")).await.unwrap();

    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.last_brief.topic, "second");
}

#[tokio::test]
async fn file_sanitizes_hostile_identities() {
    let scratch = ScratchDir::new();
    let store = FileContextStore::open(&scratch.0).unwrap();
    let id = Identity::new("team/alpha:user@7");
    store.put(&id, &brief("rust")).await.unwrap();

    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.last_brief.topic, "rust");

    // The record landed inside the store dir, not along a path traversal
    for entry in std::fs::read_dir(&scratch.0).unwrap() {
        let name = entry.unwrap().file_name();
        assert!(!name.to_string_lossy().contains('/'));
    }
}

#[tokio::test]
async fn file_corrupt_record_is_an_error() {
    let scratch = ScratchDir::new();
    let store = FileContextStore::open(&scratch.0).unwrap();
    let id = Identity::new("user-1");
    store.put(&id, &brief("rust")).await.unwrap();

    // Clobber the record with garbage
    let path = scratch.0.join("user-1.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = store.get(&id).await.unwrap_err();
    assert!(format!("{}", err).contains("corrupt record"));
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let scratch = ScratchDir::new();
    let id = Identity::new("user-1");
    {
        let store = FileContextStore::open(&scratch.0).unwrap();
        store.put(&id, &brief("rust")).await.unwrap();
    }
    let store = FileContextStore::open(&scratch.0).unwrap();
    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.last_brief.topic, "rust");
}
