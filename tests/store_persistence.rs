//! Session store durability tests against the embedded database

use reviewd::store::SessionStore;
use tempfile::tempdir;

#[tokio::test]
async fn test_history_survives_store_reopen() {
    let dir = tempdir().expect("failed to create tempdir");
    let path = dir.path().join("sessions");

    {
        let store = SessionStore::open(&path).expect("open failed");
        store
            .add_review("s1", "fn main() {}", "rust", "first review", None)
            .await
            .expect("add failed");
        store
            .add_review("s1", "fn main() { run() }", "rust", "second review", None)
            .await
            .expect("add failed");
    }

    let store = SessionStore::open(&path).expect("reopen failed");
    let reviews = store.get_reviews("s1").await.expect("get failed");
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].review, "first review");
    assert_eq!(reviews[1].review, "second review");
}

#[tokio::test]
async fn test_created_at_survives_reopen_and_clear() {
    let dir = tempdir().expect("failed to create tempdir");
    let path = dir.path().join("sessions");

    let created_at = {
        let store = SessionStore::open(&path).expect("open failed");
        store
            .add_review("s1", "x", "python", "r", Some("hint"))
            .await
            .expect("add failed");
        store
            .get_metadata("s1")
            .await
            .expect("metadata failed")
            .created_at
    };

    let store = SessionStore::open(&path).expect("reopen failed");
    store.clear_reviews("s1").await.expect("clear failed");

    let meta = store.get_metadata("s1").await.expect("metadata failed");
    assert_eq!(meta.created_at, created_at);
    assert_eq!(meta.review_count, 0);
}

#[tokio::test]
async fn test_session_ids_survive_reopen() {
    let dir = tempdir().expect("failed to create tempdir");
    let path = dir.path().join("sessions");

    {
        let store = SessionStore::open(&path).expect("open failed");
        store
            .add_review("alpha", "a", "go", "r", None)
            .await
            .expect("add failed");
        store
            .add_review("beta", "b", "go", "r", None)
            .await
            .expect("add failed");
    }

    let store = SessionStore::open(&path).expect("reopen failed");
    let mut ids = store.session_ids().expect("session_ids failed");
    ids.sort();
    assert_eq!(ids, vec!["alpha".to_string(), "beta".to_string()]);
}
