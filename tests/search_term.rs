use hacker_stories::{KeyValueStore, MemoryStore, SearchTermStore, SqliteStore};
use std::sync::Arc;

const ENDPOINT: &str = "https://hn.algolia.com/api/v1/search";

#[test]
fn absent_term_falls_back_to_default() {
    let store = Arc::new(MemoryStore::new());
    let search = SearchTermStore::open(store, "search", "React");
    assert_eq!(search.term(), "React");
    assert_eq!(search.submitted(), "React");
    assert_eq!(
        search.request_target(ENDPOINT),
        "https://hn.algolia.com/api/v1/search?query=React"
    );
}

#[test]
fn stored_empty_term_is_kept() {
    let store = Arc::new(MemoryStore::new());
    store.set("search", "").unwrap();

    let search = SearchTermStore::open(store, "search", "React");
    assert_eq!(search.term(), "");
    assert_eq!(search.request_target(ENDPOINT), format!("{}?query=", ENDPOINT));
}

#[test]
fn keystrokes_are_written_through_but_not_submitted() {
    let store = Arc::new(MemoryStore::new());
    let mut search = SearchTermStore::open(store.clone(), "search", "React");

    search.set_term("Re");
    search.set_term("Redux");
    assert_eq!(store.get("search").unwrap().as_deref(), Some("Redux"));
    assert_eq!(search.submitted(), "React");

    let target = search.submit(ENDPOINT);
    assert_eq!(target, "https://hn.algolia.com/api/v1/search?query=Redux");
    assert_eq!(search.submitted(), "Redux");
}

#[test]
fn term_survives_reopening_sqlite_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = Arc::new(SqliteStore::open(dir.path()).unwrap());
        let mut search = SearchTermStore::open(store, "search", "React");
        search.set_term("rust async");
    }

    let store = Arc::new(SqliteStore::open(dir.path()).unwrap());
    let search = SearchTermStore::open(store, "search", "React");
    assert_eq!(search.term(), "rust async");
    assert_eq!(
        search.request_target(ENDPOINT),
        "https://hn.algolia.com/api/v1/search?query=rust%20async"
    );
}

#[test]
fn sqlite_store_creates_missing_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = SqliteStore::open(&nested).unwrap();
    store.set("search", "React").unwrap();
    assert!(nested.join("settings.db").exists());
}
