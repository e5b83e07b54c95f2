use log::{debug, warn};
use std::sync::Arc;

use crate::db::KeyValueStore;
use crate::search_client::search_url;

/// Current search term, seeded from and written through to a key-value store.
///
/// The store is read once, in [`SearchTermStore::open`]. Every change of the
/// term is written back. Write failures are logged and otherwise ignored so a
/// broken store never blocks typing.
pub struct SearchTermStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    term: String,
    submitted: String,
}

impl SearchTermStore {
    /// An absent value falls back to `default`. A stored empty string is kept
    /// as an empty query.
    pub fn open(store: Arc<dyn KeyValueStore>, key: &str, default: &str) -> Self {
        let term = match store.get(key) {
            Ok(Some(term)) => term,
            Ok(None) => default.to_string(),
            Err(e) => {
                warn!("Failed to read `{}` from settings: {}", key, e);
                default.to_string()
            }
        };
        debug!("Initial search term {:?}", term);

        Self {
            store,
            key: key.to_string(),
            submitted: term.clone(),
            term,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Last explicitly submitted term. Starts as the initial term.
    pub fn submitted(&self) -> &str {
        &self.submitted
    }

    /// Keystroke path: updates and persists the term, never triggers a fetch.
    pub fn set_term(&mut self, term: &str) {
        if self.term == term {
            return;
        }
        self.term = term.to_string();
        self.persist();
    }

    /// Submit path: freezes the current term and returns its request target.
    pub fn submit(&mut self, endpoint: &str) -> String {
        self.submitted = self.term.clone();
        self.request_target(endpoint)
    }

    pub fn request_target(&self, endpoint: &str) -> String {
        search_url(endpoint, &self.submitted)
    }

    fn persist(&self) {
        if let Err(e) = self.store.set(&self.key, &self.term) {
            warn!("Failed to save search term: {}", e);
        }
    }
}
