//! Decides when the story list is (re)requested and feeds the outcomes into
//! the [`StoryStore`].
//!
//! Every request runs on its own worker thread. All workers report on one
//! shared channel, so [`FetchPolicy::pump`] applies outcomes in the order they
//! arrived. It is called from the UI thread, so the store keeps a single
//! writer. Requests are never cancelled. With `discard_stale` off, an older
//! request that settles after a newer one overwrites the list.

use log::{debug, error, info, warn};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::error::SearchError;
use crate::models::Story;
use crate::story_state::{StoryAction, StoryStore};

/// Anything that can turn a request target into stories.
pub trait StorySource: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> Result<Vec<Story>, SearchError>;
}

struct Settled {
    generation: u64,
    target: String,
    action: StoryAction,
}

/// Sends exactly one outcome per request. A worker that unwinds before
/// reporting still reports a failure when this is dropped.
struct Reporter {
    generation: u64,
    target: String,
    tx: Sender<Settled>,
    reported: bool,
}

impl Reporter {
    fn report(mut self, action: StoryAction) {
        self.send(action);
    }

    fn send(&mut self, action: StoryAction) {
        self.reported = true;
        // The receiver is gone only when the policy itself was dropped
        let _ = self.tx.send(Settled {
            generation: self.generation,
            target: self.target.clone(),
            action,
        });
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if !self.reported {
            error!("Request for {} failed: {}", self.target, SearchError::WorkerLost);
            self.send(StoryAction::FetchFailure);
        }
    }
}

pub struct FetchPolicy<S: StorySource> {
    source: Arc<S>,
    target: Option<String>,
    generation: u64,
    outstanding: usize,
    tx: Sender<Settled>,
    rx: Receiver<Settled>,
    discard_stale: bool,
}

impl<S: StorySource> FetchPolicy<S> {
    pub fn new(source: S) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source: Arc::new(source),
            target: None,
            generation: 0,
            outstanding: 0,
            tx,
            rx,
            discard_stale: false,
        }
    }

    /// Drop responses from requests that were superseded by a newer target.
    pub fn with_discard_stale(mut self, discard_stale: bool) -> Self {
        self.discard_stale = discard_stale;
        self
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn in_flight(&self) -> usize {
        self.outstanding
    }

    pub fn is_idle(&self) -> bool {
        self.outstanding == 0
    }

    /// Points the policy at `target`. Issues a request only when the target
    /// differs from the current one. Returns whether a request was issued.
    pub fn request(&mut self, target: String, store: &mut StoryStore) -> bool {
        if self.target.as_deref() == Some(target.as_str()) {
            debug!("Target unchanged, not refetching {}", target);
            return false;
        }
        self.target = Some(target.clone());
        self.issue(target, store);
        true
    }

    /// Re-issues the current target even though it did not change.
    pub fn refresh(&mut self, store: &mut StoryStore) -> bool {
        match self.target.clone() {
            Some(target) => {
                self.issue(target, store);
                true
            }
            None => false,
        }
    }

    fn issue(&mut self, target: String, store: &mut StoryStore) {
        self.generation += 1;
        self.outstanding += 1;
        store.dispatch(StoryAction::FetchInit);
        info!("Fetching stories from {} (request #{})", target, self.generation);

        let source = Arc::clone(&self.source);
        let reporter = Reporter {
            generation: self.generation,
            target,
            tx: self.tx.clone(),
            reported: false,
        };

        thread::spawn(move || {
            let action = match source.fetch(&reporter.target) {
                Ok(stories) => StoryAction::FetchSuccess(stories),
                Err(e) => {
                    warn!("Failed to fetch {}: {}", reporter.target, e);
                    StoryAction::FetchFailure
                }
            };
            reporter.report(action);
        });
    }

    /// Applies every outcome that arrived since the last call, in arrival
    /// order. Returns how many requests settled during this call.
    pub fn pump(&mut self, store: &mut StoryStore) -> usize {
        let mut settled = 0;

        // `self.tx` keeps the channel open, so only `Empty` ends the loop
        while let Ok(outcome) = self.rx.try_recv() {
            settled += 1;
            self.outstanding = self.outstanding.saturating_sub(1);

            if self.discard_stale && outcome.generation != self.generation {
                debug!(
                    "Discarding stale {} for {} (request #{}, latest #{})",
                    outcome.action.name(),
                    outcome.target,
                    outcome.generation,
                    self.generation
                );
                continue;
            }
            store.dispatch(outcome.action);
        }

        settled
    }
}
