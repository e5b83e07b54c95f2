//! Story list state and the reducer that owns every transition of it.
//!
//! `FetchState` only changes through [`reduce`]. Outcomes of network requests
//! and user gestures are both expressed as a [`StoryAction`], which is a closed
//! enum. An action the reducer does not know about cannot be constructed:
//!
//! ```compile_fail
//! use hacker_stories::story_state::{reduce, FetchState, StoryAction};
//!
//! let state = reduce(FetchState::default(), StoryAction::FetchCancel);
//! ```

use log::debug;

use crate::models::Story;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    pub data: Vec<Story>,
    pub is_loading: bool,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoryAction {
    /// A request was issued. Previous stories stay visible while it runs.
    FetchInit,
    /// A request settled with a payload that replaces the whole list.
    FetchSuccess(Vec<Story>),
    /// A request settled with a transport or status failure.
    FetchFailure,
    /// The user dismissed one story.
    RemoveItem(Story),
}

impl StoryAction {
    pub fn name(&self) -> &'static str {
        match self {
            StoryAction::FetchInit => "FETCH_INIT",
            StoryAction::FetchSuccess(_) => "FETCH_SUCCESS",
            StoryAction::FetchFailure => "FETCH_FAILURE",
            StoryAction::RemoveItem(_) => "REMOVE_ITEM",
        }
    }
}

pub fn reduce(state: FetchState, action: StoryAction) -> FetchState {
    match action {
        StoryAction::FetchInit => FetchState {
            is_loading: true,
            is_error: false,
            ..state
        },
        StoryAction::FetchSuccess(data) => FetchState {
            data,
            is_loading: false,
            is_error: false,
        },
        StoryAction::FetchFailure => FetchState {
            is_loading: false,
            is_error: true,
            ..state
        },
        StoryAction::RemoveItem(target) => {
            let mut data = state.data;
            // Identities are unique per result set, so at most one element goes
            if let Some(pos) = data.iter().position(|s| s.object_id == target.object_id) {
                data.remove(pos);
            }
            FetchState { data, ..state }
        }
    }
}

/// Owner of the single `FetchState` of an app instance.
#[derive(Debug, Default)]
pub struct StoryStore {
    state: FetchState,
}

impl StoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn dispatch(&mut self, action: StoryAction) {
        debug!("dispatch {}", action.name());
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    /// Handles the "dismiss" gesture on a displayed story.
    pub fn dismiss(&mut self, story: &Story) {
        debug!("dismissing story {}", story.object_id);
        self.dispatch(StoryAction::RemoveItem(story.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn react() -> Story {
        let mut story = Story::new(0u64, "React");
        story.url = "https://reactjs.org/".to_string();
        story.author = "Jordan Walke".to_string();
        story.num_comments = 3;
        story.points = 4;
        story
    }

    fn redux() -> Story {
        let mut story = Story::new(1u64, "Redux");
        story.url = "https://redux.js.org/".to_string();
        story.author = "Dan Abramov, Andrew Clark".to_string();
        story.num_comments = 2;
        story.points = 5;
        story
    }

    fn loaded(data: Vec<Story>) -> FetchState {
        FetchState {
            data,
            is_loading: false,
            is_error: false,
        }
    }

    #[test]
    fn initial_state_is_idle_and_empty() {
        let state = FetchState::default();
        assert!(state.data.is_empty());
        assert!(!state.is_loading);
        assert!(!state.is_error);
    }

    #[test]
    fn init_then_success_loads_payload() {
        let state = reduce(FetchState::default(), StoryAction::FetchInit);
        assert_eq!(
            state,
            FetchState {
                data: vec![],
                is_loading: true,
                is_error: false
            }
        );

        let state = reduce(state, StoryAction::FetchSuccess(vec![react()]));
        assert_eq!(state, loaded(vec![react()]));
    }

    #[test]
    fn success_replaces_previous_data_wholesale() {
        let before = loaded(vec![react(), redux()]);
        let payload = vec![redux()];
        let state = reduce(before, StoryAction::FetchSuccess(payload.clone()));
        assert_eq!(state.data, payload);

        let state = reduce(state, StoryAction::FetchSuccess(vec![]));
        assert!(state.data.is_empty());
    }

    #[test]
    fn init_keeps_stale_data_and_clears_error() {
        let before = FetchState {
            data: vec![react(), redux()],
            is_loading: false,
            is_error: true,
        };
        let state = reduce(before, StoryAction::FetchInit);
        assert_eq!(state.data, vec![react(), redux()]);
        assert!(state.is_loading);
        assert!(!state.is_error);
    }

    #[test]
    fn failure_keeps_data_from_before_init() {
        let state = reduce(loaded(vec![react()]), StoryAction::FetchInit);
        let state = reduce(state, StoryAction::FetchFailure);
        assert_eq!(state.data, vec![react()]);
        assert!(!state.is_loading);
        assert!(state.is_error);
    }

    #[test]
    fn remove_item_drops_exactly_one_story() {
        let state = reduce(
            loaded(vec![react(), redux()]),
            StoryAction::RemoveItem(redux()),
        );
        assert_eq!(state.data, vec![react()]);
    }

    #[test]
    fn remove_item_is_noop_once_absent() {
        let state = reduce(
            loaded(vec![react(), redux()]),
            StoryAction::RemoveItem(react()),
        );
        let again = reduce(state.clone(), StoryAction::RemoveItem(react()));
        assert_eq!(again, state);
        assert_eq!(again.data.len(), 1);
    }

    #[test]
    fn remove_item_matches_on_identity_only() {
        let mut stale_copy = react();
        stale_copy.title = "React (edited)".to_string();
        stale_copy.points = 999;

        let state = reduce(loaded(vec![react(), redux()]), StoryAction::RemoveItem(stale_copy));
        assert_eq!(state.data, vec![redux()]);
    }

    #[test]
    fn remove_item_keeps_flags() {
        let before = FetchState {
            data: vec![react()],
            is_loading: true,
            is_error: false,
        };
        let state = reduce(before, StoryAction::RemoveItem(react()));
        assert!(state.data.is_empty());
        assert!(state.is_loading);
    }

    #[test]
    fn store_dispatch_and_dismiss() {
        let mut store = StoryStore::new();
        store.dispatch(StoryAction::FetchInit);
        store.dispatch(StoryAction::FetchSuccess(vec![react(), redux()]));
        store.dismiss(&react());

        assert_eq!(store.state(), &loaded(vec![redux()]));
    }
}
