pub mod config;
pub mod db;
pub mod error;
pub mod fetch_policy;
pub mod logging;
pub mod models;
pub mod search_client;
pub mod search_term;
pub mod story_state;

pub use config::AppConfig;
pub use db::{KeyValueStore, MemoryStore, SqliteStore};
pub use error::SearchError;
pub use fetch_policy::{FetchPolicy, StorySource};
pub use models::{Story, StoryId};
pub use search_client::SearchClient;
pub use search_term::SearchTermStore;
pub use story_state::{reduce, FetchState, StoryAction, StoryStore};
