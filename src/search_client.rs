use anyhow::Result;
use log::{debug, info};
use reqwest::blocking::Client;
use std::time::Duration;

use crate::error::SearchError;
use crate::fetch_policy::StorySource;
use crate::models::{SearchResponse, Story};

/// Builds the request target for a search term.
pub fn search_url(endpoint: &str, term: &str) -> String {
    format!("{}?query={}", endpoint, urlencoding::encode(term))
}

/// Decodes a search API body into its stories.
pub fn parse_hits(body: &str) -> Result<Vec<Story>, SearchError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.hits)
}

#[derive(Clone)]
pub struct SearchClient {
    client: Client,
}

impl SearchClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hacker_stories/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    pub fn fetch_stories(&self, url: &str) -> Result<Vec<Story>, SearchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = response.text()?;
        let stories = parse_hits(&body)?;

        info!("Loaded {} stories from {}", stories.len(), url);
        Ok(stories)
    }
}

impl StorySource for SearchClient {
    fn fetch(&self, url: &str) -> Result<Vec<Story>, SearchError> {
        self.fetch_stories(url)
    }
}
