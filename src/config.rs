use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://hn.algolia.com/api/v1/search";
pub const DEFAULT_QUERY: &str = "React";
pub const DEFAULT_STORAGE_KEY: &str = "search";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub endpoint: String,
    pub default_query: String,
    pub storage_key: String,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
    pub discard_stale_responses: bool,
    pub log_level: String,
}

impl AppConfig {
    /// Reads the configuration from the process environment. A `.env` file in
    /// the working directory is loaded first when present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup("HACKER_STORIES_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        if endpoint.trim().is_empty() {
            bail!("HACKER_STORIES_ENDPOINT must not be empty");
        }

        let data_dir = match lookup("HACKER_STORIES_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let request_timeout = match lookup("HACKER_STORIES_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .with_context(|| format!("Invalid HACKER_STORIES_TIMEOUT_SECS `{}`", secs))?,
            ),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let discard_stale_responses = match lookup("HACKER_STORIES_DISCARD_STALE") {
            Some(flag) => parse_flag(&flag)
                .ok_or_else(|| anyhow!("Invalid HACKER_STORIES_DISCARD_STALE `{}`", flag))?,
            None => false,
        };

        Ok(Self {
            endpoint: endpoint.trim().to_string(),
            default_query: lookup("HACKER_STORIES_DEFAULT_QUERY").unwrap_or_else(|| DEFAULT_QUERY.to_string()),
            storage_key: lookup("HACKER_STORIES_STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            data_dir,
            request_timeout,
            discard_stale_responses,
            log_level: lookup("HACKER_STORIES_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs_next::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home_dir.join(".hacker_stories"))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
