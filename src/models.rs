use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Identity of a story within a result set. The search API sends string ids,
/// but numeric ids are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum StoryId {
    Number(u64),
    Text(String),
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoryId::Number(n) => write!(f, "{}", n),
            StoryId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for StoryId {
    fn from(n: u64) -> Self {
        StoryId::Number(n)
    }
}

impl From<&str> for StoryId {
    fn from(s: &str) -> Self {
        StoryId::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Story {
    #[serde(rename = "objectID")]
    pub object_id: StoryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub num_comments: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Story {
    pub fn new(object_id: impl Into<StoryId>, title: &str) -> Self {
        Self {
            object_id: object_id.into(),
            title: title.to_string(),
            url: String::new(),
            author: String::new(),
            num_comments: 0,
            points: 0,
            created_at: None,
        }
    }

    // Host part of the url, shown next to the title
    pub fn domain(&self) -> &str {
        let rest = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(self.url.as_str());
        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        host.strip_prefix("www.").unwrap_or(host)
    }

    /// Human readable age such as "3 hours ago", relative to `now`.
    pub fn age_label(&self, now: DateTime<Utc>) -> Option<String> {
        let created_at = self.created_at?;
        let elapsed = now.signed_duration_since(created_at);

        let (amount, unit) = if elapsed.num_days() >= 365 {
            (elapsed.num_days() / 365, "year")
        } else if elapsed.num_days() >= 30 {
            (elapsed.num_days() / 30, "month")
        } else if elapsed.num_days() >= 1 {
            (elapsed.num_days(), "day")
        } else if elapsed.num_hours() >= 1 {
            (elapsed.num_hours(), "hour")
        } else {
            (elapsed.num_minutes().max(0), "minute")
        };

        let plural = if amount == 1 { "" } else { "s" };
        Some(format!("{} {}{} ago", amount, unit, plural))
    }
}

/// Body of a search API response. Only `hits` is read.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<Story>,
}

/// Case-insensitive title filter over already loaded stories.
/// An empty needle keeps everything.
pub fn filter_by_title<'a>(stories: &'a [Story], needle: &str) -> Vec<&'a Story> {
    let needle = needle.to_lowercase();
    stories
        .iter()
        .filter(|story| story.title.to_lowercase().contains(&needle))
        .collect()
}

// The API sends `null` for missing titles, urls and counts
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stories() -> Vec<Story> {
        vec![
            Story::new(0u64, "React"),
            Story::new(1u64, "Redux"),
            Story::new(2u64, "Preact Signals"),
        ]
    }

    #[test]
    fn filter_matches_titles_case_insensitively() {
        let stories = stories();
        let hits = filter_by_title(&stories, "REACT");
        let titles: Vec<&str> = hits.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["React", "Preact Signals"]);
    }

    #[test]
    fn empty_filter_keeps_all_stories() {
        let stories = stories();
        assert_eq!(filter_by_title(&stories, "").len(), 3);
    }

    #[test]
    fn story_accepts_numeric_and_string_ids() {
        let numeric: Story = serde_json::from_str(r#"{"objectID": 7, "title": "A"}"#).unwrap();
        assert_eq!(numeric.object_id, StoryId::Number(7));

        let text: Story = serde_json::from_str(r#"{"objectID": "8", "title": "B"}"#).unwrap();
        assert_eq!(text.object_id, StoryId::Text("8".to_string()));
        assert_eq!(text.object_id.to_string(), "8");
    }

    #[test]
    fn null_fields_become_defaults() {
        let story: Story = serde_json::from_str(
            r#"{"objectID": "1", "title": null, "url": null, "author": "pg", "num_comments": null, "points": null}"#,
        )
        .unwrap();
        assert_eq!(story.title, "");
        assert_eq!(story.url, "");
        assert_eq!(story.author, "pg");
        assert_eq!(story.num_comments, 0);
        assert_eq!(story.points, 0);
    }

    #[test]
    fn domain_strips_scheme_and_www() {
        let mut story = Story::new(1u64, "React");
        story.url = "https://www.reactjs.org/docs?x=1".to_string();
        assert_eq!(story.domain(), "reactjs.org");

        story.url = String::new();
        assert_eq!(story.domain(), "");
    }

    #[test]
    fn age_label_uses_largest_unit() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let mut story = Story::new(1u64, "React");
        assert_eq!(story.age_label(now), None);

        story.created_at = Some(Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap());
        assert_eq!(story.age_label(now).as_deref(), Some("3 hours ago"));

        story.created_at = Some(Utc.with_ymd_and_hms(2024, 5, 9, 12, 0, 0).unwrap());
        assert_eq!(story.age_label(now).as_deref(), Some("1 day ago"));
    }
}
