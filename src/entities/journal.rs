// 📓 Journal Entity - Free-text entries with mood and tags

use super::{check_len, check_max_len, UserId};
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub mood: Option<String>,
    pub weather: Option<String>,
    pub location: Option<String>,
    /// Comma-separated
    pub tags: Option<String>,
    pub category: String,
    pub is_private: bool,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl JournalEntry {
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(self.tags.as_deref())
    }

    pub fn written_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    pub fn merged(&self, update: &JournalEntryUpdate) -> JournalEntry {
        let mut next = self.clone();
        if let Some(title) = &update.title {
            next.title = title.trim().to_string();
        }
        if let Some(content) = &update.content {
            next.content = content.clone();
        }
        if let Some(mood) = &update.mood {
            next.mood = Some(mood.clone());
        }
        if let Some(weather) = &update.weather {
            next.weather = Some(weather.clone());
        }
        if let Some(location) = &update.location {
            next.location = Some(location.clone());
        }
        if let Some(tags) = &update.tags {
            next.tags = Some(tags.clone());
        }
        if let Some(category) = &update.category {
            next.category = category.clone();
        }
        if let Some(is_private) = update.is_private {
            next.is_private = is_private;
        }
        if let Some(is_favorite) = update.is_favorite {
            next.is_favorite = is_favorite;
        }
        next.updated_at = Some(Utc::now());
        next
    }
}

pub fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|tags| {
        tags.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should",
];

/// Most frequent meaningful words of `text`, used when an entry has no tags.
///
/// Words shorter than four characters and stop words are skipped. Ties keep
/// first-seen order.
pub fn generate_tags(text: &str, max_tags: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for word in text.to_lowercase().split_whitespace() {
        if word.chars().count() <= 3 || STOP_WORDS.contains(&word) {
            continue;
        }
        match counts.iter_mut().find(|(seen, _)| seen.as_str() == word) {
            Some((_, count)) => *count += 1,
            None => counts.push((word.to_string(), 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(max_tags).map(|(word, _)| word).collect()
}

fn default_category() -> String {
    "general".to_string()
}

fn default_private() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_private")]
    pub is_private: bool,
    #[serde(default)]
    pub is_favorite: bool,
}

impl NewJournalEntry {
    pub fn new(title: &str, content: &str) -> Self {
        NewJournalEntry {
            title: title.to_string(),
            content: content.to_string(),
            mood: None,
            weather: None,
            location: None,
            tags: None,
            category: default_category(),
            is_private: default_private(),
            is_favorite: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_len("title", &self.title, 1, 255)?;
        check_len("content", &self.content, 1, usize::MAX)?;
        check_max_len("mood", self.mood.as_deref(), 20)?;
        check_max_len("weather", self.weather.as_deref(), 50)?;
        check_max_len("location", self.location.as_deref(), 255)?;
        check_max_len("tags", self.tags.as_deref(), 500)?;
        check_len("category", &self.category, 1, 50)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<String>,
    pub weather: Option<String>,
    pub location: Option<String>,
    pub tags: Option<String>,
    pub category: Option<String>,
    pub is_private: Option<bool>,
    pub is_favorite: Option<bool>,
}

impl JournalEntryUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            check_len("title", title, 1, 255)?;
        }
        if let Some(content) = &self.content {
            check_len("content", content, 1, usize::MAX)?;
        }
        check_max_len("mood", self.mood.as_deref(), 20)?;
        check_max_len("weather", self.weather.as_deref(), 50)?;
        check_max_len("location", self.location.as_deref(), 255)?;
        check_max_len("tags", self.tags.as_deref(), 500)?;
        check_max_len("category", self.category.as_deref(), 50)?;
        Ok(())
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.content.is_some() {
            fields.push("content");
        }
        if self.mood.is_some() {
            fields.push("mood");
        }
        if self.weather.is_some() {
            fields.push("weather");
        }
        if self.location.is_some() {
            fields.push("location");
        }
        if self.tags.is_some() {
            fields.push("tags");
        }
        if self.category.is_some() {
            fields.push("category");
        }
        if self.is_private.is_some() {
            fields.push("is_private");
        }
        if self.is_favorite.is_some() {
            fields.push("is_favorite");
        }
        fields
    }
}

/// Filters for journal search; all present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalSearch {
    /// Case-insensitive match against title and content
    pub query: Option<String>,
    pub mood: Option<String>,
    pub category: Option<String>,
    pub favorites_only: Option<bool>,
    /// Each tag must appear (case-insensitively) in the entry's tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl JournalSearch {
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let needle = query.to_lowercase();
            let in_title = entry.title.to_lowercase().contains(&needle);
            let in_content = entry.content.to_lowercase().contains(&needle);
            if !in_title && !in_content {
                return false;
            }
        }
        if let Some(mood) = &self.mood {
            if entry.mood.as_deref() != Some(mood.as_str()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &entry.category != category {
                return false;
            }
        }
        if self.favorites_only == Some(true) && !entry.is_favorite {
            return false;
        }
        let entry_tags = entry.tags.as_deref().unwrap_or("").to_lowercase();
        self.tags
            .iter()
            .all(|tag| entry_tags.contains(&tag.trim().to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, content: &str) -> JournalEntry {
        JournalEntry {
            id: 1,
            user_id: 1,
            title: title.to_string(),
            content: content.to_string(),
            mood: Some("calm".to_string()),
            weather: None,
            location: None,
            tags: Some(" work, ideas ,,focus".to_string()),
            category: "work".to_string(),
            is_private: true,
            is_favorite: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_tag_list_trims_and_skips_empty() {
        let entry = entry("Monday", "Planning");
        assert_eq!(entry.tag_list(), vec!["work", "ideas", "focus"]);
        assert!(split_tags(None).is_empty());
    }

    #[test]
    fn test_search_matches() {
        let entry = entry("Monday notes", "Sprint planning went well");

        let by_text = JournalSearch {
            query: Some("SPRINT".to_string()),
            ..Default::default()
        };
        assert!(by_text.matches(&entry));

        let wrong_mood = JournalSearch {
            mood: Some("sad".to_string()),
            ..Default::default()
        };
        assert!(!wrong_mood.matches(&entry));

        let favorites = JournalSearch {
            favorites_only: Some(true),
            ..Default::default()
        };
        assert!(!favorites.matches(&entry));
        assert!(JournalSearch::default().matches(&entry));

        let tagged = JournalSearch {
            tags: vec!["Ideas".to_string(), "work".to_string()],
            ..Default::default()
        };
        assert!(tagged.matches(&entry));
        let missing_tag = JournalSearch {
            tags: vec!["travel".to_string()],
            ..Default::default()
        };
        assert!(!missing_tag.matches(&entry));
    }

    #[test]
    fn test_generate_tags_by_frequency() {
        let tags = generate_tags("Running today. running again with friends and running shoes", 2);
        assert_eq!(tags, vec!["running", "today."]);

        assert!(generate_tags("a an the to of", 5).is_empty());
    }

    #[test]
    fn test_new_entry_validation() {
        assert!(NewJournalEntry::new("Day one", "Started a journal").validate().is_ok());
        assert!(NewJournalEntry::new("Empty", "  ").validate().is_err());
    }
}
