use crate::entities::JournalEntry;
use crate::period::{resolve, Period};
use crate::streak::presence_streak;
use crate::summary::round_to;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TOP_TAGS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodCount {
    pub mood: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalStats {
    pub total_entries: usize,
    pub entries_this_month: usize,
    pub entries_this_year: usize,
    pub favorite_entries: usize,
    pub most_used_tags: Vec<TagCount>,
    pub mood_distribution: Vec<MoodCount>,
    /// Consecutive days with at least one entry
    pub writing_streak: u32,
    /// Mean content length in characters
    pub average_entry_length: f64,
}

pub fn journal_stats(entries: &[JournalEntry], today: NaiveDate) -> JournalStats {
    let month_start = resolve(Period::Month, today).start;
    let year_start = resolve(Period::Year, today).start;

    let mut tags: BTreeMap<String, usize> = BTreeMap::new();
    let mut moods: BTreeMap<String, usize> = BTreeMap::new();
    for entry in entries {
        for tag in entry.tag_list() {
            *tags.entry(tag).or_insert(0) += 1;
        }
        if let Some(mood) = &entry.mood {
            *moods.entry(mood.clone()).or_insert(0) += 1;
        }
    }

    let mut most_used_tags: Vec<TagCount> = tags
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    // BTreeMap order already breaks ties alphabetically; the sort is stable
    most_used_tags.sort_by(|a, b| b.count.cmp(&a.count));
    most_used_tags.truncate(TOP_TAGS);

    let average_entry_length = if entries.is_empty() {
        0.0
    } else {
        let chars: usize = entries.iter().map(|e| e.content.chars().count()).sum();
        chars as f64 / entries.len() as f64
    };

    JournalStats {
        total_entries: entries.len(),
        entries_this_month: entries.iter().filter(|e| e.written_on() >= month_start).count(),
        entries_this_year: entries.iter().filter(|e| e.written_on() >= year_start).count(),
        favorite_entries: entries.iter().filter(|e| e.is_favorite).count(),
        most_used_tags,
        mood_distribution: moods
            .into_iter()
            .map(|(mood, count)| MoodCount { mood, count })
            .collect(),
        writing_streak: presence_streak(entries.iter().map(JournalEntry::written_on), today),
        average_entry_length: round_to(average_entry_length, 1),
    }
}
