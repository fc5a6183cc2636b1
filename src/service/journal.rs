use super::{Dashboard, Paging};
use crate::access::DataAccess;
use crate::db::journal::{self, JournalListFilter};
use crate::entities::journal::generate_tags;
use crate::entities::{JournalEntry, JournalEntryUpdate, JournalSearch, NewJournalEntry, UserId};
use crate::error::{DashboardError, Result};
use crate::stats::{journal_stats, JournalStats};
use serde::{Deserialize, Serialize};
use serde_json::json;

const AUTO_TAGS: usize = 5;
const DASHBOARD_RECENT_ENTRIES: usize = 5;
const DASHBOARD_POPULAR_TAGS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalDashboard {
    pub stats: JournalStats,
    pub recent_entries: Vec<JournalEntry>,
    pub popular_tags: Vec<String>,
}

/// Comma-joined tags generated from `content`, `None` when nothing qualifies.
fn auto_tags(content: &str) -> Option<String> {
    let tags = generate_tags(content, AUTO_TAGS);
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(","))
    }
}

fn given_tags(tags: Option<&str>) -> Option<&str> {
    tags.map(str::trim).filter(|tags| !tags.is_empty())
}

impl Dashboard<'_> {
    fn journal_entry_or_404(&self, user: UserId, id: i64) -> Result<JournalEntry> {
        journal::get_journal_entry(self.conn, user, id)?.ok_or(DashboardError::NotFound("journal entry"))
    }

    pub fn list_journal_entries(
        &self,
        user: UserId,
        filter: &JournalListFilter,
        paging: Paging,
    ) -> Result<Vec<JournalEntry>> {
        Ok(journal::list_journal_entries(self.conn, user, filter, self.page(paging))?)
    }

    /// Entries created without tags are tagged from their content.
    pub fn create_journal_entry(&self, user: UserId, entry: &NewJournalEntry) -> Result<JournalEntry> {
        entry.validate()?;
        let tags = match given_tags(entry.tags.as_deref()) {
            Some(tags) => Some(tags.to_string()),
            None => auto_tags(&entry.content),
        };
        let created = journal::insert_journal_entry(self.conn, user, entry, tags.as_deref())?;
        self.record(
            user,
            "create",
            "journal_entry",
            created.id,
            json!({ "title": created.title, "tags": created.tags }),
        )?;
        Ok(created)
    }

    pub fn get_journal_entry(&self, user: UserId, id: i64) -> Result<JournalEntry> {
        self.journal_entry_or_404(user, id)
    }

    /// Changing the content without supplying tags regenerates them.
    pub fn update_journal_entry(&self, user: UserId, id: i64, update: &JournalEntryUpdate) -> Result<JournalEntry> {
        update.validate()?;
        let mut updated = self.journal_entry_or_404(user, id)?.merged(update);
        if update.content.is_some() && given_tags(update.tags.as_deref()).is_none() {
            updated.tags = auto_tags(&updated.content);
        }
        journal::update_journal_entry(self.conn, &updated)?;
        self.record(user, "update", "journal_entry", id, json!({ "fields": update.changed_fields() }))?;
        Ok(updated)
    }

    pub fn delete_journal_entry(&self, user: UserId, id: i64) -> Result<()> {
        if !journal::delete_journal_entry(self.conn, user, id)? {
            return Err(DashboardError::NotFound("journal entry"));
        }
        self.record(user, "delete", "journal_entry", id, json!({}))
    }

    /// Newest matching entries first.
    pub fn search_journal(&self, user: UserId, search: &JournalSearch, paging: Paging) -> Result<Vec<JournalEntry>> {
        let page = self.page(paging);
        let entries = self.store().fetch_journal_entries(user)?;
        Ok(entries
            .into_iter()
            .filter(|entry| search.matches(entry))
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .collect())
    }

    pub fn journal_stats(&self, user: UserId) -> Result<JournalStats> {
        let entries = self.store().fetch_journal_entries(user)?;
        Ok(journal_stats(&entries, self.today))
    }

    pub fn journal_dashboard(&self, user: UserId) -> Result<JournalDashboard> {
        let entries = self.store().fetch_journal_entries(user)?;
        let stats = journal_stats(&entries, self.today);
        let popular_tags = stats
            .most_used_tags
            .iter()
            .take(DASHBOARD_POPULAR_TAGS)
            .map(|tag| tag.tag.clone())
            .collect();
        let recent_entries = entries.into_iter().take(DASHBOARD_RECENT_ENTRIES).collect();

        Ok(JournalDashboard {
            stats,
            recent_entries,
            popular_tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::NoopReporter;
    use crate::config::Settings;
    use crate::db::tests::test_conn;
    use chrono::Utc;

    #[test]
    fn test_create_generates_tags_only_when_missing() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter);

        let auto = dashboard
            .create_journal_entry(1, &NewJournalEntry::new("Hike", "mountain trail mountain views and a lake"))
            .unwrap();
        assert_eq!(auto.tag_list()[0], "mountain");
        assert!(auto.tag_list().len() <= 5);

        let mut tagged = NewJournalEntry::new("Work", "Long meeting about budgets");
        tagged.tags = Some("work, meetings".to_string());
        let tagged = dashboard.create_journal_entry(1, &tagged).unwrap();
        assert_eq!(tagged.tag_list(), vec!["work", "meetings"]);

        let bare = dashboard.create_journal_entry(1, &NewJournalEntry::new("Hi", "a b c")).unwrap();
        assert_eq!(bare.tags, None);
    }

    #[test]
    fn test_default_today_matches_entry_dates() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter);

        let entry = dashboard
            .create_journal_entry(1, &NewJournalEntry::new("Late", "written just now"))
            .unwrap();
        assert_eq!(entry.written_on(), dashboard.today());
        assert_eq!(dashboard.today(), Utc::now().date_naive());

        let stats = dashboard.journal_stats(1).unwrap();
        assert_eq!(stats.entries_this_month, 1);
        assert_eq!(stats.writing_streak, 1);
    }

    #[test]
    fn test_update_regenerates_tags_with_new_content() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter);
        let entry = dashboard
            .create_journal_entry(1, &NewJournalEntry::new("Day", "garden garden flowers"))
            .unwrap();

        let retitle = JournalEntryUpdate {
            title: Some("Sunday".to_string()),
            ..Default::default()
        };
        let same_tags = dashboard.update_journal_entry(1, entry.id, &retitle).unwrap();
        assert_eq!(same_tags.tags, entry.tags);

        let rewrite = JournalEntryUpdate {
            content: Some("cooking dinner cooking pasta".to_string()),
            ..Default::default()
        };
        let updated = dashboard.update_journal_entry(1, entry.id, &rewrite).unwrap();
        assert_eq!(updated.tag_list(), vec!["cooking", "dinner", "pasta"]);
        assert_eq!(dashboard.get_journal_entry(1, entry.id).unwrap().tags, updated.tags);
    }

    #[test]
    fn test_search_filters_and_pages() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter);

        for n in 0..3 {
            let mut entry = NewJournalEntry::new(&format!("Run {}", n), "morning running session");
            entry.mood = Some("happy".to_string());
            dashboard.create_journal_entry(1, &entry).unwrap();
        }
        dashboard.create_journal_entry(1, &NewJournalEntry::new("Rain", "stayed inside")).unwrap();
        dashboard.create_journal_entry(2, &NewJournalEntry::new("Run", "not mine")).unwrap();

        let happy = JournalSearch {
            mood: Some("happy".to_string()),
            ..Default::default()
        };
        assert_eq!(dashboard.search_journal(1, &happy, Paging::default()).unwrap().len(), 3);
        assert_eq!(dashboard.search_journal(1, &happy, Paging::new(2, 10)).unwrap().len(), 1);

        let by_tag = JournalSearch {
            tags: vec!["RUNNING".to_string()],
            ..Default::default()
        };
        assert_eq!(dashboard.search_journal(1, &by_tag, Paging::default()).unwrap().len(), 3);

        let by_text = JournalSearch {
            query: Some("inside".to_string()),
            ..Default::default()
        };
        let found = dashboard.search_journal(1, &by_text, Paging::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Rain");
    }

    #[test]
    fn test_dashboard_and_delete() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter).with_today(Utc::now().date_naive());

        let mut ids = Vec::new();
        for n in 0..6 {
            let entry = NewJournalEntry::new(&format!("Entry {}", n), "reading books tonight");
            ids.push(dashboard.create_journal_entry(1, &entry).unwrap().id);
        }

        let board = dashboard.journal_dashboard(1).unwrap();
        assert_eq!(board.stats.total_entries, 6);
        assert_eq!(board.stats.writing_streak, 1);
        assert_eq!(board.recent_entries.len(), 5);
        assert_eq!(board.popular_tags, vec!["books", "reading", "tonight"]);

        dashboard.delete_journal_entry(1, ids[0]).unwrap();
        assert!(matches!(
            dashboard.delete_journal_entry(1, ids[0]),
            Err(DashboardError::NotFound(_))
        ));
        assert_eq!(dashboard.journal_stats(1).unwrap().total_entries, 5);
    }
}
