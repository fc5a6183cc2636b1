use super::Dashboard;
use crate::access::DataAccess;
use crate::db::travel;
use crate::entities::travel::normalize_iso3;
use crate::entities::{NewVisitedCountry, NewWishlistCountry, UserId, VisitedCountry, WishlistCountry};
use crate::error::{DashboardError, Result};
use crate::stats::{travel_dashboard, travel_stats, TravelDashboard, TravelStats};
use serde_json::json;

impl Dashboard<'_> {
    pub fn add_to_wishlist(&self, user: UserId, country: &NewWishlistCountry) -> Result<WishlistCountry> {
        country.validate()?;
        let iso3 = normalize_iso3(&country.country_iso3)?;
        let added = travel::insert_wishlist(self.conn, user, &iso3, country)?
            .ok_or_else(|| DashboardError::conflict(format!("{} is already on the wishlist", iso3)))?;
        self.record(user, "create", "travel_wishlist", &iso3, json!({ "country": added.country_name }))?;
        Ok(added)
    }

    pub fn list_wishlist(&self, user: UserId, continent: Option<&str>) -> Result<Vec<WishlistCountry>> {
        Ok(travel::list_wishlist(self.conn, user, continent)?)
    }

    pub fn remove_from_wishlist(&self, user: UserId, code: &str) -> Result<()> {
        let iso3 = normalize_iso3(code)?;
        if !travel::delete_wishlist(self.conn, user, &iso3)? {
            return Err(DashboardError::NotFound("wishlist country"));
        }
        self.record(user, "delete", "travel_wishlist", &iso3, json!({}))
    }

    /// Mark a country visited; it leaves the wishlist in the same step.
    pub fn mark_visited(&self, user: UserId, country: &NewVisitedCountry) -> Result<VisitedCountry> {
        country.validate()?;
        let iso3 = normalize_iso3(&country.country_iso3)?;
        let tx = self.conn.unchecked_transaction()?;
        let visited = travel::insert_visited(self.conn, user, &iso3, country)?
            .ok_or_else(|| DashboardError::conflict(format!("{} is already marked visited", iso3)))?;
        self.record(
            user,
            "create",
            "travel_visited",
            &iso3,
            json!({ "country": visited.country_name, "visit_date": visited.visit_date }),
        )?;
        tx.commit()?;
        Ok(visited)
    }

    pub fn list_visited(&self, user: UserId) -> Result<Vec<VisitedCountry>> {
        Ok(travel::list_visited(self.conn, user)?)
    }

    pub fn remove_visited(&self, user: UserId, code: &str) -> Result<()> {
        let iso3 = normalize_iso3(code)?;
        if !travel::delete_visited(self.conn, user, &iso3)? {
            return Err(DashboardError::NotFound("visited country"));
        }
        self.record(user, "delete", "travel_visited", &iso3, json!({}))
    }

    pub fn travel_stats(&self, user: UserId) -> Result<TravelStats> {
        let store = self.store();
        Ok(travel_stats(&store.fetch_wishlist(user)?, &store.fetch_visited(user)?))
    }

    pub fn travel_dashboard(&self, user: UserId) -> Result<TravelDashboard> {
        let store = self.store();
        Ok(travel_dashboard(&store.fetch_wishlist(user)?, &store.fetch_visited(user)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::NoopReporter;
    use crate::config::Settings;
    use crate::db::tests::test_conn;

    fn wish(code: &str, name: &str, continent: &str) -> NewWishlistCountry {
        NewWishlistCountry {
            country_iso3: code.to_string(),
            country_name: name.to_string(),
            continent: Some(continent.to_string()),
        }
    }

    fn visit(code: &str, name: &str) -> NewVisitedCountry {
        NewVisitedCountry {
            country_iso3: code.to_string(),
            country_name: name.to_string(),
            continent: None,
            visit_date: None,
            notes: None,
        }
    }

    #[test]
    fn test_wishlist_codes_are_normalized() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter);

        let added = dashboard.add_to_wishlist(1, &wish("jpn", "Japan", "Asia")).unwrap();
        assert_eq!(added.country_iso3, "JPN");

        let err = dashboard.add_to_wishlist(1, &wish("JPN", "Japan", "Asia")).unwrap_err();
        assert!(matches!(err, DashboardError::Conflict(_)));
        assert!(matches!(
            dashboard.add_to_wishlist(1, &wish("JP", "Japan", "Asia")),
            Err(DashboardError::Validation { .. })
        ));

        dashboard.remove_from_wishlist(1, "Jpn").unwrap();
        assert!(matches!(
            dashboard.remove_from_wishlist(1, "JPN"),
            Err(DashboardError::NotFound(_))
        ));
    }

    #[test]
    fn test_visiting_moves_country_and_feeds_stats() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter);

        dashboard.add_to_wishlist(1, &wish("PER", "Peru", "South America")).unwrap();
        dashboard.add_to_wishlist(1, &wish("ISL", "Iceland", "Europe")).unwrap();

        let visited = dashboard.mark_visited(1, &visit("per", "Peru")).unwrap();
        assert_eq!(visited.continent.as_deref(), Some("South America"));
        assert!(matches!(
            dashboard.mark_visited(1, &visit("PER", "Peru")),
            Err(DashboardError::Conflict(_))
        ));
        dashboard.mark_visited(1, &visit("UZB", "Uzbekistan")).unwrap();

        let stats = dashboard.travel_stats(1).unwrap();
        assert_eq!(stats.total_wishlist, 1);
        assert_eq!(stats.total_visited, 2);
        assert!(stats
            .continents
            .iter()
            .any(|c| c.continent == "Unknown" && c.visited_count == 1));

        let board = dashboard.travel_dashboard(1).unwrap();
        assert_eq!(board.recent_wishlist.len(), 1);
        assert_eq!(board.recent_visited.len(), 2);

        dashboard.remove_visited(1, "UZB").unwrap();
        assert_eq!(dashboard.list_visited(1).unwrap().len(), 1);
        assert_eq!(dashboard.list_wishlist(1, Some("Europe")).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_audit_rolls_back_visit() {
        let conn = test_conn();
        let settings = Settings::default();
        let dashboard = Dashboard::new(&conn, &settings, &NoopReporter);
        dashboard.add_to_wishlist(1, &wish("NOR", "Norway", "Europe")).unwrap();

        conn.execute_batch(
            "CREATE TRIGGER reject_events BEFORE INSERT ON events
             BEGIN SELECT RAISE(ABORT, 'audit unavailable'); END;",
        )
        .unwrap();

        let err = dashboard.mark_visited(1, &visit("NOR", "Norway")).unwrap_err();
        assert!(matches!(err, DashboardError::Storage(_)));
        assert!(dashboard.list_visited(1).unwrap().is_empty());
        assert_eq!(dashboard.list_wishlist(1, None).unwrap().len(), 1);
    }
}
