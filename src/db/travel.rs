use super::is_constraint_violation;
use crate::entities::{NewVisitedCountry, NewWishlistCountry, UserId, VisitedCountry, WishlistCountry};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

fn wishlist_from_row(row: &Row<'_>) -> rusqlite::Result<WishlistCountry> {
    Ok(WishlistCountry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        country_iso3: row.get(2)?,
        country_name: row.get(3)?,
        continent: row.get(4)?,
        added_date: row.get(5)?,
    })
}

fn visited_from_row(row: &Row<'_>) -> rusqlite::Result<VisitedCountry> {
    Ok(VisitedCountry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        country_iso3: row.get(2)?,
        country_name: row.get(3)?,
        continent: row.get(4)?,
        visit_date: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
    })
}

// ============================================================================
// WISHLIST
// ============================================================================

/// `None` when the country is already on the wishlist. `iso3` must be normalized.
pub fn insert_wishlist(
    conn: &Connection,
    user: UserId,
    iso3: &str,
    country: &NewWishlistCountry,
) -> Result<Option<WishlistCountry>> {
    let result = conn.execute(
        "INSERT INTO travel_wishlist (user_id, country_iso3, country_name, continent, added_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user,
            iso3,
            country.country_name.trim(),
            country.continent,
            Utc::now(),
        ],
    );

    match result {
        Ok(_) => get_wishlist(conn, user, iso3),
        Err(err) if is_constraint_violation(&err) => Ok(None),
        Err(err) => Err(err).context("Failed to insert wishlist country"),
    }
}

pub fn get_wishlist(conn: &Connection, user: UserId, iso3: &str) -> Result<Option<WishlistCountry>> {
    let country = conn
        .query_row(
            "SELECT id, user_id, country_iso3, country_name, continent, added_date
             FROM travel_wishlist WHERE user_id = ?1 AND country_iso3 = ?2",
            params![user, iso3],
            wishlist_from_row,
        )
        .optional()?;
    Ok(country)
}

/// Most recently added first
pub fn list_wishlist(conn: &Connection, user: UserId, continent: Option<&str>) -> Result<Vec<WishlistCountry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, country_iso3, country_name, continent, added_date
         FROM travel_wishlist
         WHERE user_id = ?1 AND (?2 IS NULL OR continent = ?2)
         ORDER BY added_date DESC, id DESC",
    )?;
    let rows = stmt
        .query_map(params![user, continent], wishlist_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_wishlist(conn: &Connection, user: UserId, iso3: &str) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM travel_wishlist WHERE user_id = ?1 AND country_iso3 = ?2",
        params![user, iso3],
    )?;
    Ok(deleted > 0)
}

// ============================================================================
// VISITED
// ============================================================================

/// Mark a country visited and drop it from the wishlist.
///
/// Two writes: run inside the caller's transaction. Without an explicit
/// continent the wishlist entry's continent is kept. `None` when the country
/// was already marked visited.
pub fn insert_visited(
    conn: &Connection,
    user: UserId,
    iso3: &str,
    country: &NewVisitedCountry,
) -> Result<Option<VisitedCountry>> {
    let wished = get_wishlist(conn, user, iso3)?;
    let continent = country
        .continent
        .clone()
        .or_else(|| wished.and_then(|w| w.continent));

    let result = conn.execute(
        "INSERT INTO travel_visited (
            user_id, country_iso3, country_name, continent, visit_date, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user,
            iso3,
            country.country_name.trim(),
            continent,
            country.visit_date,
            country.notes,
            Utc::now(),
        ],
    );

    match result {
        Ok(_) => {}
        Err(err) if is_constraint_violation(&err) => return Ok(None),
        Err(err) => return Err(err).context("Failed to insert visited country"),
    }

    delete_wishlist(conn, user, iso3)?;
    get_visited(conn, user, iso3)
}

pub fn get_visited(conn: &Connection, user: UserId, iso3: &str) -> Result<Option<VisitedCountry>> {
    let country = conn
        .query_row(
            "SELECT id, user_id, country_iso3, country_name, continent, visit_date, notes, created_at
             FROM travel_visited WHERE user_id = ?1 AND country_iso3 = ?2",
            params![user, iso3],
            visited_from_row,
        )
        .optional()?;
    Ok(country)
}

/// Latest visit first; countries without a visit date last
pub fn list_visited(conn: &Connection, user: UserId) -> Result<Vec<VisitedCountry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, country_iso3, country_name, continent, visit_date, notes, created_at
         FROM travel_visited
         WHERE user_id = ?1
         ORDER BY visit_date IS NULL, visit_date DESC, created_at DESC",
    )?;
    let rows = stmt
        .query_map(params![user], visited_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_visited(conn: &Connection, user: UserId, iso3: &str) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM travel_visited WHERE user_id = ?1 AND country_iso3 = ?2",
        params![user, iso3],
    )?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::test_conn;

    fn wish(name: &str, continent: Option<&str>) -> NewWishlistCountry {
        NewWishlistCountry {
            country_iso3: String::new(),
            country_name: name.to_string(),
            continent: continent.map(str::to_string),
        }
    }

    fn visit(name: &str) -> NewVisitedCountry {
        NewVisitedCountry {
            country_iso3: String::new(),
            country_name: name.to_string(),
            continent: None,
            visit_date: None,
            notes: None,
        }
    }

    #[test]
    fn test_wishlist_rejects_duplicates() {
        let conn = test_conn();
        assert!(insert_wishlist(&conn, 1, "JPN", &wish("Japan", Some("Asia"))).unwrap().is_some());
        assert!(insert_wishlist(&conn, 1, "JPN", &wish("Japan", Some("Asia"))).unwrap().is_none());
        assert!(insert_wishlist(&conn, 2, "JPN", &wish("Japan", Some("Asia"))).unwrap().is_some());

        assert_eq!(list_wishlist(&conn, 1, Some("Asia")).unwrap().len(), 1);
        assert_eq!(list_wishlist(&conn, 1, Some("Europe")).unwrap().len(), 0);
    }

    #[test]
    fn test_visit_moves_country_off_wishlist() {
        let conn = test_conn();
        insert_wishlist(&conn, 1, "PER", &wish("Peru", Some("South America"))).unwrap();

        let visited = insert_visited(&conn, 1, "PER", &visit("Peru")).unwrap().unwrap();
        assert_eq!(visited.continent.as_deref(), Some("South America"));
        assert!(get_wishlist(&conn, 1, "PER").unwrap().is_none());

        assert!(insert_visited(&conn, 1, "PER", &visit("Peru")).unwrap().is_none());
        assert_eq!(list_visited(&conn, 1).unwrap().len(), 1);

        assert!(delete_visited(&conn, 1, "PER").unwrap());
        assert!(!delete_visited(&conn, 1, "PER").unwrap());
    }
}
