use crate::entities::{VisitedCountry, WishlistCountry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const UNKNOWN_CONTINENT: &str = "Unknown";
const RECENT_COUNTRIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinentStats {
    pub continent: String,
    pub wishlist_count: usize,
    pub visited_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelStats {
    pub total_wishlist: usize,
    pub total_visited: usize,
    /// Sorted by continent name
    pub continents: Vec<ContinentStats>,
    pub wishlist_countries: Vec<String>,
    pub visited_countries: Vec<String>,
}

fn continent_of(continent: &Option<String>) -> String {
    continent
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(UNKNOWN_CONTINENT)
        .to_string()
}

pub fn travel_stats(wishlist: &[WishlistCountry], visited: &[VisitedCountry]) -> TravelStats {
    let mut continents: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for country in wishlist {
        continents.entry(continent_of(&country.continent)).or_default().0 += 1;
    }
    for country in visited {
        continents.entry(continent_of(&country.continent)).or_default().1 += 1;
    }

    TravelStats {
        total_wishlist: wishlist.len(),
        total_visited: visited.len(),
        continents: continents
            .into_iter()
            .map(|(continent, (wishlist_count, visited_count))| ContinentStats {
                continent,
                wishlist_count,
                visited_count,
            })
            .collect(),
        wishlist_countries: wishlist.iter().map(|c| c.country_name.clone()).collect(),
        visited_countries: visited.iter().map(|c| c.country_name.clone()).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelDashboard {
    pub stats: TravelStats,
    pub recent_wishlist: Vec<WishlistCountry>,
    pub recent_visited: Vec<VisitedCountry>,
}

/// Stats plus the five most recently added countries of each list.
pub fn travel_dashboard(wishlist: &[WishlistCountry], visited: &[VisitedCountry]) -> TravelDashboard {
    let mut recent_wishlist = wishlist.to_vec();
    recent_wishlist.sort_by(|a, b| b.added_date.cmp(&a.added_date).then_with(|| b.id.cmp(&a.id)));
    recent_wishlist.truncate(RECENT_COUNTRIES);

    let mut recent_visited = visited.to_vec();
    recent_visited.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    recent_visited.truncate(RECENT_COUNTRIES);

    TravelDashboard {
        stats: travel_stats(wishlist, visited),
        recent_wishlist,
        recent_visited,
    }
}
