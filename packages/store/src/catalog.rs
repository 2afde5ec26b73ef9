//! # Restaurant catalogue normalization and filtering
//!
//! The grid fetches the whole catalogue once and does all filtering on the
//! client. Everything here is pure: the same catalogue and [`CatalogFilter`]
//! always produce the same [`Listing`].
//!
//! ## Filters
//!
//! Filters apply in order, each narrowing the previous result:
//!
//! 1. **Area**: skipped when the selection is empty or `"all"`; otherwise the
//!    restaurant's area name must equal the selection, trimmed and ignoring
//!    case.
//! 2. **Category**: skipped when unset; otherwise the comma-split, trimmed,
//!    lower-cased cuisine list must contain the lower-cased category.
//! 3. **Search**: skipped when blank; otherwise the trimmed, lower-cased text
//!    must be a substring of the name or of any cuisine token.
//!
//! The result is partitioned open-first. The grid draws a divider between the
//! groups when both are non-empty.

use std::collections::BTreeSet;

use crate::models::{Area, Restaurant, RestaurantAddress};

pub const NO_CUISINES: &str = "No cuisines listed";
pub const NO_ADDRESS: &str = "No address";
pub const UNKNOWN_AREA: &str = "Unknown Area";

/// A normalized restaurant with its derived open/closed status.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    pub restaurant: Restaurant,
    pub is_currently_open: bool,
}

/// Fill display placeholders and derive open/closed status.
pub fn normalize(restaurants: Vec<Restaurant>) -> Vec<CatalogEntry> {
    restaurants.into_iter().map(normalize_one).collect()
}

fn normalize_one(mut restaurant: Restaurant) -> CatalogEntry {
    if restaurant.cuisines.as_deref().map_or(true, str::is_empty) {
        restaurant.cuisines = Some(NO_CUISINES.to_string());
    }
    if restaurant.address.is_none() {
        restaurant.address = Some(RestaurantAddress {
            street: NO_ADDRESS.to_string(),
            ..RestaurantAddress::default()
        });
    }
    if restaurant.area.is_none() {
        restaurant.area = Some(Area {
            area_name: UNKNOWN_AREA.to_string(),
            latitude: Some(0.0),
            longitude: Some(0.0),
            pincode: Some(0),
            ..Area::default()
        });
    }
    let is_currently_open = match restaurant.is_open {
        Some(open) => open,
        None => {
            tracing::warn!(
                "Restaurant \"{}\" has no isOpen flag; assuming closed",
                restaurant.name
            );
            false
        }
    };
    CatalogEntry {
        restaurant,
        is_currently_open,
    }
}

/// The filter inputs the grid recomputes on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogFilter {
    pub area: String,
    pub category: Option<String>,
    pub search: String,
}

impl CatalogFilter {
    pub fn new(area: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    fn matches_area(&self, restaurant: &Restaurant) -> bool {
        let area = self.area.trim();
        if area.is_empty() || area.eq_ignore_ascii_case("all") {
            return true;
        }
        restaurant.area_name().trim().to_lowercase() == area.to_lowercase()
    }

    fn matches_category(&self, restaurant: &Restaurant) -> bool {
        match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => restaurant
                .cuisine_tokens()
                .contains(&category.to_lowercase()),
        }
    }

    fn matches_search(&self, restaurant: &Restaurant) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        restaurant.name.to_lowercase().contains(&needle)
            || restaurant
                .cuisine_tokens()
                .iter()
                .any(|c| c.contains(&needle))
    }

    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        self.matches_area(restaurant)
            && self.matches_category(restaurant)
            && self.matches_search(restaurant)
    }
}

/// Filtered restaurants, open ones first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Listing {
    pub open: Vec<CatalogEntry>,
    pub closed: Vec<CatalogEntry>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.open.is_empty() && self.closed.is_empty()
    }

    pub fn show_divider(&self) -> bool {
        !self.open.is_empty() && !self.closed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.open.len() + self.closed.len()
    }
}

/// Apply `filter` and partition the result by open/closed status.
pub fn filter(entries: &[CatalogEntry], filter: &CatalogFilter) -> Listing {
    let (open, closed) = entries
        .iter()
        .filter(|e| filter.matches(&e.restaurant))
        .cloned()
        .partition(|e| e.is_currently_open);
    Listing { open, closed }
}

/// The text shown when a filter matches nothing.
pub fn empty_message(filter: &CatalogFilter) -> String {
    let mut text = String::from("No restaurants found");
    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        text.push_str(&format!(" for category \"{category}\""));
    }
    text.push_str(&format!(" in {}", filter.area));
    let search = filter.search.trim();
    if !search.is_empty() {
        text.push_str(&format!(" for \"{search}\""));
    }
    text.push('.');
    text
}

/// Distinct cuisine names across the catalogue, for the category bar.
///
/// Names keep the casing of their first appearance; placeholders are skipped.
pub fn categories(entries: &[CatalogEntry]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();
    for entry in entries {
        let Some(cuisines) = entry.restaurant.cuisines.as_deref() else {
            continue;
        };
        if cuisines == NO_CUISINES {
            continue;
        }
        for token in cuisines.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if seen.insert(token.to_lowercase()) {
                names.push(token.to_string());
            }
        }
    }
    names.sort_by_key(|n| n.to_lowercase());
    names
}
