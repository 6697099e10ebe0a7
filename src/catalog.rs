//! Client-side search over the listing snapshot.
//!
//! The listings page fetches every listing once and then narrows the
//! snapshot locally on each input change. All three predicates are pure and
//! combined with AND, so the result never depends on evaluation order.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::Listing;

/// Location selector value that disables the location predicate.
pub const ALL_LOCATIONS: &str = "All Locations";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown price range '{0}' (see `price-ranges` for the options)")]
    UnknownPriceRange(String),
}

/// The fixed, ordered table of price buckets. Each bucket is `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriceRange {
    #[default]
    All,
    Under2000,
    From2000To5000,
    From5000To10000,
    From10000To20000,
    From20000To50000,
    Above50000,
}

impl PriceRange {
    pub const ALL: [PriceRange; 7] = [
        PriceRange::All,
        PriceRange::Under2000,
        PriceRange::From2000To5000,
        PriceRange::From5000To10000,
        PriceRange::From10000To20000,
        PriceRange::From20000To50000,
        PriceRange::Above50000,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PriceRange::All => "All Prices",
            PriceRange::Under2000 => "Under 2000",
            PriceRange::From2000To5000 => "2000–5000",
            PriceRange::From5000To10000 => "5000–10000",
            PriceRange::From10000To20000 => "10000–20000",
            PriceRange::From20000To50000 => "20000–50000",
            PriceRange::Above50000 => "Above 50000",
        }
    }

    /// Lower (inclusive) and upper (exclusive) bound, `None` for "All Prices"
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            PriceRange::All => None,
            PriceRange::Under2000 => Some((0.0, 2000.0)),
            PriceRange::From2000To5000 => Some((2000.0, 5000.0)),
            PriceRange::From5000To10000 => Some((5000.0, 10000.0)),
            PriceRange::From10000To20000 => Some((10000.0, 20000.0)),
            PriceRange::From20000To50000 => Some((20000.0, 50000.0)),
            PriceRange::Above50000 => Some((50000.0, f64::INFINITY)),
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        match self.bounds() {
            None => true,
            Some((min, max)) => min <= price && price < max,
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PriceRange {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        PriceRange::ALL
            .iter()
            .copied()
            .find(|range| normalize_label(range.label()) == wanted)
            .ok_or_else(|| FilterError::UnknownPriceRange(s.to_string()))
    }
}

fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace(['–', '—'], "-")
        .replace(' ', "")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationFilter {
    #[default]
    All,
    Only(String),
}

impl LocationFilter {
    /// Parses a selector value; "All Locations", "All" and blank mean no filter
    pub fn parse(value: &str) -> Self {
        let sentinel = value.trim();
        if sentinel.is_empty()
            || sentinel.eq_ignore_ascii_case(ALL_LOCATIONS)
            || sentinel.eq_ignore_ascii_case("all")
        {
            LocationFilter::All
        } else {
            LocationFilter::Only(value.to_string())
        }
    }

    pub fn matches(&self, location: &str) -> bool {
        match self {
            LocationFilter::All => true,
            LocationFilter::Only(wanted) => wanted.to_lowercase() == location.to_lowercase(),
        }
    }
}

/// Transient search inputs of the listings page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub query: String,
    pub location: LocationFilter,
    pub price_range: PriceRange,
}

impl FilterCriteria {
    pub fn new(query: &str, location: &str, price_range_label: &str) -> Result<Self, FilterError> {
        Ok(Self {
            query: query.to_string(),
            location: LocationFilter::parse(location),
            price_range: price_range_label.parse()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.location == LocationFilter::All
            && self.price_range == PriceRange::All
    }

    fn matches_query(&self, listing: &Listing) -> bool {
        if self.query.trim().is_empty() {
            return true;
        }

        let query = self.query.to_lowercase();
        [&listing.title, &listing.location, &listing.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.matches_query(listing)
            && self.location.matches(&listing.location)
            && self.price_range.contains(listing.price)
    }
}

/// Applies the criteria to a snapshot, keeping the snapshot's order
pub fn apply<'a>(listings: &'a [Listing], criteria: &FilterCriteria) -> Vec<&'a Listing> {
    listings.iter().filter(|l| criteria.matches(l)).collect()
}

/// Label-based entry point used by the listings page inputs
pub fn filter<'a>(
    listings: &'a [Listing],
    query: &str,
    location: &str,
    price_range_label: &str,
) -> Result<Vec<&'a Listing>, FilterError> {
    let criteria = FilterCriteria::new(query, location, price_range_label)?;
    Ok(apply(listings, &criteria))
}

/// Distinct locations of the snapshot in first-seen order, compared
/// case-insensitively
pub fn locations(listings: &[Listing]) -> Vec<String> {
    let mut seen = HashSet::new();
    listings
        .iter()
        .map(|l| l.location.as_str())
        .filter(|loc| !loc.trim().is_empty())
        .filter(|loc| seen.insert(loc.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Where a page stands with its data. Keeps "nothing matched" apart from
/// "nothing loaded yet".
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// A listing snapshot fetched once per page visit.
#[derive(Debug, Clone)]
pub struct Catalog {
    state: LoadState<Vec<Listing>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
        }
    }

    pub fn from_listings(listings: Vec<Listing>) -> Self {
        Self {
            state: LoadState::Loaded(listings),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            state: LoadState::Failed(message.into()),
        }
    }

    pub fn state(&self) -> &LoadState<Vec<Listing>> {
        &self.state
    }

    /// Filtered view; `Loading`/`Failed` pass through so callers never
    /// mistake them for an empty result
    pub fn view(&self, criteria: &FilterCriteria) -> LoadState<Vec<&Listing>> {
        match &self.state {
            LoadState::Loading => LoadState::Loading,
            LoadState::Failed(message) => LoadState::Failed(message.clone()),
            LoadState::Loaded(listings) => LoadState::Loaded(apply(listings, criteria)),
        }
    }

    /// Location selector options, led by the "All Locations" sentinel
    pub fn location_options(&self) -> Vec<String> {
        let mut options = vec![ALL_LOCATIONS.to_string()];
        if let Some(listings) = self.state.loaded() {
            options.extend(locations(listings));
        }
        options
    }

    pub fn len(&self) -> usize {
        self.state.loaded().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, title: &str, location: &str, price: f64) -> Listing {
        Listing {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{} stay", title),
            price,
            location: location.to_string(),
            amenities: vec![],
            images: vec![],
            max_guests: 2,
            bedrooms: 1,
            bathrooms: 1,
            host: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn snapshot() -> Vec<Listing> {
        vec![
            listing("1", "Beach Hut", "Goa", 1500.0),
            listing("2", "Hill Cabin", "Manali", 2000.0),
            listing("3", "City Loft", "Mumbai", 4999.0),
            listing("4", "Palace Suite", "Jaipur", 50000.0),
            listing("5", "Goa Villa", "goa", 5000.0),
            listing("6", "Lake House", "Udaipur", 12000.0),
        ]
    }

    fn ids(listings: &[&Listing]) -> Vec<String> {
        listings.iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn test_empty_criteria_returns_everything_in_order() {
        let all = snapshot();
        let result = filter(&all, "", ALL_LOCATIONS, "All Prices").unwrap();
        assert_eq!(ids(&result), vec!["1", "2", "3", "4", "5", "6"]);
        assert!(FilterCriteria::default().is_empty());
    }

    #[test]
    fn test_query_matches_title_location_or_description() {
        let mut all = snapshot();
        all[5].description = "Overlooks the LAKE at dawn".to_string();

        assert_eq!(ids(&filter(&all, "cabin", "All", "All Prices").unwrap()), vec!["2"]);
        assert_eq!(ids(&filter(&all, "GOA", "All", "All Prices").unwrap()), vec!["1", "5"]);
        assert_eq!(ids(&filter(&all, "dawn", "All", "All Prices").unwrap()), vec!["6"]);
        assert_eq!(ids(&filter(&all, "   ", "All", "All Prices").unwrap()).len(), 6);
    }

    #[test]
    fn test_query_and_location_are_not_trimmed_for_matching() {
        let mut all = snapshot();
        all[0].location = " Goa".to_string();

        assert!(filter(&all, " beach hut", "All", "All Prices").unwrap().is_empty());
        assert_eq!(ids(&filter(&all, "beach hut", "All", "All Prices").unwrap()), vec!["1"]);

        assert_eq!(ids(&filter(&all, "", "Goa", "All Prices").unwrap()), vec!["5"]);
        assert_eq!(locations(&all)[0], " Goa");
    }

    #[test]
    fn test_location_is_exact_and_case_insensitive() {
        let all = snapshot();
        let result = filter(&all, "", "Goa", "All Prices").unwrap();
        assert_eq!(ids(&result), vec!["1", "5"]);
        assert!(result.iter().all(|l| l.location.eq_ignore_ascii_case("goa")));

        // substring of a location is not a match
        assert!(filter(&all, "", "Go", "All Prices").unwrap().is_empty());
    }

    #[test]
    fn test_price_range_edges_belong_to_the_upper_bucket() {
        let all = snapshot();
        assert_eq!(ids(&filter(&all, "", "All", "Under 2000").unwrap()), vec!["1"]);
        assert_eq!(ids(&filter(&all, "", "All", "2000–5000").unwrap()), vec!["2", "3"]);
        assert_eq!(ids(&filter(&all, "", "All", "5000-10000").unwrap()), vec!["5"]);
        assert_eq!(ids(&filter(&all, "", "All", "20000–50000").unwrap()), Vec::<String>::new());
        assert_eq!(ids(&filter(&all, "", "All", "above 50000").unwrap()), vec!["4"]);
    }

    #[test]
    fn test_every_bucket_result_is_within_bounds() {
        let all = snapshot();
        for range in PriceRange::ALL {
            let result = filter(&all, "", "All", range.label()).unwrap();
            if let Some((min, max)) = range.bounds() {
                assert!(result.iter().all(|l| min <= l.price && l.price < max), "{}", range);
            }
        }
    }

    #[test]
    fn test_unknown_price_label_is_rejected() {
        let all = snapshot();
        let err = filter(&all, "", "All", "Cheap").unwrap_err();
        assert_eq!(err, FilterError::UnknownPriceRange("Cheap".to_string()));
    }

    #[test]
    fn test_combined_predicates_are_the_intersection() {
        let all = snapshot();
        let by_query: HashSet<String> = ids(&filter(&all, "goa", "All", "All Prices").unwrap()).into_iter().collect();
        let by_location: HashSet<String> = ids(&filter(&all, "", "Goa", "All Prices").unwrap()).into_iter().collect();
        let by_price: HashSet<String> = ids(&filter(&all, "", "All", "5000–10000").unwrap()).into_iter().collect();

        let expected: HashSet<String> = by_query
            .intersection(&by_location)
            .cloned()
            .collect::<HashSet<_>>()
            .intersection(&by_price)
            .cloned()
            .collect();

        let combined: HashSet<String> = ids(&filter(&all, "goa", "Goa", "5000–10000").unwrap()).into_iter().collect();
        assert_eq!(combined, expected);
        assert_eq!(combined, HashSet::from(["5".to_string()]));
    }

    #[test]
    fn test_locations_are_distinct_in_first_seen_order() {
        let all = snapshot();
        assert_eq!(locations(&all), vec!["Goa", "Manali", "Mumbai", "Jaipur", "Udaipur"]);
    }

    #[test]
    fn test_catalog_distinguishes_loading_from_no_matches() {
        let criteria = FilterCriteria::new("nowhere", "All", "All Prices").unwrap();

        let catalog = Catalog::new();
        assert!(catalog.view(&criteria).is_loading());
        assert_eq!(catalog.location_options(), vec![ALL_LOCATIONS.to_string()]);

        let catalog = Catalog::from_listings(snapshot());
        assert_eq!(catalog.view(&criteria), LoadState::Loaded(vec![]));
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.location_options()[0], ALL_LOCATIONS);

        let catalog = Catalog::failed("Failed to load listings");
        assert_eq!(catalog.view(&criteria), LoadState::Failed("Failed to load listings".to_string()));
    }
}
