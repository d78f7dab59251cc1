//! Train search over the catalog, annotated with availability.
//!
//! Filters are conjunctive: a train is a match only if it passes every
//! filter that is present. Text filters are case-insensitive substring
//! matches, the departure window is inclusive at both ends, and results
//! come back in catalog order. A search with a travel date reports real
//! availability for that date; without one it reports full capacity,
//! since every date starts empty.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::availability;
use crate::catalog::Catalog;
use crate::domain::{LedgerKey, SeatNumber, TimeRange, Train};
use crate::ledger::{CachedLedger, StorageError};

/// What to search for. Absent fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub time_range: Option<TimeRange>,
    pub travel_date: Option<NaiveDate>,
    /// Minimum seats still free. Zero is no constraint at all.
    pub min_available_seats: Option<u32>,
}

/// One search result: a train and how much of it is left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainAvailability {
    pub train: Train,
    /// The date the availability numbers are for, when one was given.
    pub travel_date: Option<NaiveDate>,
    pub available_count: u32,
    pub booked_seats: Vec<SeatNumber>,
}

/// Runs searches against the catalog and the booking ledger.
pub struct SearchEngine {
    catalog: Arc<Catalog>,
    ledger: Arc<CachedLedger>,
}

impl SearchEngine {
    pub fn new(catalog: Arc<Catalog>, ledger: Arc<CachedLedger>) -> Self {
        Self { catalog, ledger }
    }

    /// All trains matching `filters`, in catalog order.
    pub async fn search(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<TrainAvailability>, StorageError> {
        let empty = BTreeSet::new();
        let mut results = Vec::new();

        for train in self.catalog.iter() {
            if !matches_static(train, filters) {
                continue;
            }

            let booked: BTreeSet<SeatNumber> = match filters.travel_date {
                Some(date) => {
                    let key = LedgerKey::new(train.id, date);
                    (*self.ledger.booked_seats(&key).await?).clone()
                }
                None => empty.clone(),
            };

            let available_count = availability::available_count(train.total_seats, &booked);
            match filters.min_available_seats {
                Some(min) if min > 0 && available_count < min => continue,
                _ => {}
            }

            results.push(TrainAvailability {
                train: train.clone(),
                travel_date: filters.travel_date,
                available_count,
                booked_seats: booked.into_iter().collect(),
            });
        }

        Ok(results)
    }
}

/// The filters that need only the train itself, not the ledger.
fn matches_static(train: &Train, filters: &SearchFilters) -> bool {
    if let Some(source) = &filters.source
        && !contains_ci(&train.source, source)
    {
        return false;
    }
    if let Some(destination) = &filters.destination
        && !contains_ci(&train.destination, destination)
    {
        return false;
    }
    if let Some(range) = &filters.time_range
        && !range.contains(train.departure)
    {
        return false;
    }
    true
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DepartureTime, TrainId, UserId};
    use crate::ledger::{CacheConfig, MemoryLedger, NewBooking};

    fn train(
        id: i64,
        name: &str,
        source: &str,
        destination: &str,
        departure: &str,
        total_seats: u32,
    ) -> Train {
        Train {
            id: TrainId::new(id),
            name: name.to_string(),
            source: source.to_string(),
            destination: destination.to_string(),
            departure: DepartureTime::parse(departure).unwrap(),
            total_seats,
        }
    }

    fn fixture() -> (Arc<Catalog>, Arc<CachedLedger>, SearchEngine) {
        let catalog = Arc::new(
            Catalog::new(vec![
                train(1, "Highland Chief", "London", "Edinburgh", "09:15", 50),
                train(2, "Coastal Flyer", "London", "Brighton", "12:30", 30),
                train(3, "Night Mail", "Edinburgh", "London", "23:40", 40),
                train(4, "Borders Link", "Newcastle", "Edinburgh", "07:05", 20),
            ])
            .unwrap(),
        );
        let ledger = Arc::new(CachedLedger::new(
            Arc::new(MemoryLedger::new()),
            &CacheConfig::default(),
        ));
        let engine = SearchEngine::new(catalog.clone(), ledger.clone());
        (catalog, ledger, engine)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn ids(results: &[TrainAvailability]) -> Vec<i64> {
        results.iter().map(|r| r.train.id.get()).collect()
    }

    async fn book(ledger: &CachedLedger, train_id: i64, seats: &[u32]) {
        ledger
            .insert(NewBooking {
                user_id: UserId::new(1),
                key: LedgerKey::new(TrainId::new(train_id), date()),
                seats: seats.iter().map(|&n| SeatNumber::new(n).unwrap()).collect(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn no_filters_returns_the_whole_catalog_in_order() {
        let (_, _, engine) = fixture();
        let results = engine.search(&SearchFilters::default()).await.unwrap();
        assert_eq!(ids(&results), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn source_filter_is_case_insensitive() {
        let (_, _, engine) = fixture();
        let filters = SearchFilters {
            source: Some("london".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&engine.search(&filters).await.unwrap()), vec![1, 2]);
    }

    #[tokio::test]
    async fn destination_filter_matches_substrings() {
        let (_, _, engine) = fixture();
        let filters = SearchFilters {
            destination: Some("edin".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&engine.search(&filters).await.unwrap()), vec![1, 4]);
    }

    #[tokio::test]
    async fn filters_are_conjunctive() {
        let (_, _, engine) = fixture();
        let filters = SearchFilters {
            source: Some("London".to_string()),
            destination: Some("Edinburgh".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&engine.search(&filters).await.unwrap()), vec![1]);
    }

    #[tokio::test]
    async fn departure_window_is_inclusive() {
        let (_, _, engine) = fixture();
        let filters = SearchFilters {
            time_range: Some(TimeRange::parse("07:05-09:15").unwrap()),
            ..Default::default()
        };
        assert_eq!(ids(&engine.search(&filters).await.unwrap()), vec![1, 4]);
    }

    #[tokio::test]
    async fn inverted_window_matches_nothing() {
        let (_, _, engine) = fixture();
        let filters = SearchFilters {
            time_range: Some(TimeRange::parse("18:00-06:00").unwrap()),
            ..Default::default()
        };
        assert!(engine.search(&filters).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dateless_search_reports_full_capacity() {
        let (_, ledger, engine) = fixture();
        book(&ledger, 1, &[1, 2, 3]).await;

        let results = engine.search(&SearchFilters::default()).await.unwrap();
        let first = &results[0];
        assert_eq!(first.travel_date, None);
        assert_eq!(first.available_count, 50);
        assert!(first.booked_seats.is_empty());
    }

    #[tokio::test]
    async fn dated_search_reflects_bookings() {
        let (_, ledger, engine) = fixture();
        book(&ledger, 1, &[1, 2, 3]).await;

        let filters = SearchFilters {
            travel_date: Some(date()),
            ..Default::default()
        };
        let results = engine.search(&filters).await.unwrap();
        let first = &results[0];
        assert_eq!(first.travel_date, Some(date()));
        assert_eq!(first.available_count, 47);
        assert_eq!(
            first.booked_seats.iter().map(|s| s.get()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        // The other trains are untouched on this date
        assert_eq!(results[1].available_count, 30);
    }

    #[tokio::test]
    async fn minimum_availability_drops_small_trains() {
        let (_, _, engine) = fixture();
        let filters = SearchFilters {
            min_available_seats: Some(25),
            ..Default::default()
        };
        assert_eq!(ids(&engine.search(&filters).await.unwrap()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn minimum_availability_counts_per_date() {
        let (_, ledger, engine) = fixture();
        // Fill train 2 down to 27 free seats on the date
        book(&ledger, 2, &[1, 2, 3]).await;

        let filters = SearchFilters {
            travel_date: Some(date()),
            min_available_seats: Some(28),
            ..Default::default()
        };
        assert_eq!(ids(&engine.search(&filters).await.unwrap()), vec![1, 3]);
    }

    #[tokio::test]
    async fn minimum_of_zero_is_no_constraint() {
        let (_, _, engine) = fixture();
        let filters = SearchFilters {
            min_available_seats: Some(0),
            ..Default::default()
        };
        assert_eq!(engine.search(&filters).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn unmatched_source_returns_empty() {
        let (_, _, engine) = fixture();
        let filters = SearchFilters {
            source: Some("Cardiff".to_string()),
            ..Default::default()
        };
        assert!(engine.search(&filters).await.unwrap().is_empty());
    }
}
