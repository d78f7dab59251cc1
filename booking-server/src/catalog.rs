//! Read-only train catalog.
//!
//! Trains are reference data, loaded once at startup from a JSON file and
//! never mutated while the server runs. Capacity changes or new routes are
//! a redeploy. Iteration order is file order, which is also the order
//! search results are returned in.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{DepartureTime, Train, TrainId};

/// Error returned when the catalog cannot be loaded or is inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid train {id}: {reason}")]
    InvalidTrain { id: i64, reason: String },

    #[error("duplicate train id {id}")]
    DuplicateId { id: i64 },
}

/// One train entry as it appears in the catalog file.
#[derive(Debug, Deserialize)]
struct TrainRecord {
    id: i64,
    name: String,
    source: String,
    destination: String,
    /// Departure time as zero-padded `HH:MM`.
    departure_time: String,
    total_seats: u32,
}

/// The in-memory train catalog.
pub struct Catalog {
    trains: Vec<Train>,
    index: HashMap<TrainId, usize>,
}

impl Catalog {
    /// Build a catalog from already-validated trains.
    ///
    /// Rejects duplicate ids and zero-capacity trains; everything else
    /// about a `Train` is valid by construction.
    pub fn new(trains: Vec<Train>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(trains.len());
        for (pos, train) in trains.iter().enumerate() {
            if train.total_seats == 0 {
                return Err(CatalogError::InvalidTrain {
                    id: train.id.get(),
                    reason: "total_seats must be at least 1".to_string(),
                });
            }
            if index.insert(train.id, pos).is_some() {
                return Err(CatalogError::DuplicateId {
                    id: train.id.get(),
                });
            }
        }
        Ok(Catalog { trains, index })
    }

    /// Load a catalog from a JSON file containing an array of train entries.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let json = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: display.clone(),
            source: e,
        })?;

        let records: Vec<TrainRecord> =
            serde_json::from_str(&json).map_err(|e| CatalogError::Parse {
                path: display,
                source: e,
            })?;

        let mut trains = Vec::with_capacity(records.len());
        for record in records {
            let departure = DepartureTime::parse(&record.departure_time).map_err(|e| {
                CatalogError::InvalidTrain {
                    id: record.id,
                    reason: e.to_string(),
                }
            })?;
            trains.push(Train {
                id: TrainId::new(record.id),
                name: record.name,
                source: record.source,
                destination: record.destination,
                departure,
                total_seats: record.total_seats,
            });
        }

        Catalog::new(trains)
    }

    /// Look up a train by id.
    pub fn train(&self, id: TrainId) -> Option<&Train> {
        self.index.get(&id).map(|&pos| &self.trains[pos])
    }

    /// Iterate over all trains in catalog (file) order.
    pub fn iter(&self) -> impl Iterator<Item = &Train> {
        self.trains.iter()
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn train(id: i64, departure: &str, total_seats: u32) -> Train {
        Train {
            id: TrainId::new(id),
            name: format!("Service {id}"),
            source: "London".to_string(),
            destination: "Leeds".to_string(),
            departure: DepartureTime::parse(departure).unwrap(),
            total_seats,
        }
    }

    #[test]
    fn lookup_by_id() {
        let catalog = Catalog::new(vec![train(1, "09:00", 50), train(2, "10:00", 30)]).unwrap();
        assert_eq!(catalog.train(TrainId::new(2)).unwrap().total_seats, 30);
        assert!(catalog.train(TrainId::new(99)).is_none());
    }

    #[test]
    fn iteration_preserves_input_order() {
        let catalog = Catalog::new(vec![
            train(5, "09:00", 50),
            train(1, "10:00", 30),
            train(3, "11:00", 20),
        ])
        .unwrap();
        let ids: Vec<i64> = catalog.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![5, 1, 3]);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = Catalog::new(vec![train(1, "09:00", 50), train(1, "10:00", 30)]);
        assert!(matches!(result, Err(CatalogError::DuplicateId { id: 1 })));
    }

    #[test]
    fn zero_capacity_rejected() {
        let result = Catalog::new(vec![train(1, "09:00", 0)]);
        assert!(matches!(result, Err(CatalogError::InvalidTrain { id: 1, .. })));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trains.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "name": "Morning Flyer", "source": "London",
                  "destination": "York", "departure_time": "07:30", "total_seats": 40}},
                {{"id": 2, "name": "Evening Star", "source": "York",
                  "destination": "London", "departure_time": "18:15", "total_seats": 60}}
            ]"#
        )
        .unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        let first = catalog.train(TrainId::new(1)).unwrap();
        assert_eq!(first.name, "Morning Flyer");
        assert_eq!(first.departure.to_string(), "07:30");
    }

    #[test]
    fn load_rejects_malformed_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trains.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "name": "X", "source": "A", "destination": "B",
                 "departure_time": "7:30", "total_seats": 40}]"#,
        )
        .unwrap();

        let result = Catalog::load(&path);
        assert!(matches!(result, Err(CatalogError::InvalidTrain { id: 1, .. })));
    }

    #[test]
    fn load_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Catalog::load(dir.path().join("nope.json"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trains.json");
        std::fs::write(&path, "{not json").unwrap();
        let result = Catalog::load(&path);
        assert!(matches!(result, Err(CatalogError::Parse { .. })));
    }
}
