// Flight table holding the immutable snapshot of loaded records

use crate::models::{Cost, FlightRecord, Minutes};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Read-only flight table shared by every query.
///
/// Cloning is cheap: clones share the same record slice.
#[derive(Debug, Clone)]
pub struct FlightTable {
    records: Arc<[FlightRecord]>,
}

impl FlightTable {
    /// Creates a table from already normalized records
    pub fn new(records: Vec<FlightRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted union of every source and destination airport
    pub fn airports(&self) -> Vec<String> {
        let codes: BTreeSet<&str> = self
            .records
            .iter()
            .flat_map(|f| [f.source.as_str(), f.destination.as_str()])
            .collect();
        codes.into_iter().map(String::from).collect()
    }

    /// Sorted unique airline names
    pub fn airlines(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self.records.iter().map(|f| f.airline.as_str()).collect();
        names.into_iter().map(String::from).collect()
    }

    /// Lowest and highest price in the table
    pub fn price_bounds(&self) -> Option<(Cost, Cost)> {
        bounds(self.records.iter().map(|f| f.price))
    }

    /// Shortest and longest duration in the table
    pub fn duration_bounds(&self) -> Option<(Minutes, Minutes)> {
        bounds(self.records.iter().map(|f| f.duration))
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
