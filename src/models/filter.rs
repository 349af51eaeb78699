// Filter model applying the user's airline, price and duration selections

use crate::error::PlannerError;
use crate::models::{FlightRecord, FlightTable};
use serde::Serialize;
use std::collections::BTreeSet;

/// Inclusive numeric range `[lo, hi]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub lo: f64,
    pub hi: f64,
}

impl ValueRange {
    /// Creates a range, rejecting inverted or non-finite bounds
    pub fn new(lo: f64, hi: f64) -> Result<Self, PlannerError> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(PlannerError::InvalidQuery(format!(
                "range bounds must be finite, got [{lo}, {hi}]"
            )));
        }
        if lo > hi {
            return Err(PlannerError::InvalidQuery(format!(
                "range lower bound {lo} exceeds upper bound {hi}"
            )));
        }
        Ok(Self { lo, hi })
    }

    /// Range accepting every value
    pub fn unbounded() -> Self {
        Self {
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }
}

/// Predicates applied to the flight table before any solver runs.
///
/// A record passes when its airline is selected and both its price and its
/// duration fall inside the inclusive ranges. An empty airline selection
/// passes nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightFilter {
    pub airlines: BTreeSet<String>,
    pub price: ValueRange,
    pub duration: ValueRange,
}

impl FlightFilter {
    pub fn new<I, S>(airlines: I, price: ValueRange, duration: ValueRange) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            airlines: airlines
                .into_iter()
                .map(|a| a.as_ref().trim().to_string())
                .collect(),
            price,
            duration,
        }
    }

    /// Filter selecting every airline and the full price/duration bounds of the table
    pub fn permissive(table: &FlightTable) -> Self {
        let price = table
            .price_bounds()
            .map(|(lo, hi)| ValueRange { lo, hi })
            .unwrap_or_else(ValueRange::unbounded);
        let duration = table
            .duration_bounds()
            .map(|(lo, hi)| ValueRange { lo, hi })
            .unwrap_or_else(ValueRange::unbounded);

        Self {
            airlines: table.airlines().into_iter().collect(),
            price,
            duration,
        }
    }

    /// Checks a single record against all three predicates
    pub fn matches(&self, flight: &FlightRecord) -> bool {
        self.airlines.contains(&flight.airline)
            && self.price.contains(flight.price)
            && self.duration.contains(flight.duration)
    }

    /// Keeps the records passing every predicate, in table order
    pub fn apply(&self, records: &[FlightRecord]) -> Vec<FlightRecord> {
        records
            .iter()
            .filter(|flight| self.matches(flight))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<FlightRecord> {
        vec![
            FlightRecord::new("DEL", "BOM", "IndiGo", 4500.0, 125.0),
            FlightRecord::new("DEL", "BOM", "Vistara", 6200.0, 120.0),
            FlightRecord::new("BOM", "BLR", "IndiGo", 3000.0, 95.0),
            FlightRecord::new("BLR", "DEL", "Air India", 7000.0, 170.0),
        ]
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = ValueRange::new(100.0, 200.0).unwrap();
        assert!(range.contains(100.0));
        assert!(range.contains(200.0));
        assert!(!range.contains(99.9));
        assert!(!range.contains(200.1));
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(ValueRange::new(5.0, 1.0).is_err());
        assert!(ValueRange::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_apply_all_predicates() {
        let filter = FlightFilter::new(
            ["IndiGo", "Air India"],
            ValueRange::new(3000.0, 4500.0).unwrap(),
            ValueRange::new(0.0, 200.0).unwrap(),
        );
        let kept = filter.apply(&sample());
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|f| f.airline == "IndiGo"));
    }

    #[test]
    fn test_empty_airline_set_keeps_nothing() {
        let filter = FlightFilter::new(
            Vec::<String>::new(),
            ValueRange::unbounded(),
            ValueRange::unbounded(),
        );
        assert!(filter.apply(&sample()).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = FlightFilter::new(
            ["IndiGo", "Vistara"],
            ValueRange::new(0.0, 6500.0).unwrap(),
            ValueRange::new(100.0, 130.0).unwrap(),
        );
        let once = filter.apply(&sample());
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_permissive_keeps_everything() {
        let table = FlightTable::new(sample());
        let filter = FlightFilter::permissive(&table);
        assert_eq!(filter.apply(table.records()), sample());
    }
}
