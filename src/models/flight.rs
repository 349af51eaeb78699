// Flight model representing one scheduled flight from the input table

use crate::models::{Cost, Minutes};
use serde::Serialize;

/// A single scheduled flight between two airports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    /// Departure airport code
    pub source: String,

    /// Arrival airport code
    pub destination: String,

    /// Operating airline
    pub airline: String,

    /// Ticket price
    pub price: Cost,

    /// Flight duration in minutes (the `time` column of the table)
    #[serde(rename = "time")]
    pub duration: Minutes,
}

impl FlightRecord {
    /// Creates a new flight record, normalizing airport codes to upper case
    pub fn new<S: Into<String>>(
        source: S,
        destination: S,
        airline: S,
        price: Cost,
        duration: Minutes,
    ) -> Self {
        Self {
            source: normalize_code(&source.into()),
            destination: normalize_code(&destination.into()),
            airline: airline.into().trim().to_string(),
            price,
            duration,
        }
    }

    /// Checks if the flight connects `from` to `to` in that direction.
    ///
    /// Not used by the solvers; reference implementations in the test suite
    /// match flights with it.
    pub fn connects(&self, from: &str, to: &str) -> bool {
        self.source == from && self.destination == to
    }
}

/// Trims and upper-cases an airport code
pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
