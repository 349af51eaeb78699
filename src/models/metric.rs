// Cost metric selecting which flight field weights the graph

use crate::error::PlannerError;
use crate::models::{Cost, FlightRecord};
use serde::Serialize;
use std::fmt;

/// The flight attribute used as edge weight for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CostMetric {
    Price,
    Duration,
}

impl CostMetric {
    /// Weight of a flight under this metric
    pub fn weight(&self, flight: &FlightRecord) -> Cost {
        match self {
            Self::Price => flight.price,
            Self::Duration => flight.duration,
        }
    }

    /// Name of the table column the metric reads
    pub fn column(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Duration => "time",
        }
    }

    pub fn from_str_loose(s: &str) -> Result<Self, PlannerError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cheapest" | "price" => Ok(Self::Price),
            "quickest" | "duration" | "time" => Ok(Self::Duration),
            other => Err(PlannerError::InvalidQuery(format!(
                "unknown optimization \"{other}\", expected cheapest or quickest"
            ))),
        }
    }
}

impl fmt::Display for CostMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price => write!(f, "price"),
            Self::Duration => write!(f, "duration"),
        }
    }
}
