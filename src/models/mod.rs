// Models module - exports all model types

mod filter;
mod flight;
mod flight_table;
mod metric;
mod route;

// Re-export model types
pub use self::filter::{FlightFilter, ValueRange};
pub use self::flight::FlightRecord;
pub(crate) use self::flight::normalize_code;
pub use self::flight_table::FlightTable;
pub use self::metric::CostMetric;
pub use self::route::{Connection, PathResult, SpanningResult, TourResult};

// Common type aliases for improved code readability
pub type AirportCode = String;
pub type Cost = f64;
pub type Minutes = f64;
