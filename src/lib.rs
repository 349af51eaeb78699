// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod planner;
pub mod table;
pub mod utils;

// Re-exports for convenience
pub use algorithms::tour::TourLimits;
pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use models::{CostMetric, FlightFilter, FlightRecord, FlightTable, ValueRange};
pub use planner::{RoutePlanner, RouteRequest, TripRequest};
