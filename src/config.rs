// Planner configuration passed explicitly into the core

use std::path::PathBuf;
use std::time::Duration;

use crate::algorithms::tour::{TourLimits, DEFAULT_MAX_TOUR_CITIES};
use crate::utils::status::StatusConfig;

/// Default flight table location
pub const DEFAULT_DATA_PATH: &str = "flights_data.csv";

/// Everything a planning session needs from the outside world.
///
/// The core never reads the environment; the binary fills this from flags
/// and their environment fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub data_path: PathBuf,
    pub max_trip_cities: usize,
    pub trip_deadline: Option<Duration>,
    pub status: StatusConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            max_trip_cities: DEFAULT_MAX_TOUR_CITIES,
            trip_deadline: None,
            status: StatusConfig::default(),
        }
    }
}

impl PlannerConfig {
    pub fn tour_limits(&self) -> TourLimits {
        TourLimits {
            max_cities: self.max_trip_cities,
            deadline: self.trip_deadline,
        }
    }
}
