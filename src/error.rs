//! Error and outcome types for the planner
//!
//! Every query returns `Result<T, PlannerError>`. Some variants are ordinary
//! "no result" outcomes rather than failures; `is_no_result` tells them apart.

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("flight data unavailable at {path}: {reason}")]
    DataUnavailable { path: String, reason: String },

    #[error("flight table is missing required column \"{0}\"")]
    MissingColumn(String),

    #[error("malformed flight row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("no flights match the selected filters")]
    EmptyFilterResult,

    #[error("no route from {from} to {to} with the selected flights")]
    NoPath { from: String, to: String },

    #[error("selected cities are not fully connected (unreachable: {})", unreachable.join(", "))]
    NotConnected { unreachable: Vec<String> },

    #[error("no order visits all selected cities using direct flights")]
    NoValidTour,

    #[error("too many cities ({requested}); trip planning is limited to {cap}")]
    TooManyCities { requested: usize, cap: usize },

    #[error("select at least {min} distinct cities (got {requested})")]
    TooFewCities { requested: usize, min: usize },

    #[error("trip search exceeded its time limit after {0:?}")]
    SearchTimedOut(Duration),

    #[error("{0}")]
    InvalidQuery(String),
}

impl PlannerError {
    /// Stable identifier for machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } | Self::MissingColumn(_) | Self::MalformedRow { .. } => {
                "data_unavailable"
            }
            Self::EmptyFilterResult => "empty_filter_result",
            Self::NoPath { .. } => "no_path",
            Self::NotConnected { .. } => "not_connected",
            Self::NoValidTour => "no_valid_tour",
            Self::TooManyCities { .. } => "too_many_cities",
            Self::TooFewCities { .. } => "too_few_cities",
            Self::SearchTimedOut(_) => "search_timed_out",
            Self::InvalidQuery(_) => "invalid_query",
        }
    }

    /// True for outcomes meaning "the query was valid but has no answer"
    pub fn is_no_result(&self) -> bool {
        matches!(
            self,
            Self::EmptyFilterResult
                | Self::NoPath { .. }
                | Self::NotConnected { .. }
                | Self::NoValidTour
        )
    }
}
