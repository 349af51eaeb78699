//! Query façade over the shared flight table
//!
//! Each query filters the table snapshot, builds its own graph and runs one
//! solver. Nothing is cached between queries, so a `RoutePlanner` can be shared
//! freely across threads.

use serde::Serialize;
use tracing::{debug, info_span};

use crate::algorithms::shortest_path::shortest_path;
use crate::algorithms::spanning::minimum_spanning_connections;
use crate::algorithms::tour::{plan_tour, TourLimits};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::models::{
    normalize_code, Cost, CostMetric, FlightFilter, FlightRecord, FlightTable, PathResult,
    SpanningResult, TourResult,
};
use crate::utils::flight_graph::FlightGraph;
use crate::utils::loader::load_flights;

/// Single-pair route query
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub from: String,
    pub to: String,
    pub metric: CostMetric,
    /// `None` uses every flight in the table
    pub filter: Option<FlightFilter>,
}

impl RouteRequest {
    pub fn new(from: &str, to: &str, metric: CostMetric) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            metric,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: FlightFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Visit-all-cities query
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub cities: Vec<String>,
    pub metric: CostMetric,
    /// `None` uses every flight in the table
    pub filter: Option<FlightFilter>,
}

impl TripRequest {
    pub fn new<I, S>(cities: I, metric: CostMetric) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cities: cities.into_iter().map(Into::into).collect(),
            metric,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: FlightFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Best direct flight for one ordered airport pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkLink {
    pub from: String,
    pub to: String,
    /// Weight under the metric the network was built for
    pub weight: Cost,
    pub flight: FlightRecord,
}

/// Answers route, connectivity and trip queries against one flight table
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    table: FlightTable,
    limits: TourLimits,
}

impl RoutePlanner {
    pub fn new(table: FlightTable, limits: TourLimits) -> Self {
        Self { table, limits }
    }

    /// Loads the table named by `config` and applies its trip limits
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let table = load_flights(&config.data_path)?;
        Ok(Self::new(table, config.tour_limits()))
    }

    pub fn table(&self) -> &FlightTable {
        &self.table
    }

    pub fn limits(&self) -> &TourLimits {
        &self.limits
    }

    /// Records passing `filter`; fails with `EmptyFilterResult` when none do
    pub fn filtered(&self, filter: &FlightFilter) -> Result<Vec<FlightRecord>> {
        let records = filter.apply(self.table.records());
        debug!(
            kept = records.len(),
            total = self.table.len(),
            "applied flight filter"
        );
        if records.is_empty() {
            return Err(PlannerError::EmptyFilterResult);
        }
        Ok(records)
    }

    // Filtered copy when a filter is given, otherwise the whole snapshot
    fn selection(&self, filter: Option<&FlightFilter>) -> Result<Vec<FlightRecord>> {
        match filter {
            Some(filter) => self.filtered(filter),
            None => Ok(self.table.records().to_vec()),
        }
    }

    /// Cheapest or quickest route between two airports
    pub fn find_route(&self, request: &RouteRequest) -> Result<PathResult> {
        let from = normalize_code(&request.from);
        let to = normalize_code(&request.to);
        let _span = info_span!("find_route", %from, %to, metric = %request.metric).entered();

        if from.is_empty() || to.is_empty() {
            return Err(PlannerError::InvalidQuery(
                "origin and destination are required".into(),
            ));
        }

        let records = self.selection(request.filter.as_ref())?;
        let graph = FlightGraph::build(&records, request.metric);
        shortest_path(&graph, &from, &to)
    }

    /// Cheapest set of connections joining `cities`, with return flights.
    ///
    /// Always uses the full table; filters do not apply.
    pub fn connect_cities(&self, cities: &[String]) -> Result<SpanningResult> {
        let _span = info_span!("connect_cities", cities = cities.len()).entered();
        minimum_spanning_connections(self.table.records(), cities)
    }

    /// Best order to visit every requested city once by direct flights
    pub fn plan_trip(&self, request: &TripRequest) -> Result<TourResult> {
        let _span = info_span!(
            "plan_trip",
            cities = request.cities.len(),
            metric = %request.metric
        )
        .entered();

        let records = self.selection(request.filter.as_ref())?;
        plan_tour(&records, &request.cities, request.metric, &self.limits)
    }

    /// Best direct flight for every connected airport pair
    pub fn network(
        &self,
        metric: CostMetric,
        filter: Option<&FlightFilter>,
    ) -> Result<Vec<NetworkLink>> {
        let records = self.selection(filter)?;
        let graph = FlightGraph::build(&records, metric);

        Ok(graph
            .direct_routes()
            .into_iter()
            .map(|(from, to, edge)| NetworkLink {
                from: from.to_string(),
                to: to.to_string(),
                weight: edge.weight,
                flight: edge.flight.clone(),
            })
            .collect())
    }
}
