// Route models for representing solver results

use crate::models::{AirportCode, Cost, CostMetric, FlightRecord, Minutes};
use serde::Serialize;

/// Cheapest or quickest path between two airports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// Metric the path was optimized for
    pub metric: CostMetric,

    /// Airports visited in order, origin first
    pub airports: Vec<AirportCode>,

    /// Total cost under the active metric
    pub total_cost: Cost,

    /// Flight taken for each hop; one fewer than `airports`
    pub segments: Vec<FlightRecord>,
}

impl PathResult {
    /// Creates a path result from its realizing segments.
    ///
    /// `origin` is only used when there are no segments (origin equals destination).
    pub fn from_segments(metric: CostMetric, origin: &str, segments: Vec<FlightRecord>) -> Self {
        let mut airports = Vec::with_capacity(segments.len() + 1);
        match segments.first() {
            Some(first) => airports.push(first.source.clone()),
            None => airports.push(origin.to_string()),
        }
        airports.extend(segments.iter().map(|s| s.destination.clone()));

        let total_cost = segments.iter().map(|s| metric.weight(s)).sum();

        Self {
            metric,
            airports,
            total_cost,
            segments,
        }
    }

    pub fn hops(&self) -> usize {
        self.segments.len()
    }

    pub fn total_price(&self) -> Cost {
        self.segments.iter().map(|s| s.price).sum()
    }

    pub fn total_duration(&self) -> Minutes {
        self.segments.iter().map(|s| s.duration).sum()
    }
}

/// One undirected tree edge, reported with a travel direction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub from: AirportCode,
    pub to: AirportCode,
    pub price: Cost,
}

impl Connection {
    pub fn new<S: Into<String>>(from: S, to: S, price: Cost) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            price,
        }
    }

    /// The same connection flown the other way at the same price
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            price: self.price,
        }
    }
}

/// Minimum-price connections joining a set of cities, with return flights
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanningResult {
    /// Distinct selected cities, in selection order
    pub cities: Vec<AirportCode>,

    /// Tree edges in the order they joined the tree
    pub connections: Vec<Connection>,

    /// Sum of tree edge prices
    pub one_way_total: Cost,

    /// Tree edges followed by their reversed return flights
    pub round_trip: Vec<Connection>,

    /// Sum over `round_trip`; always twice the one-way total
    pub round_trip_total: Cost,
}

impl SpanningResult {
    pub fn from_tree(cities: Vec<AirportCode>, connections: Vec<Connection>) -> Self {
        let one_way_total: Cost = connections.iter().map(|c| c.price).sum();

        let round_trip: Vec<Connection> = connections
            .iter()
            .cloned()
            .chain(connections.iter().map(Connection::reversed))
            .collect();
        let round_trip_total = round_trip.iter().map(|c| c.price).sum();

        Self {
            cities,
            connections,
            one_way_total,
            round_trip,
            round_trip_total,
        }
    }
}

/// Best order to visit every requested city without returning to the start
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourResult {
    /// Metric the order was optimized for
    pub metric: CostMetric,

    /// Visiting order; each city appears once
    pub order: Vec<AirportCode>,

    /// Total cost under the active metric
    pub total_cost: Cost,

    /// Direct flight used between each consecutive pair
    pub segments: Vec<FlightRecord>,
}

impl TourResult {
    pub fn new(metric: CostMetric, order: Vec<AirportCode>, segments: Vec<FlightRecord>) -> Self {
        let total_cost = segments.iter().map(|s| metric.weight(s)).sum();
        Self {
            metric,
            order,
            total_cost,
            segments,
        }
    }

    pub fn total_price(&self) -> Cost {
        self.segments.iter().map(|s| s.price).sum()
    }

    pub fn total_duration(&self) -> Minutes {
        self.segments.iter().map(|s| s.duration).sum()
    }
}
