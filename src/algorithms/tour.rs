// Open tour planning: best order to visit every selected city once

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering::Relaxed};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::debug;

use super::spanning::distinct_cities;
use crate::error::{PlannerError, Result};
use crate::models::{Cost, CostMetric, FlightRecord, TourResult};
use crate::utils::flight_graph::{FlightEdge, FlightGraph};

/// Default cap on cities per trip; the search is factorial in the city count
pub const DEFAULT_MAX_TOUR_CITIES: usize = 8;

/// Fewest cities a trip can visit
pub const MIN_TOUR_CITIES: usize = 2;

// Deadline is checked on the first expansion and every this many after
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Admission limits for a trip search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourLimits {
    /// Requests with more distinct cities fail with `TooManyCities`
    pub max_cities: usize,

    /// Wall-clock budget for the search; `None` means unlimited
    pub deadline: Option<Duration>,
}

impl Default for TourLimits {
    fn default() -> Self {
        Self {
            max_cities: DEFAULT_MAX_TOUR_CITIES,
            deadline: None,
        }
    }
}

// Best direct flight for each ordered pair of selected cities, by position
type PairMatrix<'a> = Vec<Vec<Option<FlightEdge<'a>>>>;

#[derive(Debug, Default)]
struct BranchBest {
    cost: Option<Cost>,
    order: Vec<usize>,
    expanded: u64,
}

/// Depth-first search over visiting orders that start with one fixed city
struct BranchSearch<'m, 'a> {
    matrix: &'m PairMatrix<'a>,
    deadline: Option<Instant>,
    cancelled: &'m AtomicBool,
    expanded: u64,
    best_cost: Cost,
    best_order: Option<Vec<usize>>,
}

impl<'m, 'a> BranchSearch<'m, 'a> {
    fn run(mut self, first: usize) -> BranchBest {
        let n = self.matrix.len();
        let mut order = Vec::with_capacity(n);
        let mut used = vec![false; n];

        order.push(first);
        used[first] = true;
        self.extend(&mut order, &mut used, 0.0);

        BranchBest {
            cost: self.best_order.as_ref().map(|_| self.best_cost),
            order: self.best_order.unwrap_or_default(),
            expanded: self.expanded,
        }
    }

    fn extend(&mut self, order: &mut Vec<usize>, used: &mut [bool], cost: Cost) {
        if self.cancelled.load(Relaxed) {
            return;
        }

        self.expanded += 1;
        if self.expanded % DEADLINE_CHECK_INTERVAL == 1 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.cancelled.store(true, Relaxed);
                    return;
                }
            }
        }

        let n = self.matrix.len();
        if order.len() == n {
            if cost < self.best_cost {
                self.best_cost = cost;
                self.best_order = Some(order.clone());
            }
            return;
        }

        let last = order[order.len() - 1];
        for next in 0..n {
            if used[next] {
                continue;
            }
            let Some(edge) = self.matrix[last][next] else {
                continue;
            };

            // Weights are non-negative, so this prefix cannot beat the best
            let total = cost + edge.weight;
            if total >= self.best_cost {
                continue;
            }

            used[next] = true;
            order.push(next);
            self.extend(order, used, total);
            order.pop();
            used[next] = false;
        }
    }
}

/// Finds the cheapest (or quickest) order visiting every city in `cities`
/// exactly once using direct flights only. The trip does not return to its
/// first city.
///
/// Among equally good orders the one listing cities earliest in the request
/// wins. Requests above `limits.max_cities` fail with `TooManyCities` before
/// any search starts.
pub fn plan_tour(
    records: &[FlightRecord],
    cities: &[String],
    metric: CostMetric,
    limits: &TourLimits,
) -> Result<TourResult> {
    let cities = distinct_cities(cities);
    if cities.len() < MIN_TOUR_CITIES {
        return Err(PlannerError::TooFewCities {
            requested: cities.len(),
            min: MIN_TOUR_CITIES,
        });
    }
    if cities.len() > limits.max_cities {
        return Err(PlannerError::TooManyCities {
            requested: cities.len(),
            cap: limits.max_cities,
        });
    }

    let selected: HashSet<&str> = cities.iter().map(String::as_str).collect();
    let graph = FlightGraph::build(
        records.iter().filter(|f| {
            selected.contains(f.source.as_str()) && selected.contains(f.destination.as_str())
        }),
        metric,
    );

    let nodes: Vec<_> = cities.iter().map(|c| graph.node(c)).collect();
    let matrix: PairMatrix<'_> = nodes
        .iter()
        .enumerate()
        .map(|(i, from)| {
            nodes
                .iter()
                .enumerate()
                .map(|(j, to)| match (from, to) {
                    (Some(from), Some(to)) if i != j => graph.cheapest_direct(*from, *to).copied(),
                    _ => None,
                })
                .collect()
        })
        .collect();

    let started = Instant::now();
    let deadline = limits.deadline.map(|budget| started + budget);
    let cancelled = AtomicBool::new(false);

    let branches: Vec<BranchBest> = (0..cities.len())
        .into_par_iter()
        .map(|first| {
            BranchSearch {
                matrix: &matrix,
                deadline,
                cancelled: &cancelled,
                expanded: 0,
                best_cost: Cost::INFINITY,
                best_order: None,
            }
            .run(first)
        })
        .collect();

    let expanded: u64 = branches.iter().map(|b| b.expanded).sum();
    if cancelled.load(Relaxed) {
        debug!(expanded, elapsed = ?started.elapsed(), "trip search timed out");
        return Err(PlannerError::SearchTimedOut(started.elapsed()));
    }

    // Branches are in first-city order; strict comparison keeps the earliest on ties
    let mut best: Option<&BranchBest> = None;
    for branch in &branches {
        if let Some(cost) = branch.cost {
            if best.and_then(|b| b.cost).map_or(true, |current| cost < current) {
                best = Some(branch);
            }
        }
    }

    let Some(best) = best else {
        debug!(expanded, cities = cities.len(), "no valid trip order");
        return Err(PlannerError::NoValidTour);
    };

    let order: Vec<String> = best.order.iter().map(|&i| cities[i].clone()).collect();
    let segments: Vec<FlightRecord> = best
        .order
        .windows(2)
        .filter_map(|pair| matrix[pair[0]][pair[1]].map(|edge| edge.flight.clone()))
        .collect();

    let tour = TourResult::new(metric, order, segments);
    debug!(
        expanded,
        elapsed = ?started.elapsed(),
        total = tour.total_cost,
        "found trip order"
    );
    Ok(tour)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_one_way_cycle_picks_cheapest_rotation() {
        let flights = vec![
            FlightRecord::new("A", "B", "X", 10.0, 60.0),
            FlightRecord::new("B", "C", "X", 20.0, 60.0),
            FlightRecord::new("C", "A", "X", 5.0, 60.0),
        ];
        let tour = plan_tour(
            &flights,
            &cities(&["A", "B", "C"]),
            CostMetric::Price,
            &TourLimits::default(),
        )
        .unwrap();

        assert_eq!(tour.order, vec!["C", "A", "B"]);
        assert_eq!(tour.total_cost, 15.0);
        assert_eq!(tour.segments.len(), 2);
    }

    #[test]
    fn test_ties_prefer_request_order() {
        let flights = vec![
            FlightRecord::new("A", "B", "X", 10.0, 60.0),
            FlightRecord::new("B", "C", "X", 10.0, 60.0),
            FlightRecord::new("C", "A", "X", 10.0, 60.0),
        ];
        let tour = plan_tour(
            &flights,
            &cities(&["A", "B", "C"]),
            CostMetric::Price,
            &TourLimits::default(),
        )
        .unwrap();

        assert_eq!(tour.order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_no_valid_order() {
        let flights = vec![
            FlightRecord::new("A", "B", "X", 10.0, 60.0),
            FlightRecord::new("C", "B", "X", 10.0, 60.0),
        ];
        let result = plan_tour(
            &flights,
            &cities(&["A", "B", "C"]),
            CostMetric::Price,
            &TourLimits::default(),
        );

        assert!(matches!(result, Err(PlannerError::NoValidTour)));
    }

    #[test]
    fn test_metric_changes_choice_and_total() {
        let flights = vec![
            FlightRecord::new("A", "B", "Slow", 50.0, 300.0),
            FlightRecord::new("A", "B", "Fast", 90.0, 100.0),
        ];
        let limits = TourLimits::default();

        let cheapest = plan_tour(&flights, &cities(&["A", "B"]), CostMetric::Price, &limits).unwrap();
        assert_eq!(cheapest.segments[0].airline, "Slow");
        assert_eq!(cheapest.total_cost, 50.0);

        let quickest =
            plan_tour(&flights, &cities(&["A", "B"]), CostMetric::Duration, &limits).unwrap();
        assert_eq!(quickest.segments[0].airline, "Fast");
        assert_eq!(quickest.total_cost, 100.0);
    }

    #[test]
    fn test_too_many_cities_fails_fast() {
        let limits = TourLimits {
            max_cities: 3,
            deadline: None,
        };
        let result = plan_tour(&[], &cities(&["A", "B", "C", "D"]), CostMetric::Price, &limits);

        assert!(matches!(
            result,
            Err(PlannerError::TooManyCities {
                requested: 4,
                cap: 3
            })
        ));
    }

    #[test]
    fn test_too_few_cities() {
        let result = plan_tour(&[], &cities(&["A"]), CostMetric::Price, &TourLimits::default());
        assert!(matches!(result, Err(PlannerError::TooFewCities { .. })));
    }

    #[test]
    fn test_zero_deadline_times_out() {
        let codes = ["A", "B", "C", "D", "E"];
        let mut flights = Vec::new();
        for from in codes {
            for to in codes {
                if from != to {
                    flights.push(FlightRecord::new(from, to, "X", 10.0, 60.0));
                }
            }
        }
        let limits = TourLimits {
            max_cities: 8,
            deadline: Some(Duration::ZERO),
        };
        let result = plan_tour(&flights, &cities(&codes), CostMetric::Price, &limits);

        assert!(matches!(result, Err(PlannerError::SearchTimedOut(_))));
    }
}
