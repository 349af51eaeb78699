// Minimum spanning connections among selected cities (Prim's algorithm)

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use priority_queue::PriorityQueue;
use tracing::debug;

use super::Weight;
use crate::error::{PlannerError, Result};
use crate::models::{normalize_code, Connection, Cost, FlightRecord, SpanningResult};

/// Fewest cities a spanning request can join
pub const MIN_SPANNING_CITIES: usize = 2;

/// Removes duplicate cities, keeping first occurrences in order
pub(crate) fn distinct_cities(cities: &[String]) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::with_capacity(cities.len());
    for city in cities.iter().map(|c| normalize_code(c)) {
        if !city.is_empty() && !distinct.contains(&city) {
            distinct.push(city);
        }
    }
    distinct
}

/// Undirected candidate graph over the selected cities.
///
/// Node `i` is the `i`-th selected city. A flight in either direction between
/// two selected cities contributes an edge; when several flights join the same
/// pair, the edge takes the lowest price among them.
fn candidate_graph<'c>(records: &[FlightRecord], cities: &'c [String]) -> UnGraph<&'c str, Cost> {
    let position: HashMap<&str, usize> = cities
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut cheapest: BTreeMap<(usize, usize), Cost> = BTreeMap::new();
    for flight in records {
        let (Some(&u), Some(&v)) = (
            position.get(flight.source.as_str()),
            position.get(flight.destination.as_str()),
        ) else {
            continue;
        };
        if u == v || !flight.price.is_finite() || flight.price < 0.0 {
            continue;
        }

        let key = (u.min(v), u.max(v));
        cheapest
            .entry(key)
            .and_modify(|price| *price = price.min(flight.price))
            .or_insert(flight.price);
    }

    let mut graph = UnGraph::with_capacity(cities.len(), cheapest.len());
    for city in cities {
        graph.add_node(city.as_str());
    }
    for ((u, v), price) in cheapest {
        graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), price);
    }
    graph
}

/// Joins `cities` with the cheapest set of undirected connections, using raw
/// ticket prices from every flight in `records`, and reports each connection
/// in both directions.
///
/// The tree grows from the first city. Fails with `NotConnected` instead of
/// returning a partial tree.
pub fn minimum_spanning_connections(
    records: &[FlightRecord],
    cities: &[String],
) -> Result<SpanningResult> {
    let cities = distinct_cities(cities);
    if cities.len() < MIN_SPANNING_CITIES {
        return Err(PlannerError::TooFewCities {
            requested: cities.len(),
            min: MIN_SPANNING_CITIES,
        });
    }

    let graph = candidate_graph(records, &cities);
    debug!(
        cities = cities.len(),
        candidates = graph.edge_count(),
        "built spanning candidates"
    );

    let mut in_tree = vec![false; cities.len()];
    // Best known attachment (parent, price) for nodes outside the tree
    let mut attachment: HashMap<NodeIndex, (NodeIndex, Cost)> = HashMap::new();
    let mut connections = Vec::with_capacity(cities.len() - 1);

    // Lowest price first; equal prices go to the earlier selected city
    let mut queue: PriorityQueue<NodeIndex, Reverse<(Weight, usize)>> = PriorityQueue::new();
    let root = NodeIndex::new(0);
    queue.push(root, Reverse((Weight(0.0), 0)));

    while let Some((node, _)) = queue.pop() {
        if in_tree[node.index()] {
            continue;
        }
        in_tree[node.index()] = true;

        if let Some(&(parent, price)) = attachment.get(&node) {
            connections.push(Connection::new(graph[parent], graph[node], price));
        }

        for edge in graph.edges(node) {
            let next = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            if in_tree[next.index()] {
                continue;
            }

            let price = *edge.weight();
            let improves = match attachment.get(&next) {
                Some(&(_, current)) => price < current,
                None => true,
            };
            if improves {
                attachment.insert(next, (node, price));
                queue.push(next, Reverse((Weight(price), next.index())));
            }
        }
    }

    if connections.len() != cities.len() - 1 {
        let unreachable: Vec<String> = cities
            .iter()
            .zip(&in_tree)
            .filter(|(_, &joined)| !joined)
            .map(|(city, _)| city.clone())
            .collect();
        debug!(?unreachable, "selected cities are not connected");
        return Err(PlannerError::NotConnected { unreachable });
    }

    let result = SpanningResult::from_tree(cities, connections);
    debug!(
        one_way = result.one_way_total,
        round_trip = result.round_trip_total,
        "built spanning connections"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn triangle() -> Vec<FlightRecord> {
        vec![
            FlightRecord::new("A", "B", "X", 10.0, 60.0),
            FlightRecord::new("B", "C", "X", 20.0, 60.0),
            FlightRecord::new("A", "C", "X", 100.0, 60.0),
        ]
    }

    #[test]
    fn test_triangle_totals() {
        let result = minimum_spanning_connections(&triangle(), &cities(&["A", "B", "C"])).unwrap();

        assert_eq!(result.connections.len(), 2);
        assert_eq!(result.one_way_total, 30.0);
        assert_eq!(result.round_trip_total, 60.0);
        assert_eq!(result.connections[0], Connection::new("A", "B", 10.0));
        assert_eq!(result.connections[1], Connection::new("B", "C", 20.0));
    }

    #[test]
    fn test_direction_does_not_matter() {
        // Only C -> B exists, yet B and C are joined
        let flights = vec![
            FlightRecord::new("A", "B", "X", 10.0, 60.0),
            FlightRecord::new("C", "B", "X", 20.0, 60.0),
        ];
        let result = minimum_spanning_connections(&flights, &cities(&["A", "B", "C"])).unwrap();
        assert_eq!(result.one_way_total, 30.0);
    }

    #[test]
    fn test_both_directions_take_lower_price() {
        let flights = vec![
            FlightRecord::new("A", "B", "X", 90.0, 60.0),
            FlightRecord::new("B", "A", "Y", 40.0, 60.0),
        ];
        let result = minimum_spanning_connections(&flights, &cities(&["A", "B"])).unwrap();
        assert_eq!(result.connections, vec![Connection::new("A", "B", 40.0)]);

        // Same answer regardless of table order
        let reversed: Vec<FlightRecord> = flights.into_iter().rev().collect();
        let again = minimum_spanning_connections(&reversed, &cities(&["A", "B"])).unwrap();
        assert_eq!(again.one_way_total, 40.0);
    }

    #[test]
    fn test_disconnected_cities_fail() {
        let mut flights = triangle();
        flights.push(FlightRecord::new("D", "E", "X", 5.0, 60.0));

        match minimum_spanning_connections(&flights, &cities(&["A", "B", "D", "E"])) {
            Err(PlannerError::NotConnected { unreachable }) => {
                assert_eq!(unreachable, vec!["D", "E"]);
            }
            other => panic!("expected NotConnected, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_city_is_not_connected() {
        assert!(matches!(
            minimum_spanning_connections(&triangle(), &cities(&["A", "ZZZ"])),
            Err(PlannerError::NotConnected { .. })
        ));
    }

    #[test]
    fn test_requires_two_distinct_cities() {
        assert!(matches!(
            minimum_spanning_connections(&triangle(), &cities(&["A", "a"])),
            Err(PlannerError::TooFewCities { requested: 1, .. })
        ));
    }

    #[test]
    fn test_ignores_flights_outside_selection() {
        let mut flights = triangle();
        flights.push(FlightRecord::new("A", "Z", "X", 1.0, 60.0));
        flights.push(FlightRecord::new("Z", "C", "X", 1.0, 60.0));

        let result = minimum_spanning_connections(&flights, &cities(&["A", "B", "C"])).unwrap();
        assert_eq!(result.one_way_total, 30.0);
    }
}
