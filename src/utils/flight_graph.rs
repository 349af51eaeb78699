use crate::models::{Cost, CostMetric, FlightRecord};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Edge of the flight graph: one scheduled flight weighted by the active metric
#[derive(Debug, Clone, Copy)]
pub struct FlightEdge<'a> {
    pub weight: Cost,
    pub flight: &'a FlightRecord,
}

/// Directed multigraph of airports and flights, built fresh for one query.
///
/// Parallel flights between the same airports are kept as separate edges.
/// Nodes and edges are numbered in the order records are supplied, so two
/// builds from the same records are identical.
pub struct FlightGraph<'a> {
    metric: CostMetric,
    graph: DiGraph<&'a str, FlightEdge<'a>>,
    nodes: HashMap<&'a str, NodeIndex>,
}

impl<'a> FlightGraph<'a> {
    /// Build the graph from `records`, weighting every edge by `metric`
    pub fn build<I>(records: I, metric: CostMetric) -> Self
    where
        I: IntoIterator<Item = &'a FlightRecord>,
    {
        let mut flight_graph = FlightGraph {
            metric,
            graph: DiGraph::new(),
            nodes: HashMap::new(),
        };

        for flight in records {
            let weight = metric.weight(flight);

            // Dijkstra and the tour bound both need non-negative weights
            if !weight.is_finite() || weight < 0.0 {
                warn!(
                    source = %flight.source,
                    destination = %flight.destination,
                    weight,
                    "skipping flight with invalid weight"
                );
                continue;
            }

            let from = flight_graph.node_or_insert(&flight.source);
            let to = flight_graph.node_or_insert(&flight.destination);
            flight_graph
                .graph
                .add_edge(from, to, FlightEdge { weight, flight });
        }

        debug!(
            metric = %metric,
            airports = flight_graph.node_count(),
            flights = flight_graph.edge_count(),
            "built flight graph"
        );

        flight_graph
    }

    fn node_or_insert(&mut self, code: &'a str) -> NodeIndex {
        if let Some(&index) = self.nodes.get(code) {
            return index;
        }
        let index = self.graph.add_node(code);
        self.nodes.insert(code, index);
        index
    }

    pub fn metric(&self) -> CostMetric {
        self.metric
    }

    /// Node of an airport code, if any flight touches it
    pub fn node(&self, code: &str) -> Option<NodeIndex> {
        self.nodes.get(code).copied()
    }

    /// Airport code of a node
    pub fn airport(&self, node: NodeIndex) -> &'a str {
        self.graph[node]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Airport codes in first-appearance order
    pub fn airports(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.graph.node_indices().map(move |n| self.graph[n])
    }

    /// Outgoing flights of a node as (edge, neighbor, edge data)
    pub fn outgoing(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, NodeIndex, &FlightEdge<'a>)> + '_ {
        self.graph
            .edges(node)
            .map(|edge| (edge.id(), edge.target(), edge.weight()))
    }

    pub fn edge(&self, edge: EdgeIndex) -> &FlightEdge<'a> {
        &self.graph[edge]
    }

    /// Departure node of an edge
    pub fn edge_source(&self, edge: EdgeIndex) -> Option<NodeIndex> {
        self.graph.edge_endpoints(edge).map(|(source, _)| source)
    }

    /// Cheapest (or quickest) direct flight from `from` to `to`.
    ///
    /// Equal weights resolve to the flight listed first in the table.
    pub fn cheapest_direct(&self, from: NodeIndex, to: NodeIndex) -> Option<&FlightEdge<'a>> {
        self.graph
            .edges_connecting(from, to)
            .min_by(|a, b| {
                a.weight()
                    .weight
                    .total_cmp(&b.weight().weight)
                    .then(a.id().index().cmp(&b.id().index()))
            })
            .map(|edge| edge.weight())
    }

    /// Best direct flight for every connected ordered airport pair, sorted by codes
    pub fn direct_routes(&self) -> Vec<(&'a str, &'a str, &FlightEdge<'a>)> {
        let mut best: HashMap<(NodeIndex, NodeIndex), EdgeIndex> = HashMap::new();

        for edge in self.graph.edge_references() {
            let key = (edge.source(), edge.target());
            let replace = match best.get(&key) {
                None => true,
                Some(&current) => {
                    edge.weight().weight.total_cmp(&self.graph[current].weight) == Ordering::Less
                }
            };
            if replace {
                best.insert(key, edge.id());
            }
        }

        let mut routes: Vec<_> = best
            .into_iter()
            .map(|((from, to), edge)| (self.graph[from], self.graph[to], &self.graph[edge]))
            .collect();
        routes.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        routes
    }
}
