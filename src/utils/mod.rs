pub mod flight_graph;
pub mod loader;
pub mod status;
