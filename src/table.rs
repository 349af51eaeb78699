use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::models::{CostMetric, FlightRecord, FlightTable, PathResult, SpanningResult, TourResult};
use crate::planner::NetworkLink;
use crate::utils::status::StatusRecord;

pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

pub fn format_duration(minutes: f64) -> String {
    let total = minutes.round() as u64;
    format!("{}h {:02}m", total / 60, total % 60)
}

fn format_cost(metric: CostMetric, cost: f64) -> String {
    match metric {
        CostMetric::Price => format_price(cost),
        CostMetric::Duration => format_duration(cost),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn flight_rows(table: &mut Table, flights: &[FlightRecord]) {
    for f in flights {
        table.add_row(vec![
            format!("{} → {}", f.source, f.destination),
            f.airline.clone(),
            format_price(f.price),
            format_duration(f.duration),
        ]);
    }
}

pub fn render_flights(flights: &[FlightRecord]) -> String {
    let mut table = new_table(vec!["Route", "Airline", "Price", "Duration"]);
    flight_rows(&mut table, flights);
    table.to_string()
}

pub fn render_path(path: &PathResult) -> String {
    let mut table = new_table(vec!["Route", "Airline", "Price", "Duration"]);
    flight_rows(&mut table, &path.segments);

    let label = match path.metric {
        CostMetric::Price => "Cheapest",
        CostMetric::Duration => "Quickest",
    };
    let stops = path.hops().saturating_sub(1);
    format!(
        "{table}\n{label} route: {} ({stops} stop{}), total {}",
        path.airports.join(" → "),
        if stops == 1 { "" } else { "s" },
        format_cost(path.metric, path.total_cost),
    )
}

pub fn render_spanning(result: &SpanningResult) -> String {
    let mut table = new_table(vec!["From", "To", "Price"]);
    for c in &result.round_trip {
        table.add_row(vec![c.from.clone(), c.to.clone(), format_price(c.price)]);
    }

    format!(
        "{table}\nOne-way total: {}\nRound-trip total: {}",
        format_price(result.one_way_total),
        format_price(result.round_trip_total),
    )
}

pub fn render_tour(tour: &TourResult) -> String {
    let mut table = new_table(vec!["Leg", "Route", "Airline", "Price", "Duration"]);
    for (i, f) in tour.segments.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            format!("{} → {}", f.source, f.destination),
            f.airline.clone(),
            format_price(f.price),
            format_duration(f.duration),
        ]);
    }

    format!(
        "{table}\nVisit order: {}\nTotal ({}): {}",
        tour.order.join(" → "),
        tour.metric,
        format_cost(tour.metric, tour.total_cost),
    )
}

pub fn render_airports(flights: &FlightTable) -> String {
    let mut table = new_table(vec!["Field", "Values"]);
    table.add_row(vec!["Airports".to_string(), flights.airports().join(", ")]);
    table.add_row(vec!["Airlines".to_string(), flights.airlines().join(", ")]);
    if let Some((lo, hi)) = flights.price_bounds() {
        table.add_row(vec![
            "Price".to_string(),
            format!("{} – {}", format_price(lo), format_price(hi)),
        ]);
    }
    if let Some((lo, hi)) = flights.duration_bounds() {
        table.add_row(vec![
            "Duration".to_string(),
            format!("{} – {}", format_duration(lo), format_duration(hi)),
        ]);
    }
    table.to_string()
}

pub fn render_network(links: &[NetworkLink], metric: CostMetric) -> String {
    let mut table = new_table(vec!["From", "To", "Airline", "Best"]);
    for link in links {
        table.add_row(vec![
            link.from.clone(),
            link.to.clone(),
            link.flight.airline.clone(),
            format_cost(metric, link.weight),
        ]);
    }
    table.to_string()
}

pub fn render_status(records: &[StatusRecord]) -> String {
    let mut table = new_table(vec!["Airline", "Flight", "Departure", "Arrival", "Status"]);
    for r in records {
        table.add_row(vec![
            r.airline.clone(),
            r.flight_number.clone(),
            r.departure_scheduled.clone(),
            r.arrival_scheduled.clone(),
            r.status.clone(),
        ]);
    }
    table.to_string()
}
