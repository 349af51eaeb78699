use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

const FLIGHTS: &str = "\
source,destination,airline,price,time
DEL,BOM,IndiGo,4500,125
BOM,BLR,Vistara,3000,95
DEL,BLR,Air India,9800,165
BLR,MAA,IndiGo,2100,60
";

fn cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("flight_planner"));
    cmd.env_remove("FLIGHT_PLANNER_DATA")
        .env_remove("FLIGHT_PLANNER_MAX_TRIP_CITIES")
        .env_remove("AVIATIONSTACK_API_KEY")
        .env_remove("RUST_LOG")
        .env_remove("FLIGHT_PLANNER_LOG");
    cmd
}

fn fixture(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("flights_data.csv");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn top_level_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("route"))
        .stdout(predicate::str::contains("connect"))
        .stdout(predicate::str::contains("trip"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("Examples:"));
}

#[test]
fn route_help_shows_filters() {
    cmd()
        .args(["route", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--from <IATA>"))
        .stdout(predicate::str::contains("--optimize <MODE>"))
        .stdout(predicate::str::contains("--airlines <NAME,...>"))
        .stdout(predicate::str::contains("--max-price <PRICE>"))
        .stdout(predicate::str::contains("--min-duration <MINUTES>"));
}

#[test]
fn route_renders_table() {
    let (_dir, path) = fixture(FLIGHTS);
    cmd()
        .arg("--data")
        .arg(&path)
        .args(["route", "--from", "del", "--to", "blr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cheapest route: DEL → BOM → BLR"))
        .stdout(predicate::str::contains("7500.00"));
}

#[test]
fn route_json_output() {
    let (_dir, path) = fixture(FLIGHTS);
    let output = cmd()
        .arg("--data")
        .arg(&path)
        .args(["route", "--from", "DEL", "--to", "BLR", "--optimize", "quickest", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["metric"], "duration");
    assert_eq!(json["total_cost"], 165.0);
    assert_eq!(json["airports"], serde_json::json!(["DEL", "BLR"]));
}

#[test]
fn route_with_airline_filter() {
    let (_dir, path) = fixture(FLIGHTS);
    cmd()
        .arg("--data")
        .arg(&path)
        .args(["route", "--from", "DEL", "--to", "BLR", "--airlines", "Air India"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Air India"))
        .stdout(predicate::str::contains("9800.00"));
}

#[test]
fn route_without_path_exits_one() {
    let (_dir, path) = fixture(FLIGHTS);
    cmd()
        .arg("--data")
        .arg(&path)
        .args(["route", "--from", "MAA", "--to", "DEL", "--json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"kind\":\"no_path\""));
}

#[test]
fn route_with_inverted_range_exits_two() {
    let (_dir, path) = fixture(FLIGHTS);
    cmd()
        .arg("--data")
        .arg(&path)
        .args(["route", "--from", "DEL", "--to", "BLR"])
        .args(["--min-price", "5000", "--max-price", "100"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn unknown_optimization_exits_two() {
    let (_dir, path) = fixture(FLIGHTS);
    cmd()
        .arg("--data")
        .arg(&path)
        .args(["route", "--from", "DEL", "--to", "BLR", "--optimize", "scenic"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown optimization"));
}

#[test]
fn missing_data_file_exits_three() {
    let dir = tempdir().unwrap();
    cmd()
        .arg("--data")
        .arg(dir.path().join("absent.csv"))
        .args(["route", "--from", "DEL", "--to", "BLR", "--json"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("data_unavailable"));
}

#[test]
fn data_path_from_environment() {
    let (_dir, path) = fixture(FLIGHTS);
    cmd()
        .env("FLIGHT_PLANNER_DATA", &path)
        .arg("airports")
        .assert()
        .success()
        .stdout(predicate::str::contains("BLR, BOM, DEL, MAA"));
}

#[test]
fn connect_reports_round_trip() {
    let (_dir, path) = fixture(FLIGHTS);
    cmd()
        .arg("--data")
        .arg(&path)
        .args(["connect", "--cities", "DEL,BOM,BLR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("One-way total: 7500.00"))
        .stdout(predicate::str::contains("Round-trip total: 15000.00"));
}

#[test]
fn trip_json_output() {
    let (_dir, path) = fixture(FLIGHTS);
    let output = cmd()
        .arg("--data")
        .arg(&path)
        .args(["trip", "--cities", "BLR,DEL,BOM", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["order"], serde_json::json!(["DEL", "BOM", "BLR"]));
    assert_eq!(json["total_cost"], 7500.0);
}

#[test]
fn trip_over_cap_exits_two() {
    let (_dir, path) = fixture(FLIGHTS);
    cmd()
        .arg("--data")
        .arg(&path)
        .args(["--max-trip-cities", "2"])
        .args(["trip", "--cities", "DEL,BOM,BLR"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("too many cities"));
}

#[test]
fn trip_timeout_exits_four() {
    let mut csv = String::from("source,destination,airline,price,time\n");
    let codes = ["AAA", "BBB", "CCC", "DDD", "EEE"];
    for from in codes {
        for to in codes {
            if from != to {
                csv.push_str(&format!("{from},{to},IndiGo,100,60\n"));
            }
        }
    }
    let (_dir, path) = fixture(&csv);

    cmd()
        .arg("--data")
        .arg(&path)
        .args(["--trip-timeout", "0", "--json"])
        .args(["trip", "--cities", "AAA,BBB,CCC,DDD,EEE"])
        .assert()
        .code(4)
        .stdout(predicate::str::contains("search_timed_out"));
}

#[test]
fn network_lists_direct_pairs() {
    let (_dir, path) = fixture(FLIGHTS);
    let output = cmd()
        .arg("--data")
        .arg(&path)
        .args(["network", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(4));
}

#[test]
fn flights_filter_to_nothing_exits_one() {
    let (_dir, path) = fixture(FLIGHTS);
    cmd()
        .arg("--data")
        .arg(&path)
        .args(["flights", "--airlines", "Lufthansa"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no flights match"));
}

#[test]
fn status_without_key_is_empty() {
    cmd()
        .args(["status", "--dep", "DEL", "--arr", "BOM", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"))
        .stderr(predicate::str::contains("AVIATIONSTACK_API_KEY"));
}
