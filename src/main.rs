use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tracing::debug;

use flight_planner::config::{PlannerConfig, DEFAULT_DATA_PATH};
use flight_planner::models::{CostMetric, FlightFilter, FlightTable, ValueRange};
use flight_planner::planner::{RoutePlanner, RouteRequest, TripRequest};
use flight_planner::utils::status::{
    AviationStackClient, StatusConfig, StatusSource, DEFAULT_STATUS_TIMEOUT_SECONDS,
    DEFAULT_STATUS_URL,
};
use flight_planner::{logging, table, PlannerError};

#[derive(Parser)]
#[command(
    name = "flight_planner",
    about = "Plan cheapest or quickest flight routes from a flight table",
    version,
    after_help = "\
Examples:
  flight_planner route --from DEL --to BLR
  flight_planner route --from DEL --to BLR --optimize quickest --airlines IndiGo,Vistara
  flight_planner connect --cities DEL,BOM,BLR,MAA
  flight_planner trip --cities DEL,BOM,BLR --json --pretty
  flight_planner status --dep DEL --arr BOM"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        global = true,
        env = "FLIGHT_PLANNER_DATA",
        default_value = DEFAULT_DATA_PATH,
        value_name = "PATH",
        help = "Flight table (CSV with source,destination,airline,price,time)"
    )]
    data: PathBuf,

    #[arg(long, global = true, help = "Output as JSON")]
    json: bool,

    #[arg(long, global = true, help = "Output as pretty-printed JSON")]
    pretty: bool,

    #[arg(short, long, global = true, help = "Log query details to stderr")]
    verbose: bool,

    #[arg(long, global = true, value_name = "LEVEL", help = "Log level or filter directive")]
    log_level: Option<String>,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    log_json: bool,

    #[arg(
        long,
        global = true,
        env = "FLIGHT_PLANNER_MAX_TRIP_CITIES",
        default_value_t = flight_planner::algorithms::tour::DEFAULT_MAX_TOUR_CITIES,
        value_name = "N",
        help = "Largest number of cities a trip may visit"
    )]
    max_trip_cities: usize,

    #[arg(long, global = true, value_name = "SECS", help = "Time limit for trip search")]
    trip_timeout: Option<f64>,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(about = "Cheapest or quickest route between two airports")]
    Route(RouteArgs),

    #[command(about = "Cheapest connections joining a set of cities, with return flights")]
    Connect {
        #[arg(long, value_delimiter = ',', required = true, value_name = "A,B,...")]
        cities: Vec<String>,
    },

    #[command(about = "Best order to visit every city once by direct flights")]
    Trip(TripArgs),

    #[command(about = "Show the flight table")]
    Flights {
        #[command(flatten)]
        filter: FilterArgs,
    },

    #[command(about = "Show airports, airlines and price/duration bounds")]
    Airports,

    #[command(about = "Best direct flight for every connected airport pair")]
    Network {
        #[arg(long, default_value = "cheapest", value_name = "MODE")]
        optimize: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    #[command(about = "Live flight status between two airports")]
    Status(StatusArgs),
}

#[derive(clap::Args)]
struct RouteArgs {
    #[arg(short, long, value_name = "IATA", help = "Departure airport code")]
    from: String,

    #[arg(short, long, value_name = "IATA", help = "Arrival airport code")]
    to: String,

    #[arg(
        long,
        default_value = "cheapest",
        value_name = "MODE",
        help = "Optimize for [cheapest, quickest]"
    )]
    optimize: String,

    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(clap::Args)]
struct TripArgs {
    #[arg(long, value_delimiter = ',', required = true, value_name = "A,B,...")]
    cities: Vec<String>,

    #[arg(
        long,
        default_value = "cheapest",
        value_name = "MODE",
        help = "Optimize for [cheapest, quickest]"
    )]
    optimize: String,

    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(clap::Args)]
struct FilterArgs {
    #[arg(
        long,
        value_delimiter = ',',
        value_name = "NAME,...",
        help = "Only use these airlines"
    )]
    airlines: Vec<String>,

    #[arg(long, value_name = "PRICE")]
    min_price: Option<f64>,

    #[arg(long, value_name = "PRICE")]
    max_price: Option<f64>,

    #[arg(long, value_name = "MINUTES")]
    min_duration: Option<f64>,

    #[arg(long, value_name = "MINUTES")]
    max_duration: Option<f64>,
}

impl FilterArgs {
    fn is_empty(&self) -> bool {
        self.airlines.is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_duration.is_none()
            && self.max_duration.is_none()
    }

    /// Unset selections default to everything in the table
    fn to_filter(&self, table: &FlightTable) -> Result<Option<FlightFilter>, PlannerError> {
        if self.is_empty() {
            return Ok(None);
        }

        let airlines: Vec<String> = if self.airlines.is_empty() {
            FlightFilter::permissive(table).airlines.into_iter().collect()
        } else {
            self.airlines.clone()
        };
        let price = ValueRange::new(
            self.min_price.unwrap_or(0.0),
            self.max_price.unwrap_or(f64::MAX),
        )?;
        let duration = ValueRange::new(
            self.min_duration.unwrap_or(0.0),
            self.max_duration.unwrap_or(f64::MAX),
        )?;

        Ok(Some(FlightFilter::new(airlines, price, duration)))
    }
}

#[derive(clap::Args)]
struct StatusArgs {
    #[arg(long, value_name = "IATA", help = "Departure airport code")]
    dep: String,

    #[arg(long, value_name = "IATA", help = "Arrival airport code")]
    arr: String,

    #[arg(long, env = "AVIATIONSTACK_API_KEY", hide_env_values = true, value_name = "KEY")]
    api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_STATUS_URL, value_name = "URL")]
    status_url: String,

    #[arg(long, default_value_t = DEFAULT_STATUS_TIMEOUT_SECONDS, value_name = "SECS")]
    status_timeout: u64,
}

fn error_code(err: &PlannerError) -> i32 {
    match err {
        e if e.is_no_result() => 1,
        PlannerError::DataUnavailable { .. }
        | PlannerError::MissingColumn(_)
        | PlannerError::MalformedRow { .. } => 3,
        PlannerError::SearchTimedOut(_) => 4,
        _ => 2,
    }
}

fn die(err: &PlannerError, json_mode: bool) -> ! {
    if json_mode {
        let json = serde_json::json!({
            "error": {
                "kind": err.kind(),
                "message": err.to_string(),
            }
        });
        println!("{json}");
    } else {
        eprintln!("error: {err}");
    }
    process::exit(error_code(err));
}

fn emit<T, F>(value: &T, cli: &Cli, render: F)
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if !(cli.json || cli.pretty) {
        println!("{}", render(value));
        return;
    }

    let encoded = if cli.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match encoded {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: failed to encode output: {e}");
            process::exit(3);
        }
    }
}

fn planner_config(cli: &Cli) -> Result<PlannerConfig, PlannerError> {
    let trip_deadline = cli
        .trip_timeout
        .map(|secs| {
            Duration::try_from_secs_f64(secs).map_err(|_| {
                PlannerError::InvalidQuery(format!(
                    "--trip-timeout must be a non-negative number of seconds, got {secs}"
                ))
            })
        })
        .transpose()?;

    if cli.max_trip_cities == 0 {
        return Err(PlannerError::InvalidQuery(
            "--max-trip-cities must be at least 1".into(),
        ));
    }

    let status = match &cli.command {
        Commands::Status(args) => StatusConfig {
            api_key: args.api_key.clone(),
            base_url: args.status_url.clone(),
            timeout_seconds: args.status_timeout,
        },
        _ => StatusConfig::default(),
    };

    Ok(PlannerConfig {
        data_path: cli.data.clone(),
        max_trip_cities: cli.max_trip_cities,
        trip_deadline,
        status,
    })
}

fn run(cli: &Cli) -> Result<(), PlannerError> {
    let config = planner_config(cli)?;

    if let Commands::Status(args) = &cli.command {
        if !config.status.is_configured() {
            eprintln!("hint: set AVIATIONSTACK_API_KEY or pass --api-key for live status");
        }
        let client = AviationStackClient::new(config.status.clone());
        let records = client.fetch_status(&args.dep, &args.arr);
        if records.is_empty() && !(cli.json || cli.pretty) {
            eprintln!("No live flights found for {} → {}", args.dep, args.arr);
        }
        emit(records.as_slice(), cli, table::render_status);
        return Ok(());
    }

    let planner = RoutePlanner::from_config(&config)?;

    match &cli.command {
        Commands::Route(args) => {
            let metric = CostMetric::from_str_loose(&args.optimize)?;
            let mut request = RouteRequest::new(&args.from, &args.to, metric);
            request.filter = args.filter.to_filter(planner.table())?;
            let path = planner.find_route(&request)?;
            emit(&path, cli, table::render_path);
        }
        Commands::Connect { cities } => {
            let result = planner.connect_cities(cities)?;
            emit(&result, cli, table::render_spanning);
        }
        Commands::Trip(args) => {
            let metric = CostMetric::from_str_loose(&args.optimize)?;
            let mut request = TripRequest::new(args.cities.iter().cloned(), metric);
            request.filter = args.filter.to_filter(planner.table())?;
            let tour = planner.plan_trip(&request)?;
            emit(&tour, cli, table::render_tour);
        }
        Commands::Flights { filter } => {
            let flights = match filter.to_filter(planner.table())? {
                Some(filter) => planner.filtered(&filter)?,
                None => planner.table().records().to_vec(),
            };
            emit(flights.as_slice(), cli, table::render_flights);
        }
        Commands::Airports => {
            let summary = serde_json::json!({
                "airports": planner.table().airports(),
                "airlines": planner.table().airlines(),
                "price_bounds": planner.table().price_bounds(),
                "duration_bounds": planner.table().duration_bounds(),
            });
            emit(&summary, cli, |_| table::render_airports(planner.table()));
        }
        Commands::Network { optimize, filter } => {
            let metric = CostMetric::from_str_loose(optimize)?;
            let filter = filter.to_filter(planner.table())?;
            let links = planner.network(metric, filter.as_ref())?;
            emit(links.as_slice(), cli, |links| {
                table::render_network(links, metric)
            });
        }
        Commands::Status(_) => {}
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json || cli.pretty;

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    if let Err(err) = run(&cli) {
        debug!(kind = err.kind(), "query failed");
        die(&err, json_mode);
    }
}
