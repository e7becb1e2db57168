use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use pathroute::dataset::{AxisOrder, FileFormat};
use pathroute::{GeoPoint, RouteOptions, RouteQuery, SearchLimits, Solver};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] pathroute::dataset::Error);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AxisOrderArg {
    LatLon,
    LonLat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Json,
    JsonGz,
    JsonBz2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SolverArg {
    Weighted,
    FewestEdges,
    Greedy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputArg {
    /// {"route": [[lat, lon], ...], "length_m": ...}
    Wire,
    /// GeoJSON FeatureCollection with the route and the network
    Geojson,
}

#[derive(Parser)]
struct Cli {
    /// The path to the JSON dataset of path segments
    dataset: PathBuf,

    /// Latitude of the start point
    #[arg(allow_hyphen_values = true)]
    start_lat: f64,

    /// Longitude of the start point
    #[arg(allow_hyphen_values = true)]
    start_lon: f64,

    /// Latitude of the end point
    #[arg(allow_hyphen_values = true)]
    end_lat: f64,

    /// Longitude of the end point
    #[arg(allow_hyphen_values = true)]
    end_lon: f64,

    /// Order of coordinates in the dataset pairs
    #[arg(long, value_enum, default_value_t = AxisOrderArg::LatLon)]
    axis_order: AxisOrderArg,

    /// Compression of the dataset; guessed from the content if not provided
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    #[arg(long, value_enum, default_value_t = SolverArg::Weighted)]
    solver: SolverArg,

    /// Distance from the destination at which the greedy solver stops, in meters
    #[arg(long, default_value_t = pathroute::DEFAULT_GREEDY_TOLERANCE_M)]
    greedy_tolerance: f64,

    /// Fall back to the greedy solver if no exact route exists
    #[arg(long)]
    fallback: bool,

    /// Abort the search after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputArg::Wire)]
    output: OutputArg,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    fn dataset_options(&self) -> pathroute::dataset::Options {
        pathroute::dataset::Options {
            axis_order: match self.axis_order {
                AxisOrderArg::LatLon => AxisOrder::LatLon,
                AxisOrderArg::LonLat => AxisOrder::LonLat,
            },
            file_format: match self.format {
                None => FileFormat::Unknown,
                Some(FormatArg::Json) => FileFormat::Json,
                Some(FormatArg::JsonGz) => FileFormat::JsonGz,
                Some(FormatArg::JsonBz2) => FileFormat::JsonBz2,
            },
        }
    }

    fn route_options(&self) -> RouteOptions {
        let mut limits = SearchLimits::default();
        if let Some(ms) = self.timeout_ms {
            limits = limits.with_deadline(Instant::now() + Duration::from_millis(ms));
        }

        RouteOptions {
            solver: match self.solver {
                SolverArg::Weighted => Solver::Weighted,
                SolverArg::FewestEdges => Solver::FewestEdges,
                SolverArg::Greedy => Solver::Greedy,
            },
            limits,
            greedy_tolerance_m: self.greedy_tolerance,
            fallback_to_greedy: self.fallback,
        }
    }
}

pub fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    let mut logger = colog::default_builder();
    logger.filter(None, cli.log_level());
    logger.init();

    let query = RouteQuery::new(
        GeoPoint::new(cli.start_lat, cli.start_lon)?,
        GeoPoint::new(cli.end_lat, cli.end_lon)?,
    );

    let g = load_graph(&cli.dataset, &cli.dataset_options())?;

    let Some(route) = pathroute::find_route(&g, &query, &cli.route_options())? else {
        log::error!("no route between the given points");
        return Ok(ExitCode::from(2));
    };

    let output = match cli.output {
        OutputArg::Wire => serde_json::to_string_pretty(&route)?,
        OutputArg::Geojson => {
            let mut collection = g.to_geojson();
            if let Some(features) = collection["features"].as_array_mut() {
                features.push(route.to_geojson());
            }
            serde_json::to_string_pretty(&collection)?
        }
    };
    println!("{output}");

    Ok(ExitCode::SUCCESS)
}

fn load_graph<P: AsRef<Path>>(
    path: P,
    options: &pathroute::dataset::Options,
) -> Result<pathroute::PathGraph, GraphLoadError> {
    match pathroute::dataset::load_from_file(options, path.as_ref()) {
        Ok(g) => Ok(g),
        Err(e) => Err(GraphLoadError(PathBuf::from(path.as_ref()), e)),
    }
}
