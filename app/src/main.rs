//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point. Loads the CSV, applies the filter
// given on the command line and prints the requested views as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use app_lib::{
    apply_filter_change, create_dashboard_state, filter_options, get_view, init_log_file, list_views,
    load_records, log_error, log_info, logging, DashboardConfig, DashboardError, FilterRequest,
};
use dataset::{Dataset, RegionTable};
use view_adapters::ViewKind;

/// Shopping Trends Dashboard - filtered aggregate views as JSON
///
/// Examples:
///   shopping-dashboard --data shopping_trends_updated.csv
///   shopping-dashboard --data data.csv --season winter --season fall --region CA
///   shopping-dashboard --config dashboard.json --view demographic-lines --gender Female --no-overall
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CSV dataset (overrides the config)
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Season to include; repeat for several. Default: all seasons
    #[arg(short, long = "season", value_name = "SEASON")]
    seasons: Vec<String>,

    /// Region code or state name. Default: all regions
    #[arg(short, long)]
    region: Option<String>,

    /// Gender to include; repeat for several. Default: every gender in the data
    #[arg(short, long = "gender", value_name = "GENDER")]
    genders: Vec<String>,

    /// Hide the pooled Overall series
    #[arg(long)]
    no_overall: bool,

    /// View to print; repeat for several. Default: every enabled view
    #[arg(long = "view", value_name = "VIEW", value_parser = parse_view)]
    views: Vec<ViewKind>,

    /// Print the filter option lists instead of views
    #[arg(long)]
    options: bool,

    /// Log file (overrides the config)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Echo log lines to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

fn parse_view(raw: &str) -> Result<ViewKind, String> {
    let id = raw.trim().to_ascii_lowercase().replace('-', "_");
    ViewKind::ALL
        .into_iter()
        .find(|kind| kind.id() == id)
        .ok_or_else(|| {
            let known: Vec<&str> = ViewKind::ALL.iter().map(|k| k.id()).collect();
            format!("unknown view '{}', expected one of: {}", raw, known.join(", "))
        })
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path).map_err(DashboardError::from)?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = args.data {
        config.dataset_path = data;
    }
    if let Some(log_file) = args.log_file {
        config.log_file = Some(log_file);
    }

    if let Some(path) = &config.log_file {
        match init_log_file(path) {
            Ok(path) => log_info!("SYS", "dashboard starting, log={}", path.display()),
            Err(e) => eprintln!("[LOG_INIT] FAILED: {}", e),
        }
    }

    let bands = config.bands().map_err(DashboardError::from)?;
    let regions = RegionTable::us_states();
    let records = load_records(&config.dataset_path).map_err(DashboardError::from)?;
    let dataset = Dataset::load(records, &regions, &bands);
    let state = create_dashboard_state(dataset, regions, &config)?;

    if args.options {
        println!("{}", to_json(&filter_options(&state), args.pretty)?);
        return Ok(());
    }

    let defaults = state.current_filter()?;
    let request = FilterRequest {
        seasons: if args.seasons.is_empty() {
            defaults.seasons().iter().map(|s| s.to_string()).collect()
        } else {
            args.seasons
        },
        region: args.region,
        genders: if args.genders.is_empty() {
            defaults.genders().iter().cloned().collect()
        } else {
            args.genders
        },
        show_overall: Some(!args.no_overall),
    };
    apply_filter_change(&state, request)?;

    let kinds: Vec<ViewKind> = if args.views.is_empty() {
        list_views(&state)
            .into_iter()
            .filter_map(|status| match status {
                app_lib::ViewStatus::Ready { kind } => Some(kind),
                app_lib::ViewStatus::Failed { .. } => None,
            })
            .collect()
    } else {
        args.views
    };

    let mut outputs = Vec::with_capacity(kinds.len());
    for kind in kinds {
        outputs.push(get_view(&state, kind)?);
    }
    println!("{}", to_json(&outputs, args.pretty)?);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::set_console_echo(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!("SYS", "{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
