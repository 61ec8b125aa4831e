use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use forecast_core::application::ForecastServiceImpl;
use forecast_core::config::{StoreConfig, DEFAULT_DB_PATH, DEFAULT_ICON_BASE_URL};
use forecast_core::domain::ForecastView;
use forecast_core::error::ForecastError;
use forecast_core::ports::{ForecastRepository, ForecastWriter};
use forecast_core::utils::{format_timestamp_to_local, parse_date};
use jma_adapter::{decode_forecast, find_prefecture, forecast_url, PREFECTURES};
use markdown_adapter::MarkdownWriterAdapter;
use sqlite_adapter::SqliteForecastRepository;
use std::path::PathBuf;
use std::process::ExitCode;

/// CLI tool to store JMA forecasts in SQLite and read them back
#[derive(Parser, Debug)]
#[command(name = "forecast-cli")]
#[command(about = "Stores decoded JMA forecasts in a local SQLite database and looks them up")]
struct Cli {
    /// Path to the forecast SQLite database file
    #[arg(long = "db", env = "FORECAST_DB", default_value = DEFAULT_DB_PATH, global = true)]
    db: PathBuf,

    /// Base URL weather icons are derived from
    #[arg(long, env = "FORECAST_ICON_BASE_URL", default_value = DEFAULT_ICON_BASE_URL, global = true)]
    icon_base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a downloaded forecast document and save every day in it
    Import {
        /// Forecast JSON as served by the JMA forecast endpoint
        #[arg(short = 'p', long)]
        payload: PathBuf,

        /// Area code the document belongs to (e.g. 130000)
        #[arg(short = 'a', long)]
        area: String,

        /// Display name for the area; defaults to the prefecture catalog entry
        #[arg(short = 'n', long)]
        name: Option<String>,
    },

    /// Print the stored forecast for one area and date
    Show {
        #[arg(short = 'a', long)]
        area: String,

        /// Date to look up, e.g. 2024-06-01
        #[arg(short = 'd', long, value_parser = date_arg)]
        date: NaiveDate,

        /// Print the forecast as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write a Markdown report of stored days for an area
    Export {
        #[arg(short = 'a', long)]
        area: String,

        /// First day of the report; defaults to today
        #[arg(short = 'f', long, value_parser = date_arg)]
        from: Option<NaiveDate>,

        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Directory the report is written to
        #[arg(short = 'o', long = "output-dir", default_value = "reports")]
        output_dir: PathBuf,
    },

    /// List the prefecture area codes
    Areas,
}

fn date_arg(input: &str) -> Result<NaiveDate, String> {
    parse_date(input).ok_or_else(|| format!("unrecognized date: {}", input))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_view(view: &ForecastView) {
    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "--".to_string());
    println!("{} {}", view.area_name, view.forecast_date.format("%Y-%m-%d (%a)"));
    println!("  Weather:        {}", view.weather_description);
    println!("  Icon:           {}", view.icon_path);
    println!(
        "  Temperature:    {} / {}",
        or_dash(view.temperature_min.map(|t| format!("{}℃", t))),
        or_dash(view.temperature_max.map(|t| format!("{}℃", t)))
    );
    println!(
        "  Chance of rain: {}",
        or_dash(view.precipitation_probability.map(|p| format!("{}%", p)))
    );
    println!("  Updated:        {}", format_timestamp_to_local(&view.updated_at));
}

fn render_json(view: &ForecastView) -> Result<String, ForecastError> {
    Ok(serde_json::to_string_pretty(view).map_err(std::io::Error::from)?)
}

fn run(cli: Cli) -> Result<(), ForecastError> {
    if let Command::Areas = cli.command {
        for prefecture in PREFECTURES {
            println!("{}  {}", prefecture.code, prefecture.name);
        }
        return Ok(());
    }

    let config = StoreConfig::new(cli.db).with_icon_base_url(cli.icon_base_url);

    // Instantiate concrete implementations of secondary adapters
    let repository: Box<dyn ForecastRepository> =
        Box::new(SqliteForecastRepository::open(config)?);
    let output_dir = match &cli.command {
        Command::Export { output_dir, .. } => output_dir.clone(),
        _ => PathBuf::from("reports"),
    };
    let writer: Box<dyn ForecastWriter> = Box::new(MarkdownWriterAdapter::new(output_dir));

    // Instantiate the core business service with dependency injection
    let service = ForecastServiceImpl::new(repository, writer);
    let today = Local::now().date_naive();

    match cli.command {
        Command::Import {
            payload,
            area,
            name,
        } => {
            let name = name
                .or_else(|| find_prefecture(&area).map(|p| p.name.to_string()))
                .unwrap_or_else(|| area.clone());
            tracing::debug!(source = %forecast_url(&area), "Importing forecast document");

            let body = std::fs::read_to_string(&payload)?;
            let records = decode_forecast(&body, &area, &name, today)?;
            let report = service.ingest(&records);
            println!(
                "Saved {} of {} forecast days for {} ({})",
                report.saved,
                records.len(),
                name,
                area
            );
            if report.failed > 0 {
                return Err(ForecastError::Storage(format!(
                    "{} forecast days could not be saved",
                    report.failed
                )));
            }
        }
        Command::Show { area, date, json } => match service.lookup(&area, date)? {
            Some(view) if json => println!("{}", render_json(&view)?),
            Some(view) => print_view(&view),
            None if json => println!("null"),
            None => println!("No forecast stored for {} on {}", area, date),
        },
        Command::Export {
            area, from, days, ..
        } => {
            let written = service.export(&area, from.unwrap_or(today), days)?;
            println!("Exported {} forecast days for {}", written, area);
        }
        Command::Areas => {}
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    // Execute the primary port method
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_retryable() {
                eprintln!("The database may be busy; try again shortly.");
            }
            ExitCode::FAILURE
        }
    }
}
