use clap::{Parser, Subcommand};
use forecast_insights::{
    write_conditions, write_daily_means, write_daily_series, FileStore, ForecastError,
    ForecastFetcher, LatLon, WeatherAnalyzer, WeatherSummary, DEFAULT_FORECAST_URL, DEFAULT_RECORD_COUNT,
    DEFAULT_TIMESTAMP_FIELD,
};
use log::info;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forecast-insights")]
#[command(about = "Fetch a short-term weather forecast and summarize it per day", long_about = None)]
struct Cli {
    /// Directory holding the stored forecast documents (default: system cache dir)
    #[arg(long, env = "FORECAST_STORE_DIR", global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the forecast and store each entry under data[0], data[1], ...
    Fetch {
        /// Latitude of the forecast location
        #[arg(long, default_value_t = 35.5, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude of the forecast location
        #[arg(long, default_value_t = -78.5, allow_negative_numbers = true)]
        lon: f64,

        /// Forecast endpoint
        #[arg(long, env = "FORECAST_URL", default_value = DEFAULT_FORECAST_URL)]
        url: String,

        /// RapidAPI key
        #[arg(long, env = "WEATHERBIT_API_KEY")]
        api_key: Option<String>,

        /// RapidAPI host header
        #[arg(long, env = "WEATHERBIT_API_HOST")]
        api_host: Option<String>,
    },

    /// Load the stored entries and print daily temperature, wind and conditions
    Analyze {
        /// Number of data[i] keys to read
        #[arg(long, default_value_t = DEFAULT_RECORD_COUNT)]
        count: usize,

        /// Field holding the YYYY-MM-DD:HH timestamp
        #[arg(long, default_value = DEFAULT_TIMESTAMP_FIELD)]
        timestamp_field: String,
    },
}

/// Opens the store under `dir`, or under the system cache dir when unset.
async fn open_store(dir: Option<PathBuf>) -> Result<FileStore, ForecastError> {
    Ok(match dir {
        Some(dir) => FileStore::open(dir).await?,
        None => FileStore::open_default().await?,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let store = open_store(cli.store_dir).await?;
    info!("Using forecast store at {}", store.dir().display());

    match cli.command {
        Command::Fetch {
            lat,
            lon,
            url,
            api_key,
            api_host,
        } => {
            let fetcher = ForecastFetcher::builder()
                .location(LatLon(lat, lon))
                .url(url)
                .maybe_api_key(api_key)
                .maybe_api_host(api_host)
                .build();
            let stored = fetcher.fetch_and_store(&store).await?;
            println!("Stored {} forecast entries in {}", stored, store.dir().display());
        }
        Command::Analyze {
            count,
            timestamp_field,
        } => {
            let analyzer = WeatherAnalyzer::new(store);
            let mut table = analyzer
                .load_table()
                .max_count(count)
                .timestamp_field(timestamp_field)
                .call()
                .await?;
            if table.is_empty() {
                println!(
                    "No forecast entries found in {}",
                    analyzer.store().dir().display()
                );
                return Ok(());
            }

            let summary = WeatherSummary::from_table(&mut table)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "Average temperature per day (°C)")?;
            write_daily_means(&mut out, &summary.daily_temperature)?;
            writeln!(out, "\nWind speed per day (m/s)")?;
            write_daily_series(&mut out, &summary.wind_speed)?;
            writeln!(out, "\nWeather per day")?;
            write_conditions(&mut out, &summary.conditions)?;
        }
    }

    Ok(())
}
