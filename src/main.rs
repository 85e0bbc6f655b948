use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;

use fleet_sens::config::AppConfig;
use fleet_sens::core::FleetApp;

/// fleet-sens - live sensor telemetry buffer for vessel fleets
#[derive(Parser, Debug, Clone)]
#[command(name = "fleet-sens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Config file to load instead of the default location
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop after this many seconds (default: run until Ctrl-C)
    #[arg(short = 's', long = "seconds", value_name = "N")]
    seconds: Option<u64>,

    /// Print the latest readings as JSON on exit
    #[arg(long = "json")]
    json: bool,

    /// Print the stored history of a sensor on exit
    #[arg(short = 'H', long = "history", value_name = "SENSOR_ID")]
    history: Option<String>,

    /// Write the default configuration to FILE and exit
    #[arg(long = "write-default-config", value_name = "FILE")]
    write_default_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info, Level 2: debug, Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting fleet-sens v{}", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &cli.write_default_config {
        AppConfig::default().save_to_path(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = load_config(cli.config.as_ref());
    let FleetApp {
        stream,
        registry: _,
        mut ingest,
        dashboard,
    } = FleetApp::from_config(&config);

    let base_interval = ingest.base_interval();
    let ingest_task = tokio::spawn(async move { ingest.run(base_interval).await });

    let poll_interval = Duration::from_millis(config.dashboard.poll_interval_ms.max(1));
    let dashboard_task = {
        let dashboard = dashboard.clone();
        tokio::spawn(async move { dashboard.run(poll_interval).await })
    };

    let stop_after = async {
        match cli.seconds {
            Some(seconds) => tokio::time::sleep(Duration::from_secs(seconds)).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Interrupted, shutting down");
        }
        _ = stop_after => info!("Run time elapsed, shutting down"),
    }

    ingest_task.abort();
    dashboard_task.abort();

    if let Some(sensor_id) = &cli.history {
        let history = stream.history(sensor_id, Some(config.stream.history_limit));
        if history.is_empty() {
            println!("No readings for {}", sensor_id);
        }
        for reading in history {
            println!(
                "{} {} {:.3} {}",
                reading.timestamp.to_rfc3339(),
                reading.sensor_id,
                reading.value,
                reading.unit
            );
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&dashboard.rows())?);
    }

    let stats = stream.stats();
    info!(
        "Ingested {} readings from {} sensors ({} evicted)",
        stats.ingested, stats.sensors, stats.evicted
    );

    Ok(())
}

/// Load configuration from the CLI path or the default location, falling back to defaults
fn load_config(path: Option<&PathBuf>) -> AppConfig {
    match path {
        Some(path) => match AppConfig::load_from_path(path) {
            Ok(config) => {
                info!("Loaded configuration from: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to load config file '{}': {:#}", path.display(), e);
                AppConfig::default()
            }
        },
        None => match AppConfig::load() {
            Ok(config) => {
                info!("Loaded configuration from disk");
                config
            }
            Err(e) => {
                warn!("Failed to load config, using defaults: {:#}", e);
                AppConfig::default()
            }
        },
    }
}
