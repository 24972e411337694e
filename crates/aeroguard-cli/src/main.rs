use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aeroguard_core::{CandidateRoutePair, WindObservation};

mod app;
mod config;
mod console;
mod render;

use app::{App, WindSource};
use config::AppConfig;

/// AeroGuard - verified upwind evacuation routing for wildfire sectors
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: $AEROGUARD_CONFIG or ./aeroguard.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured sectors
    Sectors {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the safe and unsafe candidate routes for a wind bearing
    Routes {
        #[arg(short, long)]
        sector: String,
        /// Wind source bearing in degrees (default: sector default)
        #[arg(short, long)]
        bearing: Option<f64>,
    },

    /// Fetch current fire and wind telemetry for a sector
    Telemetry {
        #[arg(short, long)]
        sector: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one propose/verify decision cycle
    Run {
        #[arg(short, long)]
        sector: String,
        /// Wind source bearing override, 0-360
        #[arg(short, long)]
        bearing: Option<f64>,
        /// Wind speed override in km/h, 0-100
        #[arg(long)]
        speed: Option<f64>,
        /// Use Open-Meteo current wind instead of the sector default
        #[arg(long, conflicts_with_all = ["bearing", "speed"])]
        live_wind: bool,
        /// Output the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive operator console
    Console {
        /// Starting sector (default: first configured)
        #[arg(short, long)]
        sector: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(cli.verbose)
                .without_time(),
        )
        .init();

    let config = AppConfig::load(cli.config.as_deref())?;
    let app = App::from_config(&config)?;

    match cli.command {
        Commands::Sectors { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&app.registry)?);
            } else {
                println!("{}", "Sectors".bold().cyan());
                for sector in app.registry.iter() {
                    println!(
                        "  {:<16} {} ({:.2}, {:.2}) wind {:.0}°/{:.0} {}",
                        sector.id.bold(),
                        sector.name,
                        sector.latitude,
                        sector.longitude,
                        sector.default_wind_bearing,
                        sector.default_wind_speed,
                        sector.intensity.dimmed()
                    );
                }
            }
        }
        Commands::Routes { sector, bearing } => {
            let sector = app.registry.get(&sector)?;
            let bearing = bearing.unwrap_or(sector.default_wind_bearing);
            let wind = WindObservation::from_operator(bearing, 0.0)?;
            let candidates = CandidateRoutePair::resolve(&wind, &sector.routes);
            println!("{} {}", "SECTOR:".bold(), sector.name);
            println!(
                "{} {:.0}° ({})",
                "WIND SOURCE:".bold(),
                wind.bearing_degrees(),
                candidates.safe_octant
            );
            println!("{}", render::candidates_block(&candidates));
        }
        Commands::Telemetry { sector, json } => {
            let sector = app.registry.get(&sector)?;
            let fire = app.gateway.latest_fire().await;
            let wind = app
                .gateway
                .current_wind(sector.latitude, sector.longitude)
                .await;
            if json {
                let value = serde_json::json!({
                    "sector": sector.id,
                    "fire": fire,
                    "wind": wind,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} {}", "SECTOR:".bold(), sector.name);
                println!("{}", render::fire_line(fire.as_ref()));
                println!("{}", render::wind_line(&wind));
            }
        }
        Commands::Run {
            sector,
            bearing,
            speed,
            live_wind,
            json,
        } => {
            let sector = app.registry.get(&sector)?;
            let source = WindSource::from_args(sector, bearing, speed, live_wind)?;
            let wind = app.wind_for(sector, source).await;
            let outcome = app.pipeline.run(sector, wind).await;
            let at = chrono::Utc::now();
            if json {
                let value = render::outcome_json(&outcome, at);
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", render::outcome_text(sector, &outcome, at));
            }
        }
        Commands::Console { sector } => {
            let start = match sector {
                Some(sector) => sector,
                None => app.registry.first().id.clone(),
            };
            console::run_console(Arc::new(app), &start).await?;
        }
    }

    Ok(())
}
