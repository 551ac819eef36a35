use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{error, info};
use crate::config::load_config;
use crate::errors::{ModelError, ValidationError};
use crate::logging::setup_logger;
use crate::models::weather_record::WeatherInput;
use crate::session::Session;

mod commands;
mod config;
mod data_loader;
mod errors;
mod feature_encoder;
mod forecast;
mod logging;
mod model_store;
mod models;
mod predictor;
mod session;
mod validation;

#[derive(Parser)]
#[command(version, about = "Historical weather records and temperature prediction")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "WEATHERCAST_CONFIG", default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a model on the historical dataset and save it
    Train,
    /// Show the dataset and the temperature series within a date range
    History {
        /// First date to show (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last date to show (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Number of leading rows to show
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
    /// Predict the temperature for a date after the dataset
    Predict {
        /// The date to predict for (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// Predict the temperature from weather measurements
    PredictWeather {
        #[arg(long)]
        precipitation: f64,
        #[arg(long)]
        humidity: f64,
        #[arg(long)]
        wind_speed: f64,
        #[arg(long)]
        condition: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    setup_logger(&config.general)?;
    info!("weathercast version: {}", env!("CARGO_PKG_VERSION"));

    let session = Session::new(&config.files);

    let result = match cli.command {
        Command::Train => commands::train(&config, &session),
        Command::History { start, end, rows } => commands::history(&session, start, end, rows),
        Command::Predict { date } => commands::predict_date(&session, date),
        Command::PredictWeather { precipitation, humidity, wind_speed, condition } => {
            let input = WeatherInput { precipitation, humidity, wind_speed, condition };
            commands::predict_weather(&session, input)
        }
    };

    // Validation failures and a missing model are reported, not fatal
    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            if let Some(v) = e.downcast_ref::<ValidationError>() {
                commands::report_validation(v);
                Ok(())
            } else if let Some(ModelError::NotFound(_)) = e.downcast_ref::<ModelError>() {
                commands::report_model_not_found(session.model_file());
                Ok(())
            } else {
                error!("{:#}", e);
                Err(e)
            }
        }
    }
}
