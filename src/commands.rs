use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use log::{info, warn};
use crate::config::Config;
use crate::data_loader::{date_span, filter_range, preview};
use crate::errors::ValidationError;
use crate::feature_encoder::{encode, FeatureInput};
use crate::forecast::generate;
use crate::model_store::save_model;
use crate::models::fitted_model::SchemaKind;
use crate::models::forecast_point::ForecastPoint;
use crate::models::weather_record::WeatherInput;
use crate::predictor::{predict, score, train_on_records};
use crate::session::Session;
use crate::validation::{check_future_date, check_weather_input};

/// Trains a model of the configured feature variant on the dataset and saves it
///
/// # Arguments
///
/// * 'config' - the configuration
/// * 'session' - session holding the dataset
pub fn train(config: &Config, session: &Session) -> Result<()> {
    let records = session.records()?;
    let model = train_on_records(config.model.features, records)?;

    let vectors: Vec<Vec<f64>> = records
        .iter()
        .map(|r| encode(&FeatureInput::Record(r), &model.schema))
        .collect();
    let targets: Vec<f64> = records.iter().map(|r| r.temperature).collect();
    let r2 = score(&model, &vectors, &targets)?;

    save_model(&config.files.model_file, &model)
        .with_context(|| format!("saving model to {}", config.files.model_file))?;
    info!("model saved to {}, R² {:0.4}", config.files.model_file, r2);

    print_msg(&format!("{}\nR² on training data: {:0.4}", model, r2), "Model trained");

    Ok(())
}

/// Shows the first rows of the dataset and the temperature series within a date range
///
/// # Arguments
///
/// * 'session' - session holding the dataset
/// * 'start' - first date, defaults to the earliest date in the dataset
/// * 'end' - last date, defaults to the latest date in the dataset
/// * 'rows' - number of leading rows to show
pub fn history(session: &Session, start: Option<NaiveDate>, end: Option<NaiveDate>, rows: usize) -> Result<()> {
    let records = session.records()?;
    let (first, last) = date_span(records).context("dataset is empty")?;

    let head = preview(records, rows)
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<String>>()
        .join("\n");
    print_msg(&format!("date        temp  precip  humid   wind condition\n{}", head),
              &format!("First {} rows of the dataset", rows));

    let filtered = filter_range(records, start.unwrap_or(first), end.unwrap_or(last))?;
    let series = filtered
        .iter()
        .map(|r| format!("{} {:>7.2}", r.date, r.temperature))
        .collect::<Vec<String>>()
        .join("\n");
    print_msg(&series, &format!("Historical temperature, {} records", filtered.len()));

    Ok(())
}

/// Predicts the temperature for a future date and shows the forecast series
/// from the earliest historical date through that date
///
/// # Arguments
///
/// * 'session' - session holding dataset and model
/// * 'date' - the date to predict for
pub fn predict_date(session: &Session, date: NaiveDate) -> Result<()> {
    let records = session.records()?;
    let (_, last) = date_span(records).context("dataset is empty")?;
    check_future_date(date, last)?;

    let model = session.model()?;
    if model.schema.kind != SchemaKind::Date {
        Err(ValidationError(format!(
            "the model at {} predicts from weather measurements, use predict-weather", session.model_file())))?
    }
    let points = generate(model, records, date)?
        .collect::<Result<Vec<ForecastPoint>, _>>()?;
    let predicted = points
        .last()
        .map(|p| p.predicted_temperature)
        .context("empty forecast series")?;

    let series = points
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<String>>()
        .join("\n");
    print_msg(&series, "Temperature trend with forecast");
    print_msg(&format!("Predicted Temperature on {}: {:0.2}°C", date, predicted), "Prediction");

    Ok(())
}

/// Predicts the temperature from weather measurements
///
/// # Arguments
///
/// * 'session' - session holding the model
/// * 'input' - the measurements
pub fn predict_weather(session: &Session, input: WeatherInput) -> Result<()> {
    let model = session.model()?;
    if model.schema.kind != SchemaKind::Weather {
        Err(ValidationError(format!(
            "the model at {} predicts from the date only, use predict <DATE>", session.model_file())))?
    }
    check_weather_input(&input, &model.schema)?;

    let vector = encode(&FeatureInput::Weather(&input), &model.schema);
    let predicted = predict(model, &vector)?;

    print_msg(&format!("Predicted Temperature: {:0.2}°C", predicted), "Prediction");

    Ok(())
}

/// Reports a validation failure, nothing has been computed
///
/// # Arguments
///
/// * 'e' - the validation error
pub fn report_validation(e: &ValidationError) {
    warn!("validation failed: {}", e);
    print_msg(&format!("⚠️ {}", e), "Validation");
}

/// Reports that no model is available, prediction is disabled until one is trained
///
/// # Arguments
///
/// * 'model_file' - where the model was looked for
pub fn report_model_not_found(model_file: &str) {
    warn!("model not found at {}", model_file);
    print_msg(&format!("model not found: {}\nrun the train command to create it", model_file), "Model");
}

/// Prints a message with a time stamped caption
///
/// # Arguments
///
/// * 'message' - the message
/// * 'caption' - caption to print above the message
fn print_msg(message: &str, caption: &str) {
    let report_time = format!("{}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    let caption = format!("{} {} ", report_time, caption);

    println!("{:=<80}\n{}\n", caption, message);
}
