use chrono::NaiveDate;
use crate::errors::ValidationError;
use crate::models::fitted_model::FeatureSchema;
use crate::models::weather_record::WeatherInput;

/// Checks that a date range is not reversed
///
/// # Arguments
///
/// * 'start' - first date of the range
/// * 'end' - last date of the range
pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start > end {
        Err(ValidationError(format!("End date {} must be after start date {}", end, start)))
    } else {
        Ok(())
    }
}

/// Checks that a date to predict for lies after the historical data
///
/// # Arguments
///
/// * 'date' - the requested date
/// * 'last_historical' - the last date in the dataset
pub fn check_future_date(date: NaiveDate, last_historical: NaiveDate) -> Result<(), ValidationError> {
    if date <= last_historical {
        Err(ValidationError(format!(
            "Please select a future date after the last date in the dataset ({})", last_historical)))
    } else {
        Ok(())
    }
}

/// Checks measurements of a multi feature prediction request against
/// physical limits and the categories the model knows
///
/// # Arguments
///
/// * 'input' - the requested measurements
/// * 'schema' - schema of the model that will do the prediction
pub fn check_weather_input(input: &WeatherInput, schema: &FeatureSchema) -> Result<(), ValidationError> {
    let values = [
        ("precipitation", input.precipitation),
        ("humidity", input.humidity),
        ("wind speed", input.wind_speed),
    ];
    if let Some((name, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
        return Err(ValidationError(format!("{} must be a number", name)));
    }

    if input.precipitation < 0.0 {
        Err("precipitation must be zero or more")?
    }
    if !(0.0..=100.0).contains(&input.humidity) {
        Err("humidity must be between 0 and 100")?
    }
    if input.wind_speed < 0.0 {
        Err("wind speed must be zero or more")?
    }

    let categories = schema.categories();
    if !categories.contains(&input.condition.as_str()) {
        return Err(ValidationError(format!(
            "unknown weather condition '{}', expected one of: {}", input.condition, categories.join(", "))));
    }

    Ok(())
}
