use std::collections::{BTreeSet, HashMap};
use chrono::{Datelike, NaiveDate};
use crate::models::fitted_model::{condition_column, FeatureSchema, SchemaKind, DATE_ORDINAL, HUMIDITY, PRECIPITATION, WIND_SPEED};
use crate::models::weather_record::{WeatherInput, WeatherRecord};

/// Raw input that can be turned into a feature vector
pub enum FeatureInput<'a> {
    Date(NaiveDate),
    Record(&'a WeatherRecord),
    Weather(&'a WeatherInput),
}

/// Returns the proleptic Gregorian day number of a date, 0001-01-01 being day 1
///
/// # Arguments
///
/// * 'date' - the date to convert
pub fn ordinal(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

/// Derives the training schema for the given variant from the dataset.
/// For the weather variant one indicator column is added per distinct
/// condition, sorted by name.
///
/// # Arguments
///
/// * 'kind' - the feature variant to train
/// * 'records' - the training records
pub fn schema_for(kind: SchemaKind, records: &[WeatherRecord]) -> FeatureSchema {
    match kind {
        SchemaKind::Date => FeatureSchema::date_only(),
        SchemaKind::Weather => {
            let categories = records
                .iter()
                .filter_map(|r| r.condition.clone())
                .collect::<BTreeSet<String>>()
                .into_iter()
                .collect::<Vec<String>>();

            FeatureSchema::weather(&categories)
        }
    }
}

/// Returns the natural encoding of an input, i.e. every column the input
/// itself can provide. Absent measurements provide no column.
///
/// # Arguments
///
/// * 'input' - the raw input
pub fn raw_encoding(input: &FeatureInput) -> HashMap<String, f64> {
    let mut raw: HashMap<String, f64> = HashMap::new();

    match input {
        FeatureInput::Date(date) => {
            raw.insert(DATE_ORDINAL.to_string(), ordinal(*date) as f64);
        }
        FeatureInput::Record(record) => {
            raw.insert(DATE_ORDINAL.to_string(), ordinal(record.date) as f64);
            let measurements = [
                (PRECIPITATION, record.precipitation),
                (HUMIDITY, record.humidity),
                (WIND_SPEED, record.wind_speed),
            ];
            for (name, value) in measurements {
                if let Some(v) = value {
                    raw.insert(name.to_string(), v);
                }
            }
            if let Some(condition) = &record.condition {
                raw.insert(condition_column(condition), 1.0);
            }
        }
        FeatureInput::Weather(weather) => {
            raw.insert(PRECIPITATION.to_string(), weather.precipitation);
            raw.insert(HUMIDITY.to_string(), weather.humidity);
            raw.insert(WIND_SPEED.to_string(), weather.wind_speed);
            raw.insert(condition_column(&weather.condition), 1.0);
        }
    }

    raw
}

/// Encodes an input into a feature vector laid out exactly as the schema.
/// Schema columns the input doesn't provide are 0, columns the schema doesn't
/// know are dropped. An unseen weather condition thus encodes as all zeros.
///
/// # Arguments
///
/// * 'input' - the raw input
/// * 'schema' - the schema the vector must match
pub fn encode(input: &FeatureInput, schema: &FeatureSchema) -> Vec<f64> {
    let raw = raw_encoding(input);

    schema.columns
        .iter()
        .map(|c| raw.get(c).copied().unwrap_or(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(condition: Option<&str>, humidity: Option<f64>) -> WeatherRecord {
        WeatherRecord {
            date: date(2023, 1, 1),
            temperature: 5.0,
            precipitation: Some(0.5),
            humidity,
            wind_speed: Some(3.0),
            condition: condition.map(|c| c.to_string()),
        }
    }

    #[test]
    fn ordinal_counts_from_year_one() {
        assert_eq!(ordinal(date(1, 1, 1)), 1);
        assert_eq!(ordinal(date(2023, 1, 1)), 738521);
        assert_eq!(ordinal(date(2023, 1, 2)) - ordinal(date(2023, 1, 1)), 1);
    }

    #[test]
    fn date_encoding_is_single_ordinal_column() {
        let schema = FeatureSchema::date_only();
        let vector = encode(&FeatureInput::Date(date(2023, 1, 1)), &schema);
        assert_eq!(vector, vec![738521.0]);

        // extra measurements of a record are dropped
        let r = record(Some("Sunny"), Some(60.0));
        assert_eq!(encode(&FeatureInput::Record(&r), &schema), vec![738521.0]);
    }

    #[test]
    fn schema_for_weather_collects_sorted_categories() {
        let records = vec![record(Some("Sunny"), None), record(Some("Cloudy"), None), record(None, None), record(Some("Sunny"), None)];
        let schema = schema_for(SchemaKind::Weather, &records);

        assert_eq!(schema.categories(), vec!["Cloudy", "Sunny"]);
        assert_eq!(schema_for(SchemaKind::Date, &records), FeatureSchema::date_only());
    }

    #[test]
    fn weather_encoding_follows_schema_order() {
        let schema = FeatureSchema::weather(&["Cloudy".to_string(), "Rainy".to_string(), "Sunny".to_string()]);
        let input = WeatherInput { precipitation: 1.5, humidity: 70.0, wind_speed: 4.0, condition: "Rainy".to_string() };

        let vector = encode(&FeatureInput::Weather(&input), &schema);
        assert_eq!(vector, vec![1.5, 70.0, 4.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn absent_columns_encode_as_zero() {
        let schema = FeatureSchema::weather(&["Sunny".to_string()]);

        let unseen = WeatherInput { precipitation: 0.0, humidity: 50.0, wind_speed: 1.0, condition: "Hail".to_string() };
        let vector = encode(&FeatureInput::Weather(&unseen), &schema);
        assert_eq!(vector.len(), schema.len());
        assert_eq!(vector[3], 0.0);

        let r = record(None, None);
        let vector = encode(&FeatureInput::Record(&r), &schema);
        assert_eq!(vector, vec![0.5, 0.0, 3.0, 0.0]);
    }

    #[test]
    fn output_length_always_matches_schema() {
        let schemas = [
            FeatureSchema::date_only(),
            FeatureSchema::weather(&[]),
            FeatureSchema::weather(&["A".to_string(), "B".to_string(), "C".to_string()]),
        ];
        let r = record(Some("B"), Some(10.0));
        let input = WeatherInput { precipitation: 0.0, humidity: 0.0, wind_speed: 0.0, condition: "Z".to_string() };

        for schema in &schemas {
            assert_eq!(encode(&FeatureInput::Date(date(2020, 2, 29)), schema).len(), schema.len());
            assert_eq!(encode(&FeatureInput::Record(&r), schema).len(), schema.len());
            assert_eq!(encode(&FeatureInput::Weather(&input), schema).len(), schema.len());
        }
    }
}
