use std::fs::File;
use std::io::Read;
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use crate::errors::{DataFormatError, ValidationError};
use crate::models::weather_record::WeatherRecord;
use crate::validation::check_range;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Positions of the recognised columns in the header row
struct Columns {
    date: usize,
    temperature: usize,
    precipitation: Option<usize>,
    humidity: Option<usize>,
    wind_speed: Option<usize>,
    condition: Option<usize>,
}

impl Columns {
    /// Locates the recognised columns, header names are matched case-insensitively
    ///
    /// # Arguments
    ///
    /// * 'headers' - the header row of the dataset
    fn from_headers(headers: &StringRecord) -> Result<Columns, DataFormatError> {
        let find = |names: &[&str]| headers
            .iter()
            .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)));

        Ok(Columns {
            date: find(&["date"])
                .ok_or(DataFormatError("missing date column".to_string()))?,
            temperature: find(&["temperature", "temp"])
                .ok_or(DataFormatError("missing temperature column".to_string()))?,
            precipitation: find(&["precipitation"]),
            humidity: find(&["humidity"]),
            wind_speed: find(&["wind_speed", "windspeed", "wind speed"]),
            condition: find(&["condition", "weather_condition", "weather"]),
        })
    }
}

/// Loads historical weather records from a CSV file and sorts them by date
///
/// # Arguments
///
/// * 'data_path' - path to the CSV file
pub fn load_records(data_path: &str) -> Result<Vec<WeatherRecord>, DataFormatError> {
    let file = File::open(data_path)
        .map_err(|e| DataFormatError(format!("unable to open {}: {}", data_path, e)))?;

    read_records(file)
}

/// Reads historical weather records from any CSV source and sorts them by date.
/// Records sharing a date keep their order from the source.
///
/// # Arguments
///
/// * 'reader' - the CSV source, a header row is expected
pub fn read_records<R: Read>(reader: R) -> Result<Vec<WeatherRecord>, DataFormatError> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;

    let mut records: Vec<WeatherRecord> = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map_or(0, |p| p.line());

        let date_field = row.get(columns.date).unwrap_or_default();
        let date = parse_date(date_field)
            .ok_or_else(|| DataFormatError(format!("line {}: unparsable date '{}'", line, date_field)))?;

        let temperature_field = row.get(columns.temperature).unwrap_or_default();
        let temperature = parse_number(temperature_field, "temperature", line)?;

        records.push(WeatherRecord {
            precipitation: optional_number(&row, columns.precipitation, "precipitation", line)?,
            humidity: optional_number(&row, columns.humidity, "humidity", line)?,
            wind_speed: optional_number(&row, columns.wind_speed, "wind speed", line)?,
            condition: columns.condition
                .and_then(|i| row.get(i))
                .filter(|c| !c.is_empty())
                .map(|c| c.to_string()),
            ..WeatherRecord::new(date, temperature)
        });
    }

    if records.is_empty() {
        return Err(DataFormatError("dataset contains no records".to_string()));
    }

    records.sort_by_key(|r| r.date);

    Ok(records)
}

/// Returns the records with a date within the given range, both ends included
///
/// # Arguments
///
/// * 'records' - records sorted by date
/// * 'start' - first date to include
/// * 'end' - last date to include
pub fn filter_range(records: &[WeatherRecord], start: NaiveDate, end: NaiveDate) -> Result<Vec<WeatherRecord>, ValidationError> {
    check_range(start, end)?;

    Ok(records
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .cloned()
        .collect())
}

/// Returns at most the first n records
///
/// # Arguments
///
/// * 'records' - records sorted by date
/// * 'n' - number of records to show
pub fn preview(records: &[WeatherRecord], n: usize) -> &[WeatherRecord] {
    &records[..n.min(records.len())]
}

/// Returns the earliest and latest date among the records
///
/// # Arguments
///
/// * 'records' - records sorted by date
pub fn date_span(records: &[WeatherRecord]) -> Option<(NaiveDate, NaiveDate)> {
    Some((records.first()?.date, records.last()?.date))
}

/// Parses a calendar date, a date time is accepted in which case the time is dropped
///
/// # Arguments
///
/// * 'field' - the date field as written in the dataset
fn parse_date(field: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(field, f).ok())
        .or_else(|| DATE_TIME_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(field, f).ok())
            .map(|dt| dt.date()))
}

/// Parses a numeric cell, NaN and infinities are refused since they poison a fit
///
/// # Arguments
///
/// * 'field' - the cell as written in the dataset
/// * 'name' - column name used in error messages
/// * 'line' - line number used in error messages
fn parse_number(field: &str, name: &str, line: u64) -> Result<f64, DataFormatError> {
    let value = field.parse::<f64>()
        .map_err(|_| DataFormatError(format!("line {}: unparsable {} '{}'", line, name, field)))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(DataFormatError(format!("line {}: non-finite {} '{}'", line, name, field)))
    }
}

/// Parses an optional numeric cell, an empty cell or a missing column gives None
///
/// # Arguments
///
/// * 'row' - the current row
/// * 'column' - position of the column if it exists in the dataset
/// * 'name' - column name used in error messages
/// * 'line' - line number used in error messages
fn optional_number(row: &StringRecord, column: Option<usize>, name: &str, line: u64) -> Result<Option<f64>, DataFormatError> {
    column
        .and_then(|i| row.get(i))
        .filter(|v| !v.is_empty())
        .map(|v| parse_number(v, name, line))
        .transpose()
}
