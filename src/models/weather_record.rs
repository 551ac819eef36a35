use std::fmt;
use chrono::NaiveDate;

/// One row of the historical dataset
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub temperature: f64,
    pub precipitation: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub condition: Option<String>,
}

impl WeatherRecord {
    /// Returns a record carrying only date and temperature
    ///
    /// # Arguments
    ///
    /// * 'date' - the date of the record
    /// * 'temperature' - the recorded temperature
    pub fn new(date: NaiveDate, temperature: f64) -> WeatherRecord {
        WeatherRecord {
            date,
            temperature,
            precipitation: None,
            humidity: None,
            wind_speed: None,
            condition: None,
        }
    }
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for WeatherRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let opt = |v: Option<f64>| v.map_or("-".to_string(), |v| format!("{:0.1}", v));
        write!(f, "{} {:>6.1} {:>6} {:>6} {:>6} {}",
               self.date, self.temperature, opt(self.precipitation), opt(self.humidity),
               opt(self.wind_speed), self.condition.as_deref().unwrap_or("-"))
    }
}

/// Measurements supplied by a multi feature prediction request
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherInput {
    pub precipitation: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub condition: String,
}
