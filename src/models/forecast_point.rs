use std::fmt;
use chrono::NaiveDate;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_temperature: f64,
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for ForecastPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {:>7.2}", self.date, self.predicted_temperature)
    }
}
