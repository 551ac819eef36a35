use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current version of the persisted feature schema layout
pub const SCHEMA_VERSION: u32 = 1;

pub const DATE_ORDINAL: &str = "date_ordinal";
pub const PRECIPITATION: &str = "precipitation";
pub const HUMIDITY: &str = "humidity";
pub const WIND_SPEED: &str = "wind_speed";
pub const CONDITION_PREFIX: &str = "condition_";

/// Which inputs a model predicts from
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// The date's ordinal day number is the only regressor
    #[default]
    Date,
    /// Precipitation, humidity, wind speed and a one-hot encoded weather condition
    Weather,
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchemaKind::Date    => write!(f, "date"),
            SchemaKind::Weather => write!(f, "weather"),
        }
    }
}

/// The ordered list of columns a model was trained against.
///
/// A linear model's coefficients are positional, so every feature vector handed
/// to a model must follow exactly this order.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct FeatureSchema {
    pub version: u32,
    pub kind: SchemaKind,
    pub columns: Vec<String>,
}

impl FeatureSchema {
    /// Returns the single column schema used by the date only variant
    pub fn date_only() -> FeatureSchema {
        FeatureSchema {
            version: SCHEMA_VERSION,
            kind: SchemaKind::Date,
            columns: vec![DATE_ORDINAL.to_string()],
        }
    }

    /// Returns the multi feature schema, one indicator column per category
    ///
    /// # Arguments
    ///
    /// * 'categories' - weather conditions observed during training, in column order
    pub fn weather(categories: &[String]) -> FeatureSchema {
        let mut columns = vec![PRECIPITATION.to_string(), HUMIDITY.to_string(), WIND_SPEED.to_string()];
        columns.extend(categories.iter().map(|c| condition_column(c)));

        FeatureSchema {
            version: SCHEMA_VERSION,
            kind: SchemaKind::Weather,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns the weather conditions this schema has indicator columns for
    pub fn categories(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter_map(|c| c.strip_prefix(CONDITION_PREFIX))
            .collect()
    }
}

/// Returns the name of the indicator column for a weather condition
///
/// # Arguments
///
/// * 'condition' - the weather condition category
pub fn condition_column(condition: &str) -> String {
    format!("{}{}", CONDITION_PREFIX, condition)
}

/// Coefficients and intercept of an ordinary least squares fit together with
/// the schema the coefficients line up with
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FittedModel {
    pub schema: FeatureSchema,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub samples: usize,
    pub trained_at: DateTime<Utc>,
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for FittedModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} model trained {} on {} samples, intercept {:0.6}",
               self.schema.kind, self.trained_at.format("%Y-%m-%d %H:%M:%S"), self.samples, self.intercept)?;
        for (column, coefficient) in self.schema.columns.iter().zip(&self.coefficients) {
            write!(f, "\n  {:<24} {:>14.8}", column, coefficient)?;
        }

        Ok(())
    }
}
