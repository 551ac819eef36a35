use std::cell::OnceCell;
use log::info;
use crate::config::Files;
use crate::data_loader::load_records;
use crate::errors::{DataFormatError, ModelError};
use crate::model_store::load_model;
use crate::models::fitted_model::FittedModel;
use crate::models::weather_record::WeatherRecord;

/// Holds the historical records and the fitted model for the lifetime of the process.
///
/// Each is loaded on first use and kept afterwards, a failed load is retried on
/// the next call. Changed files are only picked up by a new process.
pub struct Session {
    data_file: String,
    model_file: String,
    records: OnceCell<Vec<WeatherRecord>>,
    model: OnceCell<FittedModel>,
}

impl Session {
    /// Returns a session that loads from the configured files
    ///
    /// # Arguments
    ///
    /// * 'files' - file section of the configuration
    pub fn new(files: &Files) -> Session {
        Session {
            data_file: files.data_file.clone(),
            model_file: files.model_file.clone(),
            records: OnceCell::new(),
            model: OnceCell::new(),
        }
    }

    /// Returns a session already holding the given records and, optionally, model
    ///
    /// # Arguments
    ///
    /// * 'records' - historical records sorted by date
    /// * 'model' - a fitted model, if None then model() will look for the model file
    #[cfg(test)]
    pub fn with_fixtures(records: Vec<WeatherRecord>, model: Option<FittedModel>) -> Session {
        Session {
            data_file: String::new(),
            model_file: String::new(),
            records: OnceCell::from(records),
            model: match model {
                Some(m) => OnceCell::from(m),
                None => OnceCell::new(),
            },
        }
    }

    pub fn model_file(&self) -> &str {
        &self.model_file
    }

    /// Returns the historical records, loading them on first call
    pub fn records(&self) -> Result<&[WeatherRecord], DataFormatError> {
        if let Some(records) = self.records.get() {
            return Ok(records);
        }

        let loaded = load_records(&self.data_file)?;
        info!("loaded {} records from {}", loaded.len(), self.data_file);

        Ok(self.records.get_or_init(|| loaded))
    }

    /// Returns the fitted model, loading it on first call
    pub fn model(&self) -> Result<&FittedModel, ModelError> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        let loaded = load_model(&self.model_file)?;
        info!("loaded {} model from {}", loaded.schema.kind, self.model_file);

        Ok(self.model.get_or_init(|| loaded))
    }
}
