use thiserror::Error;

/// Error depicting errors that occur while loading the configuration
///
#[derive(Error, Debug)]
#[error("ConfigError: {0}")]
pub struct ConfigError(pub String);
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self { ConfigError(e.to_string()) }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self { ConfigError(e.to_string()) }
}
impl From<&str> for ConfigError {
    fn from(e: &str) -> Self { ConfigError(e.to_string()) }
}

/// Error depicting errors that occur while setting up the logger
///
#[derive(Error, Debug)]
#[error("LoggingError: {0}")]
pub struct LoggingError(pub String);
impl From<std::io::Error> for LoggingError {
    fn from(e: std::io::Error) -> Self { LoggingError(e.to_string()) }
}
impl From<log::SetLoggerError> for LoggingError {
    fn from(e: log::SetLoggerError) -> Self { LoggingError(e.to_string()) }
}

/// Error depicting a malformed or incomplete historical dataset
///
#[derive(Error, Debug)]
#[error("DataFormatError: {0}")]
pub struct DataFormatError(pub String);
impl From<std::io::Error> for DataFormatError {
    fn from(e: std::io::Error) -> Self { DataFormatError(format!("read error: {}", e)) }
}
impl From<csv::Error> for DataFormatError {
    fn from(e: csv::Error) -> Self { DataFormatError(format!("csv error: {}", e)) }
}

/// Error depicting user supplied values that break stated constraints
///
#[derive(Error, Debug, PartialEq)]
#[error("{0}")]
pub struct ValidationError(pub String);
impl From<&str> for ValidationError {
    fn from(e: &str) -> Self { ValidationError(e.to_string()) }
}

/// Error depicting a feature vector that doesn't match the model it is fed to
///
#[derive(Error, Debug, PartialEq)]
#[error("DimensionMismatchError: expected {expected} features, got {actual}")]
pub struct DimensionMismatchError {
    pub expected: usize,
    pub actual: usize,
}

/// Error depicting a persisted model file that doesn't exist
///
#[derive(Error, Debug)]
#[error("model not found: {0}")]
pub struct ModelNotFoundError(pub String);

/// Errors from saving or loading a fitted model
///
#[derive(Error, Debug)]
pub enum ModelError {
    #[error(transparent)]
    NotFound(#[from] ModelNotFoundError),
    #[error("ModelError::Document: {0}")]
    Document(String),
    #[error("ModelError::Version: unsupported feature schema version {0}")]
    Version(u32),
    #[error(transparent)]
    Dimension(#[from] DimensionMismatchError),
}
impl From<std::io::Error> for ModelError {
    fn from(e: std::io::Error) -> Self { ModelError::Document(e.to_string()) }
}
impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self { ModelError::Document(e.to_string()) }
}

/// Error depicting that a model couldn't be fitted to the given samples
///
#[derive(Error, Debug)]
#[error("TrainingError: {0}")]
pub struct TrainingError(pub String);
impl From<&str> for TrainingError {
    fn from(e: &str) -> Self { TrainingError(e.to_string()) }
}

/// Errors from generating a forecast series
///
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("ForecastError::InvalidRange: {0}")]
    InvalidRange(String),
    #[error("ForecastError::UnsupportedSchema: {0}")]
    UnsupportedSchema(String),
    #[error(transparent)]
    Dimension(#[from] DimensionMismatchError),
}
