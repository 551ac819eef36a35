use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::models::fitted_model::SchemaKind;

#[derive(Deserialize, Debug)]
pub struct Files {
    pub data_file: String,
    pub model_file: String,
}

#[derive(Deserialize, Default, Debug)]
pub struct ModelParameters {
    #[serde(default)]
    pub features: SchemaKind,
}

#[derive(Deserialize, Debug)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub files: Files,
    #[serde(default)]
    pub model: ModelParameters,
    pub general: General,
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {

    let toml = fs::read_to_string(config_path)
        .map_err(|e| ConfigError(format!("unable to read {}: {}", config_path, e)))?;
    let config: Config = toml::from_str(&toml)?;

    if config.files.data_file.is_empty() {
        return Err(ConfigError::from("data_file must not be empty"));
    }
    if config.files.model_file.is_empty() {
        return Err(ConfigError::from("model_file must not be empty"));
    }

    Ok(config)
}
