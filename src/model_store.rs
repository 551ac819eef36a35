use std::fs;
use std::path::Path;
use crate::errors::{DimensionMismatchError, ModelError, ModelNotFoundError};
use crate::models::fitted_model::{FittedModel, SCHEMA_VERSION};

/// Saves a fitted model together with its feature schema
///
/// # Arguments
///
/// * 'model_path' - the file to save to, missing parent directories are created
/// * 'model' - the model to save
pub fn save_model(model_path: &str, model: &FittedModel) -> Result<(), ModelError> {
    if let Some(parent) = Path::new(model_path).parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(model)?;
    fs::write(model_path, json)?;

    Ok(())
}

/// Loads a fitted model and checks that its coefficients line up with its schema
///
/// # Arguments
///
/// * 'model_path' - the file to load from
pub fn load_model(model_path: &str) -> Result<FittedModel, ModelError> {
    let path = Path::new(model_path);
    if !path.exists() {
        Err(ModelNotFoundError(model_path.to_string()))?
    }

    let json = fs::read_to_string(path)?;
    let model: FittedModel = serde_json::from_str(&json)?;

    if model.schema.version != SCHEMA_VERSION {
        return Err(ModelError::Version(model.schema.version));
    }
    if model.coefficients.len() != model.schema.len() {
        Err(DimensionMismatchError { expected: model.schema.len(), actual: model.coefficients.len() })?
    }

    Ok(model)
}
