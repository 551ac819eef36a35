use chrono::Utc;
use nalgebra::{DMatrix, DVector};
use crate::errors::{DimensionMismatchError, TrainingError};
use crate::feature_encoder::{encode, schema_for, FeatureInput};
use crate::models::fitted_model::{FeatureSchema, FittedModel, SchemaKind};
use crate::models::weather_record::WeatherRecord;

/// Singular values below this fraction of the largest one are treated as zero,
/// i.e. the direction is constant or a linear combination of other columns
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Fits an ordinary least squares linear regression.
///
/// The mean centred design matrix is decomposed with an SVD and solved for
/// the minimum norm least squares coefficients, so collinear columns like a
/// full one-hot set against the intercept don't make the fit fail.
///
/// # Arguments
///
/// * 'schema' - schema the feature vectors are laid out by
/// * 'vectors' - one feature vector per sample
/// * 'targets' - the observed temperature per sample
pub fn train(schema: FeatureSchema, vectors: &[Vec<f64>], targets: &[f64]) -> Result<FittedModel, TrainingError> {
    if vectors.is_empty() {
        Err("no samples to train on")?
    }
    if vectors.len() != targets.len() {
        return Err(TrainingError(format!("{} feature vectors but {} targets", vectors.len(), targets.len())));
    }
    let p = schema.len();
    if let Some(v) = vectors.iter().find(|v| v.len() != p) {
        return Err(TrainingError(format!("feature vector of length {} for a schema of {} columns", v.len(), p)));
    }
    if !targets.iter().chain(vectors.iter().flatten()).all(|v| v.is_finite()) {
        Err("samples contain non-finite values")?
    }

    let n = vectors.len();
    let x_mean: Vec<f64> = (0..p)
        .map(|j| vectors.iter().map(|v| v[j]).sum::<f64>() / n as f64)
        .collect();
    let y_mean = targets.iter().sum::<f64>() / n as f64;

    let x = DMatrix::from_fn(n, p, |i, j| vectors[i][j] - x_mean[j]);
    let y = DVector::from_iterator(n, targets.iter().map(|t| t - y_mean));

    let svd = x.svd(true, true);
    let eps = svd.singular_values.max() * SINGULAR_TOLERANCE;
    let solution = svd.solve(&y, eps.max(f64::MIN_POSITIVE))
        .map_err(|e| TrainingError(format!("least squares solve failed: {}", e)))?;

    let coefficients: Vec<f64> = solution.iter().copied().collect();
    let intercept = y_mean - coefficients.iter().zip(&x_mean).map(|(c, m)| c * m).sum::<f64>();

    Ok(FittedModel {
        schema,
        coefficients,
        intercept,
        samples: n,
        trained_at: Utc::now(),
    })
}

/// Derives a schema of the given variant from the records, encodes them and fits a model
///
/// # Arguments
///
/// * 'kind' - the feature variant to train
/// * 'records' - the historical records
pub fn train_on_records(kind: SchemaKind, records: &[WeatherRecord]) -> Result<FittedModel, TrainingError> {
    let schema = schema_for(kind, records);

    let vectors: Vec<Vec<f64>> = records
        .iter()
        .map(|r| encode(&FeatureInput::Record(r), &schema))
        .collect();
    let targets: Vec<f64> = records.iter().map(|r| r.temperature).collect();

    train(schema, &vectors, &targets)
}

/// Returns intercept + dot(coefficients, vector)
///
/// # Arguments
///
/// * 'model' - the fitted model
/// * 'vector' - feature vector laid out by the model's schema
pub fn predict(model: &FittedModel, vector: &[f64]) -> Result<f64, DimensionMismatchError> {
    if vector.len() != model.coefficients.len() {
        return Err(DimensionMismatchError { expected: model.coefficients.len(), actual: vector.len() });
    }

    Ok(model.intercept + model.coefficients.iter().zip(vector).map(|(c, x)| c * x).sum::<f64>())
}

/// Returns the coefficient of determination (R²) of the model over the samples.
/// A constant target gives 1.0 for a perfect fit and 0.0 otherwise.
///
/// # Arguments
///
/// * 'model' - the fitted model
/// * 'vectors' - one feature vector per sample
/// * 'targets' - the observed temperature per sample
pub fn score(model: &FittedModel, vectors: &[Vec<f64>], targets: &[f64]) -> Result<f64, DimensionMismatchError> {
    let n = targets.len().max(1) as f64;
    let y_mean = targets.iter().sum::<f64>() / n;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (v, y) in vectors.iter().zip(targets) {
        ss_res += (y - predict(model, v)?).powi(2);
        ss_tot += (y - y_mean).powi(2);
    }

    if ss_tot == 0.0 {
        Ok(if ss_res == 0.0 { 1.0 } else { 0.0 })
    } else {
        Ok(1.0 - ss_res / ss_tot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::feature_encoder::ordinal;
    use crate::models::weather_record::WeatherInput;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn close(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs().max(1.0)
    }

    #[test]
    fn recovers_noiseless_linear_trend() {
        let a = 0.0125;
        let b = -9000.0;
        let start = date(2020, 3, 1);
        let records: Vec<WeatherRecord> = (0..400)
            .map(|i| {
                let d = start + chrono::Days::new(i);
                WeatherRecord::new(d, a * ordinal(d) as f64 + b)
            })
            .collect();

        let model = train_on_records(SchemaKind::Date, &records).unwrap();

        assert!(close(model.coefficients[0], a, 1e-6), "slope {}", model.coefficients[0]);
        assert!(close(model.intercept, b, 1e-6), "intercept {}", model.intercept);
        assert_eq!(model.samples, 400);
    }

    #[test]
    fn three_day_trend_predicts_tenth_day() {
        let records = vec![
            WeatherRecord::new(date(2023, 1, 1), 10.0),
            WeatherRecord::new(date(2023, 1, 2), 12.0),
            WeatherRecord::new(date(2023, 1, 3), 14.0),
        ];
        let model = train_on_records(SchemaKind::Date, &records).unwrap();

        let vector = encode(&FeatureInput::Date(date(2023, 1, 10)), &model.schema);
        let predicted = predict(&model, &vector).unwrap();
        assert!((predicted - 28.0).abs() < 1e-6, "predicted {}", predicted);
    }

    #[test]
    fn predict_rejects_wrong_dimension() {
        let model = train(FeatureSchema::date_only(), &[vec![1.0], vec![2.0]], &[1.0, 2.0]).unwrap();

        let err = predict(&model, &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, DimensionMismatchError { expected: 1, actual: 2 });
    }

    #[test]
    fn training_input_is_checked() {
        let schema = FeatureSchema::date_only();
        assert!(train(schema.clone(), &[], &[]).is_err());
        assert!(train(schema.clone(), &[vec![1.0]], &[1.0, 2.0]).is_err());
        assert!(train(schema, &[vec![1.0, 2.0]], &[1.0]).is_err());
    }

    #[test]
    fn single_date_gives_flat_model() {
        let model = train_on_records(SchemaKind::Date, &[WeatherRecord::new(date(2023, 1, 1), 7.0)]).unwrap();

        assert_eq!(model.coefficients, vec![0.0]);
        assert!((model.intercept - 7.0).abs() < 1e-9);
    }

    #[test]
    fn weather_model_fits_one_hot_conditions() {
        // temperature = 20 - 2 * precipitation + 0.1 * wind + offset per condition
        let offsets = [("Cloudy", -3.0), ("Rainy", -5.0), ("Sunny", 4.0)];
        let mut records = Vec::new();
        for i in 0..30u64 {
            let (condition, offset) = offsets[(i % 3) as usize];
            let precipitation = (i % 7) as f64 * 0.5;
            let humidity = 40.0 + (i % 5) as f64 * 10.0;
            let wind_speed = (i % 4) as f64 + 1.0;
            records.push(WeatherRecord {
                date: date(2023, 1, 1) + chrono::Days::new(i),
                temperature: 20.0 - 2.0 * precipitation + 0.1 * wind_speed + offset,
                precipitation: Some(precipitation),
                humidity: Some(humidity),
                wind_speed: Some(wind_speed),
                condition: Some(condition.to_string()),
            });
        }

        let model = train_on_records(SchemaKind::Weather, &records).unwrap();
        assert_eq!(model.schema.categories(), vec!["Cloudy", "Rainy", "Sunny"]);

        let vectors: Vec<Vec<f64>> = records.iter().map(|r| encode(&FeatureInput::Record(r), &model.schema)).collect();
        let targets: Vec<f64> = records.iter().map(|r| r.temperature).collect();
        assert!(score(&model, &vectors, &targets).unwrap() > 0.999999);

        let input = WeatherInput { precipitation: 1.0, humidity: 55.0, wind_speed: 2.0, condition: "Sunny".to_string() };
        let predicted = predict(&model, &encode(&FeatureInput::Weather(&input), &model.schema)).unwrap();
        assert!((predicted - 22.2).abs() < 1e-6, "predicted {}", predicted);
    }

    #[test]
    fn non_finite_samples_are_refused() {
        let schema = FeatureSchema::date_only();
        assert!(train(schema.clone(), &[vec![1.0], vec![2.0]], &[1.0, f64::NAN]).is_err());
        assert!(train(schema, &[vec![1.0], vec![f64::INFINITY]], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn score_of_constant_target() {
        let model = train(FeatureSchema::date_only(), &[vec![1.0], vec![2.0]], &[3.0, 3.0]).unwrap();
        assert_eq!(score(&model, &[vec![1.0], vec![2.0]], &[3.0, 3.0]).unwrap(), 1.0);
    }
}
