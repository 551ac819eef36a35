use chrono::NaiveDate;
use crate::errors::{DimensionMismatchError, ForecastError};
use crate::feature_encoder::{encode, FeatureInput};
use crate::models::fitted_model::{FittedModel, SchemaKind};
use crate::models::forecast_point::ForecastPoint;
use crate::models::weather_record::WeatherRecord;
use crate::predictor::predict;

/// Lazy daily series of predicted temperatures over an inclusive date range.
///
/// Cloning a series that hasn't been consumed gives an identical series.
#[derive(Clone)]
pub struct ForecastSeries<'a> {
    model: &'a FittedModel,
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for ForecastSeries<'_> {
    type Item = Result<ForecastPoint, DimensionMismatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.next?;
        self.next = date.succ_opt().filter(|d| *d <= self.end);

        let vector = encode(&FeatureInput::Date(date), &self.model.schema);
        Some(predict(self.model, &vector).map(|t| ForecastPoint { date, predicted_temperature: t }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.next.map_or(0, |d| (self.end - d).num_days() as usize + 1);
        (len, Some(len))
    }
}

impl ExactSizeIterator for ForecastSeries<'_> {}

/// Returns a series with one predicted temperature per day from the earliest
/// historical date through the target date. Everything is checked before the
/// series is returned, so a failure never leaves partial output.
///
/// # Arguments
///
/// * 'model' - a date only model
/// * 'records' - the historical records
/// * 'target_date' - the last date of the series
pub fn generate<'a>(model: &'a FittedModel, records: &[WeatherRecord], target_date: NaiveDate) -> Result<ForecastSeries<'a>, ForecastError> {
    if model.schema.kind != SchemaKind::Date {
        return Err(ForecastError::UnsupportedSchema(
            format!("a {} model can't predict from a date alone", model.schema.kind)));
    }
    if model.coefficients.len() != model.schema.len() {
        Err(DimensionMismatchError { expected: model.schema.len(), actual: model.coefficients.len() })?
    }

    let first = records
        .iter()
        .map(|r| r.date)
        .min()
        .ok_or(ForecastError::InvalidRange("no historical records".to_string()))?;

    if target_date < first {
        return Err(ForecastError::InvalidRange(
            format!("target date {} precedes earliest historical date {}", target_date, first)));
    }

    Ok(ForecastSeries { model, next: Some(first), end: target_date })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fitted_model::FeatureSchema;
    use crate::predictor::train_on_records;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn three_day_records() -> Vec<WeatherRecord> {
        vec![
            WeatherRecord::new(date(2023, 1, 1), 10.0),
            WeatherRecord::new(date(2023, 1, 2), 12.0),
            WeatherRecord::new(date(2023, 1, 3), 14.0),
        ]
    }

    #[test]
    fn series_runs_from_first_record_to_target() {
        let records = three_day_records();
        let model = train_on_records(SchemaKind::Date, &records).unwrap();

        let series = generate(&model, &records, date(2023, 1, 10)).unwrap();
        assert_eq!(series.len(), 10);

        let points: Vec<ForecastPoint> = series.collect::<Result<_, _>>().unwrap();
        assert_eq!(points.len(), 10);
        assert_eq!(points[0].date, date(2023, 1, 1));
        assert_eq!(points[9].date, date(2023, 1, 10));
        assert!((points[9].predicted_temperature - 28.0).abs() < 1e-6);
        assert!(points.windows(2).all(|w| w[1].predicted_temperature > w[0].predicted_temperature));
        assert!(points.windows(2).all(|w| w[1].date.signed_duration_since(w[0].date).num_days() == 1));
    }

    #[test]
    fn point_count_is_day_difference_plus_one() {
        let records = vec![WeatherRecord::new(date(2020, 2, 20), 1.0), WeatherRecord::new(date(2020, 2, 25), 2.0)];
        let model = train_on_records(SchemaKind::Date, &records).unwrap();

        for target in [date(2020, 2, 20), date(2020, 3, 1), date(2021, 2, 20)] {
            let expected = (target - date(2020, 2, 20)).num_days() as usize + 1;
            assert_eq!(generate(&model, &records, target).unwrap().count(), expected);
        }
    }

    #[test]
    fn series_is_restartable() {
        let records = three_day_records();
        let model = train_on_records(SchemaKind::Date, &records).unwrap();

        let series = generate(&model, &records, date(2023, 2, 1)).unwrap();
        let first: Vec<_> = series.clone().collect();
        let second: Vec<_> = series.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn target_before_history_is_invalid_range() {
        let records = three_day_records();
        let model = train_on_records(SchemaKind::Date, &records).unwrap();

        let result = generate(&model, &records, date(2022, 12, 31));
        assert!(matches!(result, Err(ForecastError::InvalidRange(_))));
        assert!(matches!(generate(&model, &[], date(2023, 1, 1)), Err(ForecastError::InvalidRange(_))));
    }

    #[test]
    fn weather_model_is_refused() {
        let mut model = train_on_records(SchemaKind::Date, &three_day_records()).unwrap();
        model.schema = FeatureSchema::weather(&[]);
        model.coefficients = vec![0.0; 3];

        let result = generate(&model, &three_day_records(), date(2023, 1, 5));
        assert!(matches!(result, Err(ForecastError::UnsupportedSchema(_))));
    }
}
