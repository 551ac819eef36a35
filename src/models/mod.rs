pub mod weather_record;
pub mod fitted_model;
pub mod forecast_point;
