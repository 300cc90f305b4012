use thiserror::Error;

pub mod linear;
pub mod model;

use linear::LinearTrendModel;
use model::AvailabilityModel;

pub const DEFAULT_HORIZON_MINUTES: u32 = 30;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown prediction model: {0}")]
    Unknown(String),
}

// Model Factory
pub fn create_model(name: &str) -> Result<Box<dyn AvailabilityModel>, ModelError> {
    match name {
        linear::MODEL_NAME => Ok(Box::new(LinearTrendModel::new())),
        other => Err(ModelError::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_linear_trend_model() {
        let model = create_model("linear_trend").expect("known model");

        assert_eq!(model.name(), "linear_trend");
    }

    #[test]
    fn factory_rejects_unknown_model() {
        let result = create_model("arima");

        assert!(matches!(result, Err(ModelError::Unknown(name)) if name == "arima"));
    }
}
