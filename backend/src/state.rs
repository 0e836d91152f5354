use log::{error, info};

use crate::config::Config;
use crate::encoders::MetadataEncoders;
use crate::error::ApiError;
use crate::inference::Model;

/// Read-only artifact set shared by all request handlers. A load failure at
/// startup is recorded rather than fatal so `/health` stays queryable; every
/// prediction then fails with `ModelUnavailable` until the process restarts.
pub struct AppState {
    pub model: Option<Model>,
    pub encoders: Option<MetadataEncoders>,
}

impl AppState {
    pub fn initialize(config: &Config) -> Self {
        let model = match Model::load(&config.model_path) {
            Ok(model) => {
                info!("Model loaded from {}", config.model_path);
                Some(model)
            }
            Err(e) => {
                error!("Failed to load model from {}: {e}", config.model_path);
                None
            }
        };

        let encoders = match MetadataEncoders::load(&config.encoder_path, &config.scaler_path) {
            Ok(encoders) => {
                info!(
                    "Encoders loaded ({} metadata features)",
                    encoders.vector_len()
                );
                Some(encoders)
            }
            Err(e) => {
                error!("Failed to load metadata encoders: {e}");
                None
            }
        };

        Self { model, encoders }
    }

    #[cfg(test)]
    pub fn unloaded() -> Self {
        Self {
            model: None,
            encoders: None,
        }
    }

    pub fn model(&self) -> Result<&Model, ApiError> {
        self.model.as_ref().ok_or(ApiError::ModelUnavailable)
    }

    pub fn encoders(&self) -> Result<&MetadataEncoders, ApiError> {
        self.encoders.as_ref().ok_or(ApiError::ModelUnavailable)
    }
}
