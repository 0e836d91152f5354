use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;

/// Process configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub model_path: String,
    pub encoder_path: PathBuf,
    pub scaler_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "models/final_finetuned_model.pt".to_string()),
            encoder_path: env::var("ENCODER_PATH")
                .unwrap_or_else(|_| "metadata/encoders/onehot_encoder.json".to_string())
                .into(),
            scaler_path: env::var("SCALER_PATH")
                .unwrap_or_else(|_| "metadata/encoders/scaler.json".to_string())
                .into(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
