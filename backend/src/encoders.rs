use ndarray::Array1;
use serde::Deserialize;
use shared::{AgarMedium, Species};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("Failed to read encoder artifact {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse encoder artifact {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Category '{value}' is outside the fitted vocabulary of column {column}")]
    UnseenCategory { column: usize, value: String },
    #[error("Scaler artifact carries no parameters for the numeric column")]
    MalformedScaler,
}

/// Fitted one-hot transform, exported at training time. `categories` holds
/// one vocabulary per categorical column, in fit order.
#[derive(Debug, Clone, Deserialize)]
pub struct OneHotEncoder {
    pub categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    /// Strict transform: a value outside the fitted vocabulary is an error,
    /// never a silent all-zeros row.
    pub fn transform(&self, values: &[&str]) -> Result<Vec<f32>, EncoderError> {
        let mut encoded = Vec::with_capacity(self.output_len());
        for (column, (vocabulary, value)) in self.categories.iter().zip(values).enumerate() {
            let hit = vocabulary.iter().position(|c| c == value).ok_or_else(|| {
                EncoderError::UnseenCategory {
                    column,
                    value: (*value).to_string(),
                }
            })?;
            for i in 0..vocabulary.len() {
                encoded.push(if i == hit { 1.0 } else { 0.0 });
            }
        }
        Ok(encoded)
    }

    pub fn output_len(&self) -> usize {
        self.categories.iter().map(|c| c.len()).sum()
    }
}

/// Fitted affine scaler, `(x - mean) / scale` per numeric column.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f32>, EncoderError> {
        if self.mean.len() != values.len() || self.scale.len() != values.len() {
            return Err(EncoderError::MalformedScaler);
        }
        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| ((x - mean) / scale) as f32)
            .collect())
    }
}

fn load_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, EncoderError> {
    let raw = fs::read_to_string(path).map_err(|source| EncoderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| EncoderError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// The fitted categorical encoder and numeric scaler, loaded once at startup
/// and read-only afterwards.
#[derive(Debug, Clone)]
pub struct MetadataEncoders {
    encoder: OneHotEncoder,
    scaler: StandardScaler,
}

impl MetadataEncoders {
    pub fn new(encoder: OneHotEncoder, scaler: StandardScaler) -> Self {
        Self { encoder, scaler }
    }

    pub fn load(encoder_path: &Path, scaler_path: &Path) -> Result<Self, EncoderError> {
        Ok(Self::new(load_artifact(encoder_path)?, load_artifact(scaler_path)?))
    }

    /// Categorical block first (agar column, then species column), scaled
    /// hours last. Deterministic for identical inputs.
    pub fn encode(
        &self,
        agar: AgarMedium,
        species: Species,
        hours: u64,
    ) -> Result<Array1<f32>, EncoderError> {
        let agar_token: &'static str = agar.into();
        let species_token: &'static str = species.into();
        let mut vector = self.encoder.transform(&[agar_token, species_token])?;
        vector.extend(self.scaler.transform(&[hours as f64])?);
        Ok(Array1::from(vector))
    }

    pub fn vector_len(&self) -> usize {
        self.encoder.output_len() + self.scaler.mean.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn fitted_encoders() -> MetadataEncoders {
        MetadataEncoders::new(
            OneHotEncoder {
                categories: vec![
                    vec![
                        "Ashdown".to_string(),
                        "Blood".to_string(),
                        "Macconkey".to_string(),
                        "Nutrient".to_string(),
                    ],
                    vec!["Bpseudomallei".to_string(), "Unknown".to_string()],
                ],
            },
            StandardScaler {
                mean: vec![48.0],
                scale: vec![24.0],
            },
        )
    }

    #[test]
    fn encode_concatenates_categorical_then_numeric() {
        let encoders = fitted_encoders();
        let vector = encoders
            .encode(AgarMedium::Blood, Species::Unknown, 72)
            .unwrap();
        assert_eq!(vector.len(), encoders.vector_len());
        assert_eq!(
            vector.to_vec(),
            vec![0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0]
        );
    }

    #[test]
    fn encode_is_deterministic() {
        let encoders = fitted_encoders();
        let a = encoders
            .encode(AgarMedium::Ashdown, Species::Bpseudomallei, 48)
            .unwrap();
        let b = encoders
            .encode(AgarMedium::Ashdown, Species::Bpseudomallei, 48)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unseen_category_is_rejected() {
        let encoders = MetadataEncoders::new(
            OneHotEncoder {
                categories: vec![vec!["Blood".to_string()], vec!["Unknown".to_string()]],
            },
            StandardScaler {
                mean: vec![48.0],
                scale: vec![24.0],
            },
        );
        let err = encoders
            .encode(AgarMedium::Ashdown, Species::Unknown, 48)
            .unwrap_err();
        assert!(matches!(err, EncoderError::UnseenCategory { column: 0, .. }));
    }

    #[test]
    fn scaler_applies_affine_transform() {
        let scaler = StandardScaler {
            mean: vec![48.0],
            scale: vec![24.0],
        };
        assert_eq!(scaler.transform(&[96.0]).unwrap(), vec![2.0]);
        assert_eq!(scaler.transform(&[0.0]).unwrap(), vec![-2.0]);
    }

    #[test]
    fn missing_artifact_reports_io_error() {
        let err = MetadataEncoders::load(
            Path::new("/nonexistent/onehot_encoder.json"),
            Path::new("/nonexistent/scaler.json"),
        )
        .unwrap_err();
        assert!(matches!(err, EncoderError::Io { .. }));
    }
}
