use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::imageops::FilterType;
use serde::Serialize;
use tch::{Kind, Tensor};

pub const IMG_SIZE: u32 = 224;
pub const IMAGE_FORMAT_DESCRIPTION: &str = "Grayscale -> 3-channel RGB";
pub const NORMALIZATION_DESCRIPTION: &str = "EfficientNet rescale to [-1, 1]";

// EfficientNet training-time rescale constants, identical for all three
// channels: (x - 127.5) / 127.5.
const PIXEL_MEAN: f32 = 127.5;
const PIXEL_SCALE: f32 = 127.5;

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("invalid base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("could not decode image bytes: {0}")]
    Decode(#[from] image::ImageError),
}

/// Strips an optional `data:image/...;base64,` prefix and decodes the payload.
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>, PreprocessError> {
    let encoded = match payload.split_once(',') {
        Some((_prefix, rest)) => rest,
        None => payload,
    };
    Ok(STANDARD.decode(encoded.trim())?)
}

/// Turns raw image bytes into the model's [1, 224, 224, 3] float input.
///
/// Order matters: grayscale conversion happens before the resize, the single
/// luminance plane is replicated across three identical channels, and the
/// EfficientNet rescale maps pixels into approximately [-1, 1]. This must
/// stay aligned with the training-time transform.
pub fn preprocess_image(image_bytes: &[u8]) -> Result<Tensor, PreprocessError> {
    let img = image::load_from_memory(image_bytes)?;
    let gray = img.to_luma8();
    let resized = image::imageops::resize(&gray, IMG_SIZE, IMG_SIZE, FilterType::Triangle);

    let mut pixels = Vec::with_capacity((IMG_SIZE * IMG_SIZE * 3) as usize);
    for pixel in resized.pixels() {
        let value = (pixel.0[0] as f32 - PIXEL_MEAN) / PIXEL_SCALE;
        pixels.extend_from_slice(&[value, value, value]);
    }

    let side = IMG_SIZE as i64;
    Ok(Tensor::from_slice(&pixels).view([1, side, side, 3]))
}

/// Post-hoc sanity report on a prepared input tensor. Violations are logged
/// by the caller, never fatal.
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessChecks {
    pub shape_correct: bool,
    pub dtype_correct: bool,
    pub range_correct: bool,
    pub min_value: f64,
    pub max_value: f64,
    pub mean_value: f64,
    pub std_value: f64,
}

impl PreprocessChecks {
    pub fn all_passed(&self) -> bool {
        self.shape_correct && self.dtype_correct && self.range_correct
    }

    pub fn value_range(&self) -> String {
        format!("[{:.3}, {:.3}]", self.min_value, self.max_value)
    }
}

pub fn verify_tensor(tensor: &Tensor) -> PreprocessChecks {
    let side = IMG_SIZE as i64;
    let min_value = tensor.min().double_value(&[]);
    let max_value = tensor.max().double_value(&[]);
    PreprocessChecks {
        shape_correct: tensor.size() == [1, side, side, 3],
        dtype_correct: matches!(tensor.kind(), Kind::Float | Kind::Double),
        range_correct: min_value > -2.0 && max_value < 2.0,
        min_value,
        max_value,
        mean_value: tensor.mean(Kind::Float).double_value(&[]),
        std_value: tensor.std(true).double_value(&[]),
    }
}
