use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;

use crate::encoders::EncoderError;
use crate::preprocess::PreprocessError;

/// Request-level failure taxonomy. Every variant maps to one status code and
/// one stable machine-readable code; failures are terminal for the request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No image provided")]
    MissingImage,
    #[error("Failed to process image: {0}")]
    ImageDecode(String),
    #[error("ML model or encoders failed to load. Please check server logs.")]
    ModelUnavailable,
    #[error("Failed to encode metadata: {0}")]
    Encoding(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingImage => "invalid_request",
            ApiError::ImageDecode(_) => "image_decode_failed",
            ApiError::ModelUnavailable => "model_unavailable",
            ApiError::Encoding(_) => "metadata_encoding_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<PreprocessError> for ApiError {
    fn from(err: PreprocessError) -> Self {
        ApiError::ImageDecode(err.to_string())
    }
}

impl From<EncoderError> for ApiError {
    fn from(err: EncoderError) -> Self {
        ApiError::Encoding(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::ImageDecode(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelUnavailable | ApiError::Encoding(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.code(),
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(ApiError::MissingImage.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::ImageDecode("bad bytes".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn server_errors_map_to_500() {
        assert_eq!(
            ApiError::ModelUnavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Encoding("unseen category".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ApiError::MissingImage.code(), "invalid_request");
        assert_eq!(ApiError::ModelUnavailable.code(), "model_unavailable");
    }
}
