use actix_web::{HttpResponse, web};
use chrono::Utc;
use log::{info, warn};
use serde_json::json;
use shared::{
    EchoedMetadata, EncodingTestRequest, ImagePayload, PredictionRequest, PredictionResponse,
    PreprocessingDetails, VerificationSummary,
};
use tch::Tensor;
use uuid::Uuid;

use crate::assessment::{assess, interpretation, recommendations, round_to};
use crate::error::ApiError;
use crate::inference::MODEL_VERSION;
use crate::metadata;
use crate::preprocess::{self, IMAGE_FORMAT_DESCRIPTION, IMG_SIZE, NORMALIZATION_DESCRIPTION};
use crate::state::AppState;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let body = json!({
            "error": "invalid_request",
            "message": format!("Invalid JSON payload: {err}"),
        });
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(body),
        )
        .into()
    }))
        .service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/predict").route(web::post().to(predict)))
        .service(web::resource("/test-preprocessing").route(web::post().to(test_preprocessing)))
        .service(web::resource("/test-encoding").route(web::post().to(test_encoding)))
        .service(web::resource("/info").route(web::get().to(info_document)))
        .default_service(web::route().to(not_found));
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "model_loaded": state.model.is_some(),
        "encoders_loaded": state.encoders.is_some(),
        "version": API_VERSION,
        "model_type": MODEL_VERSION,
        "preprocessing": "Grayscale -> 3-channel -> EfficientNet rescale",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn predict(
    state: web::Data<AppState>,
    payload: web::Json<PredictionRequest>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let req = payload.into_inner();

    // Artifact availability is checked up front so a degraded process answers
    // with one consistent failure regardless of payload contents.
    let model = state.model()?;
    let encoders = state.encoders()?;

    let image_b64 = req.image.as_deref().ok_or(ApiError::MissingImage)?;

    info!(
        "[{request_id}] prediction request: agar='{}', colony_age='{}', {} characteristic(s)",
        req.agar,
        req.colony_age,
        req.characteristics.len()
    );

    let hours = metadata::extract_hours(&req.colony_age);
    let species = metadata::species_from_characteristics(&req.characteristics);
    let agar = metadata::normalize_agar(&req.agar);

    let image_bytes = preprocess::decode_image_payload(image_b64)?;
    let image_tensor = preprocess::preprocess_image(&image_bytes)?;
    let checks = preprocess::verify_tensor(&image_tensor);
    if !checks.all_passed() {
        warn!(
            "[{request_id}] preprocessing verification failed: shape={}, dtype={}, range={}",
            checks.shape_correct, checks.dtype_correct, checks.range_correct
        );
    }

    let metadata_vector = encoders.encode(agar, species, hours)?;
    let metadata_tensor =
        Tensor::from_slice(&metadata_vector.to_vec()).view([1, metadata_vector.len() as i64]);

    let raw_score = model
        .predict(&image_tensor, &metadata_tensor)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let assessment = assess(raw_score);

    info!(
        "[{request_id}] raw_score={raw_score:.4}, result='{}', confidence={}%",
        assessment.result,
        assessment.confidence_percent()
    );

    let response = PredictionResponse {
        result: assessment.result.clone(),
        confidence: assessment.confidence_percent(),
        confidence_level: assessment.tier.to_string(),
        is_bpseudo: assessment.is_bpseudo,
        confidence_score: assessment.confidence_score(),
        model_raw_output: round_to(raw_score as f64, 4),
        metadata: EchoedMetadata {
            agar: req.agar.clone(),
            colony_age: req.colony_age.clone(),
            time_hours: hours,
            species: species.to_string(),
            characteristics: req.characteristics,
        },
        interpretation: interpretation(raw_score, &req.agar),
        recommendations: recommendations(raw_score, agar),
        preprocessing_details: PreprocessingDetails {
            image_format: IMAGE_FORMAT_DESCRIPTION.to_string(),
            size: format!("{IMG_SIZE}x{IMG_SIZE}"),
            normalization: NORMALIZATION_DESCRIPTION.to_string(),
            verification: VerificationSummary {
                shape_correct: checks.shape_correct,
                dtype_correct: checks.dtype_correct,
                range_correct: checks.range_correct,
                value_range: checks.value_range(),
            },
        },
        model_version: MODEL_VERSION.to_string(),
        api_version: API_VERSION.to_string(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Runs the image pipeline alone and reports the verification checks.
/// No model call, so it answers even on a degraded process.
async fn test_preprocessing(payload: web::Json<ImagePayload>) -> Result<HttpResponse, ApiError> {
    let image_b64 = payload.image.as_deref().ok_or(ApiError::MissingImage)?;
    let image_bytes = preprocess::decode_image_payload(image_b64)?;
    let tensor = preprocess::preprocess_image(&image_bytes)?;
    let checks = preprocess::verify_tensor(&tensor);

    Ok(HttpResponse::Ok().json(json!({
        "status": if checks.all_passed() { "success" } else { "check details" },
        "preprocessing_checks": {
            "shape_correct": checks.shape_correct,
            "expected_shape": "(1, 224, 224, 3)",
            "actual_shape": format!("{:?}", tensor.size()),
            "dtype_correct": checks.dtype_correct,
            "dtype": format!("{:?}", tensor.kind()),
            "range_correct": checks.range_correct,
            "min_value": checks.min_value,
            "max_value": checks.max_value,
            "mean_value": checks.mean_value,
            "std_value": checks.std_value,
        },
        "normalization": NORMALIZATION_DESCRIPTION,
        "expected_range": "[-1, 1] approximately",
        "image_format": IMAGE_FORMAT_DESCRIPTION,
    })))
}

/// Encodes metadata without touching the model, echoing the feature vector.
async fn test_encoding(
    state: web::Data<AppState>,
    payload: web::Json<EncodingTestRequest>,
) -> Result<HttpResponse, ApiError> {
    let encoders = state.encoders()?;
    let hours = metadata::extract_hours(&payload.colony_age);
    let agar = metadata::normalize_agar(&payload.agar);
    let vector = encoders.encode(agar, shared::Species::Unknown, hours)?;

    Ok(HttpResponse::Ok().json(json!({
        "agar": payload.agar,
        "time_hr": hours,
        "metadata_vector": vector.to_vec(),
        "vector_size": vector.len(),
    })))
}

async fn info_document() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "model_name": "B. pseudomallei Detector",
        "architecture": MODEL_VERSION,
        "input_specification": {
            "image": {
                "format": IMAGE_FORMAT_DESCRIPTION,
                "size": format!("{IMG_SIZE}x{IMG_SIZE}"),
                "channels": 3,
                "normalization": NORMALIZATION_DESCRIPTION,
            },
            "metadata": {
                "agar": "Categorical (Blood, Macconkey, Nutrient, Ashdown)",
                "species": "Categorical (Unknown, Bpseudomallei)",
                "time_hours": "Numeric (continuous)",
            },
        },
        "output": {
            "model_raw_output": "Float 0-1 (probability of B. pseudomallei)",
            "display_confidence": "Float 0-1 (flipped for negative results)",
            "result": "Classification with three tiers",
        },
        "confidence_tiers": {
            "probably": "model_raw_output >= 0.7",
            "possibly": "0.5 <= model_raw_output < 0.7",
            "not": "model_raw_output < 0.5",
        },
        "confidence_logic": {
            "explanation": "Confidence always represents 'How confident are we in our answer?'",
            "for_positive_results": "Display model_raw_output as-is",
            "for_negative_results": "Display 1 - model_raw_output (flipped)",
            "example_1": "model_raw_output=0.85 -> 'Probably B. pseudomallei - 85% confidence'",
            "example_2": "model_raw_output=0.23 -> 'Not B. pseudomallei - 77% confidence (flipped)'",
            "example_3": "model_raw_output=0.55 -> 'Possibly B. pseudomallei - 55% confidence'",
        },
        "preprocessing_pipeline": [
            "1. Decode base64 image",
            "2. Convert to grayscale",
            "3. Resize to 224x224",
            "4. Expand grayscale to 3 channels",
            "5. Apply EfficientNet rescale to [-1, 1]",
            "6. Encode metadata (one-hot encoder + standard scaler)",
            "7. Run inference",
            "8. Apply three-tier confidence logic",
        ],
        "api_version": API_VERSION,
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": "endpoint_not_found",
        "message": "Endpoint not found",
        "available_endpoints": [
            "/health",
            "/predict",
            "/test-preprocessing",
            "/test-encoding",
            "/info",
        ],
    }))
}
