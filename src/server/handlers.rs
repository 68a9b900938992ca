use actix_web::{http::StatusCode, web, HttpResponse};
use uuid::Uuid;

use crate::{
    bridge::SwapBridge,
    error::SwapError,
    logger,
    models::{
        CallableError, CallableRequest, CallableResponse, CallableResult, GenerationResult,
        HealthStatus, SwapRequest, SwapResponse,
    },
};

pub async fn swap_clothes(
    bridge: web::Data<SwapBridge>,
    body: web::Json<SwapRequest>,
) -> Result<HttpResponse, SwapError> {
    let request_id = Uuid::new_v4();
    let request = body.into_inner();

    log::info!(
        "[req:{}] swap-clothes called; person: {:?}, clothing: {:?}",
        request_id,
        request.person_image.as_ref().map(|i| i.mime_type.as_str()),
        request.clothing_image.as_ref().map(|i| i.mime_type.as_str())
    );

    let _timer = logger::timer(&format!("[req:{}] swap-clothes", request_id));
    let result = bridge.swap(&request).await.map_err(|e| {
        log_failure(&request_id, &e);
        e
    })?;

    Ok(match &result {
        GenerationResult::Generated { .. } => {
            HttpResponse::Ok().json(SwapResponse::from(&result))
        }
        GenerationResult::NoImage {
            message,
            candidate_count,
        } => {
            log::warn!("[req:{}] No image produced by AI: {}", request_id, message);
            HttpResponse::BadGateway().json(SwapResponse::failure(
                message.clone(),
                Some(format!("candidates: {}", candidate_count)),
            ))
        }
    })
}

/// Same bridge, wrapped in the callable function envelope.
pub async fn swap_clothes_callable(
    bridge: web::Data<SwapBridge>,
    body: web::Json<CallableRequest<SwapRequest>>,
) -> HttpResponse {
    let request_id = Uuid::new_v4();
    log::info!("[req:{}] swapClothes callable invoked", request_id);

    match bridge.swap(&body.data).await {
        Ok(result) => HttpResponse::Ok().json(CallableResponse {
            result: Some(CallableResult::from(&result)),
            error: None,
        }),
        Err(e) => {
            log_failure(&request_id, &e);
            let (status, code) = match e {
                SwapError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
                SwapError::Config(_) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
            };
            HttpResponse::build(status).json(CallableResponse {
                result: None,
                error: Some(CallableError {
                    status: code.to_string(),
                    message: e.user_message(),
                }),
            })
        }
    }
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus::healthy())
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("AI Clothes Swap service is running")
}

fn log_failure(request_id: &Uuid, e: &SwapError) {
    if e.is_transport_class() {
        log::error!("[req:{}] Error calling the model: {}", request_id, e);
    } else {
        log::warn!("[req:{}] Rejected: {}", request_id, e);
    }
}
