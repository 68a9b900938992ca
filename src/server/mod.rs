pub mod cors;
pub mod handlers;

use actix_web::{
    error::InternalError,
    http::StatusCode,
    middleware::{from_fn, Logger},
    web, App, HttpResponse, HttpServer, ResponseError,
};

use crate::{
    bridge::SwapBridge,
    config::Config,
    error::SwapError,
    models::{CallableError, CallableResponse, SwapResponse},
};

pub use cors::{cors_middleware, CorsPolicy};

impl ResponseError for SwapError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self))
            .json(SwapResponse::failure(self.user_message(), self.details()))
    }
}

/// Registers the routes. `/swapClothes` carries its own JSON settings so body
/// errors come back in the callable envelope.
pub fn routes(cfg: &mut web::ServiceConfig, json_limit: usize) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/health", web::get().to(handlers::health))
        .route("/swap-clothes", web::post().to(handlers::swap_clothes))
        .service(
            web::resource("/swapClothes")
                .app_data(callable_json_config(json_limit))
                .route(web::post().to(handlers::swap_clothes_callable)),
        );
}

/// JSON extractor settings: large bodies for base64 images, failure-shaped 400s.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            log::warn!("Rejected request body: {}", err);
            let response = HttpResponse::BadRequest()
                .json(SwapResponse::failure("Invalid request body.", Some(err.to_string())));
            InternalError::from_response(err, response).into()
        })
}

pub fn callable_json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            log::warn!("Rejected callable request body: {}", err);
            let response = HttpResponse::BadRequest().json(CallableResponse {
                result: None,
                error: Some(CallableError {
                    status: "INVALID_ARGUMENT".to_string(),
                    message: "Invalid request body.".to_string(),
                }),
            });
            InternalError::from_response(err, response).into()
        })
}

/// Serves the bridge until the process is asked to stop. The bridge is
/// dropped once the server has shut down.
pub async fn run(config: Config, bridge: SwapBridge) -> std::io::Result<()> {
    if let Err(e) = bridge.check_config() {
        log::warn!("⚠️  {}; swap requests will fail until this is fixed", e);
    }

    let cors = web::Data::new(CorsPolicy::new(config.allowed_origins.clone()));
    let bridge = web::Data::new(bridge);
    let limit = config.json_limit_bytes;

    HttpServer::new(move || {
        App::new()
            .app_data(cors.clone())
            .app_data(bridge.clone())
            .app_data(json_config(limit))
            .wrap(from_fn(cors_middleware))
            .wrap(Logger::new("%r %s %Dms"))
            .configure(|cfg| routes(cfg, limit))
    })
    .bind((config.host(), config.port()))?
    .run()
    .await?;

    log::info!("🛑 Server stopped");
    Ok(())
}
