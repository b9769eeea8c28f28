pub mod health;
pub mod ledger;

use crate::config::ApiConfig;
use actix_web::{error::InternalError, web, HttpResponse};
use shared_types::ErrorResponse;
use tracing::warn;

/// Registers every route and its shared state on `cfg`
pub fn configure(cfg: &mut web::ServiceConfig, config: &ApiConfig) {
    let upload = config.upload();

    let json_config = web::JsonConfig::default()
        .limit(upload.max_json_bytes)
        .error_handler(|err, _req| {
            warn!("Failed to parse request body: {}", err);
            let response =
                HttpResponse::BadRequest().json(ErrorResponse::new("リクエストの解析に失敗しました"));
            InternalError::from_response(err, response).into()
        });

    cfg.app_data(json_config)
        .app_data(web::Data::new(ledger::UploadAppState { upload }))
        .service(health::health)
        .route("/api/upload", web::post().to(ledger::upload_ledger))
        .route("/api/calculate", web::post().to(ledger::calculate_settlement));
}
