use axum::{
    routing::{get, post},
    Router,
    extract::{rejection::JsonRejection, Json},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SchemeConfig;
use crate::error::{PayloadError, RenderError};
use crate::payload::{Payload, PayloadBuilder};
use crate::render::QrRenderer;
use crate::types::PaymentRequest;

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Serialize)]
pub struct PayloadResponse {
    pub payload: Payload,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeResponse {
    pub qr_code: String,
    pub payload: Payload,
}

#[derive(Debug)]
pub enum ApiError {
    Request(JsonRejection),
    Payload(PayloadError),
    Render(RenderError),
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Request(e)
    }
}

impl From<PayloadError> for ApiError {
    fn from(e: PayloadError) -> Self {
        ApiError::Payload(e)
    }
}

impl From<RenderError> for ApiError {
    fn from(e: RenderError) -> Self {
        ApiError::Render(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Request(rejection) => {
                tracing::warn!("Rejected request body: {}", rejection.body_text());
                (rejection.status(), "INVALID_REQUEST", rejection.body_text())
            }
            ApiError::Payload(e) => {
                let code = match e {
                    PayloadError::InvalidAmount(_) => "INVALID_AMOUNT",
                    PayloadError::UnsupportedCurrency(_) => "UNSUPPORTED_CURRENCY",
                    PayloadError::FieldTooLong { .. } => "FIELD_TOO_LONG",
                    PayloadError::MalformedPayload(_) | PayloadError::ChecksumMismatch { .. } => "INVALID_PAYLOAD",
                };
                tracing::warn!("Rejected payment request: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, code, e.to_string())
            }
            ApiError::Render(e) => {
                tracing::error!("Error generating QR code: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR", "Failed to generate QR code".to_string())
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Failed to generate QR code".to_string())
            }
        };

        (status, Json(json!({ "error": { "code": code, "message": message } }))).into_response()
    }
}

pub struct HttpServer {
    scheme: Arc<SchemeConfig>,
    renderer: Arc<dyn QrRenderer>,
}

impl HttpServer {
    pub fn new(scheme: SchemeConfig, renderer: Arc<dyn QrRenderer>) -> Self {
        Self {
            scheme: Arc::new(scheme),
            renderer,
        }
    }

    pub fn router(&self) -> Router {
        let scheme = self.scheme.clone();
        let renderer = self.renderer.clone();

        Router::new()
            // Browser form
            .route("/", get(|| async { Html(INDEX_HTML) }))
            .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))

            // Payload only, no image
            .route("/api/v1/payload", post({
                let scheme = scheme.clone();
                move |body: Result<Json<PaymentRequest>, JsonRejection>| async move {
                    let Json(req) = body?;
                    let payload = PayloadBuilder::new(&scheme).build(&req)?;
                    tracing::info!("Generated payload ({} chars)", payload.as_str().len());
                    Ok::<_, ApiError>(Json(PayloadResponse { payload }))
                }
            }))

            // Payload rendered as a PNG data URL
            .route("/generate-qr", post(move |body: Result<Json<PaymentRequest>, JsonRejection>| async move {
                let Json(req) = body?;
                let payload = PayloadBuilder::new(&scheme).build(&req)?;

                let data = payload.as_str().to_string();
                let qr_code = tokio::task::spawn_blocking(move || renderer.render(&data))
                    .await
                    .map_err(|e| ApiError::Internal(e.to_string()))??;

                tracing::info!("Generated QR code for {} payload", if req.one_time { "one-time" } else { "reusable" });
                Ok::<_, ApiError>(Json(QrCodeResponse { qr_code, payload }))
            }))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }
}
