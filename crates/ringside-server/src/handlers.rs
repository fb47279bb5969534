use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use ringside_core::{CoreError, LookupOutcome};
use serde::Deserialize;
use serde_json::json;

use crate::server::AppState;
use crate::webhook::WebhookEvent;

/// Header carrying the webhook shared secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub phone_number: String,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Ringside",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub async fn lookup(
    State(state): State<AppState>,
    Json(req): Json<LookupRequest>,
) -> Response {
    match state.lookup.lookup(&req.phone_number).await {
        Ok(LookupOutcome::Found(customer)) => (
            StatusCode::OK,
            Json(json!({ "found": true, "customer": customer })),
        )
            .into_response(),
        Ok(LookupOutcome::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "found": false, "error": "Customer not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(category = %e.category(), error = %e, "lookup failed");
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(json!({ "found": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn psa_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<WebhookEvent>,
) -> Response {
    let presented = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    match state.invalidation.handle(&event, presented) {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "received": true,
                "event_type": report.event_type,
                "invalidated": report.invalidated,
            })),
        )
            .into_response(),
        Err(e) => webhook_error(&e),
    }
}

fn webhook_error(e: &CoreError) -> Response {
    tracing::warn!(category = %e.category(), error = %e, "webhook rejected");
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}
