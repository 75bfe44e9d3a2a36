use crate::notifier::run_notification_pass;
use crate::startup::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

/// Handler for the liveness probe
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Handler for the scheduler trigger. Answers with the lambda-style
/// status body: `{"statusCode": 200}` on success, or a 500 carrying the
/// rendered error when the pass itself fails.
pub async fn run_handler(State(state): State<AppState>) -> impl IntoResponse {
    match run_notification_pass(
        state.store.as_ref(),
        state.sender.as_ref(),
        &state.config,
        Utc::now(),
    )
    .await
    {
        Ok(attempted) => {
            info!("Notification pass finished, {} dispatch(es) attempted", attempted);
            (StatusCode::OK, Json(json!({ "statusCode": 200 })))
        }
        Err(e) => {
            error!("Notification pass failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "statusCode": 500,
                    "body": { "error": format!("{:?}", e) }
                })),
            )
        }
    }
}
