use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    alerts::{
        dto::{AlertRequest, AlertResponse},
        services::fan_out,
    },
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn alert_routes() -> Router<AppState> {
    Router::new().route("/alert", post(send_alert))
}

#[instrument(skip(state, payload))]
pub async fn send_alert(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AlertRequest>,
) -> Result<Json<AlertResponse>, AppError> {
    let delivered = fan_out(state.store.as_ref(), payload.into()).await?;
    Ok(Json(AlertResponse {
        ok: true,
        delivered_count: delivered.len(),
        delivered,
    }))
}
