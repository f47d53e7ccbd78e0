use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    error::{ApiJson, AppError},
    realtime::{
        dto::{CreateProfileRequest, FirmsRequest, FirmsResponse},
        profiles::Profile,
        services::refresh_hotspots,
    },
    state::AppState,
};

pub fn realtime_routes() -> Router<AppState> {
    Router::new()
        .route("/realtime/firms", post(firms))
        .route(
            "/realtime/profiles",
            get(list_profiles).post(create_profile),
        )
}

#[instrument(skip(state, payload))]
pub async fn firms(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<FirmsRequest>,
) -> Result<Json<FirmsResponse>, AppError> {
    let users = payload.users.unwrap_or_default();
    let outcome = refresh_hotspots(&state, payload.project_name.as_deref(), &users).await?;
    Ok(Json(FirmsResponse {
        ok: true,
        hotspots: outcome.hotspots,
        alerts_sent: outcome.alerts_sent,
        triggered_hotspots: outcome.triggered,
    }))
}

#[instrument(skip(state))]
pub async fn list_profiles(State(state): State<AppState>) -> Json<Vec<Value>> {
    Json(Profile::list(state.store.as_ref()).await)
}

#[instrument(skip(state, payload))]
pub async fn create_profile(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let profile = Profile::create(
        state.store.as_ref(),
        payload.project_name,
        payload.api_key,
        payload.users.unwrap_or_default(),
    )
    .await?;
    info!(profile_id = %profile.id, users = profile.users.len(), "profile created");
    Ok(Json(profile))
}
