use axum::{extract::State, routing::post, Json, Router};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, SignupRequest, SignupResponse},
        repo::User,
        services::{issue_token, password_matches, stored_password, TOKEN_TTL_SECS},
    },
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    let name = payload.name.unwrap_or_default().trim().to_string();
    let email = payload.email.unwrap_or_default().trim().to_lowercase();
    let password = payload.password.unwrap_or_default();

    if name.is_empty() || email.is_empty() || password.trim().is_empty() {
        warn!("signup with missing fields");
        return Err(AppError::Validation("Missing fields".into()));
    }

    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        password: stored_password(state.config.auth_mode, &password)?,
        created_at: OffsetDateTime::now_utc(),
    };

    if !user.insert_unique(state.store.as_ref()).await? {
        warn!(email = %user.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(SignupResponse {
        ok: true,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = payload.email.unwrap_or_default().trim().to_lowercase();
    let password = payload.password.unwrap_or_default();
    let invalid = || AppError::Auth("Invalid credentials".into());

    let Some(user) = User::find_by_email(state.store.as_ref(), &email).await else {
        warn!(email = %email, "login unknown email");
        return Err(invalid());
    };

    if !password_matches(state.config.auth_mode, &password, &user.password) {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    let access_token = issue_token(&state.config, &user)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        expires_in: TOKEN_TTL_SECS,
        user: PublicUser::from(&user),
    }))
}
