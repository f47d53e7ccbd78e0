mod dto;
pub mod handlers;
pub mod hotspots;
pub mod profiles;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::realtime_routes()
}
