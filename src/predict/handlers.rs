use axum::{routing::post, Json, Router};
use tracing::{debug, instrument};

use crate::{
    error::{ApiJson, AppError},
    predict::{
        dto::PredictRequest,
        services::{predict, Features, Prediction},
    },
    state::AppState,
};

pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/predict", post(predict_risk))
}

#[instrument(skip(payload))]
pub async fn predict_risk(
    ApiJson(payload): ApiJson<PredictRequest>,
) -> Result<Json<Prediction>, AppError> {
    let features = Features::try_from(payload)?;
    let prediction = predict(&features);
    debug!(?features, probability = prediction.probability, risk = ?prediction.risk, "risk scored");
    Ok(Json(prediction))
}
