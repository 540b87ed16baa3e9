use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    error::ApiResult,
    state::AppState,
    whatsapp::dto::{PairingCodeRequest, PairingCodeResponse, SendMessageRequest, WhatsAppStatus},
};

pub fn whatsapp_routes() -> Router<AppState> {
    Router::new()
        .route("/whatsapp/pairing-code", post(pairing_code))
        .route("/whatsapp/status", get(status))
        .route("/whatsapp/send", post(send))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.0.id))]
pub async fn pairing_code(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<PairingCodeRequest>,
) -> ApiResult<Json<PairingCodeResponse>> {
    let response = state.whatsapp.pairing_code(&payload).await?;
    info!("pairing code issued");
    Ok(Json(response))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn status(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<WhatsAppStatus>> {
    let response = state.whatsapp.status().await?;
    Ok(Json(response))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.0.id))]
pub async fn send(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<SendMessageRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let response = state.whatsapp.send(&payload).await?;
    info!(number = %payload.number, "message forwarded");
    Ok(Json(response))
}
