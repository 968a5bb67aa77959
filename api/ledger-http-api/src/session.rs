use axum::{Json, extract::State};
use ledger_app::workflow::session::SignInError;

use crate::{AppState, ServiceError};

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    token: String,
    expires_at: String,
}

pub async fn sign_in(State(state): State<AppState>) -> Result<Json<SessionResponse>, ServiceError> {
    let session = state
        .app
        .session_use_case
        .sign_in()
        .await
        .map_err(|SignInError::Internal| {
            ServiceError::Internal("Failed to start a session".to_string())
        })?;

    Ok(Json(SessionResponse {
        token: session.token,
        expires_at: session.expires_at.to_rfc3339(),
    }))
}
