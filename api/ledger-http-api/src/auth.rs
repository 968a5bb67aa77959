use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use ledger_app::workflow::session::SessionView;

use crate::{AppState, ServiceError};

/// A request carrying a valid `Authorization: Bearer` session token.
pub struct Auth(pub SessionView);

impl FromRequestParts<AppState> for Auth {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ServiceError::Unauthorized("Missing bearer token".to_string()))?;

        authenticate(state, bearer.token()).await.map(Auth)
    }
}

pub(crate) async fn authenticate(state: &AppState, token: &str) -> Result<SessionView, ServiceError> {
    state
        .app
        .session_use_case
        .authenticate(token)
        .await
        .ok_or_else(|| ServiceError::Unauthorized("Invalid or expired token".to_string()))
}
