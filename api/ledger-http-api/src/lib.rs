use std::sync::Arc;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use ledger_app::Application;
use ledger_core::YearMonth;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

mod auth;
mod live;
mod matches;
mod players;
mod session;
mod standings;

pub use auth::Auth;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

pub fn router(app: Arc<Application>) -> Router {
    let routes: Router<AppState> = Router::new().nest(
        "/v1",
        Router::new()
            .route("/session", post(session::sign_in))
            .route("/stakes", get(matches::get_stakes))
            .route(
                "/players",
                get(players::list_players).post(players::register_player),
            )
            .route(
                "/matches",
                get(matches::list_matches).post(matches::settle_match),
            )
            .route("/standings", get(standings::get_standings))
            .route("/standings/live", get(live::live_standings)),
    );

    routes
        .layer(CorsLayer::permissive())
        .with_state(AppState { app })
}

pub async fn run(
    app: Arc<Application>,
    host: &str,
    port: u16,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    info!("HTTP API listening on {}:{}", host, port);
    serve(listener, app, shutdown_signal).await?;
    info!("HTTP API shut down gracefully");
    Ok(())
}

pub async fn serve(
    listener: TcpListener,
    app: Arc<Application>,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal)
        .await
}

/// `None` for a missing or empty value, 400 for anything that is not
/// `YYYY-MM`.
fn parse_month(raw: Option<&str>) -> Result<Option<YearMonth>, ServiceError> {
    match raw.map(str::trim).filter(|m| !m.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| ServiceError::BadRequest(format!("Invalid month '{}': {}", raw, e))),
    }
}

#[derive(Debug)]
pub enum ServiceError {
    Unauthorized(String),
    BadRequest(String),
    NotPossible(String),
    Unavailable(String),
    Internal(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ServiceError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ServiceError::NotPossible(msg) => write!(f, "Not possible: {}", msg),
            ServiceError::Unavailable(msg) => write!(f, "Unavailable: {}", msg),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, msg) = match self {
            ServiceError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::NotPossible(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, Json(body)).into_response()
    }
}

fn still_loading() -> ServiceError {
    ServiceError::Unavailable("Ledger data is still loading".to_string())
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    id: String,
}
