use axum::{
    extract::{
        Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt, stream::SplitStream};
use ledger_app::workflow::standings::watch::StandingsWatcher;
use ledger_core::YearMonth;
use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::{AppState, ServiceError, auth::authenticate, parse_month, standings::JsonStandings};

#[derive(serde::Deserialize)]
pub struct LiveQuery {
    month: Option<String>,
    token: Option<String>,
}

/// Upgrades to a WebSocket that receives the month's standings as a JSON
/// text message once data is loaded and again after every change.
pub async fn live_standings(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<LiveQuery>,
) -> Result<Response, ServiceError> {
    let token = query
        .token
        .ok_or_else(|| ServiceError::Unauthorized("Missing token".to_string()))?;
    let session = authenticate(&state, &token).await?;
    let month = parse_month(query.month.as_deref())?.unwrap_or_else(YearMonth::current);
    let watcher = state.app.standings_watch_use_case.watch_standings(month);

    log::info!("Session {} watching standings of {}", session.session_id, month);
    Ok(ws.on_upgrade(move |socket| push_standings(socket, watcher)))
}

async fn push_standings(socket: WebSocket, mut watcher: StandingsWatcher) {
    let (mut ws_sender, ws_receiver) = socket.split();
    let cancellation_token = CancellationToken::new();
    let receive_task = tokio::spawn(drain_incoming(ws_receiver, cancellation_token.clone()));

    while let Some(view) = select! {
        _ = cancellation_token.cancelled() => None,
        view = watcher.next() => view,
    } {
        let json = match serde_json::to_string(&JsonStandings::from(view)) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize standings: {}", e);
                continue;
            }
        };
        if let Err(e) = ws_sender.send(Message::Text(json.into())).await {
            log::debug!("Live standings client went away: {}", e);
            break;
        }
    }

    cancellation_token.cancel();
    let _ = ws_sender.close().await;
    if let Err(e) = receive_task.await {
        log::error!("WebSocket receive task failed: {}", e);
    }
    log::info!("Live standings for {} finished", watcher.month());
}

/// Incoming messages are ignored; the socket only ends on close or error.
async fn drain_incoming(mut ws_receiver: SplitStream<WebSocket>, cancellation_token: CancellationToken) {
    while let Some(msg) = select! {
        _ = cancellation_token.cancelled() => None,
        msg = ws_receiver.next() => msg,
    } {
        match msg {
            Ok(Message::Close(frame)) => {
                log::debug!("Live standings connection closed: {:?}", frame);
                break;
            }
            Err(e) => {
                log::debug!("Live standings connection error: {}", e);
                break;
            }
            _ => {}
        }
    }
    cancellation_token.cancel();
}
