use axum::{Json, extract::State, http::StatusCode};
use ledger_app::workflow::roster::{
    PlayerView,
    list::ListPlayersError,
    register::{RegisterPlayerError, RegisterPlayerRequest},
};

use crate::{AppState, Auth, CreatedResponse, ServiceError, still_loading};

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlayer {
    id: String,
    name: String,
    photo: Option<String>,
    created_at: Option<String>,
}

impl From<PlayerView> for JsonPlayer {
    fn from(player: PlayerView) -> Self {
        Self {
            id: player.player_id.to_string(),
            name: player.name,
            photo: player.photo,
            created_at: player.created_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(serde::Deserialize)]
pub struct JsonNewPlayer {
    name: String,
    photo: Option<String>,
}

pub async fn list_players(
    Auth(_): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonPlayer>>, ServiceError> {
    let players = state
        .app
        .player_list_use_case
        .list_players()
        .map_err(|ListPlayersError::NotLoaded| still_loading())?;
    Ok(Json(players.into_iter().map(JsonPlayer::from).collect()))
}

pub async fn register_player(
    Auth(_): Auth,
    State(state): State<AppState>,
    Json(body): Json<JsonNewPlayer>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServiceError> {
    let request = RegisterPlayerRequest {
        name: body.name,
        photo: body.photo,
    };
    let id = state
        .app
        .player_register_use_case
        .register(request)
        .await
        .map_err(|e| match e {
            RegisterPlayerError::InvalidName(msg) => ServiceError::BadRequest(msg),
            RegisterPlayerError::InvalidPhoto(msg) => ServiceError::BadRequest(msg),
            RegisterPlayerError::Internal => {
                ServiceError::Internal("Failed to save player".to_string())
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: id.to_string() }),
    ))
}
