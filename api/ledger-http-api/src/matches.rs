use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use ledger_app::workflow::{
    history::{MatchView, ParticipantView, list::ListMatchesError},
    settlement::settle::SettleMatchError,
};
use ledger_core::{MatchSubmission, PlayerId};

use crate::{AppState, Auth, CreatedResponse, ServiceError, parse_month, still_loading};

#[derive(serde::Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonStakes {
    presets: Vec<u32>,
    default_stake: u32,
}

#[derive(serde::Serialize)]
pub struct JsonParticipant {
    id: String,
    name: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonMatch {
    id: String,
    base_rate: u32,
    pot: f64,
    winners: Vec<JsonParticipant>,
    losers: Vec<JsonParticipant>,
    created_at: String,
}

impl From<MatchView> for JsonMatch {
    fn from(m: MatchView) -> Self {
        let participants = |side: Vec<ParticipantView>| -> Vec<JsonParticipant> {
            side.into_iter()
                .map(|p| JsonParticipant {
                    id: p.player_id.to_string(),
                    name: p.name,
                })
                .collect()
        };
        Self {
            id: m.match_id.to_string(),
            base_rate: m.base_rate,
            pot: m.pot,
            winners: participants(m.winners),
            losers: participants(m.losers),
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSettleMatch {
    base_rate: u32,
    winners: Vec<String>,
    losers: Vec<String>,
}

pub async fn get_stakes(State(state): State<AppState>) -> Json<JsonStakes> {
    let presets = state.app.stake_presets_use_case.get_presets();
    Json(JsonStakes {
        presets: presets.presets,
        default_stake: presets.default_stake,
    })
}

pub async fn list_matches(
    Auth(_): Auth,
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<JsonMatch>>, ServiceError> {
    let month = parse_month(query.month.as_deref())?;
    let matches = state
        .app
        .match_list_use_case
        .list_matches(month)
        .map_err(|ListMatchesError::NotLoaded| still_loading())?;
    Ok(Json(matches.into_iter().map(JsonMatch::from).collect()))
}

pub async fn settle_match(
    Auth(_): Auth,
    State(state): State<AppState>,
    Json(body): Json<JsonSettleMatch>,
) -> Result<(StatusCode, Json<CreatedResponse>), ServiceError> {
    let submission = MatchSubmission {
        base_rate: body.base_rate,
        winners: parse_ids(&body.winners)?,
        losers: parse_ids(&body.losers)?,
    };

    let id = state
        .app
        .match_settle_use_case
        .settle(submission)
        .await
        .map_err(|e| match e {
            SettleMatchError::Rejected(reason) => ServiceError::NotPossible(reason.to_string()),
            SettleMatchError::Internal => {
                ServiceError::Internal("Failed to save match".to_string())
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: id.to_string() }),
    ))
}

fn parse_ids(raw: &[String]) -> Result<Vec<PlayerId>, ServiceError> {
    raw.iter()
        .map(|id| {
            id.parse()
                .map_err(|_| ServiceError::BadRequest(format!("Invalid player id '{}'", id)))
        })
        .collect()
}
