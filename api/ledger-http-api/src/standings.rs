use axum::{
    Json,
    extract::{Query, State},
};
use ledger_app::workflow::standings::{StandingsError, StandingsView};
use ledger_core::{Standing, YearMonth};

use crate::{AppState, Auth, ServiceError, matches::MonthQuery, parse_month, still_loading};

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonStanding {
    player_id: String,
    name: String,
    photo: Option<String>,
    net: f64,
    net_display: String,
    wins: u32,
    losses: u32,
    games_played: u32,
}

impl From<Standing> for JsonStanding {
    fn from(standing: Standing) -> Self {
        Self {
            net_display: standing.display_net(),
            player_id: standing.player_id.to_string(),
            name: standing.name,
            photo: standing.photo,
            net: standing.net,
            wins: standing.wins,
            losses: standing.losses,
            games_played: standing.games_played,
        }
    }
}

#[derive(serde::Serialize)]
pub struct JsonStandings {
    month: String,
    standings: Vec<JsonStanding>,
}

impl From<StandingsView> for JsonStandings {
    fn from(view: StandingsView) -> Self {
        Self {
            month: view.month.to_string(),
            standings: view.standings.into_iter().map(JsonStanding::from).collect(),
        }
    }
}

pub async fn get_standings(
    Auth(_): Auth,
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<JsonStandings>, ServiceError> {
    let month = parse_month(query.month.as_deref())?.unwrap_or_else(YearMonth::current);
    let view = state
        .app
        .standings_get_use_case
        .get_standings(month)
        .map_err(|StandingsError::NotLoaded| still_loading())?;
    Ok(Json(view.into()))
}
