use chrono::{DateTime, Utc};

use crate::domain::{Player, PlayerId};

pub mod list;
pub mod register;

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub name: String,
    pub photo: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            photo: player.photo.clone(),
            created_at: player.created_at,
        }
    }
}
