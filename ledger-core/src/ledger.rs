use std::collections::HashMap;

use crate::{Match, Player, PlayerId, YearMonth};

/// One player's monthly summary. Derived on demand, never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Standing {
    pub player_id: PlayerId,
    pub name: String,
    pub photo: Option<String>,
    pub net: f64,
    pub wins: u32,
    pub losses: u32,
    pub games_played: u32,
}

impl Standing {
    fn zeroed(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            photo: player.photo.clone(),
            net: 0.0,
            wins: 0,
            losses: 0,
            games_played: 0,
        }
    }

    /// Net amount truncated toward zero, with a leading `+` when that whole
    /// number is positive.
    pub fn display_net(&self) -> String {
        let whole = self.net.trunc() as i64;
        if whole > 0 {
            format!("+{}", whole)
        } else {
            whole.to_string()
        }
    }
}

/// Computes the ranked standings of `month`.
///
/// Every match dated in `month` credits each winner with an equal share of
/// `base_rate * losers` and charges each loser `base_rate`. Ids missing from
/// the roster are skipped. Players without a game in the month are left out.
/// The result is ordered by `net` descending, then by name, then by id.
pub fn aggregate_standings(roster: &[Player], matches: &[Match], month: YearMonth) -> Vec<Standing> {
    let mut standings: HashMap<PlayerId, Standing> = HashMap::with_capacity(roster.len());
    for player in roster {
        standings
            .entry(player.id)
            .or_insert_with(|| Standing::zeroed(player));
    }

    for m in matches.iter().filter(|m| month.contains(&m.created_at)) {
        let share = m.share();
        for id in &m.winners {
            if let Some(standing) = standings.get_mut(id) {
                standing.net += share;
                standing.wins += 1;
                standing.games_played += 1;
            }
        }
        for id in &m.losers {
            if let Some(standing) = standings.get_mut(id) {
                standing.net -= m.base_rate as f64;
                standing.losses += 1;
                standing.games_played += 1;
            }
        }
    }

    let mut ranked: Vec<Standing> = standings
        .into_values()
        .filter(|s| s.games_played > 0)
        .collect();
    ranked.sort_by(|a, b| {
        b.net
            .total_cmp(&a.net)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::MatchId;

    fn player(name: &str) -> Player {
        Player {
            id: PlayerId::new(),
            name: name.to_string(),
            photo: None,
            created_at: None,
        }
    }

    fn in_month(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 19, 30, 0).unwrap()
    }

    fn settled(
        base_rate: u32,
        winners: &[&Player],
        losers: &[&Player],
        created_at: DateTime<Utc>,
    ) -> Match {
        Match {
            id: MatchId::new(),
            base_rate,
            winners: winners.iter().map(|p| p.id).collect(),
            losers: losers.iter().map(|p| p.id).collect(),
            created_at,
        }
    }

    fn find<'a>(standings: &'a [Standing], p: &Player) -> &'a Standing {
        standings
            .iter()
            .find(|s| s.player_id == p.id)
            .expect("player should be ranked")
    }

    #[test]
    fn test_single_winner_takes_the_pot() {
        let (a, b, c) = (player("A"), player("B"), player("C"));
        let roster = vec![a.clone(), b.clone(), c.clone()];
        let matches = vec![settled(10, &[&a], &[&b, &c], in_month(2024, 5, 14))];

        let standings = aggregate_standings(&roster, &matches, "2024-05".parse().unwrap());

        assert_eq!(standings.len(), 3);
        assert_eq!(standings[0].player_id, a.id);
        assert_eq!(find(&standings, &a).net, 20.0);
        assert_eq!(find(&standings, &a).wins, 1);
        assert_eq!(find(&standings, &a).games_played, 1);
        assert_eq!(find(&standings, &b).net, -10.0);
        assert_eq!(find(&standings, &b).losses, 1);
        assert_eq!(find(&standings, &c).net, -10.0);
        assert_eq!(find(&standings, &c).losses, 1);
    }

    #[test]
    fn test_other_months_have_no_effect() {
        let (a, b) = (player("A"), player("B"));
        let roster = vec![a.clone(), b.clone()];
        let matches = vec![
            settled(10, &[&a], &[&b], in_month(2024, 5, 31)),
            settled(30, &[&b], &[&a], in_month(2024, 6, 1)),
        ];

        let may = aggregate_standings(&roster, &matches, "2024-05".parse().unwrap());
        assert_eq!(find(&may, &a).net, 10.0);
        assert_eq!(find(&may, &b).net, -10.0);
        assert_eq!(find(&may, &a).games_played, 1);

        let june = aggregate_standings(&roster, &matches, "2024-06".parse().unwrap());
        assert_eq!(find(&june, &b).net, 30.0);
        assert_eq!(find(&june, &a).net, -30.0);

        let july = aggregate_standings(&roster, &matches, "2024-07".parse().unwrap());
        assert!(july.is_empty());
    }

    #[test]
    fn test_unknown_player_ids_are_skipped() {
        let (a, b) = (player("A"), player("B"));
        let removed = player("gone");
        let roster = vec![a.clone(), b.clone()];
        let matches = vec![settled(20, &[&a, &removed], &[&b], in_month(2024, 5, 2))];

        let standings = aggregate_standings(&roster, &matches, "2024-05".parse().unwrap());

        assert_eq!(standings.len(), 2);
        assert!(standings.iter().all(|s| s.player_id != removed.id));
        // the share is still split across both listed winners
        assert_eq!(find(&standings, &a).net, 10.0);
        assert_eq!(find(&standings, &b).net, -20.0);
    }

    #[test]
    fn test_idle_players_are_left_out() {
        let (a, b, idle) = (player("A"), player("B"), player("Idle"));
        let roster = vec![a.clone(), b.clone(), idle.clone()];
        let matches = vec![settled(10, &[&a], &[&b], in_month(2024, 5, 2))];

        let standings = aggregate_standings(&roster, &matches, "2024-05".parse().unwrap());
        assert!(standings.iter().all(|s| s.games_played > 0));
        assert!(standings.iter().all(|s| s.player_id != idle.id));
    }

    #[test]
    fn test_empty_winners_only_charges_losers() {
        let (a, b) = (player("A"), player("B"));
        let roster = vec![a.clone(), b.clone()];
        let matches = vec![settled(10, &[], &[&a, &b], in_month(2024, 5, 2))];

        let standings = aggregate_standings(&roster, &matches, "2024-05".parse().unwrap());
        assert_eq!(find(&standings, &a).net, -10.0);
        assert_eq!(find(&standings, &b).net, -10.0);
    }

    #[test]
    fn test_uneven_split_keeps_fractions() {
        let (a, b, c, d) = (player("A"), player("B"), player("C"), player("D"));
        let roster = vec![a.clone(), b.clone(), c.clone(), d.clone()];
        let matches = vec![settled(10, &[&a, &b, &c], &[&d], in_month(2024, 5, 2))];

        let standings = aggregate_standings(&roster, &matches, "2024-05".parse().unwrap());
        let a_net = find(&standings, &a).net;
        assert!((a_net - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(find(&standings, &a).display_net(), "+3");
        assert_eq!(find(&standings, &d).display_net(), "-10");
    }

    #[test]
    fn test_net_sums_to_zero_over_known_players() {
        let players: Vec<Player> = ["A", "B", "C", "D", "E"].into_iter().map(player).collect();
        let p = &players;
        let matches = vec![
            settled(10, &[&p[0]], &[&p[1], &p[2]], in_month(2024, 5, 1)),
            settled(20, &[&p[1], &p[3], &p[4]], &[&p[0], &p[2]], in_month(2024, 5, 8)),
            settled(30, &[&p[2], &p[4]], &[&p[3]], in_month(2024, 5, 15)),
            settled(10, &[&p[0], &p[1]], &[&p[2], &p[3], &p[4]], in_month(2024, 5, 22)),
        ];

        let standings = aggregate_standings(&players, &matches, "2024-05".parse().unwrap());
        let total: f64 = standings.iter().map(|s| s.net).sum();
        assert!(total.abs() < 1e-9, "net should be zero-sum, got {total}");
    }

    #[test]
    fn test_ties_are_ordered_by_name_and_output_is_stable() {
        let (zed, amy, bob, cat) = (player("Zed"), player("Amy"), player("Bob"), player("Cat"));
        let roster = vec![zed.clone(), amy.clone(), bob.clone(), cat.clone()];
        let matches = vec![
            settled(10, &[&zed], &[&bob], in_month(2024, 5, 1)),
            settled(10, &[&amy], &[&cat], in_month(2024, 5, 2)),
        ];
        let month = "2024-05".parse().unwrap();

        let first = aggregate_standings(&roster, &matches, month);
        let names: Vec<&str> = first.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Zed", "Bob", "Cat"]);

        let mut reversed = roster.clone();
        reversed.reverse();
        let second = aggregate_standings(&reversed, &matches, month);
        assert_eq!(first, second);
    }

    #[test]
    fn test_display_net() {
        let mut standing = Standing::zeroed(&player("A"));
        assert_eq!(standing.display_net(), "0");
        standing.net = 12.9;
        assert_eq!(standing.display_net(), "+12");
        standing.net = -0.5;
        assert_eq!(standing.display_net(), "0");
        // the sign follows the shown whole number, not the raw amount
        standing.net = 0.4;
        assert_eq!(standing.display_net(), "0");
        standing.net = 1.0;
        assert_eq!(standing.display_net(), "+1");
        standing.net = -7.99;
        assert_eq!(standing.display_net(), "-7");
    }
}
