use ledger_core::{Standing, aggregate_standings};

use crate::domain::{LedgerSnapshot, YearMonth};

pub mod get;
pub mod watch;

#[derive(Clone, Debug, PartialEq)]
pub struct StandingsView {
    pub month: YearMonth,
    pub standings: Vec<Standing>,
}

impl StandingsView {
    pub fn compute(snapshot: &LedgerSnapshot, month: YearMonth) -> Self {
        Self {
            month,
            standings: aggregate_standings(&snapshot.players, &snapshot.matches, month),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum StandingsError {
    /// No session yet or the collections have not arrived.
    NotLoaded,
}
