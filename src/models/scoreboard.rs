//! Scoreboard row model and sort metrics.

use serde::{Deserialize, Serialize};

/// One row of the uploaded player statistics table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardRow {
    pub player_id: String,
    pub player_name: String,
    pub economy: f64,
    pub wins: i64,
    pub gym_wins: i64,
}

/// Numeric columns the scoreboard can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMetric {
    Economy,
    Wins,
    GymWins,
}

impl SortMetric {
    pub const ALL: [SortMetric; 3] = [SortMetric::Economy, SortMetric::Wins, SortMetric::GymWins];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMetric::Economy => "economy",
            SortMetric::Wins => "wins",
            SortMetric::GymWins => "gym_wins",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "economy" => Some(SortMetric::Economy),
            "wins" => Some(SortMetric::Wins),
            "gym_wins" => Some(SortMetric::GymWins),
            _ => None,
        }
    }

    /// Sort key for a row, widened to f64 so all metrics compare uniformly.
    pub fn key(&self, row: &ScoreboardRow) -> f64 {
        match self {
            SortMetric::Economy => row.economy,
            SortMetric::Wins => row.wins as f64,
            SortMetric::GymWins => row.gym_wins as f64,
        }
    }
}
