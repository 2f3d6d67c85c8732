//! Scoreboard store: the uploaded player statistics table.
//!
//! The table is replaced wholesale on upload and re-parsed on every load.
//! Parsing tries the comma delimiter first and falls back to semicolon, and
//! the sortable columns are schema-checked up front so a malformed table
//! fails fast with a parse error instead of deep in the sort step.

use std::path::{Path, PathBuf};

use csv::StringRecord;

use super::{write_bytes_atomic, SCOREBOARD_FILE};
use crate::errors::AppError;
use crate::models::{ScoreboardRow, SortMetric};

/// Store for the CSV-backed scoreboard table.
pub struct ScoreboardStore {
    csv_path: PathBuf,
}

impl ScoreboardStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            csv_path: data_dir.join(SCOREBOARD_FILE),
        }
    }

    /// Load and parse the table.
    pub async fn load(&self) -> Result<Vec<ScoreboardRow>, AppError> {
        let bytes = match tokio::fs::read(&self.csv_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(
                    "No scoreboard has been uploaded yet".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        tokio::task::spawn_blocking(move || parse_table(&bytes)).await?
    }

    /// Replace the table wholesale. The upload is parsed before the backing
    /// file is touched, so a malformed table leaves the previous one intact.
    /// Returns the parsed row count.
    pub async fn replace(&self, bytes: Vec<u8>) -> Result<usize, AppError> {
        let (rows, bytes) =
            tokio::task::spawn_blocking(move || parse_table(&bytes).map(|rows| (rows, bytes)))
                .await??;

        write_bytes_atomic(&self.csv_path, &bytes).await?;
        Ok(rows.len())
    }
}

/// Return at most `n` rows ordered by the metric.
///
/// The sort is stable, so ties keep their original row order. `n` larger
/// than the row count is clamped.
pub fn sort_top(
    mut rows: Vec<ScoreboardRow>,
    metric: SortMetric,
    n: usize,
    ascending: bool,
) -> Vec<ScoreboardRow> {
    rows.sort_by(|a, b| {
        let ord = metric.key(a).total_cmp(&metric.key(b));
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
    rows.truncate(n);
    rows
}

/// Parse the table, retrying with the semicolon delimiter if the comma
/// attempt fails.
fn parse_table(bytes: &[u8]) -> Result<Vec<ScoreboardRow>, AppError> {
    match parse_with_delimiter(bytes, b',') {
        Ok(rows) => Ok(rows),
        Err(_) => parse_with_delimiter(bytes, b';'),
    }
}

fn parse_with_delimiter(bytes: &[u8], delimiter: u8) -> Result<Vec<ScoreboardRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let economy = required_column(column("economy"), "economy")?;
    let wins = required_column(column("wins"), "wins")?;
    let gym_wins = required_column(column("gym_wins"), "gym_wins")?;
    // Display columns are tolerated missing; the sort path never needs them.
    let player_id = column("player_id");
    let player_name = column("player_name");

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1, records start on line 2.
        let line = index + 2;

        rows.push(ScoreboardRow {
            player_id: text_field(&record, player_id),
            player_name: text_field(&record, player_name),
            economy: numeric_field(&record, economy, "economy", line)?,
            wins: numeric_field(&record, wins, "wins", line)?,
            gym_wins: numeric_field(&record, gym_wins, "gym_wins", line)?,
        });
    }

    Ok(rows)
}

fn required_column(position: Option<usize>, name: &str) -> Result<usize, AppError> {
    position.ok_or_else(|| AppError::Parse(format!("Scoreboard is missing the {} column", name)))
}

fn text_field(record: &StringRecord, position: Option<usize>) -> String {
    position
        .and_then(|i| record.get(i))
        .unwrap_or_default()
        .to_string()
}

fn numeric_field<T: std::str::FromStr>(
    record: &StringRecord,
    position: usize,
    name: &str,
    line: usize,
) -> Result<T, AppError> {
    let raw = record.get(position).unwrap_or_default();
    raw.parse().map_err(|_| {
        AppError::Parse(format!(
            "Line {}: {} value {:?} is not numeric",
            line, name, raw
        ))
    })
}
