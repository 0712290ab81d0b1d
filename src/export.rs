use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::model::ScoredRecord;
use crate::pipeline::SeasonSnapshot;

pub struct ExportReport {
    pub players: usize,
    pub leaders: usize,
    pub issues: usize,
}

enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Blank)
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map(Cell::from).unwrap_or(Cell::Blank)
    }
}

/// Writes the merged season table and the top-`top_n` leaderboard to an xlsx workbook.
pub fn export_leaderboard(snapshot: &SeasonSnapshot, top_n: usize, path: &Path) -> Result<ExportReport> {
    let player_rows: Vec<Vec<Cell>> = std::iter::once(player_header())
        .chain(snapshot.scored.iter().map(player_row))
        .collect();

    let leaders = snapshot.leaderboard(top_n);
    let leader_rows: Vec<Vec<Cell>> = std::iter::once(leader_header())
        .chain(
            leaders
                .iter()
                .enumerate()
                .map(|(idx, record)| leader_row(idx + 1, record)),
        )
        .collect();

    let issue_rows: Vec<Vec<Cell>> = std::iter::once(vec![Cell::from("Issue")])
        .chain(
            snapshot
                .issues
                .iter()
                .map(|issue| vec![Cell::Text(issue.to_string())]),
        )
        .collect();

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &player_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("MvpTop")?;
        write_rows(sheet, &leader_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Issues")?;
        write_rows(sheet, &issue_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    tracing::info!(path = %path.display(), season = %snapshot.season, "leaderboard exported");
    Ok(ExportReport {
        players: player_rows.len().saturating_sub(1),
        leaders: leader_rows.len().saturating_sub(1),
        issues: issue_rows.len().saturating_sub(1),
    })
}

fn player_header() -> Vec<Cell> {
    [
        "Player", "Team", "Pos", "Age", "G", "MP", "PTS", "AST", "TRB", "STL", "BLK", "FGA", "FG%",
        "3P%", "FT%", "PER", "TS%", "WS", "MVP Score",
    ]
    .into_iter()
    .map(Cell::from)
    .collect()
}

fn player_row(row: &ScoredRecord) -> Vec<Cell> {
    let r = &row.record;
    let b = &r.basic;
    let a = &r.advanced;
    vec![
        Cell::from(r.player_name.as_str()),
        Cell::from(r.team.as_deref()),
        Cell::from(r.position.as_deref()),
        Cell::from(r.age.map(f64::from)),
        Cell::from(f64::from(r.games_played)),
        Cell::from(b.minutes_played),
        Cell::from(b.points),
        Cell::from(b.assists),
        Cell::from(b.rebounds),
        Cell::from(b.steals),
        Cell::from(b.blocks),
        Cell::from(b.field_goal_attempts),
        Cell::from(b.field_goal_pct),
        Cell::from(b.three_point_pct),
        Cell::from(b.free_throw_pct),
        Cell::from(a.efficiency_rating),
        Cell::from(a.true_shooting_pct),
        Cell::from(a.win_shares),
        Cell::from(row.mvp_score),
    ]
}

fn leader_header() -> Vec<Cell> {
    ["Rank", "Player", "PTS", "AST", "TRB", "PER", "TS%", "WS", "MVP Score"]
        .into_iter()
        .map(Cell::from)
        .collect()
}

fn leader_row(rank: usize, row: &ScoredRecord) -> Vec<Cell> {
    let r = &row.record;
    vec![
        Cell::Number(rank as f64),
        Cell::from(r.player_name.as_str()),
        Cell::from(r.basic.points),
        Cell::from(r.basic.assists),
        Cell::from(r.basic.rebounds),
        Cell::from(r.advanced.efficiency_rating),
        Cell::from(r.advanced.true_shooting_pct),
        Cell::from(r.advanced.win_shares),
        Cell::from(row.mvp_score),
    ]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match value {
                Cell::Text(text) => worksheet.write_string(r, c, text).map(|_| ()),
                Cell::Number(num) => worksheet.write_number(r, c, *num).map(|_| ()),
                Cell::Blank => Ok(()),
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
