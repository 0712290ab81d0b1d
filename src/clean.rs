//! Row validation and numeric coercion shared by the per-game and advanced fetchers.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::{DataIssue, StatTable};
use crate::table::RawTable;

pub const RANK_COLUMN: &str = "Rk";
pub const PLAYER_COLUMN: &str = "Player";
pub const GAMES_COLUMN: &str = "G";

/// Header names resolved once per table. Columns the source dropped resolve to `None`
/// and are reported as schema drift.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: HashMap<&'static str, Option<usize>>,
}

impl ColumnMap {
    pub fn resolve(
        table: &RawTable,
        source: StatTable,
        required: &[&'static str],
        issues: &mut Vec<DataIssue>,
    ) -> Self {
        let mut indices = HashMap::new();
        for &name in required {
            let idx = table.column(&[name]);
            if idx.is_none() {
                tracing::warn!(table = %source, column = name, "column missing, synthesizing defaults");
                issues.push(DataIssue::SchemaDrift {
                    table: source,
                    column: name.to_string(),
                });
            }
            indices.insert(name, idx);
        }
        Self { indices }
    }

    pub fn cell<'a>(&self, row: &'a [String], name: &str) -> Option<&'a str> {
        let idx = (*self.indices.get(name)?)?;
        row.get(idx).map(String::as_str)
    }

    pub fn number_or_zero(&self, row: &[String], name: &str) -> f64 {
        self.cell(row, name).and_then(parse_number).unwrap_or(0.0)
    }

    pub fn number_or_missing(&self, row: &[String], name: &str) -> Option<f64> {
        self.cell(row, name).and_then(parse_number)
    }
}

/// Accepts `.512`, `31.4`, `-2.0`, `45%`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (digits, scale) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest.trim(), 100.0),
        None => (trimmed, 1.0),
    };
    digits
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v / scale)
}

pub fn parse_count(raw: Option<&str>) -> Option<u32> {
    let value = parse_number(raw?)?;
    if value < 0.0 {
        return None;
    }
    Some(value.round() as u32)
}

/// True for rows that repeat the column labels mid-table (a pagination artifact).
pub fn is_label_row(table: &RawTable, row: &[String]) -> bool {
    if let Some(rank_idx) = table.column(&[RANK_COLUMN])
        && row.get(rank_idx).is_some_and(|cell| cell.eq_ignore_ascii_case(RANK_COLUMN))
    {
        return true;
    }
    !row.is_empty()
        && row
            .iter()
            .zip(table.headers.iter())
            .all(|(cell, header)| cell == header)
}

pub fn player_identity(columns: &ColumnMap, row: &[String]) -> Option<String> {
    let name = columns.cell(row, PLAYER_COLUMN)?.trim();
    if name.is_empty() || name.eq_ignore_ascii_case(PLAYER_COLUMN) {
        return None;
    }
    Some(name.to_string())
}

/// Keeps one entry per key: the one with the highest priority. Ties keep the
/// earlier entry. Output follows each key's first appearance.
pub fn dedup_by_max<T, K, P>(items: Vec<T>, key: K, priority: P) -> Vec<T>
where
    K: Fn(&T) -> String,
    P: Fn(&T) -> Option<u32>,
{
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        match slots.entry(key(&item)) {
            Entry::Occupied(slot) => {
                let current = &mut kept[*slot.get()];
                // `None < Some(_)`, so unparsable counts never displace a real one.
                if priority(&item) > priority(&*current) {
                    *current = item;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(item);
            }
        }
    }
    kept
}
