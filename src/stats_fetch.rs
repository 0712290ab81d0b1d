use anyhow::Context;

use crate::cache::SeasonCache;
use crate::clean::{
    ColumnMap, GAMES_COLUMN, PLAYER_COLUMN, dedup_by_max, is_label_row, parse_count,
    player_identity,
};
use crate::error::{DataIssue, Result, StatTable, StatsError};
use crate::model::{AdvancedStatLine, AdvancedStats, BasicStatLine, BasicStats};
use crate::season::SeasonId;
use crate::source::PageSource;
use crate::table::{RawTable, parse_first_table};

pub const PTS: &str = "PTS";
pub const AST: &str = "AST";
pub const TRB: &str = "TRB";
pub const STL: &str = "STL";
pub const BLK: &str = "BLK";
pub const FG_PCT: &str = "FG%";
pub const THREE_PCT: &str = "3P%";
pub const FT_PCT: &str = "FT%";
pub const MP: &str = "MP";
pub const FGA: &str = "FGA";
pub const PER: &str = "PER";
pub const TS_PCT: &str = "TS%";
pub const WS: &str = "WS";

const BASIC_REQUIRED: &[&str] = &[
    PLAYER_COLUMN,
    PTS,
    AST,
    TRB,
    STL,
    BLK,
    FG_PCT,
    THREE_PCT,
    FT_PCT,
    MP,
    GAMES_COLUMN,
    FGA,
];
const ADVANCED_REQUIRED: &[&str] = &[PLAYER_COLUMN, PER, TS_PCT, WS];

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonTable<T> {
    pub season: SeasonId,
    pub rows: Vec<T>,
    pub issues: Vec<DataIssue>,
}

pub fn per_game_url(base_url: &str, season: SeasonId) -> String {
    format!("{base_url}/leagues/NBA_{season}_per_game.html")
}

pub fn advanced_url(base_url: &str, season: SeasonId) -> String {
    format!("{base_url}/leagues/NBA_{season}_advanced.html")
}

fn load_table<S: PageSource>(
    source: &S,
    url: &str,
    season: SeasonId,
    table: StatTable,
) -> Result<RawTable> {
    source
        .fetch_page(url)
        .and_then(|html| parse_first_table(&html).with_context(|| format!("parsing {url}")))
        .and_then(|raw| {
            if raw.column(&[PLAYER_COLUMN]).is_none() {
                anyhow::bail!("first table on {url} has no {PLAYER_COLUMN} column");
            }
            Ok(raw)
        })
        .map_err(|err| {
            tracing::warn!(%season, %table, "fetch failed: {err:#}");
            StatsError::unavailable(season, table, &err)
        })
}

pub struct SeasonStatsFetcher<S> {
    source: S,
    base_url: String,
    cache: SeasonCache<SeasonTable<BasicStatLine>>,
}

impl<S: PageSource> SeasonStatsFetcher<S> {
    pub fn new(
        source: S,
        base_url: impl Into<String>,
        cache: SeasonCache<SeasonTable<BasicStatLine>>,
    ) -> Self {
        Self {
            source,
            base_url: base_url.into(),
            cache,
        }
    }

    pub fn cache(&self) -> &SeasonCache<SeasonTable<BasicStatLine>> {
        &self.cache
    }

    pub fn fetch_basic_stats(&self, season: SeasonId) -> Result<SeasonTable<BasicStatLine>> {
        self.cache.get_or_try_insert_with(season, || {
            let url = per_game_url(&self.base_url, season);
            let raw = load_table(&self.source, &url, season, StatTable::PerGame)?;
            let (rows, issues) = clean_basic_table(&raw);
            tracing::info!(%season, players = rows.len(), "per-game stats loaded");
            Ok(SeasonTable {
                season,
                rows,
                issues,
            })
        })
    }
}

pub struct SeasonAdvancedFetcher<S> {
    source: S,
    base_url: String,
    cache: SeasonCache<SeasonTable<AdvancedStatLine>>,
}

impl<S: PageSource> SeasonAdvancedFetcher<S> {
    pub fn new(
        source: S,
        base_url: impl Into<String>,
        cache: SeasonCache<SeasonTable<AdvancedStatLine>>,
    ) -> Self {
        Self {
            source,
            base_url: base_url.into(),
            cache,
        }
    }

    pub fn cache(&self) -> &SeasonCache<SeasonTable<AdvancedStatLine>> {
        &self.cache
    }

    pub fn fetch_advanced_stats(&self, season: SeasonId) -> Result<SeasonTable<AdvancedStatLine>> {
        self.cache.get_or_try_insert_with(season, || {
            let url = advanced_url(&self.base_url, season);
            let raw = load_table(&self.source, &url, season, StatTable::Advanced)?;
            let (rows, issues) = clean_advanced_table(&raw);
            tracing::info!(%season, players = rows.len(), "advanced stats loaded");
            Ok(SeasonTable {
                season,
                rows,
                issues,
            })
        })
    }
}

/// Unparsable numbers become zero; traded players keep the row with the most games.
pub fn clean_basic_table(table: &RawTable) -> (Vec<BasicStatLine>, Vec<DataIssue>) {
    let mut issues = Vec::new();
    let columns = ColumnMap::resolve(table, StatTable::PerGame, BASIC_REQUIRED, &mut issues);
    let team_idx = table.column(&["Team", "Tm"]);
    let pos_idx = table.column(&["Pos"]);
    let age_idx = table.column(&["Age"]);

    let mut lines = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        if is_label_row(table, row) {
            continue;
        }
        let Some(player_name) = player_identity(&columns, row) else {
            continue;
        };
        let games = parse_count(columns.cell(row, GAMES_COLUMN));
        lines.push((
            games,
            BasicStatLine {
                player_name,
                team: text_at(row, team_idx),
                position: text_at(row, pos_idx),
                age: parse_count(text_at(row, age_idx).as_deref()),
                games_played: games.unwrap_or(0),
                stats: BasicStats {
                    points: columns.number_or_zero(row, PTS),
                    assists: columns.number_or_zero(row, AST),
                    rebounds: columns.number_or_zero(row, TRB),
                    steals: columns.number_or_zero(row, STL),
                    blocks: columns.number_or_zero(row, BLK),
                    field_goal_pct: columns.number_or_zero(row, FG_PCT),
                    three_point_pct: columns.number_or_zero(row, THREE_PCT),
                    free_throw_pct: columns.number_or_zero(row, FT_PCT),
                    minutes_played: columns.number_or_zero(row, MP),
                    field_goal_attempts: columns.number_or_zero(row, FGA),
                },
            },
        ));
    }

    let kept = dedup_by_max(lines, |(_, line)| line.player_name.clone(), |(games, _)| *games);
    (kept.into_iter().map(|(_, line)| line).collect(), issues)
}

/// Unparsable metrics stay missing.
pub fn clean_advanced_table(table: &RawTable) -> (Vec<AdvancedStatLine>, Vec<DataIssue>) {
    let mut issues = Vec::new();
    let columns = ColumnMap::resolve(table, StatTable::Advanced, ADVANCED_REQUIRED, &mut issues);
    let games_idx = table.column(&[GAMES_COLUMN]);

    let mut lines = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        if is_label_row(table, row) {
            continue;
        }
        let Some(player_name) = player_identity(&columns, row) else {
            continue;
        };
        lines.push(AdvancedStatLine {
            player_name,
            games_played: parse_count(text_at(row, games_idx).as_deref()),
            stats: AdvancedStats {
                efficiency_rating: columns.number_or_missing(row, PER),
                true_shooting_pct: columns.number_or_missing(row, TS_PCT),
                win_shares: columns.number_or_missing(row, WS),
            },
        });
    }

    let kept = dedup_by_max(lines, |line| line.player_name.clone(), |line| line.games_played);
    (kept, issues)
}

fn text_at(row: &[String], idx: Option<usize>) -> Option<String> {
    let cell = row.get(idx?)?.trim();
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}
