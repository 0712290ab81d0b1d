use std::fmt;

use thiserror::Error;

use crate::season::SeasonId;

/// Which scraped table a failure or issue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatTable {
    PerGame,
    Advanced,
}

impl fmt::Display for StatTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatTable::PerGame => write!(f, "per-game"),
            StatTable::Advanced => write!(f, "advanced"),
        }
    }
}

/// Errors surfaced to callers of the stats pipeline.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Network failure, non-success response, or no usable table for the season.
    #[error("{table} stats unavailable for season {season}: {reason}")]
    DataUnavailable {
        season: SeasonId,
        table: StatTable,
        reason: String,
    },

    #[error("season {season} is outside the supported range {first}-{last}")]
    SeasonOutOfRange {
        season: SeasonId,
        first: SeasonId,
        last: SeasonId,
    },
}

impl StatsError {
    pub fn unavailable(season: SeasonId, table: StatTable, err: &anyhow::Error) -> Self {
        StatsError::DataUnavailable {
            season,
            table,
            reason: format!("{err:#}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;

/// Non-fatal data-quality findings. They are logged and carried alongside results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataIssue {
    /// A required column was missing from the source table and was synthesized.
    SchemaDrift { table: StatTable, column: String },
    /// More than one advanced row matched a single player; none was attached.
    MergeAmbiguity { player: String, matches: usize },
    /// Score could not be computed because advanced stats are missing.
    UndefinedScore { player: String },
}

impl fmt::Display for DataIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataIssue::SchemaDrift { table, column } => {
                write!(f, "{table} table has no '{column}' column")
            }
            DataIssue::MergeAmbiguity { player, matches } => {
                write!(f, "{matches} advanced rows match '{player}'")
            }
            DataIssue::UndefinedScore { player } => {
                write!(f, "no MVP score for '{player}' (advanced stats missing)")
            }
        }
    }
}
