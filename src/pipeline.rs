use std::collections::BTreeSet;

use serde::Serialize;

use crate::cache::SeasonCache;
use crate::config::AppConfig;
use crate::error::{DataIssue, Result};
use crate::merge::merge;
use crate::model::{PlayerSeasonRecord, ScoredRecord};
use crate::scoring::{rank, score};
use crate::season::{SeasonId, SeasonRange};
use crate::source::PageSource;
use crate::stats_fetch::{SeasonAdvancedFetcher, SeasonStatsFetcher};

/// Everything the dashboard shows for one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSnapshot {
    pub season: SeasonId,
    pub records: Vec<PlayerSeasonRecord>,
    pub scored: Vec<ScoredRecord>,
    #[serde(skip)]
    pub issues: Vec<DataIssue>,
}

impl SeasonSnapshot {
    pub fn from_parts(
        season: SeasonId,
        records: Vec<PlayerSeasonRecord>,
        mut issues: Vec<DataIssue>,
    ) -> Self {
        let scored = score(&records);
        issues.extend(
            scored
                .iter()
                .filter(|r| r.mvp_score.is_none())
                .map(|r| DataIssue::UndefinedScore {
                    player: r.player_name().to_string(),
                }),
        );
        Self {
            season,
            records,
            scored,
            issues,
        }
    }

    pub fn player(&self, name: &str) -> Option<&ScoredRecord> {
        self.scored.iter().find(|r| r.record.player_name == name)
    }

    pub fn player_names(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.player_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn leaderboard(&self, top_n: usize) -> Vec<ScoredRecord> {
        rank(&self.scored, top_n)
    }

    pub fn sorted_by_points(&self) -> Vec<&ScoredRecord> {
        let mut rows: Vec<&ScoredRecord> = self.scored.iter().collect();
        rows.sort_by(|a, b| b.record.basic.points.total_cmp(&a.record.basic.points));
        rows
    }

    pub fn undefined_scores(&self) -> usize {
        self.scored.iter().filter(|r| r.mvp_score.is_none()).count()
    }
}

pub struct SeasonPipeline<S> {
    seasons: SeasonRange,
    basic: SeasonStatsFetcher<S>,
    advanced: SeasonAdvancedFetcher<S>,
}

impl<S: PageSource + Clone> SeasonPipeline<S> {
    pub fn new(source: S, base_url: &str, seasons: SeasonRange) -> Self {
        Self {
            seasons,
            basic: SeasonStatsFetcher::new(source.clone(), base_url, SeasonCache::new()),
            advanced: SeasonAdvancedFetcher::new(source, base_url, SeasonCache::new()),
        }
    }

    pub fn from_config(source: S, config: &AppConfig) -> Self {
        Self::new(source, &config.base_url, config.seasons)
    }
}

impl<S: PageSource> SeasonPipeline<S> {
    pub fn seasons(&self) -> SeasonRange {
        self.seasons
    }

    /// Loads one season. Either table failing makes the whole season unavailable.
    pub fn load(&self, season: SeasonId) -> Result<SeasonSnapshot> {
        let season = self.seasons.validate(season)?;
        let basic = self.basic.fetch_basic_stats(season)?;
        let advanced = self.advanced.fetch_advanced_stats(season)?;

        let merged = merge(&basic.rows, &advanced.rows);
        let mut issues = basic.issues;
        issues.extend(advanced.issues);
        issues.extend(merged.issues);

        let snapshot = SeasonSnapshot::from_parts(season, merged.records, issues);
        tracing::info!(
            %season,
            players = snapshot.records.len(),
            undefined_scores = snapshot.undefined_scores(),
            issues = snapshot.issues.len(),
            "season snapshot ready"
        );
        Ok(snapshot)
    }

    pub fn invalidate(&self, season: SeasonId) {
        self.basic.cache().remove(season);
        self.advanced.cache().remove(season);
    }

    pub fn is_cached(&self, season: SeasonId) -> bool {
        self.basic.cache().contains(season) && self.advanced.cache().contains(season)
    }
}
