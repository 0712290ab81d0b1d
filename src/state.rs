use std::collections::VecDeque;

use rand::Rng;

use crate::history::{
    DEFAULT_DAYS, HistoryMetric, MAX_DAYS, MIN_DAYS, PLAYER_COUNT_OPTIONS, SimulatedHistory,
    simulate_history,
};
use crate::model::ScoredRecord;
use crate::pipeline::SeasonSnapshot;
use crate::season::{SeasonId, SeasonRange};

pub const LEADERBOARD_SIZE: usize = 5;
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Players,
    Player,
    Leaderboard,
    History,
}

#[derive(Debug, Clone)]
pub enum Delta {
    SeasonLoading(SeasonId),
    SetSnapshot(SeasonSnapshot),
    SeasonUnavailable { season: SeasonId, message: String },
    ExportFinished {
        path: String,
        players: usize,
        leaders: usize,
    },
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    LoadSeason(SeasonId),
    /// Drop cached tables and load again.
    RefreshSeason(SeasonId),
    Export { season: SeasonId, path: String },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub seasons: SeasonRange,
    pub season: SeasonId,
    pub loading: bool,
    pub snapshot: Option<SeasonSnapshot>,
    pub unavailable: Option<String>,
    pub selected: usize,
    pub history_players: usize,
    pub history_days: usize,
    pub history_metric: HistoryMetric,
    pub history: Option<SimulatedHistory>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(seasons: SeasonRange, season: SeasonId) -> Self {
        Self {
            screen: Screen::Players,
            seasons,
            season: if seasons.contains(season) {
                season
            } else {
                seasons.last
            },
            loading: false,
            snapshot: None,
            unavailable: None,
            selected: 0,
            history_players: PLAYER_COUNT_OPTIONS[1],
            history_days: DEFAULT_DAYS,
            history_metric: HistoryMetric::default(),
            history: None,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// General table ordering (points per game, highest first).
    pub fn rows(&self) -> Vec<&ScoredRecord> {
        self.snapshot
            .as_ref()
            .map(|s| s.sorted_by_points())
            .unwrap_or_default()
    }

    pub fn selected_record(&self) -> Option<&ScoredRecord> {
        self.rows().get(self.selected).copied()
    }

    pub fn leaderboard(&self) -> Vec<ScoredRecord> {
        self.snapshot
            .as_ref()
            .map(|s| s.leaderboard(LEADERBOARD_SIZE))
            .unwrap_or_default()
    }

    pub fn select_next(&mut self) {
        let total = self.rows().len();
        if total > 0 {
            self.selected = (self.selected + 1).min(total - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn page_down(&mut self, by: usize) {
        let total = self.rows().len();
        if total > 0 {
            self.selected = (self.selected + by).min(total - 1);
        }
    }

    pub fn page_up(&mut self, by: usize) {
        self.selected = self.selected.saturating_sub(by);
    }

    /// Moves the season selector; returns the new season when it changed. The old
    /// season's rows and error are dropped until the new season arrives.
    pub fn step_season(&mut self, newer: bool) -> Option<SeasonId> {
        let next = if newer {
            self.seasons.newer(self.season)
        } else {
            self.seasons.older(self.season)
        };
        if next == self.season {
            return None;
        }
        self.season = next;
        self.snapshot = None;
        self.unavailable = None;
        self.history = None;
        self.selected = 0;
        self.loading = true;
        Some(next)
    }

    pub fn toggle_history_players(&mut self) {
        self.history_players = if self.history_players == PLAYER_COUNT_OPTIONS[0] {
            PLAYER_COUNT_OPTIONS[1]
        } else {
            PLAYER_COUNT_OPTIONS[0]
        };
        self.history = None;
    }

    pub fn adjust_history_days(&mut self, longer: bool) {
        let days = if longer {
            self.history_days + 1
        } else {
            self.history_days.saturating_sub(1)
        };
        self.history_days = days.clamp(MIN_DAYS, MAX_DAYS);
        self.history = None;
    }

    pub fn toggle_history_metric(&mut self) {
        self.history_metric = self.history_metric.toggle();
        self.history = None;
    }

    /// Rolls a fresh simulation when none is current.
    pub fn ensure_history<R: Rng>(&mut self, rng: &mut R) {
        if self.history.is_some() {
            return;
        }
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let leaders = snapshot.leaderboard(self.history_players);
        if leaders.is_empty() {
            return;
        }
        self.history = Some(simulate_history(
            &leaders,
            self.history_players,
            self.history_days,
            self.history_metric,
            rng,
        ));
    }

    pub fn reroll_history(&mut self) {
        self.history = None;
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SeasonLoading(season) => {
            if season == state.season {
                state.loading = true;
            }
        }
        Delta::SetSnapshot(snapshot) => {
            if snapshot.season != state.season {
                // A response for a season the user already moved away from.
                return;
            }
            let keep_name = state
                .selected_record()
                .map(|r| r.record.player_name.clone());
            state.loading = false;
            state.unavailable = None;
            state.history = None;
            let issues = snapshot.issues.len();
            let players = snapshot.records.len();
            state.snapshot = Some(snapshot);

            let rows = state.rows();
            let position = keep_name
                .as_deref()
                .and_then(|name| rows.iter().position(|r| r.record.player_name == name));
            let total = rows.len();
            state.selected = position.unwrap_or(state.selected.min(total.saturating_sub(1)));
            state.push_log(format!(
                "[INFO] Season {} loaded: {players} players, {issues} data issues",
                state.season
            ));
        }
        Delta::SeasonUnavailable { season, message } => {
            if season != state.season {
                return;
            }
            state.loading = false;
            state.snapshot = None;
            state.history = None;
            state.selected = 0;
            if state.screen == Screen::Player {
                state.screen = Screen::Players;
            }
            state.push_log(format!("[WARN] {message}"));
            state.unavailable = Some(message);
        }
        Delta::ExportFinished {
            path,
            players,
            leaders,
        } => {
            state.push_log(format!(
                "[INFO] Exported {players} players and top {leaders} to {path}"
            ));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
