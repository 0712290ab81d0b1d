use rand::SeedableRng;
use rand::rngs::StdRng;

use nba_mvp::history::{HistoryMetric, MAX_DAYS, MIN_DAYS};
use nba_mvp::model::{AdvancedStats, BasicStatLine, BasicStats, PlayerSeasonRecord};
use nba_mvp::pipeline::SeasonSnapshot;
use nba_mvp::season::{SeasonId, SeasonRange};
use nba_mvp::state::{AppState, Delta, Screen, apply_delta};

fn record(name: &str, points: f64, complete: bool) -> PlayerSeasonRecord {
    let line = BasicStatLine {
        player_name: name.to_string(),
        team: Some("TST".to_string()),
        position: None,
        age: None,
        games_played: 50,
        stats: BasicStats {
            points,
            ..BasicStats::default()
        },
    };
    let advanced = if complete {
        AdvancedStats {
            efficiency_rating: Some(points),
            true_shooting_pct: Some(0.55),
            win_shares: Some(points / 4.0),
        }
    } else {
        AdvancedStats::default()
    };
    PlayerSeasonRecord::from_basic(&line, advanced)
}

fn snapshot(season: u16, players: &[(&str, f64)]) -> SeasonSnapshot {
    let records = players
        .iter()
        .map(|(name, pts)| record(name, *pts, true))
        .collect();
    SeasonSnapshot::from_parts(SeasonId(season), records, Vec::new())
}

fn state() -> AppState {
    AppState::new(SeasonRange::new(SeasonId(2020), SeasonId(2025)), SeasonId(2025))
}

#[test]
fn snapshot_for_current_season_is_applied() {
    let mut state = state();
    apply_delta(&mut state, Delta::SeasonLoading(SeasonId(2025)));
    assert!(state.loading);

    apply_delta(
        &mut state,
        Delta::SetSnapshot(snapshot(2025, &[("Low", 10.0), ("High", 25.0)])),
    );
    assert!(!state.loading);
    assert_eq!(state.rows().len(), 2);
    assert_eq!(state.rows()[0].player_name(), "High");
    assert!(state.logs.back().is_some_and(|l| l.contains("Season 2025 loaded")));
}

#[test]
fn stale_snapshot_is_ignored() {
    let mut state = state();
    assert_eq!(state.step_season(false), Some(SeasonId(2024)));
    apply_delta(&mut state, Delta::SetSnapshot(snapshot(2025, &[("Old", 10.0)])));
    assert!(state.snapshot.is_none());
}

#[test]
fn selection_follows_player_across_reload() {
    let mut state = state();
    apply_delta(
        &mut state,
        Delta::SetSnapshot(snapshot(2025, &[("A", 30.0), ("B", 20.0), ("C", 10.0)])),
    );
    state.select_next();
    assert_eq!(state.selected_record().map(|r| r.player_name()), Some("B"));

    apply_delta(
        &mut state,
        Delta::SetSnapshot(snapshot(2025, &[("B", 20.0), ("D", 40.0), ("A", 30.0)])),
    );
    assert_eq!(state.selected_record().map(|r| r.player_name()), Some("B"));
    assert_eq!(state.selected, 2);
}

#[test]
fn selection_is_clamped_when_player_disappears() {
    let mut state = state();
    apply_delta(
        &mut state,
        Delta::SetSnapshot(snapshot(2025, &[("A", 30.0), ("B", 20.0), ("C", 10.0)])),
    );
    state.page_down(10);
    assert_eq!(state.selected, 2);
    apply_delta(&mut state, Delta::SetSnapshot(snapshot(2025, &[("A", 30.0)])));
    assert_eq!(state.selected, 0);
}

#[test]
fn unavailable_season_clears_view_and_keeps_message() {
    let mut state = state();
    apply_delta(&mut state, Delta::SetSnapshot(snapshot(2025, &[("A", 30.0)])));
    state.screen = Screen::Player;

    apply_delta(
        &mut state,
        Delta::SeasonUnavailable {
            season: SeasonId(2025),
            message: "per-game stats unavailable for season 2025: http 503".to_string(),
        },
    );
    assert!(state.snapshot.is_none());
    assert_eq!(state.screen, Screen::Players);
    assert!(state.unavailable.as_deref().is_some_and(|m| m.contains("503")));
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[WARN]")));

    apply_delta(&mut state, Delta::SetSnapshot(snapshot(2025, &[("A", 30.0)])));
    assert!(state.unavailable.is_none());
}

#[test]
fn changing_season_drops_the_previous_seasons_rows() {
    let mut state = state();
    apply_delta(&mut state, Delta::SetSnapshot(snapshot(2025, &[("Old Star", 30.0)])));
    state.ensure_history(&mut StdRng::seed_from_u64(3));

    assert_eq!(state.step_season(false), Some(SeasonId(2024)));
    apply_delta(&mut state, Delta::SeasonLoading(SeasonId(2024)));
    assert!(state.loading);
    assert!(state.snapshot.is_none());
    assert!(state.history.is_none());
    assert!(state.rows().is_empty());
    assert!(state.selected_record().is_none());

    apply_delta(&mut state, Delta::SetSnapshot(snapshot(2024, &[("New Star", 28.0)])));
    assert_eq!(state.rows()[0].player_name(), "New Star");
}

#[test]
fn changing_season_drops_the_previous_seasons_error() {
    let mut state = state();
    apply_delta(
        &mut state,
        Delta::SeasonUnavailable {
            season: SeasonId(2025),
            message: "per-game stats unavailable for season 2025: http 503".to_string(),
        },
    );
    assert!(state.unavailable.is_some());

    state.step_season(false);
    assert_eq!(state.season, SeasonId(2024));
    assert!(state.unavailable.is_none());
    assert!(state.loading);
}

#[test]
fn season_stepping_stops_at_range_edges() {
    let mut state = state();
    assert_eq!(state.step_season(true), None);
    for _ in 0..10 {
        state.step_season(false);
    }
    assert_eq!(state.season, SeasonId(2020));
}

#[test]
fn history_controls_are_bounded_and_invalidate_the_chart() {
    let mut state = state();
    apply_delta(
        &mut state,
        Delta::SetSnapshot(snapshot(2025, &[("A", 30.0), ("B", 20.0), ("C", 10.0), ("D", 5.0)])),
    );
    let mut rng = StdRng::seed_from_u64(11);
    state.ensure_history(&mut rng);
    assert_eq!(state.history.as_ref().map(|h| h.series.len()), Some(4));

    state.toggle_history_players();
    assert!(state.history.is_none());
    state.ensure_history(&mut rng);
    assert_eq!(state.history.as_ref().map(|h| h.series.len()), Some(3));

    for _ in 0..20 {
        state.adjust_history_days(true);
    }
    assert_eq!(state.history_days, MAX_DAYS);
    for _ in 0..20 {
        state.adjust_history_days(false);
    }
    assert_eq!(state.history_days, MIN_DAYS);

    state.toggle_history_metric();
    state.ensure_history(&mut rng);
    assert_eq!(state.history.as_ref().map(|h| h.metric), Some(HistoryMetric::Probability));
}

#[test]
fn players_without_scores_stay_out_of_the_leaderboard() {
    let mut state = state();
    let records = vec![record("Scored", 20.0, true), record("Partial", 35.0, false)];
    apply_delta(
        &mut state,
        Delta::SetSnapshot(SeasonSnapshot::from_parts(SeasonId(2025), records, Vec::new())),
    );
    assert_eq!(state.rows()[0].player_name(), "Partial");
    let board = state.leaderboard();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].player_name(), "Scored");
}
