use std::fs;
use std::path::PathBuf;

use nba_mvp::error::{DataIssue, StatTable};
use nba_mvp::stats_fetch::{clean_advanced_table, clean_basic_table};
use nba_mvp::table::{RawTable, parse_first_table};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn reads_first_table_with_grouped_header() {
    let table = parse_first_table(&read_fixture("per_game_2025.html")).expect("fixture should parse");
    assert_eq!(table.headers.len(), 16);
    assert_eq!(table.headers[0], "Rk");
    assert_eq!(table.headers[1], "Player");
    assert_eq!(table.column(&["pts"]), Some(15));
    // Decoy totals table further down the page is never read.
    assert!(table.rows.iter().all(|r| r.first().map(String::as_str) != Some("ignored")));
    assert_eq!(table.rows.len(), 9);
}

#[test]
fn basic_table_drops_label_and_nameless_rows_and_keeps_max_games() {
    let table = parse_first_table(&read_fixture("per_game_2025.html")).expect("fixture should parse");
    let (rows, issues) = clean_basic_table(&table);

    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    assert_eq!(
        rows.iter().map(|r| r.player_name.as_str()).collect::<Vec<_>>(),
        vec!["Alpha Guard", "Big Center", "J. Doe", "No Advanced", "Bench Guy"]
    );

    let doe = rows.iter().find(|r| r.player_name == "J. Doe").expect("traded player kept");
    assert_eq!(doe.games_played, 35);
    assert_eq!(doe.team.as_deref(), Some("2TM"));
    assert_eq!(doe.stats.points, 20.0);

    let alpha = &rows[0];
    assert_eq!(alpha.age, Some(26));
    assert_eq!(alpha.position.as_deref(), Some("PG"));
    assert_eq!(alpha.stats.field_goal_pct, 0.5);
    assert_eq!(alpha.stats.free_throw_pct, 0.9);
}

#[test]
fn basic_table_coerces_garbage_numbers_to_zero() {
    let table = parse_first_table(&read_fixture("per_game_2025.html")).expect("fixture should parse");
    let (rows, _) = clean_basic_table(&table);
    let bench = rows.iter().find(|r| r.player_name == "Bench Guy").expect("bench row kept");

    assert_eq!(bench.stats.field_goal_pct, 0.0);
    assert_eq!(bench.stats.three_point_pct, 0.0);
    assert_eq!(bench.stats.free_throw_pct, 0.75);
    for row in &rows {
        let s = &row.stats;
        for v in [
            s.points,
            s.assists,
            s.rebounds,
            s.steals,
            s.blocks,
            s.field_goal_pct,
            s.three_point_pct,
            s.free_throw_pct,
            s.minutes_played,
            s.field_goal_attempts,
        ] {
            assert!(v.is_finite());
        }
    }
}

#[test]
fn advanced_table_keeps_unparsable_metrics_missing() {
    let table = parse_first_table(&read_fixture("advanced_2025.html")).expect("fixture should parse");
    let (rows, issues) = clean_advanced_table(&table);

    assert!(issues.is_empty());
    assert_eq!(
        rows.iter().map(|r| r.player_name.as_str()).collect::<Vec<_>>(),
        vec!["Alpha Guard", "Big Center", "J. Doe", "Bench Guy"]
    );

    let bench = rows.iter().find(|r| r.player_name == "Bench Guy").expect("bench row kept");
    assert_eq!(bench.stats.efficiency_rating, None);
    assert_eq!(bench.stats.true_shooting_pct, Some(0.5));
    assert!(!bench.stats.is_complete());

    let doe = rows.iter().find(|r| r.player_name == "J. Doe").expect("traded player kept");
    assert_eq!(doe.games_played, Some(35));
    assert_eq!(doe.stats.win_shares, Some(5.0));
}

#[test]
fn missing_basic_columns_are_reported_and_zeroed() {
    let table = RawTable {
        headers: vec!["Rk".to_string(), "Player".to_string(), "G".to_string(), "PTS".to_string()],
        rows: vec![vec![
            "1".to_string(),
            "Solo Scorer".to_string(),
            "50".to_string(),
            "22.5".to_string(),
        ]],
    };
    let (rows, issues) = clean_basic_table(&table);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].stats.points, 22.5);
    assert_eq!(rows[0].stats.assists, 0.0);
    assert_eq!(rows[0].games_played, 50);
    assert!(issues.contains(&DataIssue::SchemaDrift {
        table: StatTable::PerGame,
        column: "AST".to_string(),
    }));
    assert!(issues.iter().all(|i| matches!(i, DataIssue::SchemaDrift { .. })));
}

#[test]
fn missing_advanced_column_is_reported_and_left_missing() {
    let table = RawTable {
        headers: vec!["Rk".to_string(), "Player".to_string(), "PER".to_string(), "WS".to_string()],
        rows: vec![vec![
            "1".to_string(),
            "Solo Scorer".to_string(),
            "24.0".to_string(),
            "9.5".to_string(),
        ]],
    };
    let (rows, issues) = clean_advanced_table(&table);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].stats.efficiency_rating, Some(24.0));
    assert_eq!(rows[0].stats.win_shares, Some(9.5));
    assert_eq!(rows[0].stats.true_shooting_pct, None);
    assert_eq!(
        issues,
        vec![DataIssue::SchemaDrift {
            table: StatTable::Advanced,
            column: "TS%".to_string(),
        }]
    );
}

#[test]
fn page_without_table_is_an_error() {
    let err = parse_first_table("<html><body><p>Page not found</p></body></html>")
        .expect_err("no table");
    assert!(err.to_string().contains("no table"));
}
