use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use nba_mvp::config::AppConfig;
use nba_mvp::logging::init_stderr_tracing;
use nba_mvp::model::ScoredRecord;
use nba_mvp::pipeline::SeasonPipeline;
use nba_mvp::season::SeasonId;
use nba_mvp::source::HttpPageSource;

const DEFAULT_TOP: usize = 5;

#[derive(Serialize)]
struct RankOutput<'a> {
    season: SeasonId,
    players: usize,
    undefined_scores: usize,
    leaders: &'a [ScoredRecord],
}

fn main() -> Result<()> {
    let config = AppConfig::load();
    let _ = init_stderr_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let season = parse_arg::<SeasonId>(&args, "--season").unwrap_or(config.default_season);
    let top = parse_arg::<usize>(&args, "--top").unwrap_or(DEFAULT_TOP).max(1);
    let json = has_flag(&args, "--json");

    let source = Arc::new(HttpPageSource::from_config(&config));
    let pipeline = SeasonPipeline::from_config(source, &config);
    let snapshot = pipeline
        .load(season)
        .with_context(|| format!("cannot rank season {season}"))?;
    let leaders = snapshot.leaderboard(top);

    if json {
        let out = RankOutput {
            season: snapshot.season,
            players: snapshot.records.len(),
            undefined_scores: snapshot.undefined_scores(),
            leaders: &leaders,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("MVP proxy leaderboard, season {}", snapshot.season);
    println!(
        "Players: {} ({} without a defined score)",
        snapshot.records.len(),
        snapshot.undefined_scores()
    );
    println!(
        "{:<4}{:<26}{:>6}{:>7}{:>7}{:>7}{:>7}{:>7}{:>9}",
        "#", "Player", "Tm", "PTS", "AST", "TRB", "PER", "WS", "Score"
    );
    for (idx, row) in leaders.iter().enumerate() {
        let r = &row.record;
        println!(
            "{:<4}{:<26}{:>6}{:>7.1}{:>7.1}{:>7.1}{:>7.1}{:>7.1}{:>9.3}",
            idx + 1,
            r.player_name,
            r.team.as_deref().unwrap_or("-"),
            r.basic.points,
            r.basic.assists,
            r.basic.rebounds,
            r.advanced.efficiency_rating.unwrap_or_default(),
            r.advanced.win_shares.unwrap_or_default(),
            row.mvp_score.unwrap_or_default()
        );
    }
    if !snapshot.issues.is_empty() {
        println!("Data issues: {}", snapshot.issues.len());
        for issue in snapshot.issues.iter().take(8) {
            println!(" - {issue}");
        }
    }

    Ok(())
}

/// Accepts both `--name value` and `--name=value`.
fn parse_arg<T: FromStr>(args: &[String], name: &str) -> Option<T> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && let Ok(v) = raw.trim().parse::<T>()
        {
            return Some(v);
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && let Ok(v) = next.trim().parse::<T>()
        {
            return Some(v);
        }
    }
    None
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
