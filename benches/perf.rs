use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use nba_mvp::merge::merge;
use nba_mvp::scoring::{rank, score};
use nba_mvp::stats_fetch::{clean_advanced_table, clean_basic_table};
use nba_mvp::table::parse_first_table;

const TEAMS: [&str; 6] = ["BOS", "DEN", "LAL", "NYK", "MIA", "2TM"];

fn per_game_page(players: usize) -> String {
    let mut html = String::from(
        "<table><thead><tr><th>Rk</th><th>Player</th><th>Age</th><th>Team</th><th>Pos</th>\
         <th>G</th><th>MP</th><th>FGA</th><th>FG%</th><th>3P%</th><th>FT%</th><th>TRB</th>\
         <th>AST</th><th>STL</th><th>BLK</th><th>PTS</th></tr></thead><tbody>",
    );
    for i in 0..players {
        let pts = 5.0 + (i % 30) as f64;
        html.push_str(&format!(
            "<tr><th>{rk}</th><td>Player {i}</td><td>{age}</td><td>{team}</td><td>G</td>\
             <td>{g}</td><td>28.0</td><td>14.0</td><td>.471</td><td>.362</td><td>.804</td>\
             <td>5.1</td><td>4.2</td><td>1.1</td><td>0.6</td><td>{pts:.1}</td></tr>",
            rk = i + 1,
            age = 20 + i % 15,
            team = TEAMS[i % TEAMS.len()],
            g = 20 + i % 60,
        ));
        if i % 20 == 19 {
            html.push_str("<tr class=\"thead\"><th>Rk</th><td>Player</td></tr>");
        }
    }
    html.push_str("</tbody></table>");
    html
}

fn advanced_page(players: usize) -> String {
    let mut html = String::from(
        "<table><thead><tr><th>Rk</th><th>Player</th><th>G</th><th>PER</th><th>TS%</th>\
         <th>WS</th></tr></thead><tbody>",
    );
    for i in 0..players {
        html.push_str(&format!(
            "<tr><th>{rk}</th><td>Player {i}</td><td>{g}</td><td>{per:.1}</td><td>.571</td>\
             <td>{ws:.1}</td></tr>",
            rk = i + 1,
            g = 20 + i % 60,
            per = 10.0 + (i % 20) as f64,
            ws = (i % 12) as f64,
        ));
    }
    html.push_str("</tbody></table>");
    html
}

fn bench_table_parse(c: &mut Criterion) {
    let page = per_game_page(550);
    c.bench_function("per_game_parse_clean", |b| {
        b.iter(|| {
            let table = parse_first_table(black_box(&page)).unwrap();
            let (rows, _) = clean_basic_table(&table);
            black_box(rows.len());
        })
    });
}

fn bench_merge_score_rank(c: &mut Criterion) {
    let basic_table = parse_first_table(&per_game_page(550)).unwrap();
    let advanced_table = parse_first_table(&advanced_page(550)).unwrap();
    let (basic, _) = clean_basic_table(&basic_table);
    let (advanced, _) = clean_advanced_table(&advanced_table);

    c.bench_function("merge_score_rank", |b| {
        b.iter(|| {
            let merged = merge(black_box(&basic), black_box(&advanced));
            let scored = score(&merged.records);
            let top = rank(&scored, 5);
            black_box(top.len());
        })
    });
}

criterion_group!(benches, bench_table_parse, bench_merge_score_rank);
criterion_main!(benches);
