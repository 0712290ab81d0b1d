use std::io;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::rngs::ThreadRng;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
};

use nba_mvp::config::AppConfig;
use nba_mvp::history::SimulatedHistory;
use nba_mvp::logging::init_file_tracing;
use nba_mvp::model::ScoredRecord;
use nba_mvp::pipeline::SeasonPipeline;
use nba_mvp::provider::spawn_provider;
use nba_mvp::source::HttpPageSource;
use nba_mvp::state::{AppState, Delta, ProviderCommand, Screen, apply_delta};

const SERIES_COLORS: [Color; 5] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Red,
];

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    export_path: PathBuf,
    rng: ThreadRng,
}

impl App {
    fn new(config: &AppConfig, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(config.seasons, config.default_season),
            should_quit: false,
            cmd_tx,
            export_path: config.export_path.clone(),
            rng: rand::thread_rng(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Players,
            KeyCode::Char('2') | KeyCode::Enter => {
                if self.state.selected_record().is_some() {
                    self.state.screen = Screen::Player;
                }
            }
            KeyCode::Char('3') => self.state.screen = Screen::Leaderboard,
            KeyCode::Char('4') => self.state.screen = Screen::History,
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Players,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::PageDown => self.state.page_down(10),
            KeyCode::PageUp => self.state.page_up(10),
            KeyCode::Char('[') => self.change_season(false),
            KeyCode::Char(']') => self.change_season(true),
            KeyCode::Char('R') => self.send(
                ProviderCommand::RefreshSeason(self.state.season),
                "Refresh",
            ),
            KeyCode::Char('m') => self.state.toggle_history_metric(),
            KeyCode::Char('n') => self.state.toggle_history_players(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.adjust_history_days(true),
            KeyCode::Char('-') => self.state.adjust_history_days(false),
            KeyCode::Char('r') => {
                self.state.reroll_history();
                self.state.push_log("[INFO] History re-rolled (simulated)");
            }
            KeyCode::Char('e') => self.request_export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn change_season(&mut self, newer: bool) {
        if let Some(season) = self.state.step_season(newer) {
            self.send(ProviderCommand::LoadSeason(season), "Season load");
        }
    }

    fn request_export(&mut self) {
        if self.state.snapshot.is_none() {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        }
        let cmd = ProviderCommand::Export {
            season: self.state.season,
            path: self.export_path.display().to_string(),
        };
        self.send(cmd, "Export");
    }

    fn send(&mut self, cmd: ProviderCommand, what: &str) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[INFO] {what} unavailable"));
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {what} request failed"));
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    let log_dir = std::env::current_dir()?.join("logs");
    let tracing_err = init_file_tracing(&log_dir).err();
    tracing::info!(season = %config.default_season, base_url = %config.base_url, "starting dashboard");

    let source = Arc::new(HttpPageSource::from_config(&config));
    let pipeline = SeasonPipeline::from_config(source, &config);

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let _provider = spawn_provider(pipeline, tx, cmd_rx);

    let mut app = App::new(&config, Some(cmd_tx));
    if let Some(err) = tracing_err {
        app.state.push_log(format!("[WARN] File logging disabled: {err:#}"));
    }
    let first = app.state.season;
    app.send(ProviderCommand::LoadSeason(first), "Season load");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.state.ensure_history(&mut app.rng);

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let state = &app.state;
    if let Some(message) = &state.unavailable {
        let text = format!("Data unavailable for season {}\n\n{message}", state.season);
        let para = Paragraph::new(text).style(Style::default().fg(Color::Red));
        frame.render_widget(para, chunks[1]);
    } else if state.snapshot.is_none() {
        let text = if state.loading {
            format!("Loading season {}...", state.season)
        } else {
            "No season loaded".to_string()
        };
        let para = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, chunks[1]);
    } else {
        match state.screen {
            Screen::Players => render_players(frame, chunks[1], state),
            Screen::Player => render_player(frame, chunks[1], state),
            Screen::Leaderboard => render_leaderboard(frame, chunks[1], state),
            Screen::History => render_history(frame, chunks[1], state),
        }
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Players => "Players",
        Screen::Player => "Player",
        Screen::Leaderboard => "MVP Leaderboard",
        Screen::History => "History (SIMULATED)",
    };
    let loading = if state.loading { " | loading..." } else { "" };
    format!(
        "NBA MVP | Season {} ({}-{}) | {screen}{loading}",
        state.season, state.seasons.first, state.seasons.last
    )
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Players => {
            "1-4 Screens | [ ] Season | j/k Move | Enter Player | e Export | ? Help | q Quit".to_string()
        }
        Screen::Player => "1-4 Screens | b/Esc Back | j/k Player | [ ] Season | ? Help | q Quit".to_string(),
        Screen::Leaderboard => "1-4 Screens | [ ] Season | e Export | ? Help | q Quit".to_string(),
        Screen::History => {
            "m Metric | n 3/5 Players | +/- Days | r Re-roll | [ ] Season | ? Help | q Quit".to_string()
        }
    }
}

fn player_columns() -> [Constraint; 15] {
    [
        Constraint::Min(22),
        Constraint::Length(5),
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(7),
    ]
}

const PLAYER_HEADERS: [&str; 15] = [
    "Player", "Tm", "G", "PTS", "AST", "TRB", "STL", "BLK", "FG%", "3P%", "FT%", "PER", "TS%",
    "WS", "MVP",
];

fn player_cells(row: &ScoredRecord) -> [String; 15] {
    let r = &row.record;
    let b = &r.basic;
    let a = &r.advanced;
    [
        r.player_name.clone(),
        r.team.clone().unwrap_or_else(|| "-".to_string()),
        r.games_played.to_string(),
        format!("{:.1}", b.points),
        format!("{:.1}", b.assists),
        format!("{:.1}", b.rebounds),
        format!("{:.1}", b.steals),
        format!("{:.1}", b.blocks),
        format!("{:.3}", b.field_goal_pct),
        format!("{:.3}", b.three_point_pct),
        format!("{:.3}", b.free_throw_pct),
        opt_fixed(a.efficiency_rating, 1),
        opt_fixed(a.true_shooting_pct, 3),
        opt_fixed(a.win_shares, 1),
        opt_fixed(row.mvp_score, 2),
    ]
}

fn opt_fixed(value: Option<f64>, places: usize) -> String {
    value
        .map(|v| format!("{v:.places$}"))
        .unwrap_or_else(|| "-".to_string())
}

fn render_players(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = player_columns();
    render_row(
        frame,
        sections[0],
        &widths,
        &PLAYER_HEADERS.map(String::from),
        Style::default().add_modifier(Modifier::BOLD),
    );

    let list_area = sections[1];
    let rows = state.rows();
    if rows.is_empty() {
        let empty = Paragraph::new("No players in this season")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, rows.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let style = if idx == state.selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else if rows[idx].mvp_score.is_none() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        if idx == state.selected {
            frame.render_widget(Block::default().style(style), row_area);
        }
        render_row(frame, row_area, &widths, &player_cells(rows[idx]), style);
    }
}

fn render_row(frame: &mut Frame, area: Rect, widths: &[Constraint], cells: &[String], style: Style) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    for (col, text) in cols.iter().zip(cells) {
        render_cell_text(frame, *col, text, style);
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_player(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(row) = state.selected_record() else {
        frame.render_widget(Paragraph::new("No player selected"), area);
        return;
    };
    let para = Paragraph::new(player_detail_text(row))
        .block(Block::default().title(row.record.player_name.as_str()).borders(Borders::ALL));
    frame.render_widget(para, area);
}

fn player_detail_text(row: &ScoredRecord) -> String {
    let r = &row.record;
    let b = &r.basic;
    let a = &r.advanced;
    let score = match row.mvp_score {
        Some(v) => format!("{v:.3}"),
        None => "undefined (advanced stats missing)".to_string(),
    };
    let age = r.age.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    [
        format!(
            "Team: {}   Pos: {}   Age: {age}   G: {}",
            r.team.as_deref().unwrap_or("-"),
            r.position.as_deref().unwrap_or("-"),
            r.games_played
        ),
        String::new(),
        format!(
            "PTS {:.1}   AST {:.1}   TRB {:.1}   STL {:.1}   BLK {:.1}",
            b.points, b.assists, b.rebounds, b.steals, b.blocks
        ),
        format!(
            "FG% {:.3}   3P% {:.3}   FT% {:.3}   MP {:.1}   FGA {:.1}",
            b.field_goal_pct, b.three_point_pct, b.free_throw_pct, b.minutes_played, b.field_goal_attempts
        ),
        format!(
            "PER {}   TS% {}   WS {}",
            opt_fixed(a.efficiency_rating, 1),
            opt_fixed(a.true_shooting_pct, 3),
            opt_fixed(a.win_shares, 1)
        ),
        String::new(),
        format!("MVP proxy score: {score}"),
    ]
    .join("\n")
}

fn render_leaderboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let leaders = state.leaderboard();
    let sections = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let mut lines = vec![format!("{:<4}{:<24}{:>7}{:>7}{:>7}{:>8}", "#", "Player", "PTS", "AST", "TRB", "Score")];
    for (idx, row) in leaders.iter().enumerate() {
        lines.push(format!(
            "{:<4}{:<24}{:>7.1}{:>7.1}{:>7.1}{:>8}",
            idx + 1,
            row.player_name(),
            row.record.basic.points,
            row.record.basic.assists,
            row.record.basic.rebounds,
            opt_fixed(row.mvp_score, 2)
        ));
    }
    if leaders.is_empty() {
        lines.push("No player has a defined MVP score".to_string());
    }
    let table = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Top 5 MVP").borders(Borders::ALL));
    frame.render_widget(table, sections[0]);

    frame.render_widget(leaderboard_chart(&leaders), sections[1]);
}

fn leaderboard_chart(leaders: &[ScoredRecord]) -> BarChart<'static> {
    let bars: Vec<Bar<'static>> = leaders
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let score = row.mvp_score.unwrap_or(0.0);
            Bar::default()
                .label(Line::from(row.player_name().to_string()))
                .value((score * 100.0).round().max(0.0) as u64)
                .text_value(format!("{score:.2}"))
                .style(Style::default().fg(SERIES_COLORS[idx % SERIES_COLORS.len()]))
        })
        .collect();

    BarChart::default()
        .block(Block::default().title("MVP Score").borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
}

fn render_history(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(history) = &state.history else {
        let para = Paragraph::new("No simulated history (no player has a defined score)")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, area);
        return;
    };

    let points = history_points(history);
    let datasets: Vec<Dataset> = history
        .series
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(idx, (series, data))| {
            Dataset::default()
                .name(series.player_name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[idx % SERIES_COLORS.len()]))
                .data(data)
        })
        .collect();

    let (y_min, y_max) = y_bounds(history);
    let days = history.day_labels.len();
    let x_labels: Vec<Span> = [history.day_labels.first(), history.day_labels.last()]
        .into_iter()
        .flatten()
        .map(|label| Span::raw(label.clone()))
        .collect();
    let y_labels = vec![
        Span::raw(format!("{y_min:.2}")),
        Span::raw(format!("{y_max:.2}")),
    ];

    let title = format!("{} | {}", history.metric.label(), history.label());
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(Color::Yellow)))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("Day")
                .bounds([0.0, days.saturating_sub(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(history.metric.label())
                .bounds([y_min, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

fn history_points(history: &SimulatedHistory) -> Vec<Vec<(f64, f64)>> {
    history
        .series
        .iter()
        .map(|s| {
            s.values
                .iter()
                .enumerate()
                .map(|(day, v)| (day as f64, *v))
                .collect()
        })
        .collect()
}

fn y_bounds(history: &SimulatedHistory) -> (f64, f64) {
    let min = history
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(f64::INFINITY, f64::min);
    let max = history.max_value();
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.1).max(0.05);
    ((min - pad).max(0.0), max + pad)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "NBA MVP - Help",
        "",
        "Global:",
        "  1 / 2 / 3 / 4  Players / Player / Leaderboard / History",
        "  [ / ]          Older / newer season",
        "  R              Refresh season (drop cache)",
        "  e              Export to xlsx",
        "  ?              Toggle help",
        "  q              Quit",
        "",
        "Players:",
        "  j/k or ↑/↓     Move",
        "  PgUp / PgDn    Page",
        "  Enter          Player view",
        "  b / Esc        Back",
        "",
        "History (simulated, not real data):",
        "  m              Proxy score / probability",
        "  n              3 or 5 players",
        "  + / -          More / fewer days",
        "  r              Re-roll",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
