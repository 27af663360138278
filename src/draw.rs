use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::symbols::Marker;
use tui::text::{Line, Span};
use tui::widgets::{
    Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table, Tabs, Wrap,
};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use mlb_api::branding::{Palette, hex_to_rgb};
use mlb_api::dashboard::{Dashboard, SchedulePanel, TeamMetrics};
use mlb_api::failover::FetchResult;
use mlb_api::{Elimination, GameResult, ScheduleEntry, StatField};

static TABS: &[&str; 3] = &["Overview", "Standings", "Schedule"];

const HELP_TEXT: &str = "\
←/→  h/l   previous / next team
↑/↓        next / previous season
r          reload
1 2 3      overview / standings / schedule
j/k        scroll schedule
f          full screen
\"          toggle logs
?          help (Esc to close)
q          quit";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let drawn = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match (app.state.active_tab, app.state.dashboard.as_ref()) {
            (MenuItem::Help, _) => draw_placeholder(f, layout.main, HELP_TEXT),
            (_, None) => draw_placeholder(f, layout.main, &loading_message(app)),
            (MenuItem::Overview, Some(dashboard)) => draw_overview(f, layout.main, dashboard),
            (MenuItem::Standings, Some(dashboard)) => draw_standings(f, layout.main, dashboard),
            (MenuItem::Schedule, Some(dashboard)) => {
                draw_schedule(f, layout.main, dashboard, app.state.schedule_scroll)
            }
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = drawn {
        error!("failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn loading_message(app: &App) -> String {
    let selection = &app.state.selection;
    match selection.team() {
        Some(team) => format!("Loading {} {}...", team.name, selection.season),
        None => "No team selected".to_string(),
    }
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Overview => 0,
        MenuItem::Standings => 1,
        MenuItem::Schedule => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

fn draw_overview(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let palette = dashboard.palette();
    let block = default_border(accent(&palette))
        .title(format!(" {} {} ", dashboard.team.name, dashboard.season));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [cards_top, cards_bottom, body] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let metrics = dashboard.metrics();
    let top: [Rect; 4] = Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(cards_top);
    let bottom: [Rect; 4] = Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(cards_bottom);
    for (card, rect) in metric_cards(&metrics).iter().zip(top.iter().chain(bottom.iter())) {
        draw_card(f, *rect, card);
    }

    let [stats_area, sources_area] =
        Layout::horizontal([Constraint::Fill(2), Constraint::Fill(1)]).areas(body);
    draw_team_stats(f, stats_area, dashboard);
    draw_sources(f, sources_area, dashboard);
}

struct Card {
    title: &'static str,
    value: String,
    detail: String,
    color: Color,
}

fn metric_cards(m: &TeamMetrics) -> [Card; 8] {
    let record = match (m.wins, m.losses) {
        (Some(w), Some(l)) => format!("{w}-{l}"),
        _ => "-".to_string(),
    };
    let week = match (m.week_wins, m.week_losses) {
        (Some(w), Some(l)) => format!("{w}-{l} last 7 days"),
        _ => String::new(),
    };
    let delta = m
        .win_pct_delta
        .map(|d| format!("{d:+.3} over the week"))
        .unwrap_or_default();
    let streak_color = match m.streak {
        Some(s) if s.is_winning() => Color::Green,
        Some(_) => Color::Red,
        None => Color::White,
    };
    let elimination = m
        .elimination
        .map(|e| format!("E# {e}: {}", e.help()))
        .unwrap_or_default();
    let elimination_color = match m.elimination {
        Some(Elimination::Division | Elimination::Playoffs) => Color::Red,
        _ => Color::White,
    };
    let run_diff_color = match m.run_differential {
        Some(d) if d > 0.0 => Color::Green,
        Some(d) if d < 0.0 => Color::Red,
        _ => Color::White,
    };

    [
        Card {
            title: "Record",
            value: record,
            detail: week,
            color: Color::White,
        },
        Card {
            title: "Win %",
            value: m.win_pct.map(rate).unwrap_or_else(dash),
            detail: delta,
            color: Color::White,
        },
        Card {
            title: "Streak",
            value: m.streak.map(|s| s.to_string()).unwrap_or_else(dash),
            detail: String::new(),
            color: streak_color,
        },
        Card {
            title: "Games Back",
            value: m.games_behind.map(games_behind).unwrap_or_else(dash),
            detail: elimination,
            color: elimination_color,
        },
        Card {
            title: "Run Diff",
            value: m.run_differential.map(|d| format!("{d:+.0}")).unwrap_or_else(dash),
            detail: String::new(),
            color: run_diff_color,
        },
        Card {
            title: "WAR",
            value: m.war.map(|w| format!("{w:.1}")).unwrap_or_else(dash),
            detail: String::new(),
            color: Color::White,
        },
        Card {
            title: "AVG / OBP / SLG",
            value: triple(&m.slash_line, rate),
            detail: String::new(),
            color: Color::White,
        },
        Card {
            title: "ERA / FIP / WHIP",
            value: triple(&m.pitching_line, |v| format!("{v:.2}")),
            detail: String::new(),
            color: Color::White,
        },
    ]
}

fn draw_card(f: &mut Frame, area: Rect, card: &Card) {
    let block = default_border(Color::DarkGray).title(format!(" {} ", card.title));
    let lines = vec![
        Line::from(Span::styled(
            card.value.clone(),
            Style::default().fg(card.color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(card.detail.clone(), Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

fn draw_team_stats(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let block = default_border(Color::DarkGray).title(" Team Stats ");
    let Some(record) = dashboard.team_record() else {
        draw_unavailable(f, area, block, &dashboard.team_stats);
        return;
    };

    let values: Vec<(&str, String)> = StatField::ALL
        .iter()
        .map(|field| {
            let value = record.get(*field).map(|v| stat_value(*field, v)).unwrap_or_else(dash);
            (field.label(), value)
        })
        .collect();
    let half = values.len().div_ceil(2);
    let rows: Vec<Row> = (0..half)
        .map(|i| {
            let right = values.get(i + half);
            Row::new(vec![
                values[i].0.to_string(),
                values[i].1.clone(),
                right.map(|r| r.0.to_string()).unwrap_or_default(),
                right.map(|r| r.1.clone()).unwrap_or_default(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(2),
            Constraint::Fill(1),
        ],
    )
    .block(block);
    f.render_widget(table, area);
}

/// Which provider answered each panel, or why it is empty.
fn draw_sources(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let block = default_border(Color::DarkGray).title(" Sources ");
    let mut lines = Vec::new();
    panel_status(&mut lines, "Team stats", &dashboard.team_stats);
    panel_status(&mut lines, "Standings", &dashboard.standings);
    match &dashboard.schedule {
        Ok(panel) => {
            lines.push(Line::from(format!("Schedule: {}", panel.games.served_by)));
            if !panel.games.degraded.is_empty() {
                lines.push(dim(format!("  {} rows skipped", panel.games.degraded.len())));
            }
        }
        Err(e) => lines.push(unavailable_line("Schedule", &e.to_string())),
    }
    match &dashboard.branding {
        Ok(_) => lines.push(Line::from("Colors: team logo")),
        Err(e) => lines.push(unavailable_line("Colors", &e.to_string())),
    }
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn panel_status<T>(lines: &mut Vec<Line>, name: &str, result: &FetchResult<T>) {
    match result {
        Ok(fetched) => {
            lines.push(Line::from(format!("{name}: {}", fetched.served_by)));
            if !fetched.degraded.is_empty() {
                lines.push(dim(format!("  {} rows skipped", fetched.degraded.len())));
            }
        }
        Err(e) => lines.push(unavailable_line(name, &e.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

fn draw_standings(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let palette = dashboard.palette();
    let division = dashboard.division();
    let title = division
        .first()
        .map(|r| format!(" {} ", r.division))
        .unwrap_or_else(|| " Standings ".to_string());
    let block = default_border(accent(&palette)).title(title);

    if division.is_empty() {
        draw_unavailable(f, area, block, &dashboard.standings);
        return;
    }

    let highlight = Style::default()
        .fg(accent(&palette))
        .add_modifier(Modifier::BOLD);
    let rows: Vec<Row> = division
        .iter()
        .map(|r| {
            let row = Row::new(vec![
                r.rank.to_string(),
                r.team.clone(),
                r.wins.to_string(),
                r.losses.to_string(),
                rate(r.win_pct),
                games_behind(r.games_behind),
                r.wildcard_games_behind.map(games_behind).unwrap_or_else(dash),
                r.elimination.map(|e| e.to_string()).unwrap_or_else(dash),
                r.wildcard_elimination.map(|e| e.to_string()).unwrap_or_else(dash),
            ]);
            if dashboard.team.matches(&r.team) {
                row.style(highlight)
            } else {
                row
            }
        })
        .collect();

    let header = Row::new(vec!["Rk", "Team", "W", "L", "Pct", "GB", "WC GB", "E#", "WC E#"])
        .style(Style::default().add_modifier(Modifier::UNDERLINED));
    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Length(6),
        ],
    )
    .header(header);

    let inner = block.inner(area);
    f.render_widget(block, area);
    let [table_area, legend_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(inner);
    f.render_widget(table, table_area);

    let legend: Vec<Line> = [Elimination::Division, Elimination::Playoffs, Elimination::Number(0)]
        .iter()
        .map(|e| {
            let marker = match e {
                Elimination::Number(_) => "#".to_string(),
                other => other.to_string(),
            };
            dim(format!("{marker}  {}", e.help()))
        })
        .collect();
    f.render_widget(Paragraph::new(legend), legend_area);
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

fn draw_schedule(f: &mut Frame, area: Rect, dashboard: &Dashboard, scroll: u16) {
    let palette = dashboard.palette();
    let block = default_border(accent(&palette)).title(" Schedule ");
    let panel = match &dashboard.schedule {
        Ok(panel) => panel,
        Err(e) => {
            draw_message(f, area, block, &format!("Schedule data not available\n\n{e}"));
            return;
        }
    };

    let inner = block.inner(area);
    f.render_widget(block, area);
    let [games_area, side] =
        Layout::horizontal([Constraint::Fill(3), Constraint::Fill(2)]).areas(inner);
    draw_games(f, games_area, &panel.games.value, scroll);

    let [week_area, trend_area, attendance_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Fill(2),
        Constraint::Fill(1),
    ])
    .areas(side);
    draw_week(f, week_area, panel);
    draw_trend(f, trend_area, panel, &palette);
    draw_attendance(f, attendance_area, panel, &palette);
}

fn draw_games(f: &mut Frame, area: Rect, games: &[ScheduleEntry], scroll: u16) {
    let rows: Vec<Row> = games
        .iter()
        .skip(usize::from(scroll))
        .map(|g| {
            let style = match g.outcome() {
                Some(GameResult::Win) => Style::default().fg(Color::Green),
                Some(GameResult::Loss) => Style::default().fg(Color::Red),
                Some(GameResult::Other) => Style::default().fg(Color::Yellow),
                None => Style::default().fg(Color::DarkGray),
            };
            let date = g
                .date
                .map(|d| d.format("%a %b %-d").to_string())
                .unwrap_or_else(|| g.raw_date.clone());
            let opponent = if g.home {
                g.opponent.clone()
            } else {
                format!("@ {}", g.opponent)
            };
            let score = match (g.runs_scored, g.runs_allowed) {
                (Some(r), Some(ra)) => format!("{r}-{ra}"),
                _ => String::new(),
            };
            Row::new(vec![
                g.game_number.to_string(),
                date,
                opponent,
                g.result.clone().unwrap_or_default(),
                score,
                g.record.clone().unwrap_or_default(),
                g.streak.map(|s| s.to_string()).unwrap_or_default(),
                g.attendance.map(|a| a.to_string()).unwrap_or_default(),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["G", "Date", "Opp", "W/L", "R-RA", "Rec", "Strk", "Att"])
        .style(Style::default().add_modifier(Modifier::UNDERLINED));
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(11),
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Fill(1),
        ],
    )
    .header(header);
    f.render_widget(table, area);
}

fn draw_week(f: &mut Frame, area: Rect, panel: &SchedulePanel) {
    let block = default_border(Color::DarkGray).title(" Last 7 Days ");
    let lines = match &panel.week {
        Ok(week) => {
            let mut lines = vec![Line::from(format!("{}-{}", week.wins, week.losses))];
            if let Some(streak) = week.streak {
                lines.push(Line::from(format!("Streak {streak}")));
            }
            if week.undated > 0 {
                lines.push(dim(format!("{} games without a date", week.undated)));
            }
            lines
        }
        Err(e) => vec![dim(e.to_string())],
    };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn draw_trend(f: &mut Frame, area: Rect, panel: &SchedulePanel, palette: &Palette) {
    let block = default_border(Color::DarkGray).title(" Wins & Losses ");
    if panel.trend.is_empty() {
        draw_message(f, area, block, "No decided games yet");
        return;
    }
    let colors = palette.chart_colors();
    let wins: Vec<(f64, f64)> = panel
        .trend
        .iter()
        .enumerate()
        .map(|(i, p)| ((i + 1) as f64, f64::from(p.wins)))
        .collect();
    let losses: Vec<(f64, f64)> = panel
        .trend
        .iter()
        .enumerate()
        .map(|(i, p)| ((i + 1) as f64, f64::from(p.losses)))
        .collect();
    let games = panel.trend.len() as f64;
    let top = panel
        .trend
        .last()
        .map(|p| f64::from(p.wins.max(p.losses)))
        .unwrap_or(1.0)
        .max(1.0);

    let datasets = vec![
        Dataset::default()
            .name("W")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(hex_color(&colors[0])))
            .data(&wins),
        Dataset::default()
            .name("L")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(hex_color(&colors[1])))
            .data(&losses),
    ];
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([1.0, games.max(2.0)])
                .labels(vec!["1".to_string(), format!("{games}")]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, top])
                .labels(vec!["0".to_string(), format!("{top}")]),
        );
    f.render_widget(chart, area);
}

fn draw_attendance(f: &mut Frame, area: Rect, panel: &SchedulePanel, palette: &Palette) {
    let block = default_border(Color::DarkGray).title(" Attendance ");
    let points: Vec<(f64, f64)> = panel
        .trend
        .iter()
        .enumerate()
        .filter_map(|(i, p)| Some(((i + 1) as f64, f64::from(p.attendance?))))
        .collect();
    if points.is_empty() {
        draw_message(f, area, block, "No attendance reported");
        return;
    }
    let top = points.iter().map(|(_, a)| *a).fold(1.0, f64::max);
    let games = panel.trend.len() as f64;
    let colors = palette.chart_colors();
    let chart = Chart::new(vec![
        Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(hex_color(&colors[2])))
            .data(&points),
    ])
    .block(block)
    .x_axis(Axis::default().bounds([1.0, games.max(2.0)]))
    .y_axis(
        Axis::default()
            .bounds([0.0, top])
            .labels(vec!["0".to_string(), format!("{top:.0}")]),
    );
    f.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

fn draw_unavailable<T>(f: &mut Frame, area: Rect, block: Block, result: &FetchResult<T>) {
    let msg = match result {
        Err(e) => format!("Data not available\n\n{e}"),
        Ok(fetched) => format!("Not listed by {}", fetched.served_by),
    };
    draw_message(f, area, block, &msg);
}

fn draw_message(f: &mut Frame, area: Rect, block: Block, msg: &str) {
    f.render_widget(
        Paragraph::new(msg.to_string())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    draw_message(f, area, default_border(Color::DarkGray), msg);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .output_separator(' ')
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

fn unavailable_line(name: &str, reason: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{name}: ")),
        Span::styled("data not available", Style::default().fg(Color::Red)),
        Span::styled(format!(" ({reason})"), Style::default().fg(Color::DarkGray)),
    ])
}

fn dim(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

/// Border color from the team palette; black would vanish on a dark terminal.
fn accent(palette: &Palette) -> Color {
    palette
        .colors
        .iter()
        .find(|c| !c.eq_ignore_ascii_case(mlb_api::branding::BLACK))
        .map(|c| hex_color(c))
        .unwrap_or(Color::White)
}

fn hex_color(hex: &str) -> Color {
    hex_to_rgb(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Gray)
}

fn dash() -> String {
    "-".to_string()
}

/// `.262` style, as rate stats are printed on a scoreboard.
fn rate(value: f64) -> String {
    let text = format!("{value:.3}");
    match text.strip_prefix("0.") {
        Some(rest) => format!(".{rest}"),
        None => text,
    }
}

fn games_behind(gb: f64) -> String {
    if gb == 0.0 {
        dash()
    } else if gb < 0.0 {
        format!("+{:.1}", -gb)
    } else {
        format!("{gb:.1}")
    }
}

fn triple(values: &[Option<f64>; 3], fmt: impl Fn(f64) -> String) -> String {
    values
        .iter()
        .map(|v| v.map(&fmt).unwrap_or_else(dash))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn stat_value(field: StatField, value: f64) -> String {
    match field {
        StatField::Average | StatField::OnBase | StatField::Slugging | StatField::Ops
        | StatField::Woba => rate(value),
        StatField::Era | StatField::Whip | StatField::Fip | StatField::StrikeoutsPerNine
        | StatField::WalksPerNine => format!("{value:.2}"),
        StatField::War | StatField::InningsPitched => format!("{value:.1}"),
        _ => format!("{value:.0}"),
    }
}
