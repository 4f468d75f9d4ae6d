use crate::app::App;
use crate::ui::helpers::{build_hint_line, color, draw_clock, focused_border_style};
use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use ticktock_core::format::format_lap_time;

pub fn draw_stopwatch(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(area);

    draw_clock_panel(f, app, chunks[0]);
    draw_laps(f, app, chunks[1]);
}

fn draw_clock_panel(f: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.stopwatch;
    let state = if snapshot.is_running {
        "▶ Running"
    } else if snapshot.elapsed_ms > 0 {
        "⏸ Paused"
    } else {
        "⏹ Ready"
    };

    let mut title = format!(" ⏱ Stopwatch - {} ", state);
    if snapshot.auto_lap {
        title.push_str("(auto lap) ");
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(build_hint_line(
            app.palette,
            &[("Space", "Start/Pause"), ("Enter", "Lap"), ("r", "Reset")],
        ))
        .border_style(focused_border_style(app.palette, snapshot.is_running));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let style = Style::default()
        .fg(color(app.palette.digits))
        .add_modifier(Modifier::BOLD);
    draw_clock(f, inner, &snapshot.display, style);
}

fn draw_laps(f: &mut Frame, app: &App, area: Rect) {
    let laps = &app.stopwatch.laps;
    let accent = color(app.palette.accent);

    let items: Vec<ListItem> = if laps.is_empty() {
        vec![
            ListItem::new(""),
            ListItem::new("  No laps yet."),
            ListItem::new("  Press [Enter] while the stopwatch runs to record one."),
        ]
    } else {
        laps.iter()
            .map(|lap| {
                let recorded = lap.timestamp.with_timezone(&Local).format("%H:%M:%S");
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("Lap {:<4}", lap.number),
                        Style::default().fg(accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(
                        "  {}   +{}   {}",
                        format_lap_time(lap.total_ms),
                        format_lap_time(lap.lap_ms),
                        recorded
                    )),
                ]))
            })
            .collect()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Laps ({}) ", laps.len()))
        .title_bottom(build_hint_line(
            app.palette,
            &[("↑↓", "Select"), ("d", "Delete"), ("0", "Clear"), ("e", "Export CSV")],
        ))
        .border_style(focused_border_style(app.palette, false));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("→ ");

    let mut state = ListState::default();
    if !laps.is_empty() {
        state.select(Some(app.selected_lap_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}
