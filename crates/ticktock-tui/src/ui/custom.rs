use crate::app::App;
use crate::ui::helpers::{build_hint_line, countdown_style, draw_clock, focused_border_style};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use ticktock_core::format::format_countdown_hms;
use ticktock_core::models::MAX_PRESETS;

pub fn draw_custom(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    draw_countdown(f, app, chunks[0]);
    draw_presets(f, app, chunks[1]);
}

fn draw_countdown(f: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.custom;

    let mut title = if snapshot.on_break {
        " ☕ Break ".to_string()
    } else if snapshot.total_ms > 0 {
        format!(" ⏳ Countdown of {} ", format_countdown_hms(snapshot.total_ms))
    } else {
        " ⏳ Countdown ".to_string()
    };

    if snapshot.auto_start_break && !snapshot.on_break {
        title.push_str(&format!("(then {} min break) ", snapshot.break_minutes));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(build_hint_line(
            app.palette,
            &[("Space", "Start/Pause"), ("r", "Reset"), ("s", "Set Time")],
        ))
        .border_style(focused_border_style(app.palette, snapshot.is_running));

    let inner = block.inner(area);
    f.render_widget(block, area);

    draw_clock(
        f,
        inner,
        &snapshot.display,
        countdown_style(app.palette, snapshot.is_running),
    );
}

fn draw_presets(f: &mut Frame, app: &App, area: Rect) {
    let presets = &app.custom.presets;

    let items: Vec<ListItem> = if presets.is_empty() {
        vec![
            ListItem::new(""),
            ListItem::new(" No presets yet."),
            ListItem::new(" Times you set are kept here."),
        ]
    } else {
        presets
            .iter()
            .map(|preset| ListItem::new(format!(" {}", preset.name)))
            .collect()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Presets ({}/{}) ", presets.len(), MAX_PRESETS))
        .title_bottom(build_hint_line(app.palette, &[("↑↓", "Select"), ("Enter", "Load")]))
        .border_style(focused_border_style(app.palette, false));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→");

    let mut state = ListState::default();
    if !presets.is_empty() {
        state.select(Some(app.selected_preset_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}
