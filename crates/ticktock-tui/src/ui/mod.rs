mod big_text;
mod confirmation;
mod custom;
mod help;
pub mod helpers;
mod input;
mod pomodoro;
mod settings;
mod stopwatch;

use crate::app::{App, AppView, InputMode};
use confirmation::{
    draw_alarm_modal, draw_lap_confirmation_modal, draw_pomodoro_finished_modal,
    draw_reset_settings_modal,
};
use custom::draw_custom;
use help::draw_help_modal;
use helpers::color;
use input::draw_input_modal;
use pomodoro::draw_pomodoro;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use settings::draw_settings;
use stopwatch::draw_stopwatch;

pub fn draw(f: &mut Frame, app: &App) {
    let background = Block::default().style(
        Style::default()
            .bg(color(app.palette.background))
            .fg(color(app.palette.footer)),
    );
    f.render_widget(background, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_title_bar(f, app, chunks[0]);

    match app.current_view {
        AppView::Stopwatch => draw_stopwatch(f, app, chunks[1]),
        AppView::Pomodoro => draw_pomodoro(f, app, chunks[1]),
        AppView::Custom => draw_custom(f, app, chunks[1]),
        AppView::Settings => draw_settings(f, app, chunks[1]),
    }

    draw_status_bar(f, app, chunks[2]);

    if app.stopwatch.pending.is_some() {
        draw_lap_confirmation_modal(f, app);
    }

    match app.input_mode {
        InputMode::ConfirmResetSettings => draw_reset_settings_modal(f, app),
        InputMode::PomodoroFinished => draw_pomodoro_finished_modal(f, app),
        mode if mode.is_text_entry() => draw_input_modal(f, app),
        _ => {}
    }

    if app.custom.alarm_active {
        draw_alarm_modal(f, app);
    }

    if app.show_help {
        draw_help_modal(f, app);
    }
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let accent = color(app.palette.accent);

    let mut spans = vec![
        Span::styled(
            "⏱ TickTock ",
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
    ];

    for (i, view) in AppView::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }

        if *view == app.current_view {
            spans.push(Span::styled(
                format!(" {} ", view.title()),
                Style::default()
                    .fg(Color::Black)
                    .bg(accent)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!("[{}]{}", i + 1, view.title()),
                Style::default().fg(Color::Gray),
            ));
        }
    }

    spans.push(Span::raw(" │ [?]Help [q]Quit"));

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent)),
    );
    f.render_widget(title, area);
}

fn sound_label(app: &App) -> String {
    if app.sound_enabled {
        format!("🔊 {:.0}%", app.volume * 100.0)
    } else {
        "🔇 muted".to_string()
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let message = if !app.status_message.is_empty() {
        Span::styled(
            format!(" {} ", app.status_message),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )
    } else if app.input_mode.is_text_entry() {
        Span::raw("[Enter] Submit  [Esc] Cancel")
    } else {
        let hints = match app.current_view {
            AppView::Stopwatch => "[Space]Start/Pause [Enter]Lap [r]Reset [e]Export",
            AppView::Pomodoro => "[Space]Start/Pause [↑↓]Minutes [b]Break [a]Another",
            AppView::Custom => "[Space]Start/Pause [s]Set Time [Enter]Preset [Esc]Stop Alarm",
            AppView::Settings => "[↑↓]Select [h/l]Change [x]Export [i]Import [z]Defaults",
        };
        Span::raw(hints)
    };

    let line = Line::from(vec![
        message,
        Span::raw("  │ "),
        Span::raw(sound_label(app)),
        Span::raw(format!(" │ {} theme", app.suite.theme.theme().as_str())),
    ]);

    let status = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(status, area);
}
