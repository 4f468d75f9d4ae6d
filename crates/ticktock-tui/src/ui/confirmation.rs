use crate::app::App;
use crate::ui::helpers::centered_rect;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use ticktock_core::models::PendingLapAction;

fn draw_choice_modal(
    f: &mut Frame,
    title: &str,
    message: String,
    choices: &[(&str, Color)],
    border: Color,
) {
    let modal_area = centered_rect(f.area(), 60, 9);

    f.render_widget(Clear, modal_area);

    let mut buttons = Vec::with_capacity(choices.len() * 2);
    for (i, (label, colour)) in choices.iter().enumerate() {
        if i > 0 {
            buttons.push(Span::raw("    "));
        }
        buttons.push(Span::styled(
            format!("  {}  ", label),
            Style::default().fg(*colour).add_modifier(Modifier::BOLD),
        ));
    }

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(buttons),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(border).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(border));

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(paragraph, modal_area);
}

pub fn draw_lap_confirmation_modal(f: &mut Frame, app: &App) {
    let (title, message, yes_label) = match app.stopwatch.pending {
        Some(PendingLapAction::Delete { number, .. }) => (
            "Delete Lap?",
            format!("Are you sure you want to delete lap {}?", number),
            "[Y]es, Delete",
        ),
        Some(PendingLapAction::ClearAll) => (
            "Clear Laps?",
            format!(
                "Are you sure you want to clear all {} laps?",
                app.stopwatch.laps.len()
            ),
            "[Y]es, Clear",
        ),
        None => return,
    };

    draw_choice_modal(
        f,
        title,
        message,
        &[(yes_label, Color::Red), ("[N]o, Cancel", Color::Green)],
        Color::Red,
    );
}

pub fn draw_reset_settings_modal(f: &mut Frame, _app: &App) {
    draw_choice_modal(
        f,
        "Reset Settings?",
        "Restore every setting to its default value?".to_string(),
        &[("[Y]es, Reset", Color::Red), ("[N]o, Cancel", Color::Green)],
        Color::Red,
    );
}

pub fn draw_pomodoro_finished_modal(f: &mut Frame, app: &App) {
    let next = app
        .pomodoro
        .suggested_break
        .map(|phase| phase.as_str())
        .unwrap_or("Break");

    draw_choice_modal(
        f,
        "🍅 Session Complete",
        format!("Session {} is done. Time for a {}?", app.pomodoro.session, next),
        &[
            ("[b] Start Break", Color::Green),
            ("[a] Another Session", Color::Cyan),
            ("[Esc] Dismiss", Color::Gray),
        ],
        Color::Cyan,
    );
}

pub fn draw_alarm_modal(f: &mut Frame, app: &App) {
    let message = if app.custom.auto_start_break {
        format!("Time's up! A {} minute break is starting.", app.custom.break_minutes)
    } else {
        "Time's up!".to_string()
    };

    draw_choice_modal(
        f,
        "⏰ Countdown Finished",
        message,
        &[("[Esc/Enter] Stop Alarm", Color::Yellow)],
        Color::Yellow,
    );
}
