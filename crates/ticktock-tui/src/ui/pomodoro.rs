use crate::app::App;
use crate::ui::helpers::{build_hint_line, countdown_style, draw_clock, focused_border_style};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn draw_pomodoro(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(area);

    draw_countdown(f, app, chunks[0]);
    draw_session_info(f, app, chunks[1]);
}

fn draw_countdown(f: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.pomodoro;
    let icon = if snapshot.phase.is_work() { "🍅" } else { "☕" };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} {} ", icon, snapshot.phase.as_str()))
        .title_bottom(build_hint_line(
            app.palette,
            &[("Space", "Start/Pause"), ("r", "Reset"), ("s", "Set Minutes")],
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

fn draw_session_info(f: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.pomodoro;
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Session:          ", label),
            Span::styled(
                format!(
                    "{} (long break every {})",
                    snapshot.session, snapshot.sessions_until_long_break
                ),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("  Work length:      ", label),
            Span::styled(format!("{} min", snapshot.current_minutes), value),
            Span::styled(format!("  (default {} min)", snapshot.default_minutes), label),
        ]),
        Line::from(""),
    ];

    if let Some(phase) = snapshot.suggested_break {
        lines.push(Line::from(Span::styled(
            format!("  Session complete! Up next: {}", phase.as_str()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from("  [b] Start break    [a] Another session"));
    } else if !snapshot.is_running && snapshot.phase.is_work() {
        lines.push(Line::from(Span::styled(
            "  [↑↓] adjust the work length before starting",
            label,
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Cycle ")
        .border_style(focused_border_style(app.palette, false));

    let info = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);
    f.render_widget(info, area);
}
