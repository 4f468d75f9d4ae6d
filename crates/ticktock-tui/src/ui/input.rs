use crate::app::{App, InputMode};
use crate::ui::helpers::{centered_rect, color};
use ratatui::{
    Frame,
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub fn draw_input_modal(f: &mut Frame, app: &App) {
    let modal_area = centered_rect(f.area(), 60, 3);

    f.render_widget(Clear, modal_area);

    let hint = match app.input_mode {
        InputMode::SetCustomTime => " e.g. 1:30:00 or 25:00 ",
        InputMode::SetPomodoroMinutes => " 0 restores the default ",
        _ => " [Enter] Submit  [Esc] Cancel ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.input_prompt())
        .title_bottom(hint)
        .border_style(Style::default().fg(color(app.palette.accent)));

    let input = Paragraph::new(app.input_buffer.as_str()).block(block);

    f.render_widget(input, modal_area);

    let right_edge = modal_area.x + modal_area.width.saturating_sub(2);
    let cursor_x = (modal_area.x + 1 + app.input_buffer.chars().count() as u16).min(right_edge);
    let cursor_y = modal_area.y + 1;

    f.set_cursor_position((cursor_x, cursor_y));
}
