use crate::app::App;
use crate::ui::helpers::color;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "GLOBAL",
        &[
            ("[Tab] / [1-4]", "Switch view"),
            ("[k]", "Mute / unmute sound"),
            ("[+] / [-]", "Volume up / down"),
            ("[t]", "Toggle light / dark theme"),
            ("[Esc]", "Stop a ringing alarm"),
            ("[?]", "Toggle this help"),
            ("[q]", "Quit"),
        ],
    ),
    (
        "STOPWATCH",
        &[
            ("[Space] / [p]", "Start / pause"),
            ("[Backspace] / [r]", "Reset (asks before clearing laps)"),
            ("[Enter]", "Record a lap"),
            ("[↑↓]", "Select a lap"),
            ("[d]", "Delete selected lap"),
            ("[0]", "Clear all laps"),
            ("[e]", "Export laps as CSV"),
        ],
    ),
    (
        "POMODORO",
        &[
            ("[Space] / [p]", "Start / pause"),
            ("[Backspace] / [r]", "Reset"),
            ("[↑↓]", "Adjust work length while idle"),
            ("[s]", "Type a work length"),
            ("[b]", "Start the break"),
            ("[a]", "Skip the break, start another session"),
        ],
    ),
    (
        "CUSTOM TIMER",
        &[
            ("[Space] / [p]", "Start / pause"),
            ("[Backspace] / [r]", "Reset to the chosen time"),
            ("[s]", "Set a time"),
            ("[↑↓] + [Enter]", "Load a preset"),
        ],
    ),
    (
        "SETTINGS",
        &[
            ("[↑↓]", "Select"),
            ("[h/l] / [Space]", "Change value"),
            ("[x] / [i]", "Export / import settings JSON"),
            ("[z]", "Restore defaults"),
        ],
    ),
    ("CONFIRMATIONS", &[("[y] / [n]", "Confirm / cancel")]),
];

pub fn draw_help_modal(f: &mut Frame, app: &App) {
    let area = f.area();
    let modal_width = (area.width as f32 * 0.8) as u16;
    let modal_height = (area.height as f32 * 0.9) as u16;
    let modal_area = Rect {
        x: (area.width.saturating_sub(modal_width)) / 2,
        y: (area.height.saturating_sub(modal_height)) / 2,
        width: modal_width,
        height: modal_height,
    };

    f.render_widget(Clear, modal_area);

    let accent = color(app.palette.accent);
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut help_text = vec![
        Line::from(Span::styled(
            "  ⏱ TickTock - Keyboard Shortcuts",
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (title, keys) in SECTIONS {
        help_text.push(Line::from(Span::styled(format!("  {}", title), heading)));
        for (key, action) in keys.iter() {
            help_text.push(Line::from(format!("    {:<20} {}", key, action)));
        }
        help_text.push(Line::from(""));
    }

    help_text.push(Line::from(Span::styled(
        "  Press any key to close this help",
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    )));

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("❓ Help")
                .border_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        )
        .style(Style::default().bg(Color::Black));

    f.render_widget(help_paragraph, modal_area);
}
