use super::big_text::BigText;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use ticktock_core::models::{Palette, Rgb};

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub fn focused_border_style(palette: &Palette, is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(color(palette.accent))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Countdown digits change colour while the timer runs.
pub fn countdown_style(palette: &Palette, is_running: bool) -> Style {
    let fg = if is_running {
        palette.running_text
    } else {
        palette.idle_text
    };
    Style::default().fg(color(fg)).add_modifier(Modifier::BOLD)
}

pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Draw `text` as block digits centred in `area`, or as one plain line when
/// the area is too small.
pub fn draw_clock(f: &mut Frame, area: Rect, text: &str, style: Style) {
    let width = BigText::width(text);
    if width <= area.width && BigText::height() <= area.height {
        let clock_area = centered_rect(area, width, BigText::height());
        f.render_widget(BigText::new(text).style(style), clock_area);
    } else {
        let line_area = centered_rect(area, area.width, 1);
        let plain = Paragraph::new(text.to_string())
            .style(style)
            .alignment(Alignment::Center);
        f.render_widget(plain, line_area);
    }
}

/// `[key]Label` pairs for block footers.
pub fn build_hint_line<'a>(palette: &Palette, hints: &[(&'a str, &'a str)]) -> Line<'a> {
    let key_style = Style::default().fg(color(palette.accent));
    let mut spans = Vec::with_capacity(hints.len() * 2 + 1);
    spans.push(Span::raw(" "));
    for (key, label) in hints {
        spans.push(Span::styled(format!("[{}]", key), key_style));
        spans.push(Span::raw(format!("{} ", label)));
    }
    Line::from(spans)
}
