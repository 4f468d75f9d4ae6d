use crate::app::{App, SettingsItem};
use crate::ui::helpers::{build_hint_line, focused_border_style};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

fn on_off(enabled: bool) -> String {
    let label = if enabled { "On" } else { "Off" };
    label.to_string()
}

fn value_text(app: &App, item: SettingsItem) -> String {
    let settings = &app.settings;
    match item {
        SettingsItem::Theme => settings.theme.as_str().to_string(),
        SettingsItem::Notifications => on_off(settings.notifications),
        SettingsItem::KeepScreenAwake => on_off(settings.keep_screen_awake),
        SettingsItem::PomodoroWork => format!("{} minutes", settings.pomodoro.work_duration),
        SettingsItem::PomodoroShortBreak => format!("{} minutes", settings.pomodoro.short_break),
        SettingsItem::PomodoroLongBreak => format!("{} minutes", settings.pomodoro.long_break),
        SettingsItem::SessionsUntilLongBreak => {
            settings.pomodoro.sessions_until_long_break.to_string()
        }
        SettingsItem::AutoStartBreak => on_off(settings.custom_timer.auto_start_break),
        SettingsItem::BreakDuration => {
            format!("{} minutes", settings.custom_timer.default_break_duration)
        }
        SettingsItem::AutoLap => on_off(settings.stopwatch.auto_lap),
        SettingsItem::TimeFormat => settings.stopwatch.format.as_str().to_string(),
        SettingsItem::Sound => on_off(app.sound_enabled),
        SettingsItem::Volume => format!("{:.0}%", app.volume * 100.0),
    }
}

fn change_hint(item: SettingsItem) -> &'static str {
    match item {
        SettingsItem::PomodoroWork
        | SettingsItem::PomodoroShortBreak
        | SettingsItem::PomodoroLongBreak
        | SettingsItem::SessionsUntilLongBreak
        | SettingsItem::BreakDuration
        | SettingsItem::Volume => "  <[h/l] to change>",
        SettingsItem::Theme | SettingsItem::TimeFormat => "  <[Space] to cycle>",
        _ => "  <[Space] to toggle>",
    }
}

fn section_for(item: SettingsItem) -> Option<&'static str> {
    match item {
        SettingsItem::Theme => Some("General"),
        SettingsItem::PomodoroWork => Some("Pomodoro"),
        SettingsItem::AutoStartBreak => Some("Custom Timer"),
        SettingsItem::AutoLap => Some("Stopwatch"),
        SettingsItem::Sound => Some("Sound (saved separately)"),
        _ => None,
    }
}

pub fn draw_settings(f: &mut Frame, app: &App, area: Rect) {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut items: Vec<ListItem> = Vec::new();
    for (i, &item) in SettingsItem::ALL.iter().enumerate() {
        if let Some(section) = section_for(item) {
            if i > 0 {
                items.push(ListItem::new(""));
            }
            items.push(ListItem::new(Span::styled(format!(" {}", section), header_style)));
        }

        let is_selected = i == app.selected_setting_index;
        let style = if is_selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };

        let line = Line::from(vec![
            Span::styled(
                format!("   {:<27}", item.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(value_text(app, item)),
            if is_selected {
                Span::raw(change_hint(item))
            } else {
                Span::raw("")
            },
        ]);

        items.push(ListItem::new(line).style(style));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ⚙ Settings ")
        .title_bottom(build_hint_line(
            app.palette,
            &[
                ("↑↓", "Select"),
                ("h/l", "Change"),
                ("x", "Export"),
                ("i", "Import"),
                ("z", "Defaults"),
            ],
        ))
        .border_style(focused_border_style(app.palette, true));

    f.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_item_has_a_hint() {
        for item in SettingsItem::ALL {
            assert!(change_hint(item).contains("[h/l]") || change_hint(item).contains("[Space]"));
        }
        assert_eq!(change_hint(SettingsItem::Volume), "  <[h/l] to change>");
    }
}
