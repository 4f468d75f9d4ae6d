//! Application state management

use anyhow::Result;
use std::path::{Path, PathBuf};
use ticktock_core::models::{Palette, PendingLapAction, Settings, TimeFormat};
use ticktock_engine::{
    CustomTimerSnapshot, PomodoroSnapshot, StopwatchSnapshot, TimerError, TimerSuite,
};

const VOLUME_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AppView {
    Stopwatch,
    Pomodoro,
    Custom,
    Settings,
}

impl AppView {
    pub const ALL: [Self; 4] = [Self::Stopwatch, Self::Pomodoro, Self::Custom, Self::Settings];

    pub fn title(&self) -> &'static str {
        match self {
            AppView::Stopwatch => "Stopwatch",
            AppView::Pomodoro => "Pomodoro",
            AppView::Custom => "Custom Timer",
            AppView::Settings => "Settings",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            AppView::Stopwatch => AppView::Pomodoro,
            AppView::Pomodoro => AppView::Custom,
            AppView::Custom => AppView::Settings,
            AppView::Settings => AppView::Stopwatch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    SetCustomTime,
    SetPomodoroMinutes,
    ImportSettings,
    ConfirmResetSettings,
    PomodoroFinished,
}

impl InputMode {
    pub fn is_text_entry(&self) -> bool {
        matches!(
            self,
            InputMode::SetCustomTime | InputMode::SetPomodoroMinutes | InputMode::ImportSettings
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    Theme,
    Notifications,
    KeepScreenAwake,
    PomodoroWork,
    PomodoroShortBreak,
    PomodoroLongBreak,
    SessionsUntilLongBreak,
    AutoStartBreak,
    BreakDuration,
    AutoLap,
    TimeFormat,
    Sound,
    Volume,
}

impl SettingsItem {
    pub const ALL: [Self; 13] = [
        Self::Theme,
        Self::Notifications,
        Self::KeepScreenAwake,
        Self::PomodoroWork,
        Self::PomodoroShortBreak,
        Self::PomodoroLongBreak,
        Self::SessionsUntilLongBreak,
        Self::AutoStartBreak,
        Self::BreakDuration,
        Self::AutoLap,
        Self::TimeFormat,
        Self::Sound,
        Self::Volume,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Theme => "Theme",
            Self::Notifications => "Notifications",
            Self::KeepScreenAwake => "Keep Screen Awake",
            Self::PomodoroWork => "Work Duration",
            Self::PomodoroShortBreak => "Short Break",
            Self::PomodoroLongBreak => "Long Break",
            Self::SessionsUntilLongBreak => "Sessions Until Long Break",
            Self::AutoStartBreak => "Auto-start Break",
            Self::BreakDuration => "Break Duration",
            Self::AutoLap => "Auto Lap Every Minute",
            Self::TimeFormat => "Time Format",
            Self::Sound => "Sound",
            Self::Volume => "Volume",
        }
    }
}

/// Apply one step of change to `item`. Numbers move by `delta`, everything
/// else toggles or cycles. Returns false for items outside the record.
pub fn adjust_setting(settings: &mut Settings, item: SettingsItem, delta: i32) -> bool {
    fn step(value: u32, delta: i32) -> u32 {
        value.saturating_add_signed(delta)
    }

    match item {
        SettingsItem::Theme => settings.theme = settings.theme.next(),
        SettingsItem::Notifications => settings.notifications = !settings.notifications,
        SettingsItem::KeepScreenAwake => settings.keep_screen_awake = !settings.keep_screen_awake,
        SettingsItem::PomodoroWork => {
            settings.pomodoro.work_duration = step(settings.pomodoro.work_duration, delta)
        }
        SettingsItem::PomodoroShortBreak => {
            settings.pomodoro.short_break = step(settings.pomodoro.short_break, delta)
        }
        SettingsItem::PomodoroLongBreak => {
            settings.pomodoro.long_break = step(settings.pomodoro.long_break, delta)
        }
        SettingsItem::SessionsUntilLongBreak => {
            settings.pomodoro.sessions_until_long_break =
                step(settings.pomodoro.sessions_until_long_break, delta)
        }
        SettingsItem::AutoStartBreak => {
            settings.custom_timer.auto_start_break = !settings.custom_timer.auto_start_break
        }
        SettingsItem::BreakDuration => {
            settings.custom_timer.default_break_duration =
                step(settings.custom_timer.default_break_duration, delta)
        }
        SettingsItem::AutoLap => settings.stopwatch.auto_lap = !settings.stopwatch.auto_lap,
        SettingsItem::TimeFormat => {
            settings.stopwatch.format = match settings.stopwatch.format {
                TimeFormat::Hms => TimeFormat::Dhms,
                TimeFormat::Dhms => TimeFormat::Hms,
            }
        }
        SettingsItem::Sound | SettingsItem::Volume => return false,
    }
    true
}

/// Parse `h:m:s`, `m:s` or `s` (colons or spaces). Missing leading fields
/// count as zero.
pub fn parse_time_input(input: &str) -> Option<(u32, u32, u32)> {
    let parts: Vec<&str> = input
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut values = [0u32; 3];
    let offset = 3 - parts.len();
    for (i, part) in parts.iter().enumerate() {
        values[offset + i] = part.parse().ok()?;
    }
    Some((values[0], values[1], values[2]))
}

pub struct App {
    pub suite: TimerSuite,
    pub export_dir: PathBuf,
    pub current_view: AppView,
    pub show_help: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub status_message: String,
    pub should_quit: bool,
    pub selected_lap_index: usize,
    pub selected_preset_index: usize,
    pub selected_setting_index: usize,
    pub stopwatch: StopwatchSnapshot,
    pub pomodoro: PomodoroSnapshot,
    pub custom: CustomTimerSnapshot,
    pub settings: Settings,
    pub sound_enabled: bool,
    pub volume: f32,
    pub palette: &'static Palette,
}

impl App {
    pub async fn new(suite: TimerSuite, export_dir: PathBuf, view: AppView) -> Self {
        let stopwatch = suite.stopwatch.snapshot().await;
        let pomodoro = suite.pomodoro.snapshot().await;
        let custom = suite.custom.snapshot().await;
        let settings = suite.settings.get().await;
        let sound_enabled = suite.sound.is_enabled();
        let volume = suite.sound.volume();
        let palette = suite.theme.palette();

        Self {
            suite,
            export_dir,
            current_view: view,
            show_help: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            status_message: String::new(),
            should_quit: false,
            selected_lap_index: 0,
            selected_preset_index: 0,
            selected_setting_index: 0,
            stopwatch,
            pomodoro,
            custom,
            settings,
            sound_enabled,
            volume,
            palette,
        }
    }

    pub async fn refresh(&mut self) {
        self.stopwatch = self.suite.stopwatch.snapshot().await;
        self.pomodoro = self.suite.pomodoro.snapshot().await;
        self.custom = self.suite.custom.snapshot().await;
        self.settings = self.suite.settings.get().await;
        self.sound_enabled = self.suite.sound.is_enabled();
        self.volume = self.suite.sound.volume();
        self.palette = self.suite.theme.palette();

        self.selected_lap_index = clamp_index(self.selected_lap_index, self.stopwatch.laps.len());
        self.selected_preset_index =
            clamp_index(self.selected_preset_index, self.custom.presets.len());
    }

    pub fn selected_setting(&self) -> SettingsItem {
        SettingsItem::ALL[self.selected_setting_index.min(SettingsItem::ALL.len() - 1)]
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    pub fn list_next(&mut self) {
        match self.current_view {
            AppView::Stopwatch => {
                if self.selected_lap_index + 1 < self.stopwatch.laps.len() {
                    self.selected_lap_index += 1;
                }
            }
            AppView::Custom => {
                if self.selected_preset_index + 1 < self.custom.presets.len() {
                    self.selected_preset_index += 1;
                }
            }
            AppView::Settings => {
                if self.selected_setting_index + 1 < SettingsItem::ALL.len() {
                    self.selected_setting_index += 1;
                }
            }
            AppView::Pomodoro => {}
        }
    }

    pub fn list_previous(&mut self) {
        match self.current_view {
            AppView::Stopwatch => {
                self.selected_lap_index = self.selected_lap_index.saturating_sub(1);
            }
            AppView::Custom => {
                self.selected_preset_index = self.selected_preset_index.saturating_sub(1);
            }
            AppView::Settings => {
                self.selected_setting_index = self.selected_setting_index.saturating_sub(1);
            }
            AppView::Pomodoro => {}
        }
    }

    pub async fn toggle_current(&mut self) {
        match self.current_view {
            AppView::Stopwatch => {
                self.suite.stopwatch.toggle().await;
            }
            AppView::Pomodoro => {
                self.suite.pomodoro.toggle().await;
            }
            AppView::Custom => match self.suite.custom.toggle().await {
                Ok(_) => {}
                Err(TimerError::NoDurationSet) => {
                    self.status_message = "Set a time first with [s]".to_string();
                }
                Err(e) => self.status_message = e.to_string(),
            },
            AppView::Settings => {}
        }
    }

    pub async fn reset_current(&mut self) {
        match self.current_view {
            AppView::Stopwatch => {
                self.suite.stopwatch.reset().await;
            }
            AppView::Pomodoro => self.suite.pomodoro.reset().await,
            AppView::Custom => self.suite.custom.reset().await,
            AppView::Settings => {}
        }
    }

    pub async fn add_lap(&mut self) {
        match self.suite.stopwatch.add_lap().await {
            Some(lap) => {
                self.selected_lap_index = 0;
                self.status_message = format!("Lap {} recorded", lap.number);
            }
            None => {
                self.status_message = "Start the stopwatch to record laps".to_string();
            }
        }
    }

    pub async fn request_clear_laps(&mut self) {
        if !self.suite.stopwatch.request_clear().await {
            self.status_message = "No laps to clear".to_string();
        }
    }

    pub async fn request_delete_selected_lap(&mut self) {
        if let Err(e) = self
            .suite
            .stopwatch
            .request_delete(self.selected_lap_index)
            .await
        {
            self.status_message = e.to_string();
        }
    }

    pub async fn confirm_lap_action(&mut self) -> Result<()> {
        let action = self.suite.stopwatch.confirm().await?;
        self.status_message = match action {
            PendingLapAction::Delete { number, .. } => format!("Lap {} deleted", number),
            PendingLapAction::ClearAll => "All laps cleared".to_string(),
        };
        Ok(())
    }

    pub async fn cancel_lap_action(&mut self) {
        self.suite.stopwatch.cancel().await;
    }

    pub async fn export_laps(&mut self) {
        self.status_message = match self.suite.stopwatch.export_laps(&self.export_dir).await {
            Ok(path) => format!("Exported laps to {}", path.display()),
            Err(e) => e.to_string(),
        };
    }

    pub fn toggle_sound(&mut self) {
        let enabled = self.suite.sound.toggle();
        self.status_message = if enabled {
            "Sound on".to_string()
        } else {
            "Sound muted".to_string()
        };
    }

    pub fn adjust_volume(&mut self, up: bool) {
        let delta = if up { VOLUME_STEP } else { -VOLUME_STEP };
        let volume = self.suite.sound.adjust_volume(delta);
        self.status_message = format!("Volume {:.0}%", volume * 100.0);
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.suite.theme.toggle();
        self.status_message = format!("{} theme", theme.as_str());
    }

    /// Silence whichever alarm is ringing.
    pub async fn stop_alarm(&mut self) {
        if self.suite.custom.stop_alarm().await {
            self.status_message = "Alarm stopped".to_string();
        }
        self.suite.pomodoro.stop_alarm();
    }

    pub async fn adjust_pomodoro_minutes(&mut self, delta: i32) {
        if self.pomodoro.is_running || self.pomodoro.phase.is_break() {
            return;
        }
        let minutes = self.pomodoro.current_minutes.saturating_add_signed(delta);
        if minutes > 0 {
            self.suite.pomodoro.set_minutes(minutes).await;
        }
    }

    pub async fn start_break(&mut self) {
        let phase = self.suite.pomodoro.start_break().await;
        self.status_message = format!("{} started", phase.as_str());
        self.input_mode = InputMode::Normal;
    }

    pub async fn start_another(&mut self) {
        let session = self.suite.pomodoro.start_another().await;
        self.status_message = format!("Session {} started", session);
        self.input_mode = InputMode::Normal;
    }

    pub async fn load_selected_preset(&mut self) {
        if let Err(e) = self
            .suite
            .custom
            .select_preset(self.selected_preset_index)
            .await
        {
            self.status_message = e.to_string();
        }
    }

    pub fn begin_input(&mut self, mode: InputMode) {
        self.input_buffer.clear();
        self.input_mode = mode;
    }

    pub fn cancel_input(&mut self) {
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn input_prompt(&self) -> &'static str {
        match self.input_mode {
            InputMode::SetCustomTime => " Set time (h:m:s) ",
            InputMode::SetPomodoroMinutes => " Work minutes ",
            InputMode::ImportSettings => " Import settings from file ",
            _ => " Input ",
        }
    }

    pub async fn submit_input(&mut self) {
        let input = std::mem::take(&mut self.input_buffer);
        let mode = self.input_mode;
        self.input_mode = InputMode::Normal;

        match mode {
            InputMode::SetCustomTime => match parse_time_input(&input) {
                Some((h, m, s)) => match self.suite.custom.set_time(h, m, s).await {
                    Ok(_) => self.selected_preset_index = 0,
                    Err(e) => self.status_message = e.to_string(),
                },
                None => {
                    self.status_message = format!("Could not read '{}' as a time", input.trim());
                }
            },
            InputMode::SetPomodoroMinutes => match input.trim().parse::<u32>() {
                Ok(minutes) => {
                    let total_ms = self.suite.pomodoro.set_minutes(minutes).await;
                    self.status_message = format!("Work session set to {} min", total_ms / 60_000);
                }
                Err(_) => {
                    self.status_message = format!("Could not read '{}' as minutes", input.trim());
                }
            },
            InputMode::ImportSettings => self.import_settings(Path::new(input.trim())).await,
            _ => {}
        }
    }

    pub async fn change_selected_setting(&mut self, delta: i32) {
        let item = self.selected_setting();
        match item {
            SettingsItem::Sound => self.toggle_sound(),
            SettingsItem::Volume => self.adjust_volume(delta >= 0),
            _ => {
                let mut settings = self.settings.clone();
                if !adjust_setting(&mut settings, item, delta) {
                    return;
                }
                match self.suite.update_settings(settings).await {
                    Ok(saved) => self.settings = saved,
                    Err(e) => self.status_message = e.to_string(),
                }
            }
        }
    }

    pub async fn export_settings(&mut self) {
        self.status_message = match self.suite.settings.export_to(&self.export_dir).await {
            Ok(path) => format!("Exported settings to {}", path.display()),
            Err(e) => e.to_string(),
        };
    }

    pub async fn import_settings(&mut self, path: &Path) {
        self.status_message = match self.suite.import_settings_from(path).await {
            Ok(_) => "Settings imported successfully".to_string(),
            Err(e) => e.to_string(),
        };
    }

    pub async fn reset_settings(&mut self) {
        self.input_mode = InputMode::Normal;
        self.status_message = match self.suite.reset_settings().await {
            Ok(_) => "Settings reset to defaults".to_string(),
            Err(e) => e.to_string(),
        };
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;
    use ticktock_core::models::ThemePreference;
    use ticktock_core::storage::MemoryStore;
    use ticktock_engine::{SilentSink, TokioClock};

    async fn test_app(export_dir: PathBuf) -> App {
        let suite = TimerSuite::new(
            Arc::new(MemoryStore::new()),
            Arc::new(TokioClock::new()),
            Arc::new(SilentSink),
            false,
        )
        .await;
        App::new(suite, export_dir, AppView::Stopwatch).await
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_silences_break_alarm() {
        use ticktock_engine::{TimerEventType, TimerKind};
        use tokio::time::{sleep, Duration};

        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(temp_dir.path().to_path_buf()).await;
        let mut settings = app.suite.settings.get().await;
        settings.pomodoro.work_duration = 1;
        settings.pomodoro.short_break = 1;
        app.suite.update_settings(settings).await.unwrap();

        app.suite.pomodoro.start().await;
        sleep(Duration::from_secs(61)).await;
        app.start_break().await;
        sleep(Duration::from_secs(61)).await;
        app.refresh().await;
        assert!(!app.pomodoro.completed);

        let mut events = app.suite.subscribe();
        app.stop_alarm().await;

        let mut stopped = false;
        while let Ok(event) = events.try_recv() {
            if event.event_type == TimerEventType::AlarmStopped
                && event.timer == TimerKind::Pomodoro
            {
                stopped = true;
            }
        }
        assert!(stopped);
    }

    #[test]
    fn test_parse_time_input() {
        assert_eq!(parse_time_input("1:30:15"), Some((1, 30, 15)));
        assert_eq!(parse_time_input("5:00"), Some((0, 5, 0)));
        assert_eq!(parse_time_input("90"), Some((0, 0, 90)));
        assert_eq!(parse_time_input(" 0 10 0 "), Some((0, 10, 0)));
        assert_eq!(parse_time_input(""), None);
        assert_eq!(parse_time_input("1:2:3:4"), None);
        assert_eq!(parse_time_input("ten"), None);
    }

    #[test]
    fn test_adjust_setting() {
        let mut settings = Settings::default();

        assert!(adjust_setting(&mut settings, SettingsItem::PomodoroWork, 5));
        assert_eq!(settings.pomodoro.work_duration, 30);

        assert!(adjust_setting(&mut settings, SettingsItem::Theme, 1));
        assert_eq!(settings.theme, ThemePreference::Light);

        assert!(adjust_setting(&mut settings, SettingsItem::TimeFormat, -1));
        assert_eq!(settings.stopwatch.format, TimeFormat::Dhms);

        assert!(adjust_setting(&mut settings, SettingsItem::PomodoroShortBreak, -10));
        assert_eq!(settings.pomodoro.short_break, 0);

        assert!(!adjust_setting(&mut settings, SettingsItem::Volume, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_setting_leaves_record() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(temp_dir.path().to_path_buf()).await;
        app.current_view = AppView::Settings;
        app.selected_setting_index = 3;
        app.settings.pomodoro.work_duration = 60;

        app.change_selected_setting(1).await;

        assert!(app.status_message.contains("Work duration"));
        assert_eq!(app.suite.settings.get().await, Settings::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_custom_time_from_input() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(temp_dir.path().to_path_buf()).await;

        app.begin_input(InputMode::SetCustomTime);
        app.input_buffer = "0:0:0".to_string();
        app.submit_input().await;
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.status_message.is_empty());

        app.begin_input(InputMode::SetCustomTime);
        app.input_buffer = "1:30".to_string();
        app.submit_input().await;
        app.refresh().await;
        assert_eq!(app.custom.display, "00:01:30");
        assert_eq!(app.custom.presets.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lap_workflow() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(temp_dir.path().to_path_buf()).await;

        app.add_lap().await;
        assert_eq!(app.status_message, "Start the stopwatch to record laps");

        app.toggle_current().await;
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
        app.add_lap().await;
        app.add_lap().await;
        app.refresh().await;
        assert_eq!(app.stopwatch.laps.len(), 2);

        app.export_laps().await;
        assert!(app.status_message.starts_with("Exported laps to"));

        app.request_clear_laps().await;
        app.refresh().await;
        assert_eq!(app.stopwatch.pending, Some(PendingLapAction::ClearAll));

        app.confirm_lap_action().await.unwrap();
        app.refresh().await;
        assert!(app.stopwatch.laps.is_empty());
        assert_eq!(app.status_message, "All laps cleared");
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_toggle_without_time() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(temp_dir.path().to_path_buf()).await;
        app.current_view = AppView::Custom;

        app.toggle_current().await;
        assert_eq!(app.status_message, "Set a time first with [s]");
        assert!(!app.suite.custom.is_running().await);
    }
}
