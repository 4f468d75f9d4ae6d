use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colours for one theme. `idle_*` is used while a countdown is stopped,
/// `running_*` while it counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub accent: Rgb,
    pub surface: Rgb,
    pub text: Rgb,
    pub digits: Rgb,
    pub footer: Rgb,
    pub idle_background: Rgb,
    pub idle_text: Rgb,
    pub running_background: Rgb,
    pub running_text: Rgb,
}

const LIGHT: Palette = Palette {
    background: Rgb(0x19, 0x16, 0x54),
    accent: Rgb(0x43, 0xc6, 0xac),
    surface: Rgb(0xff, 0xff, 0xff),
    text: Rgb(0x00, 0x00, 0x00),
    digits: Rgb(0xff, 0xff, 0xff),
    footer: Rgb(0xff, 0xff, 0xff),
    idle_background: Rgb(0x19, 0x16, 0x54),
    idle_text: Rgb(0x33, 0x33, 0x33),
    running_background: Rgb(5, 30, 54),
    running_text: Rgb(169, 188, 214),
};

const DARK: Palette = Palette {
    background: Rgb(0x19, 0x12, 0x12),
    accent: Rgb(0x7f, 0xe9, 0xd4),
    surface: Rgb(0x00, 0x00, 0x00),
    text: Rgb(0xff, 0xff, 0xff),
    digits: Rgb(216, 137, 31),
    footer: Rgb(0xa7, 0xa7, 0xa7),
    idle_background: Rgb(0x19, 0x12, 0x12),
    idle_text: Rgb(0x7f, 0xe9, 0xd4),
    running_background: Rgb(0x00, 0x00, 0x00),
    running_text: Rgb(0xff, 0xff, 0xff),
};

impl Theme {
    pub fn palette(&self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }
}
