use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Deserializer};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct BundledThemes;

pub const DEFAULT_THEME: &str = "default";

/// A named palette. Colors are parsed once when the theme is read.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: Palette,
}

/// Every color the screens draw with, as `#rrggbb` in theme files.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Palette {
    #[serde(deserialize_with = "hex")]
    pub bg: Color,
    #[serde(deserialize_with = "hex")]
    pub fg: Color,
    #[serde(deserialize_with = "hex")]
    pub accent: Color,
    #[serde(deserialize_with = "hex")]
    pub border: Color,
    #[serde(deserialize_with = "hex")]
    pub header_bg: Color,
    #[serde(deserialize_with = "hex")]
    pub header_fg: Color,
    #[serde(deserialize_with = "hex")]
    pub text_correct: Color,
    #[serde(deserialize_with = "hex")]
    pub text_incorrect: Color,
    #[serde(deserialize_with = "hex")]
    pub text_incorrect_bg: Color,
    #[serde(deserialize_with = "hex")]
    pub text_pending: Color,
    #[serde(deserialize_with = "hex")]
    pub text_cursor_bg: Color,
    #[serde(deserialize_with = "hex")]
    pub text_cursor_fg: Color,
    #[serde(deserialize_with = "hex")]
    pub bar_filled: Color,
    #[serde(deserialize_with = "hex")]
    pub bar_empty: Color,
    #[serde(deserialize_with = "hex")]
    pub error: Color,
    #[serde(deserialize_with = "hex")]
    pub warning: Color,
    #[serde(deserialize_with = "hex")]
    pub success: Color,
}

impl Palette {
    /// Used when even the bundled default cannot be read.
    pub const FALLBACK: Palette = Palette {
        bg: Color::Reset,
        fg: Color::Reset,
        accent: Color::Cyan,
        border: Color::DarkGray,
        header_bg: Color::DarkGray,
        header_fg: Color::White,
        text_correct: Color::Green,
        text_incorrect: Color::Red,
        text_incorrect_bg: Color::Reset,
        text_pending: Color::Gray,
        text_cursor_bg: Color::White,
        text_cursor_fg: Color::Black,
        bar_filled: Color::Cyan,
        bar_empty: Color::DarkGray,
        error: Color::Red,
        warning: Color::Yellow,
        success: Color::Green,
    };
}

fn parse_hex(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let rgb = u32::from_str_radix(digits, 16).ok()?;
    Some(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

fn hex<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_hex(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected #rrggbb color, got {value:?}")))
}

/// `<config_dir>/devtype/themes`, where user themes override bundled ones.
fn user_theme_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("devtype").join("themes"))
}

impl Theme {
    /// Resolve a theme by name: user directory first, then bundled files.
    pub fn load(name: &str) -> Option<Self> {
        let file = format!("{name}.toml");
        let user = user_theme_dir()
            .and_then(|dir| fs::read_to_string(dir.join(&file)).ok())
            .and_then(|content| toml::from_str(&content).ok());
        user.or_else(|| {
            let bundled = BundledThemes::get(&file)?;
            toml::from_str(std::str::from_utf8(&bundled.data).ok()?).ok()
        })
    }

    /// Bundled theme names, sorted.
    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = BundledThemes::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: DEFAULT_THEME.to_string(),
            colors: Palette::FALLBACK,
        })
    }
}
