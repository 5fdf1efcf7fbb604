use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_muted: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub selection_bg: String,
    pub option_selected: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub timer_low: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// User themes in `<config>/quizmaster/themes/` shadow the bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        let filename = format!("{name}.toml");

        if let Some(config_dir) = dirs::config_dir() {
            let user_path = config_dir.join("quizmaster").join("themes").join(&filename);
            if let Ok(content) = fs::read_to_string(&user_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(e) => warn!(path = %user_path.display(), error = %e, "ignoring invalid user theme"),
                }
            }
        }

        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("terminal-default").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "reset".to_string(),
            fg: "reset".to_string(),
            text_muted: "darkgray".to_string(),
            accent: "cyan".to_string(),
            accent_dim: "darkgray".to_string(),
            border: "gray".to_string(),
            border_focused: "cyan".to_string(),
            header_bg: "blue".to_string(),
            header_fg: "white".to_string(),
            selection_bg: "darkgray".to_string(),
            option_selected: "yellow".to_string(),
            bar_filled: "cyan".to_string(),
            bar_empty: "darkgray".to_string(),
            timer_low: "red".to_string(),
            error: "red".to_string(),
            warning: "yellow".to_string(),
            success: "green".to_string(),
        }
    }
}

impl ThemeColors {
    /// `#rrggbb` or a named terminal color; anything else renders white.
    pub fn parse_color(value: &str) -> Color {
        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return Color::Rgb(r, g, b);
                }
            }
            return Color::White;
        }
        value.parse::<Color>().unwrap_or(Color::White)
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_muted(&self) -> Color { Self::parse_color(&self.text_muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn selection_bg(&self) -> Color { Self::parse_color(&self.selection_bg) }
    pub fn option_selected(&self) -> Color { Self::parse_color(&self.option_selected) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn timer_low(&self) -> Color { Self::parse_color(&self.timer_low) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}
