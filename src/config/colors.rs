//! Terminal colours.

use ratatui::style::Color;
use serde::{de, Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    #[serde(deserialize_with = "color")]
    pub active_border: Color,
    #[serde(deserialize_with = "color")]
    pub inactive_border: Color,
    #[serde(deserialize_with = "color")]
    pub selection_bg: Color,
    #[serde(deserialize_with = "color")]
    pub selection_fg: Color,
    #[serde(deserialize_with = "color")]
    pub title: Color,
    #[serde(deserialize_with = "color")]
    pub metadata_source: Color,
    #[serde(deserialize_with = "color")]
    pub metadata_date: Color,
    #[serde(deserialize_with = "color")]
    pub metadata_link: Color,
    /// Footer text: spinner and end-of-list marker.
    #[serde(deserialize_with = "color")]
    pub footer: Color,
    #[serde(deserialize_with = "color")]
    pub error: Color,
    /// Result-cap notice.
    #[serde(deserialize_with = "color")]
    pub notice: Color,
    #[serde(deserialize_with = "color")]
    pub status_fg: Color,
    #[serde(deserialize_with = "color")]
    pub status_bg: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            active_border: Color::Cyan,
            inactive_border: Color::DarkGray,
            selection_bg: Color::Cyan,
            selection_fg: Color::Black,
            title: Color::White,
            metadata_source: Color::Green,
            metadata_date: Color::Yellow,
            metadata_link: Color::Blue,
            footer: Color::DarkGray,
            error: Color::LightRed,
            notice: Color::LightYellow,
            status_fg: Color::White,
            status_bg: Color::DarkGray,
        }
    }
}

fn color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_color(&raw).ok_or_else(|| de::Error::custom(format!("invalid color: {:?}", raw)))
}

/// Parse a colour name (case-insensitive, `grey` accepted) or `#RGB` / `#RRGGBB`.
pub fn parse_color(raw: &str) -> Option<Color> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix('#') {
        return parse_hex(hex);
    }

    let name = raw.to_ascii_lowercase().replace("grey", "gray");
    let color = match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" => Color::Gray,
        "darkgray" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        "reset" => Color::Reset,
        _ => return None,
    };
    Some(color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        6 => Some(Color::Rgb(
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        )),
        // Each nibble doubles: #abc == #aabbcc.
        3 => {
            let channel = |shift: u32| ((value >> shift) & 0xF) as u8 * 0x11;
            Some(Color::Rgb(channel(8), channel(4), channel(0)))
        }
        _ => None,
    }
}
