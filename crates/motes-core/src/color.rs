//! Colour types for particle rendering.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Parse `#rrggbb`, `#rgb` or a [`ColorTheme`] name.
    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError(s.to_string()));
        }
        s.parse::<ColorTheme>().map(ColorTheme::rgb)
    }

    /// Linear blend toward `other`, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    /// Channels as floats in `[0, 1]`.
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }

    /// Build from float channels, clamping to `[0, 1]`.
    pub fn from_f32(c: [f32; 3]) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb(q(c[0]), q(c[1]), q(c[2]))
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::parse(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Returned when a colour string is neither hex nor a theme name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid colour `{0}`, expected #rrggbb, #rgb or a theme name")]
pub struct ColorParseError(pub String);

/// Fill or stroke style: a colour plus opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Rgb,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

impl Paint {
    pub fn solid(color: Rgb) -> Self {
        Self { color, alpha: 1.0 }
    }

    pub fn with_alpha(color: Rgb, alpha: f32) -> Self {
        Self {
            color,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// Named foreground colours the user can cycle through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Cyan,
    Green,
    #[default]
    White,
    Magenta,
    Yellow,
    Red,
    Blue,
}

impl ColorTheme {
    pub const ALL: [ColorTheme; 7] = [
        ColorTheme::Cyan,
        ColorTheme::Green,
        ColorTheme::White,
        ColorTheme::Magenta,
        ColorTheme::Yellow,
        ColorTheme::Red,
        ColorTheme::Blue,
    ];

    /// Cycle to the next colour theme.
    pub fn next(self) -> Self {
        match self {
            ColorTheme::Cyan => ColorTheme::Green,
            ColorTheme::Green => ColorTheme::Magenta,
            ColorTheme::Magenta => ColorTheme::Yellow,
            ColorTheme::Yellow => ColorTheme::Red,
            ColorTheme::Red => ColorTheme::Blue,
            ColorTheme::Blue => ColorTheme::White,
            ColorTheme::White => ColorTheme::Cyan,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorTheme::Cyan => "cyan",
            ColorTheme::Green => "green",
            ColorTheme::White => "white",
            ColorTheme::Magenta => "magenta",
            ColorTheme::Yellow => "yellow",
            ColorTheme::Red => "red",
            ColorTheme::Blue => "blue",
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            ColorTheme::Cyan => Rgb(64, 224, 208),
            ColorTheme::Green => Rgb(80, 220, 100),
            ColorTheme::White => Rgb(235, 235, 235),
            ColorTheme::Magenta => Rgb(220, 90, 220),
            ColorTheme::Yellow => Rgb(240, 210, 80),
            ColorTheme::Red => Rgb(230, 80, 70),
            ColorTheme::Blue => Rgb(70, 130, 240),
        }
    }
}

impl FromStr for ColorTheme {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorTheme::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ColorParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse("#ff8000"), Ok(Rgb(255, 128, 0)));
        assert_eq!(Rgb::parse("#0f0"), Ok(Rgb(0, 255, 0)));
        assert!(Rgb::parse("#12345").is_err());
        assert!(Rgb::parse("#gggggg").is_err());
    }

    #[test]
    fn test_parse_hex_rejects_non_ascii_and_signs() {
        assert!(Rgb::parse("#é1").is_err());
        assert!(Rgb::parse("#aébcd").is_err());
        assert!(Rgb::parse("#+f+f+f").is_err());
    }

    #[test]
    fn test_parse_theme_name() {
        assert_eq!(Rgb::parse("Cyan"), Ok(ColorTheme::Cyan.rgb()));
        assert!(Rgb::parse("chartreuse").is_err());
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(Rgb(1, 2, 255).to_string(), "#0102ff");
    }

    #[test]
    fn test_theme_cycle_visits_all() {
        let mut theme = ColorTheme::Cyan;
        let mut seen = Vec::new();
        for _ in 0..ColorTheme::ALL.len() {
            seen.push(theme);
            theme = theme.next();
        }
        assert_eq!(theme, ColorTheme::Cyan);
        for t in ColorTheme::ALL {
            assert!(seen.contains(&t));
        }
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 0.0), Rgb::BLACK);
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 1.0), Rgb::WHITE);
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 2.0), Rgb::WHITE);
    }
}
