//! Project colours
//!
//! Projects are coloured by load index, cycling through a fixed palette so
//! the same data always renders the same way.

use serde::{Deserialize, Serialize};

/// Built-in project colours
pub const DEFAULT_PALETTE: [&str; 17] = [
    "#2E8B57", "#FF8C00", "#1E90FF", "#FF6347", "#9370DB", "#00CED1", "#8B4513", "#FF69B4",
    "#00FF7F", "#FFD700", "#191970", "#FF4500", "#20B2AA", "#DDA0DD", "#F08080", "#98FB98",
    "#FFA07A",
];

/// Marker colour for a gate that kept its date
pub const ON_TIME_COLOR: &str = "#56C440";

/// Marker colour for a gate that slipped
pub const DELAYED_COLOR: &str = "#FF0000";

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parses `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

/// Ordered list of colours assigned to projects by index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Palette {
    /// Uses the given colours, or the built-in palette when the list is empty
    pub fn new(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            Self::default()
        } else {
            Self { colors }
        }
    }

    /// Colour for the project at `index`, cycling
    pub fn color_for(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_for_cycles() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(0), "#2E8B57");
        assert_eq!(palette.color_for(16), "#FFA07A");
        assert_eq!(palette.color_for(17), "#2E8B57");
        assert_eq!(palette.color_for(35), "#FF8C00");
    }

    #[test]
    fn test_empty_custom_palette_falls_back() {
        assert_eq!(Palette::new(Vec::new()), Palette::default());
        let custom = Palette::new(vec!["#000000".to_string()]);
        assert_eq!(custom.color_for(5), "#000000");
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(
            Rgb::from_hex("#2E8B57"),
            Some(Rgb {
                r: 0x2e,
                g: 0x8b,
                b: 0x57
            })
        );
        assert_eq!(Rgb::from_hex("ff0000"), Some(Rgb { r: 255, g: 0, b: 0 }));
        assert_eq!(Rgb::from_hex("#FFF"), None);
        assert_eq!(Rgb::from_hex("#GG0000"), None);
        assert_eq!(Rgb::from_hex("#ÄÄÄÄ"), None);
    }

    #[test]
    fn test_default_palette_is_valid_hex() {
        for color in DEFAULT_PALETTE {
            assert!(Rgb::from_hex(color).is_some(), "{}", color);
        }
        assert!(Rgb::from_hex(ON_TIME_COLOR).is_some());
        assert!(Rgb::from_hex(DELAYED_COLOR).is_some());
    }
}
