//! Small value types shared across the crate.

use std::fmt;
use std::str::FromStr;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Accept only finite values strictly greater than zero.
pub fn check_positive(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// An sRGB color with alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// CSS form used in SVG output: `rgb(r,g,b)`, or `rgba(...)` when translucent.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{})",
                self.r,
                self.g,
                self.b,
                crate::render::svg::fmt_num(self.a as f64 / 255.0)
            )
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Why a color string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError {
    pub input: String,
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized color `{}`", self.input)
    }
}

impl std::error::Error for ParseColorError {}

/// Named colors accepted in wheel descriptions.
#[rustfmt::skip]
const NAMED_COLORS: &[(&str, Color)] = &[
    ("black",     Color::rgb(0, 0, 0)),
    ("white",     Color::rgb(255, 255, 255)),
    ("red",       Color::rgb(255, 0, 0)),
    ("green",     Color::rgb(0, 128, 0)),
    ("blue",      Color::rgb(0, 0, 255)),
    ("yellow",    Color::rgb(255, 255, 0)),
    ("cyan",      Color::rgb(0, 255, 255)),
    ("magenta",   Color::rgb(255, 0, 255)),
    ("orange",    Color::rgb(255, 165, 0)),
    ("purple",    Color::rgb(128, 0, 128)),
    ("brown",     Color::rgb(165, 42, 42)),
    ("pink",      Color::rgb(255, 192, 203)),
    ("gray",      Color::rgb(128, 128, 128)),
    ("grey",      Color::rgb(128, 128, 128)),
    ("lightgray", Color::rgb(211, 211, 211)),
    ("darkgray",  Color::rgb(169, 169, 169)),
    ("silver",    Color::rgb(192, 192, 192)),
    ("gold",      Color::rgb(255, 215, 0)),
];

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError { input: s.to_string() };
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(err);
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let channels: Vec<u8> = args
                .split(',')
                .map(|c| c.trim().parse::<u8>())
                .collect::<Result<_, _>>()
                .map_err(|_| err())?;
            return match channels.as_slice() {
                [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
                _ => Err(err()),
            };
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(err)
    }
}

/// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_positive_valid() {
        assert_eq!(check_positive(0.5), Ok(0.5));
    }

    #[test]
    fn check_positive_rejects() {
        assert_eq!(check_positive(0.0), Err(NumericError::Zero));
        assert_eq!(check_positive(-1.0), Err(NumericError::Negative));
        assert_eq!(check_positive(f64::NAN), Err(NumericError::NaN));
        assert_eq!(check_positive(f64::INFINITY), Err(NumericError::Infinite));
    }

    #[test]
    fn short_hex_expands_each_nibble() {
        assert_eq!("#0bf".parse::<Color>(), Ok(Color::rgb(0x00, 0xbb, 0xff)));
        assert_eq!("#f82".parse::<Color>(), Ok(Color::rgb(0xff, 0x88, 0x22)));
    }

    #[test]
    fn long_hex_and_alpha() {
        assert_eq!("#102030".parse::<Color>(), Ok(Color::rgb(0x10, 0x20, 0x30)));
        assert_eq!(
            "#10203080".parse::<Color>(),
            Ok(Color::rgba(0x10, 0x20, 0x30, 0x80))
        );
    }

    #[test]
    fn rgb_function_and_names() {
        assert_eq!("rgb(1, 2, 3)".parse::<Color>(), Ok(Color::rgb(1, 2, 3)));
        assert_eq!("White".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!("gold".parse::<Color>(), Ok(Color::rgb(255, 215, 0)));
    }

    #[test]
    fn rejects_garbage() {
        assert!("#12".parse::<Color>().is_err());
        assert!("#ggg".parse::<Color>().is_err());
        assert!("rgb(1,2)".parse::<Color>().is_err());
        assert!("rgb(1,2,300)".parse::<Color>().is_err());
        assert!("chartreuse-ish".parse::<Color>().is_err());
    }

    #[test]
    fn css_and_display_forms() {
        let c = Color::rgb(0, 187, 255);
        assert_eq!(c.to_css(), "rgb(0,187,255)");
        assert_eq!(c.to_string(), "#00bbff");
    }
}
