//! HexColor value object (`#RRGGBB`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// An opaque sRGB colour in `#RRGGBB` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    /// Pure white.
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);

    /// Pure black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Creates a colour from its components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB`, `RRGGBB` or the short form `#RGB`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(ValidationError::invalid_format(
                "color",
                format!("expected #RRGGBB, got '{}'", s),
            ));
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => {
                return Err(ValidationError::invalid_format(
                    "color",
                    format!("expected #RRGGBB, got '{}'", s),
                ))
            }
        };
        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| {
                ValidationError::invalid_format("color", format!("expected #RRGGBB, got '{}'", s))
            })
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Returns `(r, g, b)` as bytes.
    pub fn components(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Returns `(r, g, b)` scaled to `0.0..=1.0` (PDF colour operands).
    pub fn unit_components(&self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }

    /// Upper-case hex digits without the leading `#` (OOXML colour attributes).
    pub fn to_hex_digits(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Mixes the colour towards white by `amount` (0.0 keeps it, 1.0 is white).
    pub fn tint(&self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (f32::from(c) + (255.0 - f32::from(c)) * amount).round() as u8;
        Self::rgb(mix(self.r), mix(self.g), mix(self.b))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex_digits())
    }
}

impl FromStr for HexColor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        HexColor::parse(&raw).map_err(serde::de::Error::custom)
    }
}
