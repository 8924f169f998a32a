//! Genre domain model.
//!
//! # Invariants
//! - `name` is non-blank and unique case-insensitively across the catalog.
//! - `color` is always a 24-bit RGB value; storage form is uppercase `RRGGBB`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([0-9A-Fa-f]{6})$").expect("valid hex color regex"));

/// Stable identifier for a genre.
pub type GenreId = Uuid;

/// Validation failures for genre records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreValidationError {
    BlankName,
    InvalidColor(String),
}

impl Display for GenreValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "genre name must not be blank"),
            Self::InvalidColor(value) => {
                write!(f, "invalid genre color `{value}`; expected RRGGBB hex")
            }
        }
    }
}

impl Error for GenreValidationError {}

/// Display color of a genre tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenreColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl GenreColor {
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses `RRGGBB` or `#RRGGBB`, case-insensitive.
    pub fn parse(value: &str) -> Result<Self, GenreValidationError> {
        let trimmed = value.trim();
        let hex = HEX_COLOR_RE
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| GenreValidationError::InvalidColor(trimmed.to_string()))?;

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| GenreValidationError::InvalidColor(trimmed.to_string()))
        };
        Ok(Self {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }

    /// Uppercase `RRGGBB` form without a leading `#`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

impl Display for GenreColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl Serialize for GenreColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for GenreColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// User-defined colored tag shared between books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    pub color: GenreColor,
}

impl Genre {
    /// Creates a genre with a generated ID. The name is trimmed.
    pub fn new(name: impl Into<String>, color: GenreColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            color,
        }
    }

    pub fn validate(&self) -> Result<(), GenreValidationError> {
        if self.name.trim().is_empty() {
            return Err(GenreValidationError::BlankName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{GenreColor, GenreValidationError};

    #[test]
    fn parse_accepts_with_and_without_hash() {
        let plain = GenreColor::parse("00ff00").unwrap();
        let hashed = GenreColor::parse("#00FF00").unwrap();
        assert_eq!(plain, hashed);
        assert_eq!(plain.rgb(), (0, 255, 0));
        assert_eq!(plain.to_hex(), "00FF00");
    }

    #[test]
    fn parse_rejects_short_and_non_hex_values() {
        for value in ["FFF", "GG0000", "#12345", "1234567", ""] {
            assert!(matches!(
                GenreColor::parse(value),
                Err(GenreValidationError::InvalidColor(_))
            ));
        }
    }

    #[test]
    fn display_prefixes_hash() {
        assert_eq!(GenreColor::from_rgb(255, 0, 16).to_string(), "#FF0010");
    }
}
