use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// A palette entry with channels in 0.0..=1.0 (not enforced)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PaletteColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl PaletteColor {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(hex.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| Error::InvalidColor(hex.to_string()))
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

/// Accepted spellings of a palette entry in JSON
#[derive(Deserialize)]
#[serde(untagged)]
enum RawColor {
    Hex(String),
    Channels {
        #[serde(default)]
        r: f64,
        #[serde(default)]
        g: f64,
        #[serde(default)]
        b: f64,
    },
}

impl<'de> Deserialize<'de> for PaletteColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match RawColor::deserialize(deserializer)? {
            RawColor::Hex(hex) => PaletteColor::from_hex(&hex).map_err(serde::de::Error::custom),
            RawColor::Channels { r, g, b } => Ok(PaletteColor::new(r, g, b)),
        }
    }
}

/// Ordered palette, consumed once per shader generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(pub Vec<PaletteColor>);

impl Palette {
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|source| Error::Parse {
            what: "palette",
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&data)
    }

    pub fn colors(&self) -> &[PaletteColor] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PaletteColor> for Palette {
    fn from_iter<I: IntoIterator<Item = PaletteColor>>(iter: I) -> Self {
        Palette(iter.into_iter().collect())
    }
}
