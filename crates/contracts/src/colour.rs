//! RGB colour value with the wire representations used by device payloads:
//! the comma-separated `"r,g,b"` triple and the lowercase `#rrggbb` hex form.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::ContractError;

/// An RGB triple, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create from channel values
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` representation
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse a `#rrggbb` string (leading `#` optional)
    pub fn from_hex(s: &str) -> Result<Self, ContractError> {
        let h = s.strip_prefix('#').unwrap_or(s);
        if h.len() != 6 {
            return Err(ContractError::colour_parse(s, "expected 6 hex digits"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&h[range], 16)
                .map_err(|e| ContractError::colour_parse(s, e.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ContractError;

    /// Parse a `"r,g,b"` triple
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(|p| p.trim().parse::<u8>());
        let mut next = |name: &str| {
            parts
                .next()
                .ok_or_else(|| ContractError::colour_parse(s, format!("missing {name} channel")))?
                .map_err(|e| ContractError::colour_parse(s, e.to_string()))
        };
        let rgb = Self {
            r: next("red")?,
            g: next("green")?,
            b: next("blue")?,
        };
        if parts.next().is_some() {
            return Err(ContractError::colour_parse(s, "too many channels"));
        }
        Ok(rgb)
    }
}

// Configuration files carry colours as "r,g,b" strings.
impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
