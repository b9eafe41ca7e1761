//! Range conversion utilities
//!
//! Every numeric field that crosses the wire has a declared range. Conversions
//! between the canonical ranges (brightness 0-255, speed 0-100) and the
//! family-specific ones happen here and nowhere else.
//!
//! All arithmetic is integer with round-half-up so results do not depend on
//! floating point representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest canonical speed (fastest)
pub const SPEED_MAX: u8 = 100;
/// Fastest value of the inverted 1-31 scale
pub const INVERTED_FASTEST: u8 = 1;
/// Slowest value of the inverted 1-31 scale
pub const INVERTED_SLOWEST: u8 = 31;
/// Largest percent value
pub const PERCENT_MAX: u8 = 100;

/// How a family encodes effect speed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedEncoding {
    /// 0-100, larger is faster
    Direct,
    /// 1-31, smaller is faster
    Inverted,
}

impl SpeedEncoding {
    /// Canonical 0-100 speed to the wire value
    pub fn encode(self, speed: u8) -> u8 {
        match self {
            Self::Direct => speed.min(SPEED_MAX),
            Self::Inverted => canonical_to_inverted(speed),
        }
    }

    /// Wire value to canonical 0-100 speed
    pub fn decode(self, raw: u8) -> u8 {
        match self {
            Self::Direct => raw.min(SPEED_MAX),
            Self::Inverted => inverted_to_canonical(raw),
        }
    }
}

impl fmt::Display for SpeedEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct 0-100"),
            Self::Inverted => write!(f, "inverted 1-31"),
        }
    }
}

/// How a family encodes brightness fields on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessEncoding {
    /// 0-255
    Direct,
    /// 0-100
    Percent,
}

impl BrightnessEncoding {
    /// Wire value to canonical 0-255 brightness
    pub fn decode(self, raw: u8) -> u8 {
        match self {
            Self::Direct => raw,
            Self::Percent => percent_to_level(raw),
        }
    }

    /// Canonical 0-255 brightness to the wire value
    pub fn encode(self, level: u8) -> u8 {
        match self {
            Self::Direct => level,
            Self::Percent => level_to_percent(level),
        }
    }
}

impl fmt::Display for BrightnessEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct 0-255"),
            Self::Percent => write!(f, "percent 0-100"),
        }
    }
}

/// Canonical speed (0-100) to the inverted 1-31 scale
///
/// `1 + round(30 * (1 - speed / 100))`; values above 100 saturate.
pub fn canonical_to_inverted(speed: u8) -> u8 {
    let speed = u32::from(speed.min(SPEED_MAX));
    let steps = ((100 - speed) * 30 + 50) / 100;
    (1 + steps) as u8
}

/// Inverted 1-31 speed to canonical 0-100
///
/// `round((31 - value) * 99 / 30 + 1)`; out-of-range inputs are clamped to 1-31.
pub fn inverted_to_canonical(value: u8) -> u8 {
    let value = u32::from(value.clamp(INVERTED_FASTEST, INVERTED_SLOWEST));
    (((31 - value) * 99 + 15) / 30 + 1) as u8
}

/// Percent (0-100) to canonical brightness (0-255)
///
/// `round(value * 255 / 100)`; values above 100 saturate.
pub fn percent_to_level(percent: u8) -> u8 {
    let percent = u32::from(percent.min(PERCENT_MAX));
    ((percent * 255 + 50) / 100) as u8
}

/// Canonical brightness (0-255) to percent (0-100)
pub fn level_to_percent(level: u8) -> u8 {
    ((u32::from(level) * 100 + 127) / 255) as u8
}

/// Scale a channel value by a canonical brightness level
pub fn scale_channel(value: u8, level: u8) -> u8 {
    ((u32::from(value) * u32::from(level) + 127) / 255) as u8
}
