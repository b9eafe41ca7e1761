//! High-level intents
//!
//! Constructed by the caller, consumed once by the command encoder.
//! Ranges are declared per field and enforced by the encoder.

use crate::snapshot::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the caller wants the device to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Switch the output on or off
    SetPower {
        /// Target power state
        on: bool,
    },
    /// Set static channel levels, each 0-255
    SetColor {
        /// Red 0-255
        r: u8,
        /// Green 0-255
        g: u8,
        /// Blue 0-255
        b: u8,
        /// Warm white 0-255
        warm: u8,
        /// Cool white 0-255
        cool: u8,
    },
    /// Set canonical brightness 0-255, keeping the current mode
    SetBrightness {
        /// Canonical brightness 0-255
        level: u8,
    },
    /// Run a built-in effect
    SetEffect {
        /// Effect id, 1-255 (1-65535 for wide-id variants)
        id: u16,
        /// Canonical speed 0-100, larger is faster
        speed: u8,
        /// Effect brightness percent 1-100; 0 is never sent
        brightness: u8,
    },
    /// Set white color temperature
    SetColorTemperature {
        /// 0 (warmest) to 100 (coolest)
        percent: u8,
        /// Brightness percent 0-100
        brightness: u8,
    },
    /// Run an effect with explicit foreground and background colors
    SetEffectColors {
        /// Effect id 1-255
        id: u8,
        /// Canonical speed 0-100
        speed: u8,
        /// Effect brightness percent 1-100
        brightness: u8,
        /// Foreground color
        foreground: Rgb,
        /// Background color
        background: Rgb,
    },
    /// Ask for a state report
    QueryState,
    /// Ask for the addressable LED configuration
    QueryLedConfig,
}

impl Intent {
    /// Convenience constructor for an RGB-only color
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::SetColor {
            r,
            g,
            b,
            warm: 0,
            cool: 0,
        }
    }

    /// Short name used in errors and logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetPower { .. } => "SetPower",
            Self::SetColor { .. } => "SetColor",
            Self::SetBrightness { .. } => "SetBrightness",
            Self::SetEffect { .. } => "SetEffect",
            Self::SetColorTemperature { .. } => "SetColorTemperature",
            Self::SetEffectColors { .. } => "SetEffectColors",
            Self::QueryState => "QueryState",
            Self::QueryLedConfig => "QueryLedConfig",
        }
    }

    /// Whether the command produced for this intent awaits a notification
    pub fn expects_response(&self) -> bool {
        matches!(self, Self::QueryState | Self::QueryLedConfig)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetPower { on } => write!(f, "SetPower(on={})", on),
            Self::SetColor { r, g, b, warm, cool } => {
                write!(f, "SetColor({},{},{},w={},c={})", r, g, b, warm, cool)
            }
            Self::SetBrightness { level } => write!(f, "SetBrightness({})", level),
            Self::SetEffect {
                id,
                speed,
                brightness,
            } => write!(f, "SetEffect(id={}, speed={}, bri={})", id, speed, brightness),
            Self::SetColorTemperature {
                percent,
                brightness,
            } => write!(f, "SetColorTemperature({}%, bri={})", percent, brightness),
            Self::SetEffectColors { id, speed, .. } => {
                write!(f, "SetEffectColors(id={}, speed={})", id, speed)
            }
            Self::QueryState => write!(f, "QueryState"),
            Self::QueryLedConfig => write!(f, "QueryLedConfig"),
        }
    }
}
