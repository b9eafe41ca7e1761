//! Normalized device state
//!
//! A [`StateSnapshot`] is produced by the response decoder from one frame and
//! replaces the previous snapshot of its device wholesale. Every numeric field
//! is in its canonical range: channels and brightness 0-255, speed 0-100,
//! color temperature 0-100.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    /// Output on
    On,
    /// Output off
    #[default]
    Off,
}

impl PowerState {
    /// Whether the output is on
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }
}

/// Active output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Static RGB color
    #[default]
    StaticColor,
    /// Static warm/cool white levels
    StaticWhite,
    /// Built-in effect
    Effect,
    /// Native color temperature
    ColorTemperature,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticColor => write!(f, "Static Color"),
            Self::StaticWhite => write!(f, "Static White"),
            Self::Effect => write!(f, "Effect"),
            Self::ColorTemperature => write!(f, "Color Temperature"),
        }
    }
}

/// RGB triple, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Rgb {
    /// Create a color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Largest channel
    pub fn max_channel(&self) -> u8 {
        self.r.max(self.g).max(self.b)
    }

    /// Whether any channel is lit
    pub fn is_lit(&self) -> bool {
        self.max_channel() > 0
    }
}

/// Running effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectState {
    /// Effect id
    pub id: u16,
    /// Canonical speed 0-100
    pub speed: u8,
}

/// Addressable LED configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedConfig {
    /// Pixels per segment
    pub pixels: u16,
    /// Segment count
    pub segments: u8,
    /// LED driver IC type code
    pub ic_type: u8,
    /// Color wiring order code
    pub wiring: u8,
}

/// Normalized device state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Power state
    pub power: PowerState,
    /// Active mode
    pub mode: ColorMode,
    /// RGB channels
    pub rgb: Rgb,
    /// Warm white 0-255
    pub warm: u8,
    /// Cool white 0-255
    pub cool: u8,
    /// Canonical brightness 0-255
    pub brightness: u8,
    /// Effect, when mode is [`ColorMode::Effect`]
    pub effect: Option<EffectState>,
    /// Temperature percent, when mode is [`ColorMode::ColorTemperature`]
    pub color_temperature: Option<u8>,
    /// LED configuration, when it has been reported
    pub led_config: Option<LedConfig>,
    /// Reserved byte of unconfirmed meaning, verbatim
    pub opaque: Option<u8>,
    /// Model code echoed by the device
    pub model: Option<u8>,
    /// Firmware version echoed by the device
    pub firmware_version: Option<u8>,
}

impl StateSnapshot {
    /// Copy with a reported LED configuration attached
    pub fn with_led_config(self, led_config: LedConfig) -> Self {
        Self {
            led_config: Some(led_config),
            ..self
        }
    }

    /// Whether the output is on
    pub fn is_on(&self) -> bool {
        self.power.is_on()
    }
}

impl fmt::Display for StateSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {} rgb=({},{},{}) w={} c={} bri={}",
            self.power, self.mode, self.rgb.r, self.rgb.g, self.rgb.b, self.warm, self.cool,
            self.brightness
        )?;
        if let Some(effect) = self.effect {
            write!(f, " effect={} speed={}", effect.id, effect.speed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_off() {
        let snapshot = StateSnapshot::default();
        assert!(!snapshot.is_on());
        assert_eq!(snapshot.mode, ColorMode::StaticColor);
        assert!(snapshot.effect.is_none());
    }

    #[test]
    fn test_with_led_config_keeps_state() {
        let snapshot = StateSnapshot {
            power: PowerState::On,
            rgb: Rgb::new(10, 20, 30),
            ..Default::default()
        };
        let config = LedConfig {
            pixels: 150,
            segments: 1,
            ic_type: 1,
            wiring: 2,
        };
        let updated = snapshot.with_led_config(config);
        assert_eq!(updated.rgb, snapshot.rgb);
        assert_eq!(updated.led_config, Some(config));
    }

    #[test]
    fn test_rgb_max_channel() {
        assert_eq!(Rgb::new(10, 200, 30).max_channel(), 200);
        assert!(!Rgb::default().is_lit());
    }
}
