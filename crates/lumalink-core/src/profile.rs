//! Device profiles
//!
//! A profile names the codec family a device speaks, the capability flags it
//! advertises, and the range encodings its fields use. Profiles are created
//! once per device by the classifier and never mutated; refinement (for
//! example by the capability probe) produces a new value.

use crate::units::{BrightnessEncoding, SpeedEncoding};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Codec families: one wire-format convention for commands and responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecFamily {
    /// First-generation controllers: no checksums, footer-terminated frames
    Original,
    /// Direct RGB(W/WW) channel writes with a trailing checksum
    DirectRgb,
    /// 13-byte hue/saturation commands, percent brightness
    HsvStructured,
    /// Addressable strips, 13-byte color commands, segment configuration
    Addressable,
    /// Symphony strips, inverted effect speed, background colors
    Symphony,
}

impl CodecFamily {
    /// Whether commands of this family carry a trailing checksum
    pub fn has_checksum(self) -> bool {
        !matches!(self, Self::Original)
    }

    /// How brightness fields of this family are declared
    pub fn brightness_encoding(self) -> BrightnessEncoding {
        match self {
            Self::Original | Self::DirectRgb => BrightnessEncoding::Direct,
            Self::HsvStructured | Self::Addressable | Self::Symphony => {
                BrightnessEncoding::Percent
            }
        }
    }

    /// Whether colors are sent as the 13-byte structured command
    pub fn uses_structured_color(self) -> bool {
        matches!(
            self,
            Self::HsvStructured | Self::Addressable | Self::Symphony
        )
    }
}

impl fmt::Display for CodecFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "Original"),
            Self::DirectRgb => write!(f, "Direct RGB"),
            Self::HsvStructured => write!(f, "HSV Structured"),
            Self::Addressable => write!(f, "Addressable"),
            Self::Symphony => write!(f, "Symphony"),
        }
    }
}

/// Byte layout parameters of an effect command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectFormat {
    /// First byte of the command
    pub opcode: u8,
    /// Effect id takes two bytes (big-endian), making the payload 5 bytes
    pub wide_id: bool,
    /// Trailing checksum present
    pub checksum: bool,
    /// Speed byte encoding
    pub speed: SpeedEncoding,
    /// Brightness byte follows the speed byte
    pub carries_brightness: bool,
    /// Fixed byte in place of brightness when it is not carried
    pub trailer: Option<u8>,
}

impl EffectFormat {
    /// Payload length before any checksum
    pub fn payload_len(&self) -> usize {
        if self.wide_id {
            5
        } else {
            4
        }
    }

    /// Largest effect id this format can carry
    pub fn max_id(&self) -> u16 {
        if self.wide_id {
            u16::MAX
        } else {
            u16::from(u8::MAX)
        }
    }
}

/// Effect command variants
///
/// Three independent axes distinguish them: payload length, checksum and
/// speed encoding. The parameters live in [`EffectVariant::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectVariant {
    /// `BB id speed 44`
    Legacy,
    /// `61 id speed 0F cs`
    Preset,
    /// `38 id speed brightness`
    Compact,
    /// `38 id speed brightness cs`
    Checked,
    /// `38 id speed brightness cs`, inverted speed
    Symphony,
    /// `42 id_hi id_lo speed brightness cs`
    Extended,
}

impl EffectVariant {
    /// Byte layout parameters for this variant
    pub fn format(self) -> EffectFormat {
        match self {
            Self::Legacy => EffectFormat {
                opcode: 0xBB,
                wide_id: false,
                checksum: false,
                speed: SpeedEncoding::Inverted,
                carries_brightness: false,
                trailer: Some(0x44),
            },
            Self::Preset => EffectFormat {
                opcode: 0x61,
                wide_id: false,
                checksum: true,
                speed: SpeedEncoding::Inverted,
                carries_brightness: false,
                trailer: Some(0x0F),
            },
            Self::Compact => EffectFormat {
                opcode: 0x38,
                wide_id: false,
                checksum: false,
                speed: SpeedEncoding::Direct,
                carries_brightness: true,
                trailer: None,
            },
            Self::Checked => EffectFormat {
                opcode: 0x38,
                wide_id: false,
                checksum: true,
                speed: SpeedEncoding::Direct,
                carries_brightness: true,
                trailer: None,
            },
            Self::Symphony => EffectFormat {
                opcode: 0x38,
                wide_id: false,
                checksum: true,
                speed: SpeedEncoding::Inverted,
                carries_brightness: true,
                trailer: None,
            },
            Self::Extended => EffectFormat {
                opcode: 0x42,
                wide_id: true,
                checksum: true,
                speed: SpeedEncoding::Direct,
                carries_brightness: true,
                trailer: None,
            },
        }
    }
}

impl fmt::Display for EffectVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Preset => write!(f, "preset"),
            Self::Compact => write!(f, "compact"),
            Self::Checked => write!(f, "checked"),
            Self::Symphony => write!(f, "symphony"),
            Self::Extended => write!(f, "extended"),
        }
    }
}

bitflags! {
    /// Capability flags for a device
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u16 {
        /// Red, green and blue channels
        const RGB = 1 << 0;
        /// Warm white channel
        const WARM_WHITE = 1 << 1;
        /// Cool white channel
        const COOL_WHITE = 1 << 2;
        /// Built-in effects
        const EFFECTS = 1 << 3;
        /// Effects with foreground/background colors
        const BACKGROUND_COLOR = 1 << 4;
        /// Addressable segment configuration
        const SEGMENTS = 1 << 5;
        /// Native color temperature command
        const COLOR_TEMPERATURE = 1 << 6;
        /// Duration-bearing power command instead of the legacy one
        const MODERN_POWER = 1 << 7;

        /// Channel flags the capability probe can infer
        const CHANNELS = Self::RGB.bits() | Self::WARM_WHITE.bits() | Self::COOL_WHITE.bits();
        /// RGB with effects
        const RGB_EFFECTS = Self::RGB.bits() | Self::EFFECTS.bits();
        /// RGB plus warm white with effects
        const RGBW_EFFECTS = Self::RGB_EFFECTS.bits() | Self::WARM_WHITE.bits();
        /// RGB plus both whites with effects
        const RGBWW_EFFECTS = Self::RGBW_EFFECTS.bits() | Self::COOL_WHITE.bits();
        /// Both whites with native temperature control
        const TUNABLE_WHITE =
            Self::WARM_WHITE.bits() | Self::COOL_WHITE.bits() | Self::COLOR_TEMPERATURE.bits();
    }
}

impl Capabilities {
    /// Whether a color temperature intent can be expressed at all
    pub fn supports_color_temperature(self) -> bool {
        self.contains(Self::COLOR_TEMPERATURE)
            || self.contains(Self::WARM_WHITE | Self::COOL_WHITE)
    }
}

/// How confident the classification is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Identifying code found in the family table
    Confirmed,
    /// Derived from the legacy status byte; eligible for probing
    Tentative,
    /// Probe refined a tentative profile
    Probed,
    /// No match; generic fallback
    Unresolved,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Tentative => write!(f, "tentative"),
            Self::Probed => write!(f, "probed"),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// Resolved description of one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    code: u16,
    name: String,
    family: CodecFamily,
    capabilities: Capabilities,
    effect_variant: EffectVariant,
    speed_encoding: SpeedEncoding,
    brightness_encoding: BrightnessEncoding,
    checksum: bool,
    confidence: Confidence,
}

impl DeviceProfile {
    /// Create a profile; encodings and checksum presence follow from the
    /// family and effect variant
    pub fn new(
        code: u16,
        name: impl Into<String>,
        family: CodecFamily,
        effect_variant: EffectVariant,
        capabilities: Capabilities,
        confidence: Confidence,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            family,
            capabilities,
            effect_variant,
            speed_encoding: effect_variant.format().speed,
            brightness_encoding: family.brightness_encoding(),
            checksum: family.has_checksum(),
            confidence,
        }
    }

    /// Identifying code the profile was resolved from
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Codec family
    pub fn family(&self) -> CodecFamily {
        self.family
    }

    /// Capability flags
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Check a single capability
    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    /// Effect command variant
    pub fn effect_variant(&self) -> EffectVariant {
        self.effect_variant
    }

    /// Effect speed encoding
    pub fn speed_encoding(&self) -> SpeedEncoding {
        self.speed_encoding
    }

    /// Brightness field encoding
    pub fn brightness_encoding(&self) -> BrightnessEncoding {
        self.brightness_encoding
    }

    /// Whether commands carry a trailing checksum
    pub fn has_checksum(&self) -> bool {
        self.checksum
    }

    /// Classification confidence
    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Whether the capability probe may refine this profile
    pub fn is_tentative(&self) -> bool {
        self.confidence == Confidence::Tentative
    }

    /// Whether classification found no match
    pub fn is_unresolved(&self) -> bool {
        self.confidence == Confidence::Unresolved
    }

    /// New profile with replaced capabilities and confidence
    pub fn refined(&self, capabilities: Capabilities, confidence: Confidence) -> Self {
        Self {
            capabilities,
            confidence,
            ..self.clone()
        }
    }
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:#06x}, {}, {})",
            self.name, self.code, self.family, self.confidence
        )
    }
}
