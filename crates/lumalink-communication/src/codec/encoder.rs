//! Command encoder
//!
//! Lowers an [`Intent`] into the exact bytes a device of the given profile
//! expects. Capability and range checks happen before any byte is produced.

use super::{WireCommand, PERSIST, POWER_OFF, POWER_ON};
use lumalink_core::units::{level_to_percent, percent_to_level, PERCENT_MAX, SPEED_MAX};
use lumalink_core::{
    Capabilities, CodecFamily, ColorMode, DeviceProfile, EncodeError, Intent, Rgb, StateSnapshot,
};
use serde::{Deserialize, Serialize};

const STRUCTURED_OPCODE: u8 = 0x3B;
const STRUCTURED_HSV: u8 = 0xA1;
const STRUCTURED_CCT: u8 = 0xB1;
const DIRECT_COLOR_OPCODE: u8 = 0x31;
const ORIGINAL_COLOR_OPCODE: u8 = 0x56;
const ORIGINAL_COLOR_FOOTER: u8 = 0xAA;
const EFFECT_COLORS_OPCODE: u8 = 0x41;

const MODE_RGB_ONLY: u8 = 0xF0;
const MODE_WHITE_ONLY: u8 = 0x0F;
const MODE_BOTH: u8 = 0x00;

const ORIGINAL_POWER: [u8; 3] = [0xCC, 0x00, 0x33];
const LEGACY_POWER_OPCODE: u8 = 0x71;
const ORIGINAL_QUERY: [u8; 3] = [0xEF, 0x01, 0x77];
const STATE_QUERY: [u8; 3] = [0x81, 0x8A, 0x8B];
const LED_CONFIG_QUERY: [u8; 4] = [0x63, 0x12, 0x21, 0x0F];

/// Options applied to every command an encoder produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Transition written into duration-bearing commands, whole seconds
    pub transition_secs: u16,
}

/// Command encoder
#[derive(Debug, Clone, Default)]
pub struct CommandEncoder {
    options: EncodeOptions,
}

impl CommandEncoder {
    /// Create an encoder with the given options
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> EncodeOptions {
        self.options
    }

    /// Encode an intent
    ///
    /// `SetBrightness` keeps the current mode and therefore needs a basis
    /// snapshot; use [`CommandEncoder::encode_with_basis`] for it.
    pub fn encode(
        &self,
        profile: &DeviceProfile,
        intent: &Intent,
    ) -> Result<WireCommand, EncodeError> {
        let command = match *intent {
            Intent::SetPower { on } => self.power(profile, on),
            Intent::SetColor {
                r,
                g,
                b,
                warm,
                cool,
            } => self.color(profile, intent, Rgb::new(r, g, b), warm, cool)?,
            Intent::SetBrightness { .. } => {
                return Err(unsupported(
                    profile,
                    intent,
                    "brightness needs the current state as basis",
                ))
            }
            Intent::SetEffect {
                id,
                speed,
                brightness,
            } => self.effect(profile, intent, id, speed, brightness)?,
            Intent::SetColorTemperature {
                percent,
                brightness,
            } => self.color_temperature(profile, intent, percent, brightness)?,
            Intent::SetEffectColors {
                id,
                speed,
                brightness,
                foreground,
                background,
            } => self.effect_colors(
                profile,
                intent,
                id,
                speed,
                brightness,
                foreground,
                background,
            )?,
            Intent::QueryState => query_state(profile),
            Intent::QueryLedConfig => query_led_config(profile, intent)?,
        };

        tracing::debug!(
            "Encoded {} for {}: {:02X?}",
            intent,
            profile,
            command.as_bytes()
        );
        Ok(command)
    }

    /// Encode an intent, lowering `SetBrightness` against a snapshot
    pub fn encode_with_basis(
        &self,
        profile: &DeviceProfile,
        intent: &Intent,
        basis: &StateSnapshot,
    ) -> Result<WireCommand, EncodeError> {
        match *intent {
            Intent::SetBrightness { level } => {
                let lowered = lower_brightness(profile, level, basis);
                tracing::debug!("Lowered {} to {} against current state", intent, lowered);
                self.encode(profile, &lowered)
            }
            _ => self.encode(profile, intent),
        }
    }

    fn duration(&self) -> [u8; 2] {
        self.options.transition_secs.to_be_bytes()
    }

    fn structured(&self, sub: u8, params: [u8; 4], rgb: Rgb) -> WireCommand {
        let [dur_hi, dur_lo] = self.duration();
        let bytes = vec![
            STRUCTURED_OPCODE,
            sub,
            params[0],
            params[1],
            params[2],
            params[3],
            0x00,
            rgb.r,
            rgb.g,
            rgb.b,
            dur_hi,
            dur_lo,
        ];
        WireCommand::build(bytes, true, false)
    }

    fn power(&self, profile: &DeviceProfile, on: bool) -> WireCommand {
        let state = if on { POWER_ON } else { POWER_OFF };
        if profile.family() == CodecFamily::Original {
            let mut bytes = ORIGINAL_POWER.to_vec();
            bytes[1] = state;
            return WireCommand::new(bytes, false);
        }
        if profile.has(Capabilities::MODERN_POWER) {
            self.structured(state, [0; 4], Rgb::default())
        } else {
            WireCommand::build(vec![LEGACY_POWER_OPCODE, state, PERSIST], true, false)
        }
    }

    fn color(
        &self,
        profile: &DeviceProfile,
        intent: &Intent,
        rgb: Rgb,
        warm: u8,
        cool: u8,
    ) -> Result<WireCommand, EncodeError> {
        if rgb.is_lit() && !profile.has(Capabilities::RGB) {
            return Err(unsupported(profile, intent, "no RGB channels"));
        }
        if warm > 0 && !profile.has(Capabilities::WARM_WHITE) {
            return Err(unsupported(profile, intent, "no warm white channel"));
        }
        if cool > 0 && !profile.has(Capabilities::COOL_WHITE) {
            return Err(unsupported(profile, intent, "no cool white channel"));
        }
        let white_lit = warm > 0 || cool > 0;

        match profile.family() {
            CodecFamily::Original => {
                let bytes = vec![
                    ORIGINAL_COLOR_OPCODE,
                    rgb.r,
                    rgb.g,
                    rgb.b,
                    warm,
                    channel_mode(rgb.is_lit(), white_lit),
                    ORIGINAL_COLOR_FOOTER,
                ];
                Ok(WireCommand::new(bytes, false))
            }
            CodecFamily::DirectRgb => {
                let mode = channel_mode(rgb.is_lit(), white_lit);
                let bytes = if profile.has(Capabilities::COOL_WHITE) {
                    vec![DIRECT_COLOR_OPCODE, rgb.r, rgb.g, rgb.b, warm, cool, mode, PERSIST]
                } else {
                    vec![DIRECT_COLOR_OPCODE, rgb.r, rgb.g, rgb.b, warm, mode, PERSIST]
                };
                Ok(WireCommand::build(bytes, profile.has_checksum(), false))
            }
            CodecFamily::HsvStructured | CodecFamily::Addressable | CodecFamily::Symphony => {
                if rgb.is_lit() && white_lit {
                    return Err(unsupported(
                        profile,
                        intent,
                        "color and white channels cannot be set together",
                    ));
                }
                if white_lit {
                    let total = u32::from(warm) + u32::from(cool);
                    let temperature = ((u32::from(cool) * 100 + total / 2) / total) as u8;
                    let brightness = level_to_percent(warm.max(cool));
                    return Ok(self.structured(
                        STRUCTURED_CCT,
                        [0, 0, temperature, brightness],
                        Rgb::default(),
                    ));
                }
                let (hue, saturation, value) = rgb_to_hsv(rgb);
                let [hi, lo] = ((hue << 7) | u16::from(saturation)).to_be_bytes();
                Ok(self.structured(STRUCTURED_HSV, [hi, lo, value, 0], rgb))
            }
        }
    }

    fn color_temperature(
        &self,
        profile: &DeviceProfile,
        intent: &Intent,
        percent: u8,
        brightness: u8,
    ) -> Result<WireCommand, EncodeError> {
        check_range("color temperature", percent.into(), 0, PERCENT_MAX.into())?;
        check_range("brightness", brightness.into(), 0, PERCENT_MAX.into())?;
        if !profile.capabilities().supports_color_temperature() {
            return Err(unsupported(profile, intent, "no color temperature control"));
        }

        if profile.family().uses_structured_color() {
            return Ok(self.structured(
                STRUCTURED_CCT,
                [0, 0, percent, brightness],
                Rgb::default(),
            ));
        }

        // Direct families mix the two white channels instead
        let level = u32::from(percent_to_level(brightness));
        let cool = ((level * u32::from(percent) + 50) / 100) as u8;
        let warm = level as u8 - cool;
        self.color(profile, intent, Rgb::default(), warm, cool)
    }

    fn effect(
        &self,
        profile: &DeviceProfile,
        intent: &Intent,
        id: u16,
        speed: u8,
        brightness: u8,
    ) -> Result<WireCommand, EncodeError> {
        let format = profile.effect_variant().format();
        check_range("effect brightness", brightness.into(), 1, PERCENT_MAX.into())?;
        check_range("effect speed", speed.into(), 0, SPEED_MAX.into())?;
        check_range("effect id", id.into(), 1, format.max_id().into())?;
        if !profile.has(Capabilities::EFFECTS) {
            return Err(unsupported(profile, intent, "no built-in effects"));
        }

        let mut bytes = Vec::with_capacity(format.payload_len() + 1);
        bytes.push(format.opcode);
        if format.wide_id {
            bytes.extend_from_slice(&id.to_be_bytes());
        } else {
            bytes.push(id as u8);
        }
        bytes.push(format.speed.encode(speed));
        match format.trailer {
            Some(trailer) if !format.carries_brightness => bytes.push(trailer),
            _ => bytes.push(brightness),
        }
        Ok(WireCommand::build(bytes, format.checksum, false))
    }

    #[allow(clippy::too_many_arguments)]
    fn effect_colors(
        &self,
        profile: &DeviceProfile,
        intent: &Intent,
        id: u8,
        speed: u8,
        brightness: u8,
        foreground: Rgb,
        background: Rgb,
    ) -> Result<WireCommand, EncodeError> {
        check_range("effect brightness", brightness.into(), 1, PERCENT_MAX.into())?;
        check_range("effect speed", speed.into(), 0, SPEED_MAX.into())?;
        check_range("effect id", id.into(), 1, u8::MAX.into())?;
        if !profile.has(Capabilities::BACKGROUND_COLOR) {
            return Err(unsupported(profile, intent, "no background color effects"));
        }

        let bytes = vec![
            EFFECT_COLORS_OPCODE,
            id,
            foreground.r,
            foreground.g,
            foreground.b,
            background.r,
            background.g,
            background.b,
            profile.speed_encoding().encode(speed),
            0x00,
            brightness,
        ];
        Ok(WireCommand::build(bytes, profile.has_checksum(), false))
    }
}

/// Encode an intent with default options
pub fn encode(profile: &DeviceProfile, intent: &Intent) -> Result<WireCommand, EncodeError> {
    CommandEncoder::default().encode(profile, intent)
}

fn query_state(profile: &DeviceProfile) -> WireCommand {
    if profile.family() == CodecFamily::Original {
        WireCommand::new(ORIGINAL_QUERY.to_vec(), true)
    } else {
        WireCommand::build(STATE_QUERY.to_vec(), profile.has_checksum(), true)
    }
}

fn query_led_config(profile: &DeviceProfile, intent: &Intent) -> Result<WireCommand, EncodeError> {
    if !profile.has(Capabilities::SEGMENTS) {
        return Err(unsupported(profile, intent, "no addressable segments"));
    }
    Ok(WireCommand::build(
        LED_CONFIG_QUERY.to_vec(),
        profile.has_checksum(),
        true,
    ))
}

fn unsupported(profile: &DeviceProfile, intent: &Intent, reason: &str) -> EncodeError {
    EncodeError::UnsupportedIntent {
        intent: intent.name(),
        family: profile.family().to_string(),
        reason: reason.to_string(),
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), EncodeError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EncodeError::EncodingRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn channel_mode(rgb_lit: bool, white_lit: bool) -> u8 {
    match (rgb_lit, white_lit) {
        (true, true) => MODE_BOTH,
        (false, true) => MODE_WHITE_ONLY,
        _ => MODE_RGB_ONLY,
    }
}

fn div_round(num: i32, den: i32) -> i32 {
    if num >= 0 {
        (num + den / 2) / den
    } else {
        -((-num + den / 2) / den)
    }
}

/// RGB to (hue 0-359, saturation 0-100, value 0-100)
pub fn rgb_to_hsv(rgb: Rgb) -> (u16, u8, u8) {
    let (r, g, b) = (i32::from(rgb.r), i32::from(rgb.g), i32::from(rgb.b));
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = level_to_percent(max as u8);
    if delta == 0 {
        return (0, 0, value);
    }
    let saturation = div_round(delta * 100, max) as u8;
    let hue = if max == r {
        div_round(60 * (g - b), delta)
    } else if max == g {
        120 + div_round(60 * (b - r), delta)
    } else {
        240 + div_round(60 * (r - g), delta)
    };
    (hue.rem_euclid(360) as u16, saturation, value)
}

/// Rewrite a brightness change as a mode-preserving intent
fn lower_brightness(profile: &DeviceProfile, level: u8, basis: &StateSnapshot) -> Intent {
    match (basis.mode, basis.effect, basis.color_temperature) {
        (ColorMode::Effect, Some(effect), _) => {
            let brightness = if level == 0 {
                0
            } else {
                level_to_percent(level).max(1)
            };
            Intent::SetEffect {
                id: effect.id,
                speed: effect.speed,
                brightness,
            }
        }
        (ColorMode::ColorTemperature, _, Some(percent)) => Intent::SetColorTemperature {
            percent,
            brightness: level_to_percent(level),
        },
        (mode, _, _) => {
            let channels = [basis.rgb.r, basis.rgb.g, basis.rgb.b, basis.warm, basis.cool];
            let peak = channels.iter().copied().max().unwrap_or(0);
            if peak == 0 {
                // Nothing lit to scale; light a channel the device has
                let prefer_white =
                    mode == ColorMode::StaticWhite || !profile.has(Capabilities::RGB);
                return if prefer_white && profile.has(Capabilities::WARM_WHITE) {
                    white(level, 0)
                } else if prefer_white && profile.has(Capabilities::COOL_WHITE) {
                    white(0, level)
                } else {
                    Intent::rgb(level, level, level)
                };
            }
            let scale = |value: u8| {
                let peak = u32::from(peak);
                ((u32::from(value) * u32::from(level) + peak / 2) / peak) as u8
            };
            Intent::SetColor {
                r: scale(basis.rgb.r),
                g: scale(basis.rgb.g),
                b: scale(basis.rgb.b),
                warm: scale(basis.warm),
                cool: scale(basis.cool),
            }
        }
    }
}

fn white(warm: u8, cool: u8) -> Intent {
    Intent::SetColor {
        r: 0,
        g: 0,
        b: 0,
        warm,
        cool,
    }
}
