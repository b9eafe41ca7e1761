//! Response decoder
//!
//! Turns an unframed binary payload into a normalized [`StateSnapshot`].
//! A frame is either decoded completely or rejected; nothing is partially
//! applied.

use super::checksum_of;
use super::layout::{
    Integrity, StateLayout, LED_CONFIG_HEADER, LED_CONFIG_LEN, SUB_MODE_CCT, SUB_MODE_EFFECT,
    SUB_MODE_RGB, SUB_MODE_WHITE,
};
use super::{POWER_OFF, POWER_ON};
use lumalink_core::units::{percent_to_level, scale_channel};
use lumalink_core::{
    ColorMode, DecodeError, DeviceProfile, EffectState, LedConfig, PowerState, Rgb,
    StateSnapshot,
};

/// Length of the state block embedded in advertisements
pub const EMBEDDED_STATE_LEN: usize = 9;

/// A decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedFrame {
    /// State report
    State(StateSnapshot),
    /// LED configuration report
    LedConfig(LedConfig),
}

/// Response decoder
pub struct ResponseDecoder;

impl ResponseDecoder {
    /// Decode any frame the profile's family sends
    pub fn decode_frame(
        profile: &DeviceProfile,
        bytes: &[u8],
    ) -> Result<DecodedFrame, DecodeError> {
        let header = *bytes.first().ok_or(DecodeError::Empty)?;
        if header == LED_CONFIG_HEADER {
            return Self::decode_led_config(bytes).map(DecodedFrame::LedConfig);
        }
        Self::decode_state(profile, bytes).map(DecodedFrame::State)
    }

    /// Decode a state frame
    pub fn decode_state(
        profile: &DeviceProfile,
        bytes: &[u8],
    ) -> Result<StateSnapshot, DecodeError> {
        let layout = StateLayout::for_family(profile.family());
        let header = *bytes.first().ok_or(DecodeError::Empty)?;
        if header == LED_CONFIG_HEADER {
            return Err(DecodeError::UnexpectedFrame("LED configuration"));
        }
        if header != layout.header {
            return Err(DecodeError::UnexpectedHeader(header));
        }
        if bytes.len() != layout.len {
            return Err(DecodeError::Truncated {
                expected: layout.len,
                actual: bytes.len(),
            });
        }
        check_integrity(layout.integrity, bytes)?;

        let power = decode_power(bytes[layout.power])?;
        let sub_mode = bytes[layout.sub_mode];
        let rgb = Rgb::new(bytes[layout.red], bytes[layout.green], bytes[layout.blue]);
        let warm = bytes[layout.warm];
        let cool = layout.cool.map(|offset| bytes[offset]).unwrap_or(0);

        let mut snapshot = StateSnapshot {
            power,
            model: Some(bytes[layout.model]),
            firmware_version: layout.firmware_version.map(|offset| bytes[offset]),
            opaque: layout
                .opaque
                .filter(|_| !layout.opaque_in_effect_only || sub_mode == SUB_MODE_EFFECT)
                .map(|offset| bytes[offset]),
            ..Default::default()
        };

        match sub_mode {
            SUB_MODE_RGB => {
                snapshot.mode = ColorMode::StaticColor;
                snapshot.rgb = rgb;
                snapshot.warm = warm;
                snapshot.cool = cool;
                snapshot.brightness = rgb.max_channel();
            }
            SUB_MODE_WHITE => {
                snapshot.mode = ColorMode::StaticWhite;
                snapshot.rgb = rgb;
                snapshot.warm = warm;
                snapshot.cool = cool;
                snapshot.brightness = warm.max(cool);
            }
            SUB_MODE_CCT => {
                let (temp_offset, bri_offset) =
                    layout.cct.ok_or(DecodeError::UnknownMode(sub_mode))?;
                apply_cct(&mut snapshot, bytes[temp_offset], bytes[bri_offset]);
            }
            SUB_MODE_EFFECT => {
                let low = u16::from(bytes[layout.effect_id]);
                let id = match layout.effect_id_hi {
                    Some(offset) => (u16::from(bytes[offset]) << 8) | low,
                    None => low,
                };
                snapshot.mode = ColorMode::Effect;
                snapshot.effect = Some(EffectState {
                    id,
                    speed: profile.speed_encoding().decode(bytes[layout.effect_speed]),
                });
                snapshot.brightness = layout
                    .effect_brightness
                    .map(|offset| percent_to_level(bytes[offset]))
                    .unwrap_or(u8::MAX);
            }
            other => return Err(DecodeError::UnknownMode(other)),
        }

        tracing::debug!("Decoded state for {}: {}", profile, snapshot);
        Ok(snapshot)
    }

    /// Decode an LED configuration frame
    pub fn decode_led_config(bytes: &[u8]) -> Result<LedConfig, DecodeError> {
        let header = *bytes.first().ok_or(DecodeError::Empty)?;
        if header != LED_CONFIG_HEADER {
            return Err(DecodeError::UnexpectedHeader(header));
        }
        if bytes.len() != LED_CONFIG_LEN {
            return Err(DecodeError::Truncated {
                expected: LED_CONFIG_LEN,
                actual: bytes.len(),
            });
        }
        check_integrity(Integrity::Checksum, bytes)?;
        Ok(LedConfig {
            pixels: u16::from_be_bytes([bytes[1], bytes[2]]),
            segments: bytes[3],
            ic_type: bytes[4],
            wiring: bytes[5],
        })
    }

    /// Decode the state block carried in an advertisement
    ///
    /// Layout `power mode sub speed R G B W C`. In color temperature mode
    /// the R and G slots carry temperature and brightness percent. The block
    /// has no integrity byte, so the result is approximate.
    pub fn decode_embedded(
        profile: &DeviceProfile,
        block: &[u8],
    ) -> Result<StateSnapshot, DecodeError> {
        if block.len() < EMBEDDED_STATE_LEN {
            return Err(DecodeError::Truncated {
                expected: EMBEDDED_STATE_LEN,
                actual: block.len(),
            });
        }
        let power = decode_power(block[0])?;
        let rgb = Rgb::new(block[4], block[5], block[6]);
        let (warm, cool) = (block[7], block[8]);

        let mut snapshot = StateSnapshot {
            power,
            rgb,
            warm,
            cool,
            ..Default::default()
        };
        match block[2] {
            SUB_MODE_RGB => {
                snapshot.brightness = rgb.max_channel();
            }
            SUB_MODE_WHITE => {
                snapshot.mode = ColorMode::StaticWhite;
                snapshot.brightness = warm.max(cool);
            }
            // Temperature and brightness percent sit in the red and green slots
            SUB_MODE_CCT if StateLayout::for_family(profile.family()).cct.is_some() => {
                snapshot.rgb = Rgb::default();
                apply_cct(&mut snapshot, block[4], block[5]);
            }
            SUB_MODE_EFFECT => {
                snapshot.mode = ColorMode::Effect;
                snapshot.effect = Some(EffectState {
                    id: u16::from(block[1]),
                    speed: profile.speed_encoding().decode(block[3]),
                });
                snapshot.brightness = u8::MAX;
            }
            other => return Err(DecodeError::UnknownMode(other)),
        }
        Ok(snapshot)
    }
}

fn apply_cct(snapshot: &mut StateSnapshot, temperature: u8, brightness_percent: u8) {
    let temperature = temperature.min(100);
    let level = percent_to_level(brightness_percent);
    let cool = scale_channel(level, percent_to_level(temperature));
    snapshot.mode = ColorMode::ColorTemperature;
    snapshot.color_temperature = Some(temperature);
    snapshot.brightness = level;
    snapshot.cool = cool;
    snapshot.warm = level - cool;
}

/// Decode a state frame
pub fn decode(profile: &DeviceProfile, bytes: &[u8]) -> Result<StateSnapshot, DecodeError> {
    ResponseDecoder::decode_state(profile, bytes)
}

/// Decode a state or LED configuration frame
pub fn decode_frame(profile: &DeviceProfile, bytes: &[u8]) -> Result<DecodedFrame, DecodeError> {
    ResponseDecoder::decode_frame(profile, bytes)
}

/// Decode an advertisement state block
pub fn decode_embedded(
    profile: &DeviceProfile,
    block: &[u8],
) -> Result<StateSnapshot, DecodeError> {
    ResponseDecoder::decode_embedded(profile, block)
}

fn check_integrity(integrity: Integrity, bytes: &[u8]) -> Result<(), DecodeError> {
    let Some((&actual, body)) = bytes.split_last() else {
        return Err(DecodeError::Empty);
    };
    let expected = match integrity {
        Integrity::Footer(footer) => footer,
        Integrity::Checksum => checksum_of(body),
    };
    if actual == expected {
        Ok(())
    } else {
        Err(DecodeError::CorruptFrame { expected, actual })
    }
}

fn decode_power(byte: u8) -> Result<PowerState, DecodeError> {
    match byte {
        POWER_ON => Ok(PowerState::On),
        POWER_OFF => Ok(PowerState::Off),
        other => Err(DecodeError::UnknownPowerState(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_integrity_footer() {
        assert!(check_integrity(Integrity::Footer(0x99), &[0x66, 0x99]).is_ok());
        assert_eq!(
            check_integrity(Integrity::Footer(0x99), &[0x66, 0x98]),
            Err(DecodeError::CorruptFrame {
                expected: 0x99,
                actual: 0x98
            })
        );
    }

    #[test]
    fn test_check_integrity_checksum() {
        assert!(check_integrity(Integrity::Checksum, &[0x01, 0x02, 0x03]).is_ok());
        assert!(check_integrity(Integrity::Checksum, &[0x01, 0x02, 0x04]).is_err());
    }

    #[test]
    fn test_decode_power() {
        assert_eq!(decode_power(0x23), Ok(PowerState::On));
        assert_eq!(decode_power(0x24), Ok(PowerState::Off));
        assert_eq!(decode_power(0x00), Err(DecodeError::UnknownPowerState(0)));
    }

    #[test]
    fn test_led_config() {
        let mut frame = vec![0x63, 0x00, 0x96, 0x02, 0x01, 0x03, 0x00];
        frame.push(checksum_of(&frame));
        let config = ResponseDecoder::decode_led_config(&frame).unwrap();
        assert_eq!(config.pixels, 150);
        assert_eq!(config.segments, 2);
        assert_eq!(config.wiring, 3);
    }

    #[test]
    fn test_embedded_color_temperature() {
        let block = [0x23, 0x61, SUB_MODE_CCT, 0x10, 40, 60, 0x00, 0x00, 0x00];
        let tunable = lumalink_devicedb::classify(0x0035, None);
        let snapshot = ResponseDecoder::decode_embedded(&tunable, &block).unwrap();
        assert_eq!(snapshot.mode, ColorMode::ColorTemperature);
        assert_eq!(snapshot.color_temperature, Some(40));
        assert_eq!(snapshot.brightness, 153);
        assert_eq!(snapshot.cool, 61);
        assert_eq!(snapshot.warm, 92);
        assert_eq!(snapshot.rgb, Rgb::default());

        let direct = lumalink_devicedb::classify(0x0003, None);
        assert_eq!(
            ResponseDecoder::decode_embedded(&direct, &block),
            Err(DecodeError::UnknownMode(SUB_MODE_CCT))
        );
    }
}
