//! Per-family state response layouts
//!
//! Offsets are looked up from the profile's family; the decoder never
//! hard-codes a position.

use lumalink_core::CodecFamily;

/// Sub-mode byte: static RGB
pub const SUB_MODE_RGB: u8 = 0xF0;
/// Sub-mode byte: static white
pub const SUB_MODE_WHITE: u8 = 0x0F;
/// Sub-mode byte: color temperature
pub const SUB_MODE_CCT: u8 = 0xB1;
/// Sub-mode byte: effect running
pub const SUB_MODE_EFFECT: u8 = 0x25;

/// Header of the original 11-byte state frame
pub const ORIGINAL_STATE_HEADER: u8 = 0x66;
/// Footer of the original 11-byte state frame
pub const ORIGINAL_STATE_FOOTER: u8 = 0x99;
/// Header of the classic 14-byte state frame
pub const CLASSIC_STATE_HEADER: u8 = 0x81;
/// Header of the LED configuration frame
pub const LED_CONFIG_HEADER: u8 = 0x63;
/// Length of the LED configuration frame
pub const LED_CONFIG_LEN: usize = 8;

/// How a frame's integrity is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integrity {
    /// Fixed last byte
    Footer(u8),
    /// Last byte is the sum of the preceding bytes
    Checksum,
}

/// Byte offsets of a state frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateLayout {
    /// Leading byte
    pub header: u8,
    /// Total frame length
    pub len: usize,
    /// Integrity rule for the last byte
    pub integrity: Integrity,
    pub model: usize,
    pub power: usize,
    pub mode: usize,
    pub sub_mode: usize,
    pub red: usize,
    pub green: usize,
    pub blue: usize,
    pub warm: usize,
    pub cool: Option<usize>,
    pub firmware_version: Option<usize>,
    /// Effect id (low byte when `effect_id_hi` is set)
    pub effect_id: usize,
    /// High byte of a two-byte effect id
    pub effect_id_hi: Option<usize>,
    /// Effect speed, in the profile's speed encoding
    pub effect_speed: usize,
    /// Effect brightness percent
    pub effect_brightness: Option<usize>,
    /// Color temperature percent and brightness percent
    pub cct: Option<(usize, usize)>,
    /// Reserved byte copied verbatim into the snapshot
    pub opaque: Option<usize>,
    /// The reserved byte is only meaningful while an effect runs
    pub opaque_in_effect_only: bool,
}

const CLASSIC: StateLayout = StateLayout {
    header: CLASSIC_STATE_HEADER,
    len: 14,
    integrity: Integrity::Checksum,
    model: 1,
    power: 2,
    mode: 3,
    sub_mode: 4,
    red: 6,
    green: 7,
    blue: 8,
    warm: 9,
    cool: Some(11),
    firmware_version: Some(10),
    effect_id: 3,
    effect_id_hi: None,
    effect_speed: 5,
    effect_brightness: None,
    cct: None,
    opaque: Some(12),
    opaque_in_effect_only: false,
};

impl StateLayout {
    /// Layout used by a codec family
    pub fn for_family(family: CodecFamily) -> Self {
        match family {
            CodecFamily::Original => StateLayout {
                header: ORIGINAL_STATE_HEADER,
                len: 11,
                integrity: Integrity::Footer(ORIGINAL_STATE_FOOTER),
                cool: None,
                firmware_version: None,
                opaque: None,
                ..CLASSIC
            },
            CodecFamily::DirectRgb => CLASSIC,
            CodecFamily::HsvStructured => StateLayout {
                effect_brightness: Some(6),
                cct: Some((6, 7)),
                ..CLASSIC
            },
            CodecFamily::Addressable => StateLayout {
                effect_id: 6,
                effect_id_hi: Some(5),
                effect_speed: 7,
                effect_brightness: Some(8),
                ..CLASSIC
            },
            CodecFamily::Symphony => StateLayout {
                effect_id: 6,
                effect_speed: 9,
                effect_brightness: Some(8),
                opaque: Some(7),
                opaque_in_effect_only: true,
                ..CLASSIC
            },
        }
    }

    /// Offset of the integrity byte
    pub fn integrity_offset(&self) -> usize {
        self.len - 1
    }
}
