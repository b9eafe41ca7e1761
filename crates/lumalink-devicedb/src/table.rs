//! Static device family table
//!
//! Wire layouts are bit-exact contracts: changing a row changes which bytes
//! a device receives. Rows are sorted by identifying code.

use crate::model::{FamilyEntry, StatusHint};
use lumalink_core::{Capabilities as C, CodecFamily as F, EffectVariant as E};

const NONE: C = C::empty();
const WARM: C = C::WARM_WHITE;
const CCT: C = C::WARM_WHITE.union(C::COOL_WHITE);
const RGB: C = C::RGB_EFFECTS;
const RGBW: C = C::RGBW_EFFECTS;
const RGBWW: C = C::RGBWW_EFFECTS;
const MODERN: C = C::MODERN_POWER;
const BULB: C = C::RGBWW_EFFECTS.union(C::COLOR_TEMPERATURE).union(MODERN);
const TUNABLE: C = C::TUNABLE_WHITE.union(MODERN);
const STRIP: C = C::RGB_EFFECTS.union(C::SEGMENTS).union(MODERN);
const SYMPHONY: C = STRIP.union(C::BACKGROUND_COLOR);

pub static DEVICE_TABLE: &[FamilyEntry] = &[
    FamilyEntry::placeholder(0x0000, "Generic OEM"),
    FamilyEntry::new(0x0001, "Original RGB Controller", F::Original, E::Legacy, RGB),
    FamilyEntry::new(0x0002, "Original RGBW Controller", F::Original, E::Legacy, RGBW),
    FamilyEntry::new(0x0003, "RGB Controller", F::DirectRgb, E::Preset, RGB),
    FamilyEntry::new(0x0004, "RGBW Controller", F::DirectRgb, E::Preset, RGBW),
    FamilyEntry::new(0x0005, "RGBW Controller Mini", F::DirectRgb, E::Preset, RGBW),
    FamilyEntry::new(0x0006, "RGBW Controller Compact", F::DirectRgb, E::Preset, RGBW),
    FamilyEntry::new(0x0007, "RGBCW Controller", F::DirectRgb, E::Preset, RGBWW),
    FamilyEntry::new(0x0008, "RGB Music Controller", F::DirectRgb, E::Preset, RGB),
    FamilyEntry::new(0x0009, "Ceiling Light CCT", F::DirectRgb, E::Preset, CCT),
    FamilyEntry::new(0x000A, "Symphony Controller", F::Symphony, E::Symphony, SYMPHONY),
    FamilyEntry::new(0x000E, "Floor Lamp RGBCW", F::DirectRgb, E::Preset, RGBWW),
    FamilyEntry::new(0x0010, "Christmas Light", F::DirectRgb, E::Preset, RGB),
    FamilyEntry::new(0x0016, "Magnetic Light CCT", F::DirectRgb, E::Preset, CCT),
    FamilyEntry::new(0x0017, "Magnetic Light Dimmable", F::DirectRgb, E::Preset, WARM),
    FamilyEntry::new(0x0018, "Plant Light", F::DirectRgb, E::Preset, RGB),
    FamilyEntry::new(0x0019, "Smart Socket", F::DirectRgb, E::Preset, NONE),
    FamilyEntry::new(0x001A, "Christmas Light v2", F::DirectRgb, E::Preset, RGB),
    FamilyEntry::new(0x001B, "Spray Light", F::DirectRgb, E::Preset, RGB),
    FamilyEntry::new(0x001C, "Table Light CCT", F::DirectRgb, E::Preset, CCT),
    FamilyEntry::new(0x001D, "Fill Light", F::DirectRgb, E::Preset, RGBWW),
    FamilyEntry::new(0x001E, "Ceiling Light RGBCW", F::DirectRgb, E::Preset, RGBWW),
    FamilyEntry::new(0x0021, "Bulb Dimmable", F::DirectRgb, E::Preset, WARM),
    FamilyEntry::new(0x0025, "RGB/WW/CW Controller", F::DirectRgb, E::Preset, RGBWW),
    FamilyEntry::new(0x0026, "RGBW Controller v2", F::DirectRgb, E::Checked, RGBW),
    FamilyEntry::new(0x0027, "RGBCW Controller v2", F::DirectRgb, E::Checked, RGBWW),
    FamilyEntry::new(0x0033, "RGB Controller v2", F::DirectRgb, E::Compact, RGB),
    FamilyEntry::new(0x0034, "RGB Controller v3", F::DirectRgb, E::Checked, RGB.union(MODERN)),
    FamilyEntry::new(0x0035, "Bulb RGBCW", F::HsvStructured, E::Checked, BULB),
    FamilyEntry::new(0x0036, "Bulb RGBCW v2", F::HsvStructured, E::Checked, BULB),
    FamilyEntry::new(0x0037, "Bulb RGBW", F::HsvStructured, E::Checked, RGBW.union(MODERN)),
    FamilyEntry::new(0x003B, "Bulb RGBCW v3", F::HsvStructured, E::Checked, BULB),
    FamilyEntry::new(0x003C, "Downlight RGBCW", F::HsvStructured, E::Checked, BULB),
    FamilyEntry::new(0x0041, "Dimmable Controller", F::DirectRgb, E::Preset, WARM),
    FamilyEntry::new(0x0044, "Bulb RGBW Legacy", F::DirectRgb, E::Preset, RGBW),
    FamilyEntry::new(0x0045, "RGBW Controller Legacy", F::DirectRgb, E::Preset, RGBW),
    FamilyEntry::new(0x0052, "Bulb CCT", F::HsvStructured, E::Checked, TUNABLE),
    FamilyEntry::new(0x0053, "Ceiling Light CCT v2", F::HsvStructured, E::Checked, TUNABLE),
    FamilyEntry::new(0x0054, "Downlight RGBW", F::DirectRgb, E::Preset, RGBW),
    FamilyEntry::placeholder(0x005A, "OEM Placeholder"),
    FamilyEntry::new(0x0062, "CCT Controller", F::DirectRgb, E::Preset, CCT),
    FamilyEntry::placeholder(0x0065, "Prototype Board"),
    FamilyEntry::new(0x0068, "Outdoor Flood RGB", F::DirectRgb, E::Checked, RGB),
    FamilyEntry::new(0x0093, "Switch 1 Channel", F::DirectRgb, E::Preset, NONE),
    FamilyEntry::new(0x0097, "Socket v2", F::DirectRgb, E::Preset, MODERN),
    FamilyEntry::new(0x00A1, "Addressable v1", F::Addressable, E::Compact, STRIP),
    FamilyEntry::new(0x00A2, "Addressable v2", F::Addressable, E::Checked, STRIP),
    FamilyEntry::new(0x00A3, "Addressable v3", F::Addressable, E::Extended, STRIP),
    FamilyEntry::new(0x00A4, "Addressable Music", F::Addressable, E::Checked, STRIP),
    FamilyEntry::new(0x00A6, "Addressable Pixel Bar", F::Addressable, E::Extended, STRIP),
    FamilyEntry::new(0x00A7, "Addressable v4", F::Addressable, E::Extended, STRIP),
    FamilyEntry::new(0x00A9, "Symphony Strip", F::Symphony, E::Symphony, SYMPHONY),
    FamilyEntry::new(0x00AA, "Symphony Pixel Panel", F::Symphony, E::Symphony, SYMPHONY),
    FamilyEntry::new(0x00AB, "Symphony Curtain", F::Symphony, E::Symphony, SYMPHONY),
    FamilyEntry::new(0x00AC, "Symphony Light Bar", F::Symphony, E::Symphony, SYMPHONY),
    FamilyEntry::new(0x00AD, "Symphony Music Strip", F::Symphony, E::Symphony, SYMPHONY),
    FamilyEntry::new(0x00B1, "Permanent Outdoor Lights", F::Addressable, E::Extended, STRIP),
    FamilyEntry::new(0x00B2, "Wall Washer", F::HsvStructured, E::Checked, BULB),
    FamilyEntry::new(0x00E1, "Ceiling Panel RGBCW", F::HsvStructured, E::Checked, BULB),
    FamilyEntry::new(0x00E2, "Ceiling Panel CCT", F::HsvStructured, E::Checked, TUNABLE),
    FamilyEntry::placeholder(0x00FF, "Unconfigured OEM"),
];

/// Legacy status-byte hints. Several families share these values, so a hint
/// only ever yields a tentative profile with RGB assumed.
pub static STATUS_HINTS: &[StatusHint] = &[
    StatusHint {
        status: 0x51,
        family: F::DirectRgb,
        effect_variant: E::Preset,
        capabilities: C::RGB_EFFECTS,
    },
    StatusHint {
        status: 0x53,
        family: F::HsvStructured,
        effect_variant: E::Checked,
        capabilities: C::RGB_EFFECTS.union(MODERN),
    },
    StatusHint {
        status: 0x54,
        family: F::Addressable,
        effect_variant: E::Compact,
        capabilities: C::RGB_EFFECTS.union(MODERN),
    },
    StatusHint {
        status: 0x55,
        family: F::Symphony,
        effect_variant: E::Symphony,
        capabilities: C::RGB_EFFECTS.union(MODERN),
    },
    StatusHint {
        status: 0x56,
        family: F::Original,
        effect_variant: E::Legacy,
        capabilities: C::RGB_EFFECTS,
    },
];

/// Look up an identifying code
pub fn lookup(code: u16) -> Option<&'static FamilyEntry> {
    DEVICE_TABLE
        .binary_search_by_key(&code, |entry| entry.code)
        .ok()
        .map(|index| &DEVICE_TABLE[index])
}

/// Look up a legacy status byte
pub fn status_hint(status: u8) -> Option<&'static StatusHint> {
    STATUS_HINTS.iter().find(|hint| hint.status == status)
}
