use lumalink_core::{Capabilities, CodecFamily, EffectVariant};
use serde::Serialize;

/// One row of the static family table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FamilyEntry {
    /// Identifying product code
    pub code: u16,
    /// Product name
    pub name: &'static str,
    /// Wire format family
    pub family: CodecFamily,
    /// Effect command variant
    pub effect_variant: EffectVariant,
    /// Supported channels and features
    pub capabilities: Capabilities,
    /// Code is shared by unrelated OEM products; the entry carries no real information
    pub placeholder: bool,
}

impl FamilyEntry {
    /// Create a table entry
    pub const fn new(
        code: u16,
        name: &'static str,
        family: CodecFamily,
        effect_variant: EffectVariant,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            code,
            name,
            family,
            effect_variant,
            capabilities,
            placeholder: false,
        }
    }

    /// Create an entry for a code that must not be trusted
    pub const fn placeholder(code: u16, name: &'static str) -> Self {
        Self {
            code,
            name,
            family: CodecFamily::DirectRgb,
            effect_variant: EffectVariant::Preset,
            capabilities: Capabilities::RGB,
            placeholder: true,
        }
    }
}

/// Weak hint derived from the legacy advertisement status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusHint {
    /// Status byte value
    pub status: u8,
    /// Family the status byte suggests
    pub family: CodecFamily,
    /// Effect command variant
    pub effect_variant: EffectVariant,
    /// Assumed capabilities
    pub capabilities: Capabilities,
}
