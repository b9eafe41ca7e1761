//! Device classification
//!
//! Maps an identifying code, and when needed the legacy status byte, to a
//! [`DeviceProfile`]. Classification never fails: unknown devices get a
//! generic profile with [`Confidence::Unresolved`] so callers can still
//! attempt basic control.

use crate::model::FamilyEntry;
use crate::table::{lookup, status_hint};
use lumalink_core::{Capabilities, CodecFamily, Confidence, DeviceProfile, EffectVariant};

/// Name given to profiles derived from the status byte
pub const TENTATIVE_NAME: &str = "Unidentified (status hint)";
/// Name given to the generic fallback profile
pub const FALLBACK_NAME: &str = "Unidentified";

/// Where a classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationSource {
    /// Identifying code found in the family table
    Table,
    /// Code absent or placeholder; status byte matched a hint
    StatusHint,
    /// Nothing matched
    Fallback,
}

/// Classifier over the static family table
pub struct DeviceClassifier;

impl DeviceClassifier {
    /// Classify a device and report which rule decided it
    pub fn classify_with_source(
        code: u16,
        status: Option<u8>,
    ) -> (DeviceProfile, ClassificationSource) {
        if let Some(entry) = lookup(code).filter(|entry| !entry.placeholder) {
            tracing::debug!("Classified {:#06x} as {}", code, entry.name);
            return (Self::from_entry(entry), ClassificationSource::Table);
        }

        if let Some(hint) = status.and_then(status_hint) {
            tracing::warn!(
                "Code {:#06x} not in family table; status byte {:#04x} suggests {} (tentative)",
                code,
                hint.status,
                hint.family
            );
            let profile = DeviceProfile::new(
                code,
                TENTATIVE_NAME,
                hint.family,
                hint.effect_variant,
                hint.capabilities,
                Confidence::Tentative,
            );
            return (profile, ClassificationSource::StatusHint);
        }

        tracing::warn!(
            "Code {:#06x} unresolved (status byte {:?}); using generic fallback",
            code,
            status
        );
        (Self::fallback(code), ClassificationSource::Fallback)
    }

    /// Classify a device
    pub fn classify(code: u16, status: Option<u8>) -> DeviceProfile {
        Self::classify_with_source(code, status).0
    }

    /// Generic profile for devices nothing is known about
    pub fn fallback(code: u16) -> DeviceProfile {
        DeviceProfile::new(
            code,
            FALLBACK_NAME,
            CodecFamily::DirectRgb,
            EffectVariant::Preset,
            Capabilities::RGB,
            Confidence::Unresolved,
        )
    }

    fn from_entry(entry: &FamilyEntry) -> DeviceProfile {
        DeviceProfile::new(
            entry.code,
            entry.name,
            entry.family,
            entry.effect_variant,
            entry.capabilities,
            Confidence::Confirmed,
        )
    }
}

/// Classify a device from its identifying code and optional status byte
pub fn classify(code: u16, status: Option<u8>) -> DeviceProfile {
    DeviceClassifier::classify(code, status)
}
