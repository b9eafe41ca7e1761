//! # lumalink Core
//!
//! Core types and utilities shared by every lumalink crate: device profiles,
//! intents, normalized state snapshots, range conversions, and the error
//! hierarchy.

pub mod error;
pub mod intent;
pub mod profile;
pub mod snapshot;
pub mod units;

pub use error::{DecodeError, DeviceError, EncodeError, Error, FrameError, Result};
pub use intent::Intent;
pub use profile::{
    Capabilities, CodecFamily, Confidence, DeviceProfile, EffectFormat, EffectVariant,
};
pub use snapshot::{ColorMode, EffectState, LedConfig, PowerState, Rgb, StateSnapshot};
pub use units::{BrightnessEncoding, SpeedEncoding};
