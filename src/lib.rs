//! # Lumalink
//!
//! Protocol translation core for Bluetooth LED lighting controllers whose
//! wire format changes from one hardware generation to the next.
//!
//! ## Architecture
//!
//! Lumalink is organized as a workspace with multiple crates:
//!
//! 1. **lumalink-core** - Intents, state snapshots, device profiles, errors
//! 2. **lumalink-devicedb** - Product code table and device classification
//! 3. **lumalink-communication** - Command encoding, response decoding,
//!    transport framing, advertisements, capability probing, sessions
//! 4. **lumalink-settings** - Configuration files
//!
//! The transport itself is not part of this crate. Callers implement
//! [`DeviceLink`] over whatever BLE stack they use and drive a
//! [`DeviceSession`] with [`Intent`] values.

pub use lumalink_communication::{
    advertisement, codec, decode, encode, framing, probe, probe_capabilities, session,
    Advertisement, CapabilityProbe, CommandEncoder, DeviceLink, DeviceSession, EncodeOptions,
    FrameAssembler, Framer, Payload, ProbeChannel, ProbeSettings, ResponseDecoder, SessionConfig,
    WireCommand,
};
pub use lumalink_core::{
    units, Capabilities, CodecFamily, ColorMode, Confidence, DeviceProfile, EffectVariant, Error,
    Intent, LedConfig, PowerState, Result, Rgb, StateSnapshot,
};
pub use lumalink_devicedb::{classify, lookup, DeviceClassifier};
pub use lumalink_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Initialize logging with one JSON object per event, for log collectors
pub fn init_json_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
