//! lumalink Settings Crate
//!
//! Handles configuration files and their conversion into session, encoder,
//! and probe settings.

pub mod config;

pub use config::{Config, EncoderSection, ProbeSection, SessionSection};
