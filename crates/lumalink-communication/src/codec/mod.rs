//! Command encoding and response decoding
//!
//! Both directions dispatch on the profile's [`lumalink_core::CodecFamily`];
//! per-family byte layouts live in [`layout`].

pub mod decoder;
pub mod encoder;
pub mod layout;

pub use decoder::{decode, decode_embedded, decode_frame, DecodedFrame, ResponseDecoder};
pub use encoder::{encode, CommandEncoder, EncodeOptions};
pub use layout::{
    Integrity, StateLayout, SUB_MODE_CCT, SUB_MODE_EFFECT, SUB_MODE_RGB, SUB_MODE_WHITE,
};

/// Power byte value for "on"
pub const POWER_ON: u8 = 0x23;
/// Power byte value for "off"
pub const POWER_OFF: u8 = 0x24;
/// Persist / terminator byte used by several commands
pub const PERSIST: u8 = 0x0F;

/// Encoded command ready for the framer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireCommand {
    bytes: Vec<u8>,
    response_expected: bool,
}

impl WireCommand {
    /// Create a command from raw bytes
    pub fn new(bytes: Vec<u8>, response_expected: bool) -> Self {
        Self {
            bytes,
            response_expected,
        }
    }

    /// Build a command, appending a checksum when `checksum` is set
    pub fn build(mut bytes: Vec<u8>, checksum: bool, response_expected: bool) -> Self {
        if checksum {
            let sum = checksum_of(&bytes);
            bytes.push(sum);
        }
        Self::new(bytes, response_expected)
    }

    /// Command bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into the byte vector
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Whether a notification should be awaited after writing
    pub fn response_expected(&self) -> bool {
        self.response_expected
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the command is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Sum of all bytes modulo 256
pub fn checksum_of(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Whether the last byte is the checksum of the bytes before it
pub fn verify_checksum(frame: &[u8]) -> bool {
    match frame.split_last() {
        Some((&last, body)) => checksum_of(body) == last,
        None => false,
    }
}
