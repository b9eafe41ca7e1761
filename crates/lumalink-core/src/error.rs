//! Error handling for lumalink
//!
//! Provides error types for each layer of the protocol core:
//! - Encode errors (intent rejected before any bytes exist)
//! - Decode errors (a received frame could not be normalized)
//! - Frame errors (the transport envelope itself is malformed)
//! - Device errors (classification did not yield a usable profile)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Encode error type
///
/// Raised by the command encoder. Both kinds are rejected before anything is
/// written to the device.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The profile lacks the capability the intent requires
    #[error("Intent {intent} not supported by {family}: {reason}")]
    UnsupportedIntent {
        /// Short name of the rejected intent.
        intent: &'static str,
        /// Codec family of the target profile.
        family: String,
        /// Which capability is missing.
        reason: String,
    },

    /// A caller-supplied value is outside the declared range of its field
    #[error("Value {value} out of range for '{field}' ({min}..={max})")]
    EncodingRange {
        /// The field that carried the value.
        field: &'static str,
        /// The rejected value.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },
}

/// Decode error type
///
/// Raised by the response decoder. A frame that fails to decode is never
/// partially applied to a snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Checksum or footer mismatch
    #[error("Corrupt frame: expected integrity byte {expected:#04x}, got {actual:#04x}")]
    CorruptFrame {
        /// The value computed from the frame contents.
        expected: u8,
        /// The value found in the frame.
        actual: u8,
    },

    /// Frame length does not match the family's layout
    #[error("Frame length {actual} does not match expected {expected}")]
    Truncated {
        /// Length required by the layout.
        expected: usize,
        /// Length received.
        actual: usize,
    },

    /// Leading byte is not a header this family sends
    #[error("Unexpected frame header {0:#04x}")]
    UnexpectedHeader(u8),

    /// Power byte is neither the on nor the off marker
    #[error("Unknown power state byte {0:#04x}")]
    UnknownPowerState(u8),

    /// Sub-mode byte does not select a known interpretation
    #[error("Unknown mode byte {0:#04x}")]
    UnknownMode(u8),

    /// Empty input
    #[error("Empty frame")]
    Empty,

    /// A valid frame of a kind the caller did not ask for
    #[error("Unexpected frame kind: {0}")]
    UnexpectedFrame(&'static str),
}

/// Frame error type
///
/// Raised by the transport framer while unwrapping or reassembling envelopes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Notification shorter than the envelope header
    #[error("Envelope too short: {len} bytes")]
    TooShort {
        /// Bytes received.
        len: usize,
    },

    /// Declared length fields disagree with each other or the data
    #[error("Envelope length mismatch: declared {declared}, available {available}")]
    LengthMismatch {
        /// Length declared in the header.
        declared: usize,
        /// Length actually present.
        available: usize,
    },

    /// Continuation fragment without a matching first fragment
    #[error("Stray fragment {index} for sequence {seq}")]
    StrayFragment {
        /// Sequence number carried by the fragment.
        seq: u8,
        /// Fragment index.
        index: u8,
    },

    /// Outbound payload too large for the length fields
    #[error("Payload of {len} bytes exceeds the envelope limit")]
    PayloadTooLarge {
        /// Payload length.
        len: usize,
    },

    /// Structured-text record could not be parsed
    #[error("Malformed structured record: {reason}")]
    MalformedRecord {
        /// Parser message.
        reason: String,
    },

    /// Embedded payload is not valid hex
    #[error("Invalid hex payload: {reason}")]
    InvalidHex {
        /// Decoder message.
        reason: String,
    },
}

/// Device error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Classification had no confident match
    #[error("Unresolved device code {code:#06x}")]
    UnresolvedDevice {
        /// The identifying code that failed to resolve.
        code: u16,
    },
}

/// Main error type for lumalink
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used by sessions and the probe.
#[derive(Error, Debug)]
pub enum Error {
    /// Encode error
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Decode error
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Frame error
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Device error
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// No notification arrived within the bound
    #[error("No notification within {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The transport collaborator reported a failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Create a transport error from a string message
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Check if this is a corrupt frame
    pub fn is_corrupt_frame(&self) -> bool {
        matches!(self, Error::Decode(DecodeError::CorruptFrame { .. }))
    }

    /// Check if this is an encode error
    pub fn is_encode_error(&self) -> bool {
        matches!(self, Error::Encode(_))
    }

    /// Conditions expected on a lossy link; everything else is a bug
    pub fn is_expected_in_operation(&self) -> bool {
        self.is_timeout() || self.is_corrupt_frame()
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
