//! Transport framing
//!
//! Envelope wrapping, fragmentation and inbound reassembly. The header's
//! payload-encoding byte is recorded but never trusted; payloads are told
//! apart by their first byte.

pub mod assembler;
pub mod envelope;

pub use assembler::{FrameAssembler, Payload};
pub use envelope::Framer;

/// Envelope header length
pub const HEADER_LEN: usize = 8;
/// Fragment marker of a first fragment
pub const FIRST_FRAGMENT: u8 = 0x00;
/// Fragment marker bit of a continuation fragment
pub const CONTINUATION_FLAG: u8 = 0x40;
/// Largest continuation index
pub const MAX_FRAGMENT_INDEX: u8 = 0x3F;
/// Declared payload encoding: binary
pub const ENCODING_BINARY: u8 = 0x80;
/// Declared payload encoding: structured text
pub const ENCODING_TEXT: u8 = 0x81;
/// Kind byte: a response notification is expected
pub const KIND_RESPONSE: u8 = 0x0B;
/// Kind byte: write only
pub const KIND_WRITE: u8 = 0x0A;
/// Largest payload the single-byte `len+1` field can describe
pub const MAX_PAYLOAD_LEN: usize = 254;
/// Smallest usable MTU
pub const MIN_MTU: usize = 20;
/// Default MTU
pub const DEFAULT_MTU: usize = 244;
/// Leading bytes of frames legacy firmware sends without an envelope
pub const BARE_HEADERS: [u8; 4] = [0x81, 0x66, 0x63, b'{'];
