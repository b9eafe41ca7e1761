//! # lumalink Communication
//!
//! Wire protocol for BLE LED controllers: command encoding, response
//! decoding, transport framing, advertisement parsing, the capability probe,
//! and the per-device session that ties them together.

pub mod advertisement;
pub mod codec;
pub mod framing;
pub mod probe;
pub mod session;

pub use advertisement::Advertisement;
pub use codec::{
    decode, decode_embedded, decode_frame, encode, CommandEncoder, DecodedFrame, EncodeOptions,
    ResponseDecoder, WireCommand,
};
pub use framing::{FrameAssembler, Framer, Payload};
pub use probe::{probe_capabilities, CapabilityProbe, ProbeChannel, ProbeSettings};
pub use session::{DeviceLink, DeviceSession, SessionConfig};
