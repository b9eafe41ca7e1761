//! Inbound reassembly and payload disambiguation

use super::{
    BARE_HEADERS, CONTINUATION_FLAG, ENCODING_BINARY, ENCODING_TEXT, FIRST_FRAGMENT, HEADER_LEN,
    MAX_FRAGMENT_INDEX,
};
use lumalink_core::FrameError;
use serde_json::Value;
use std::collections::HashMap;

const RECORD_START: u8 = b'{';

/// A complete inbound payload
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw binary frame
    Binary(Vec<u8>),
    /// Structured record carrying an embedded binary frame
    Structured {
        /// Status code of the record, when present
        code: Option<i64>,
        /// Hex-decoded embedded frame
        payload: Vec<u8>,
    },
    /// Structured record without a payload (device-info echo)
    Info(Value),
}

impl Payload {
    /// The binary frame carried by this payload, if any
    pub fn frame(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(bytes) => Some(bytes),
            Self::Structured { payload, .. } => Some(payload),
            Self::Info(_) => None,
        }
    }

    /// Whether the payload carries a binary frame
    pub fn has_frame(&self) -> bool {
        self.frame().is_some()
    }
}

#[derive(Debug)]
struct Partial {
    declared: usize,
    encoding: u8,
    data: Vec<u8>,
    next_index: u8,
}

/// Reassembles fragmented notifications keyed by sequence number
#[derive(Debug, Default)]
pub struct FrameAssembler {
    pending: HashMap<u8, Partial>,
}

impl FrameAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sequences waiting for more fragments
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drop all partial reassemblies
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Feed one notification
    ///
    /// Returns `Ok(None)` while a fragmented payload is incomplete.
    pub fn push(&mut self, notification: &[u8]) -> Result<Option<Payload>, FrameError> {
        let Some(&first) = notification.first() else {
            return Err(FrameError::TooShort { len: 0 });
        };

        if first & !MAX_FRAGMENT_INDEX == CONTINUATION_FLAG && self.continues(notification) {
            return self.continuation(notification);
        }
        if BARE_HEADERS.contains(&first) {
            tracing::debug!("Bare frame with header {:#04x}", first);
            return classify_payload(notification, None).map(Some);
        }
        if first == FIRST_FRAGMENT {
            return self.first_fragment(notification);
        }
        if first & !MAX_FRAGMENT_INDEX == CONTINUATION_FLAG {
            return Err(FrameError::StrayFragment {
                seq: notification.get(1).copied().unwrap_or(0),
                index: first & MAX_FRAGMENT_INDEX,
            });
        }

        tracing::debug!("Unrecognized leading byte {:#04x}; passing through", first);
        Ok(Some(Payload::Binary(notification.to_vec())))
    }

    fn continues(&self, notification: &[u8]) -> bool {
        let index = notification[0] & MAX_FRAGMENT_INDEX;
        notification
            .get(1)
            .and_then(|seq| self.pending.get(seq))
            .is_some_and(|partial| partial.next_index == index)
    }

    fn first_fragment(&mut self, notification: &[u8]) -> Result<Option<Payload>, FrameError> {
        if notification.len() < HEADER_LEN {
            return Err(FrameError::TooShort {
                len: notification.len(),
            });
        }
        let seq = notification[1];
        let encoding = notification[2];
        let declared = usize::from(u16::from_be_bytes([notification[4], notification[5]]));
        let declared_plus_one = usize::from(notification[6]);
        if declared_plus_one != declared + 1 {
            return Err(FrameError::LengthMismatch {
                declared,
                available: declared_plus_one.saturating_sub(1),
            });
        }

        let data = notification[HEADER_LEN..].to_vec();
        if data.len() > declared {
            return Err(FrameError::LengthMismatch {
                declared,
                available: data.len(),
            });
        }
        if data.len() == declared {
            return classify_payload(&data, Some(encoding)).map(Some);
        }

        let partial = Partial {
            declared,
            encoding,
            data,
            next_index: 1,
        };
        if self.pending.insert(seq, partial).is_some() {
            tracing::warn!("Sequence {} restarted before completing; dropped partial", seq);
        }
        Ok(None)
    }

    fn continuation(&mut self, notification: &[u8]) -> Result<Option<Payload>, FrameError> {
        let seq = notification[1];
        let Some(mut partial) = self.pending.remove(&seq) else {
            return Err(FrameError::StrayFragment {
                seq,
                index: notification[0] & MAX_FRAGMENT_INDEX,
            });
        };
        partial.data.extend_from_slice(&notification[2..]);
        partial.next_index += 1;

        if partial.data.len() > partial.declared {
            return Err(FrameError::LengthMismatch {
                declared: partial.declared,
                available: partial.data.len(),
            });
        }
        if partial.data.len() == partial.declared {
            return classify_payload(&partial.data, Some(partial.encoding)).map(Some);
        }
        self.pending.insert(seq, partial);
        Ok(None)
    }
}

/// Tell a structured record from a binary frame by its first byte
pub fn classify_payload(bytes: &[u8], declared: Option<u8>) -> Result<Payload, FrameError> {
    let is_record = bytes.first() == Some(&RECORD_START);
    match (declared, is_record) {
        (Some(ENCODING_BINARY), true) => {
            tracing::warn!("Envelope declares binary but payload is a structured record")
        }
        (Some(ENCODING_TEXT), false) => {
            tracing::warn!("Envelope declares structured text but payload is binary")
        }
        _ => {}
    }

    if !is_record {
        return Ok(Payload::Binary(bytes.to_vec()));
    }

    let record: Value =
        serde_json::from_slice(bytes).map_err(|e| FrameError::MalformedRecord {
            reason: e.to_string(),
        })?;
    let Some(object) = record.as_object() else {
        return Err(FrameError::MalformedRecord {
            reason: "record is not an object".to_string(),
        });
    };

    match object.get("payload") {
        None => Ok(Payload::Info(record)),
        Some(Value::String(encoded)) => {
            let payload = hex::decode(encoded.trim()).map_err(|e| FrameError::InvalidHex {
                reason: e.to_string(),
            })?;
            let code = object.get("code").and_then(Value::as_i64);
            Ok(Payload::Structured { code, payload })
        }
        Some(_) => Err(FrameError::MalformedRecord {
            reason: "payload is not a string".to_string(),
        }),
    }
}
