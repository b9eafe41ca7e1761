//! Outbound envelope
//!
//! `[frag, seq, 80, 00, len_hi, len_lo, len+1, kind, payload…]`. Frames longer
//! than the MTU are split; continuation fragments carry `[40|index, seq]`
//! followed by the next slice of the frame.

use super::{
    CONTINUATION_FLAG, ENCODING_BINARY, FIRST_FRAGMENT, HEADER_LEN, KIND_RESPONSE, KIND_WRITE,
    MAX_FRAGMENT_INDEX, MAX_PAYLOAD_LEN, MIN_MTU,
};
use crate::codec::WireCommand;
use lumalink_core::FrameError;

/// Wraps commands into envelopes, one sequence number per command
#[derive(Debug, Clone)]
pub struct Framer {
    sequence: u8,
    mtu: usize,
}

impl Framer {
    /// Create a framer for the given MTU
    pub fn new(mtu: usize) -> Self {
        Self {
            sequence: 0,
            mtu: mtu.max(MIN_MTU),
        }
    }

    /// MTU in effect
    pub fn mtu(&self) -> usize {
        self.mtu
    }

    /// Sequence number the next command will carry
    pub fn peek_sequence(&self) -> u8 {
        self.sequence
    }

    fn next_sequence(&mut self) -> u8 {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        sequence
    }

    /// Wrap a command into one or more link writes
    pub fn wrap(&mut self, command: &WireCommand) -> Result<Vec<Vec<u8>>, FrameError> {
        let payload = command.as_bytes();
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLarge { len: payload.len() });
        }
        let sequence = self.next_sequence();
        let [len_hi, len_lo] = (payload.len() as u16).to_be_bytes();
        let kind = if command.response_expected() {
            KIND_RESPONSE
        } else {
            KIND_WRITE
        };

        let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
        frame.extend_from_slice(&[
            FIRST_FRAGMENT,
            sequence,
            ENCODING_BINARY,
            0x00,
            len_hi,
            len_lo,
            payload.len() as u8 + 1,
            kind,
        ]);
        frame.extend_from_slice(payload);

        if frame.len() <= self.mtu {
            return Ok(vec![frame]);
        }

        let mut writes = vec![frame[..self.mtu].to_vec()];
        let per_fragment = self.mtu - 2;
        for (index, chunk) in frame[self.mtu..].chunks(per_fragment).enumerate() {
            let index = index + 1;
            if index > usize::from(MAX_FRAGMENT_INDEX) {
                return Err(FrameError::PayloadTooLarge { len: payload.len() });
            }
            let mut write = Vec::with_capacity(chunk.len() + 2);
            write.push(CONTINUATION_FLAG | index as u8);
            write.push(sequence);
            write.extend_from_slice(chunk);
            writes.push(write);
        }
        tracing::debug!(
            "Split frame seq {} ({} bytes) into {} writes",
            sequence,
            frame.len(),
            writes.len()
        );
        Ok(writes)
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new(super::DEFAULT_MTU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_query() {
        let mut framer = Framer::default();
        let command = WireCommand::new(vec![0x81, 0x8A, 0x8B, 0x96], true);
        let writes = framer.wrap(&command).unwrap();
        assert_eq!(
            writes,
            vec![vec![
                0x00, 0x00, 0x80, 0x00, 0x00, 0x04, 0x05, 0x0B, 0x81, 0x8A, 0x8B, 0x96
            ]]
        );
        assert_eq!(framer.peek_sequence(), 1);
    }

    #[test]
    fn test_write_only_kind() {
        let mut framer = Framer::default();
        let command = WireCommand::new(vec![0x71, 0x23, 0x0F, 0xA3], false);
        let writes = framer.wrap(&command).unwrap();
        assert_eq!(writes[0][7], 0x0A);
    }

    #[test]
    fn test_sequence_wraps() {
        let mut framer = Framer::default();
        let command = WireCommand::new(vec![0x01], false);
        for _ in 0..255 {
            framer.wrap(&command).unwrap();
        }
        assert_eq!(framer.peek_sequence(), 255);
        let writes = framer.wrap(&command).unwrap();
        assert_eq!(writes[0][1], 255);
        assert_eq!(framer.peek_sequence(), 0);
    }

    #[test]
    fn test_fragmentation() {
        let mut framer = Framer::new(20);
        let command = WireCommand::new((0..40u8).collect(), false);
        let writes = framer.wrap(&command).unwrap();
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[0].len(), 20);
        assert_eq!(writes[1][0], 0x41);
        assert_eq!(writes[2][0], 0x42);
        assert!(writes[1..].iter().all(|w| w[1] == 0 && w.len() <= 20));
        let carried: usize = writes[1..].iter().map(|w| w.len() - 2).sum();
        assert_eq!(carried, 8 + 40 - 20);
    }

    #[test]
    fn test_payload_too_large() {
        let mut framer = Framer::default();
        let command = WireCommand::new(vec![0; 300], false);
        assert_eq!(
            framer.wrap(&command),
            Err(FrameError::PayloadTooLarge { len: 300 })
        );
    }
}
