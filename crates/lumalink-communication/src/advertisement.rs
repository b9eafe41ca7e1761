//! Advertisement manufacturer data
//!
//! `[0] status, [1] format, [2..8] MAC, [8..10] product id (big-endian),
//! [10] firmware, [11] LED version`. From format 2 on, a 22-byte or longer
//! record also embeds a state block at `[13..22]`.

use crate::codec::decoder::{decode_embedded, EMBEDDED_STATE_LEN};
use lumalink_core::{DecodeError, DeviceProfile, StateSnapshot};
use serde::Serialize;
use std::fmt;

/// Shortest manufacturer data record
pub const MIN_LEN: usize = 12;
/// First format version that can embed a state block
pub const EMBEDDED_STATE_FORMAT: u8 = 2;
const EMBEDDED_STATE_OFFSET: usize = 13;
const EMBEDDED_MIN_LEN: usize = EMBEDDED_STATE_OFFSET + EMBEDDED_STATE_LEN;

/// Parsed manufacturer data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advertisement {
    /// Legacy status byte
    pub status: u8,
    /// Record format version
    pub format: u8,
    /// Device MAC address
    pub mac: [u8; 6],
    /// Identifying code
    pub product_id: u16,
    /// Firmware version
    pub firmware: u8,
    /// LED version
    pub led_version: u8,
    /// Raw embedded state block
    pub state_block: Option<[u8; EMBEDDED_STATE_LEN]>,
}

impl Advertisement {
    /// Parse a manufacturer data record
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Empty);
        }
        if data.len() < MIN_LEN {
            return Err(DecodeError::Truncated {
                expected: MIN_LEN,
                actual: data.len(),
            });
        }

        let mut mac = [0u8; 6];
        mac.copy_from_slice(&data[2..8]);
        let format = data[1];
        let state_block = if format >= EMBEDDED_STATE_FORMAT && data.len() >= EMBEDDED_MIN_LEN {
            let mut block = [0u8; EMBEDDED_STATE_LEN];
            block.copy_from_slice(&data[EMBEDDED_STATE_OFFSET..EMBEDDED_MIN_LEN]);
            Some(block)
        } else {
            None
        };

        Ok(Self {
            status: data[0],
            format,
            mac,
            product_id: u16::from_be_bytes([data[8], data[9]]),
            firmware: data[10],
            led_version: data[11],
            state_block,
        })
    }

    /// Identifying code used for classification
    pub fn code(&self) -> u16 {
        self.product_id
    }

    /// Classify the advertising device
    pub fn classify(&self) -> DeviceProfile {
        lumalink_devicedb::classify(self.product_id, Some(self.status))
    }

    /// Approximate state from the embedded block, when present
    pub fn embedded_state(
        &self,
        profile: &DeviceProfile,
    ) -> Option<Result<StateSnapshot, DecodeError>> {
        self.state_block
            .as_ref()
            .map(|block| decode_embedded(profile, block))
    }

    /// MAC address as colon-separated hex
    pub fn mac_string(&self) -> String {
        self.mac
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl fmt::Display for Advertisement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} product {:#06x} fw {} (format {})",
            self.mac_string(),
            self.product_id,
            self.firmware,
            self.format
        )
    }
}
