//! # lumalink Device Database
//!
//! Static family table and the classifier that turns an advertised
//! identifying code into a [`lumalink_core::DeviceProfile`].

pub mod classifier;
pub mod model;
pub mod table;

pub use classifier::{classify, ClassificationSource, DeviceClassifier};
pub use model::{FamilyEntry, StatusHint};
pub use table::{lookup, status_hint, DEVICE_TABLE, STATUS_HINTS};
