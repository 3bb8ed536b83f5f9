//! fwdepot Core - Version gating, artifact storage and config decryption
//!
//! This crate provides the decision logic behind the fwdepot endpoint:
//! - Segment-wise firmware version comparison
//! - Read-only access to instance-rooted artifacts (configs, firmware)
//! - Authenticated decryption of the shared global configuration
//! - Typed views of the stored JSON documents

pub mod crypto;
pub mod document;
pub mod store;
pub mod version;

pub use crypto::{decrypt, DecryptError};
pub use document::{FirmwareDescriptor, GlobalConfigDocument, LocalConfigDocument};
pub use store::{ArtifactStore, StoreError};
pub use version::vercmp;
