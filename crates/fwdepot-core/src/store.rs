//! Read-only access to the instance storage tree
//!
//! All artifacts live under a single instance root and are written there by
//! deployment tooling, never by this process. Every read goes straight to
//! the filesystem so a deploy is picked up by the very next poll.
//!
//! Layout:
//! - `global_config.enc` - secretbox ciphertext of the shared config
//! - `config.json.<chip_id>` - plaintext per-device config
//! - `firmware.json` - descriptor naming the firmware binary and version
//! - firmware binary wherever the descriptor points, relative or absolute

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::document::FirmwareDescriptor;

const GLOBAL_CONFIG_FILE: &str = "global_config.enc";
const FIRMWARE_DESCRIPTOR_FILE: &str = "firmware.json";
const LOCAL_CONFIG_PREFIX: &str = "config.json.";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("malformed document {0}: {1}")]
    Malformed(String, #[source] serde_json::Error),
    #[error("invalid chip id: {0:?}")]
    InvalidChipId(String),
}

/// Handle on an instance storage tree. Cheap to clone, holds no open files.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    instance: PathBuf,
}

impl ArtifactStore {
    pub fn new(instance: impl Into<PathBuf>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    /// Instance root this store reads from.
    pub fn instance(&self) -> &Path {
        &self.instance
    }

    /// Encrypted global config, as stored.
    pub fn read_global_config_ciphertext(&self) -> Result<Vec<u8>, StoreError> {
        self.read_file(&self.instance.join(GLOBAL_CONFIG_FILE))
    }

    /// Per-device config bytes for `chip_id`.
    ///
    /// The chip id lands in a filename, so it is restricted to a safe
    /// character set before any path is built; anything else is rejected.
    pub fn read_local_config(&self, chip_id: &str) -> Result<Vec<u8>, StoreError> {
        if !valid_chip_id(chip_id) {
            return Err(StoreError::InvalidChipId(chip_id.to_string()));
        }
        let name = format!("{LOCAL_CONFIG_PREFIX}{chip_id}");
        self.read_file(&self.instance.join(name))
    }

    /// Parsed firmware descriptor.
    pub fn read_firmware_descriptor(&self) -> Result<FirmwareDescriptor, StoreError> {
        let bytes = self.read_file(&self.instance.join(FIRMWARE_DESCRIPTOR_FILE))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Malformed(FIRMWARE_DESCRIPTOR_FILE.to_string(), e))
    }

    /// Resolve a descriptor `file` value: absolute paths are taken as given,
    /// anything else is relative to the instance root.
    pub fn resolve_firmware_path(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.instance.join(path)
        }
    }

    /// Firmware binary at a path previously resolved by
    /// [`resolve_firmware_path`](Self::resolve_firmware_path).
    pub fn read_firmware_binary(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        self.read_file(path)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        match fs::read(path) {
            Ok(bytes) => {
                debug!(path = %path.display(), size = bytes.len(), "Read artifact");
                Ok(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.display().to_string()))
            }
            // Unreadable is indistinguishable from absent for a read-only
            // endpoint; report it the same way.
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Artifact read failed");
                Err(StoreError::NotFound(path.display().to_string()))
            }
        }
    }
}

/// Chip ids come verbatim off the wire and become filename suffixes.
/// Alphanumerics plus `.`, `_` and `-` only, no leading dot, non-empty.
fn valid_chip_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
