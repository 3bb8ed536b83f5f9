//! Typed views of the stored JSON documents
//!
//! Only the fields the version gate examines are modeled; the raw stored
//! bytes (or decrypted plaintext) are what gets returned to the device, so
//! unknown fields pass through untouched.

use serde::{Deserialize, Deserializer};

/// Decrypted global configuration shared by every device.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalConfigDocument {
    #[serde(deserialize_with = "version_number")]
    pub global_config_version: i64,
}

impl GlobalConfigDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Per-device configuration, stored in plaintext keyed by chip id.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfigDocument {
    #[serde(deserialize_with = "version_number")]
    pub config_version: i64,
}

impl LocalConfigDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Firmware metadata pointing at the actual binary.
#[derive(Debug, Clone, Deserialize)]
pub struct FirmwareDescriptor {
    /// Version of the firmware on offer; absent means "0.0".
    #[serde(default)]
    pub version: Option<String>,
    /// Binary location, relative to the instance root or absolute.
    #[serde(default)]
    pub file: Option<String>,
}

impl FirmwareDescriptor {
    /// Descriptor version, defaulting to `"0.0"` when the field is absent.
    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or("0.0")
    }
}

/// Config versions are written by assorted deployment tooling, some of which
/// quotes numbers. Accept an integer or a string holding one; anything else
/// is malformed.
fn version_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_ignores_extra_fields() {
        let doc = GlobalConfigDocument::from_slice(
            br#"{"global_config_version": 7, "mqtt_host": "10.0.0.2"}"#,
        )
        .unwrap();
        assert_eq!(doc.global_config_version, 7);
    }

    #[test]
    fn test_global_config_missing_version_is_error() {
        assert!(GlobalConfigDocument::from_slice(br#"{"mqtt_host": "x"}"#).is_err());
    }

    #[test]
    fn test_local_config_version() {
        let doc = LocalConfigDocument::from_slice(br#"{"config_version": 3}"#).unwrap();
        assert_eq!(doc.config_version, 3);
    }

    #[test]
    fn test_string_typed_versions_accepted() {
        let doc = GlobalConfigDocument::from_slice(br#"{"global_config_version": "5"}"#).unwrap();
        assert_eq!(doc.global_config_version, 5);
        let doc = LocalConfigDocument::from_slice(br#"{"config_version": " 12 "}"#).unwrap();
        assert_eq!(doc.config_version, 12);
    }

    #[test]
    fn test_non_numeric_version_is_error() {
        assert!(GlobalConfigDocument::from_slice(br#"{"global_config_version": "soon"}"#).is_err());
        assert!(LocalConfigDocument::from_slice(br#"{"config_version": [3]}"#).is_err());
    }

    #[test]
    fn test_descriptor_defaults() {
        let desc: FirmwareDescriptor = serde_json::from_str("{}").unwrap();
        assert_eq!(desc.version_or_default(), "0.0");
        assert!(desc.file.is_none());
    }

    #[test]
    fn test_descriptor_full() {
        let desc: FirmwareDescriptor =
            serde_json::from_str(r#"{"version": "1.2.0", "file": "fw.bin"}"#).unwrap();
        assert_eq!(desc.version_or_default(), "1.2.0");
        assert_eq!(desc.file.as_deref(), Some("fw.bin"));
    }
}
