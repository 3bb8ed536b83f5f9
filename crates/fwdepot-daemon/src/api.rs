//! REST API handlers
//!
//! Three version-gated artifact routes. Each handler is a pure function of
//! the request headers plus the storage state: extract what the device
//! declares, read fresh from the store, decide stale-or-not, respond.
//!
//! Two different version semantics coexist on purpose: the config routes
//! compare plain integers, the firmware route uses the segment-wise
//! [`vercmp`] string comparison. Devices ship that way; do not unify them.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use fwdepot_core::{crypto, vercmp, GlobalConfigDocument, LocalConfigDocument, StoreError};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::state::AppState;

const GLOBAL_VERSION_HEADER: &str = "X-global-config-version";
const GLOBAL_KEY_HEADER: &str = "X-global-config-key";
const LOCAL_VERSION_HEADER: &str = "X-config-version";
const CHIP_ID_HEADER: &str = "X-chip-id";
// Header name is the external contract with the device firmware, verbatim.
const FIRMWARE_VERSION_HEADER: &str = "X-ESP8266-version";

/// Serve the shared encrypted configuration blob.
///
/// The device sends the integer version it already has plus the base64
/// encoded 32 byte secretbox key; it gets the decrypted document back only
/// when the stored version is strictly newer.
pub async fn global_config(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let Some(version) = int_header(&headers, GLOBAL_VERSION_HEADER) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"global_config": "no version given"})),
        )
            .into_response();
    };

    let Some(key_b64) = str_header(&headers, GLOBAL_KEY_HEADER) else {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"global_config": "no key supplied"})),
        )
            .into_response();
    };

    let key = match BASE64.decode(key_b64) {
        Ok(key) if key.len() == crypto::KEY_SIZE => key,
        _ => {
            debug!("Rejected global config request with malformed key");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"global_config": "invalid key"})),
            )
                .into_response();
        }
    };

    let ciphertext = match state.store.read_global_config_ciphertext() {
        Ok(ciphertext) => ciphertext,
        Err(e) => {
            // Server-side condition: the deployment never placed the blob.
            warn!(error = %e, "Global config ciphertext unavailable");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"global_config": "storage unavailable"})),
            )
                .into_response();
        }
    };

    let plaintext = match crypto::decrypt(&key, &ciphertext) {
        Ok(plaintext) => plaintext,
        Err(e) => {
            debug!(error = %e, "Global config decryption failed");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"global_config": "invalid key"})),
            )
                .into_response();
        }
    };

    let doc = match GlobalConfigDocument::from_slice(&plaintext) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "Decrypted global config is not valid JSON");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"global_config": "failed to load"})),
            )
                .into_response();
        }
    };

    if version >= doc.global_config_version {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"global_config": "no new version"})),
        )
            .into_response();
    }

    info!(
        device_version = version,
        stored_version = doc.global_config_version,
        "Serving global config update"
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        plaintext,
    )
        .into_response()
}

/// Serve the per-device configuration document.
pub async fn local_config(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let Some(version) = int_header(&headers, LOCAL_VERSION_HEADER) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"local_config": "no version given"})),
        )
            .into_response();
    };

    let Some(chip_id) = str_header(&headers, CHIP_ID_HEADER) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"local_config": "no CHIP ID given"})),
        )
            .into_response();
    };

    let raw = match state.store.read_local_config(chip_id) {
        Ok(raw) => raw,
        Err(StoreError::InvalidChipId(id)) => {
            warn!(chip_id = %id, "Rejected unsafe chip id");
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"local_config": "invalid CHIP ID"})),
            )
                .into_response();
        }
        Err(e) => {
            debug!(chip_id, error = %e, "No local config for chip id");
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"local_config": "config for chip id not found"})),
            )
                .into_response();
        }
    };

    let doc = match LocalConfigDocument::from_slice(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            // Stored by our own tooling, so a parse failure is on us.
            warn!(chip_id, error = %e, "Stored local config is malformed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"local_config": "failed to load"})),
            )
                .into_response();
        }
    };

    if version >= doc.config_version {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"local_config": "no new version"})),
        )
            .into_response();
    }

    info!(
        chip_id,
        device_version = version,
        stored_version = doc.config_version,
        "Serving local config update"
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        raw,
    )
        .into_response()
}

/// Serve the firmware binary when the device is behind the descriptor.
pub async fn firmware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let Some(device_version) = str_header(&headers, FIRMWARE_VERSION_HEADER) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"firmware": "no version given"})),
        )
            .into_response();
    };

    let descriptor = match state.store.read_firmware_descriptor() {
        Ok(descriptor) => descriptor,
        Err(e) => {
            debug!(error = %e, "Firmware descriptor unavailable");
            return (StatusCode::NOT_FOUND, Json(json!({}))).into_response();
        }
    };

    let server_version = descriptor.version_or_default();
    if vercmp(device_version, server_version) >= 0 {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    let Some(file) = descriptor.file.as_deref() else {
        warn!("Firmware descriptor names no file");
        return (StatusCode::NOT_FOUND, Json(json!({}))).into_response();
    };

    let path = state.store.resolve_firmware_path(file);
    match state.store.read_firmware_binary(&path) {
        Ok(binary) => {
            info!(
                path = %path.display(),
                size = binary.len(),
                device_version,
                server_version,
                "Serving firmware update"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/octet-stream")],
                binary,
            )
                .into_response()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Firmware binary missing");
            (
                StatusCode::NOT_FOUND,
                Json(json!({"firmware": "not found"})),
            )
                .into_response()
        }
    }
}

/// Header value as UTF-8, `None` when absent or undecodable.
fn str_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok()
}

/// Header value parsed as an integer version.
fn int_header(headers: &HeaderMap, name: &str) -> Option<i64> {
    str_header(headers, name)?.trim().parse().ok()
}
