//! Application state management

use fwdepot_core::ArtifactStore;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use crate::config::Config;

/// Shared application state. The handlers are stateless beyond this: an
/// artifact store rooted at the configured instance path plus the loaded
/// configuration, threaded into every request via axum `State`.
pub struct AppState {
    /// Read-only artifact storage
    pub store: ArtifactStore,
    /// Configuration
    pub config: Config,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Arc<Self> {
        let instance = Path::new(&config.storage.instance);
        if !instance.is_dir() {
            warn!(
                path = %instance.display(),
                "Instance directory does not exist, every poll will report missing artifacts"
            );
        }
        let store = ArtifactStore::new(instance);
        Arc::new(Self { store, config })
    }
}
