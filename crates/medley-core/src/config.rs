//! Configuration module
//!
//! Explicit configuration structs passed into the components that need them.
//! Nothing is resolved from global state at call time; `from_env` constructors
//! exist for binaries that configure from the environment.

use std::env;

use crate::storage_types::StorageBackend;

const DEFAULT_DISK: &str = "local";

/// Upload coordinator configuration.
#[derive(Clone, Debug)]
pub struct MediaConfig {
    /// Storage backend identifier recorded on each media item. All paths for
    /// an item and its conversions are resolved against this disk.
    pub disk: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            disk: DEFAULT_DISK.to_string(),
        }
    }
}

impl MediaConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            disk: env::var("MEDIA_DISK").unwrap_or_else(|_| DEFAULT_DISK.to_string()),
        }
    }
}

/// Storage backend configuration.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            local_storage_path: None,
            local_storage_base_url: None,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let backend = env::var("STORAGE_BACKEND")
            .ok()
            .and_then(|s| StorageBackend::parse(&s))
            .unwrap_or(StorageBackend::Local);

        Self {
            backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
        }
    }
}
