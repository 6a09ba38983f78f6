//! Medley Storage Library
//!
//! This crate provides the blob-store abstraction and implementations for
//! Medley: the [`Storage`] trait, a local filesystem backend, an in-memory
//! backend, and the [`DiskManager`] that resolves backends by disk name.
//!
//! # Storage key format
//!
//! Keys derive from the media identifier: `{id}/{file_name}` for originals
//! and `{id}/conversions/{name}/{file_name}` for derived artifacts. Key
//! derivation lives on the media entity so every caller resolves the same
//! layout. Keys must not contain `..` or a leading `/`.

pub mod disks;
pub mod factory;
pub mod local;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use disks::DiskManager;
pub use factory::create_storage;
pub use local::LocalStorage;
pub use medley_core::StorageBackend;
pub use memory::MemoryStorage;
pub use traits::{MediaStorageExt, Storage, StorageError, StorageResult, Visibility};
