//! Session identity and the local-storage abstraction behind it.
//!
//! The widget correlates every message it sends with an opaque session id.
//! The id is generated once per storage context, persisted under a fixed key,
//! and reused by every widget that shares that storage.
//!
//! # Architecture
//!
//! - [`StorageProvider`]: Key/value store standing in for browser local storage
//! - [`MemoryStorage`]: In-process store, used by tests and embedders
//! - [`FileStorage`]: JSON file store, used by the CLI harness
//! - [`get_or_create_session_id`]: Session bootstrap
//!
//! # Example
//!
//! ```rust
//! use orbit_widget::session::{MemoryStorage, get_or_create_session_id};
//!
//! let storage = MemoryStorage::new();
//! let first = get_or_create_session_id(&storage);
//! let second = get_or_create_session_id(&storage);
//! assert_eq!(first, second);
//! assert!(first.starts_with("session-"));
//! ```

mod storage;

pub use storage::{
    FileStorage, MemoryStorage, SESSION_STORAGE_KEY, StorageError, StorageProvider,
    get_or_create_session_id,
};
