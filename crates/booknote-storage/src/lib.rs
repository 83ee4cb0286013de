//! Durable local storage for the BookNote client.
//!
//! Two backends implement [`LocalStorage`]:
//! - [`FileStorage`]: a JSON object on disk, written atomically
//! - [`MemoryStorage`]: a process-local map for tests and ephemeral sessions
//!
//! [`LocalStore`] wraps either one with typed accessors for the keys the
//! client uses.

mod file;
mod keys;
mod memory;
mod store;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use store::LocalStore;
pub use traits::LocalStorage;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
