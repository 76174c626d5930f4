//! Best-score storage backends
//!
//! Each game persists a single plain decimal integer under its own key.
//! Backends report failures as `StorageError`; callers decide how to degrade.

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use crate::error::StorageError;

/// Key/value string storage
pub trait ScoreStore {
    /// Read the raw value stored under `key` (`None` if never written)
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}
