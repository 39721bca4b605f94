//! Persistence bridge port for the shared config document.
//!
//! The document is owned by an external collaborator: on a device it lives
//! behind the loader's content provider, in the manager CLI it is a JSON
//! file.  The store only ever talks to the [`ConfigBridge`] trait, so the
//! backing medium can be swapped without touching store logic, and tests can
//! inject failures through the [`mock::MockBridge`].
//!
//! Calls are synchronous and block the calling task.  The store performs one
//! read at initialization and one write per mutation; neither path needs
//! streaming or cancellation.

use serde_json::Value;
use thiserror::Error;

pub mod mock;

/// Error type for bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The document could not be read from the backing medium.
    #[error("failed to read config document: {0}")]
    Read(String),

    /// The document could not be written to the backing medium.
    #[error("failed to write config document: {0}")]
    Write(String),

    /// The backing medium returned content that is not a JSON document.
    #[error("config document is malformed: {0}")]
    Malformed(String),
}

/// Trait for reading and writing the shared config document.
///
/// Implementations must be cheap to call repeatedly: the store writes the
/// whole document after every mutation.
pub trait ConfigBridge: Send + Sync {
    /// Reads the current document.
    ///
    /// Returns `Ok(None)` when no document has been written yet, which the
    /// store treats as a first run rather than a failure.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Read`] when the medium cannot be accessed and
    /// [`BridgeError::Malformed`] when its content is not valid JSON.
    fn read_document(&self) -> Result<Option<Value>, BridgeError>;

    /// Replaces the stored document with `document`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Write`] when the medium rejects the write.  The
    /// store logs this and keeps the mutation in memory.
    fn write_document(&self, document: &Value) -> Result<(), BridgeError>;
}
