//! Mock bridge for unit testing.
//!
//! Holds the document in memory and lets tests toggle read/write failures
//! without touching the file system.

use std::sync::Mutex;

use serde_json::Value;

use super::{BridgeError, ConfigBridge};

/// An in-memory [`ConfigBridge`] with injectable failures.
#[derive(Default)]
pub struct MockBridge {
    document: Mutex<Option<Value>>,
    fail_reads: Mutex<bool>,
    fail_writes: Mutex<bool>,
    write_count: Mutex<u32>,
}

impl MockBridge {
    /// Creates an empty mock bridge: reads return `Ok(None)` until a write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock bridge pre-seeded with a document.
    pub fn with_document(document: Value) -> Self {
        let bridge = Self::default();
        *bridge.document.lock().expect("lock poisoned") = Some(document);
        bridge
    }

    /// Makes every subsequent `read_document` call fail.
    pub fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().expect("lock poisoned") = fail;
    }

    /// Makes every subsequent `write_document` call fail.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().expect("lock poisoned") = fail;
    }

    /// Returns the number of successful writes.
    pub fn write_count(&self) -> u32 {
        *self.write_count.lock().expect("lock poisoned")
    }

    /// Returns the currently stored document, if any.
    pub fn stored_document(&self) -> Option<Value> {
        self.document.lock().expect("lock poisoned").clone()
    }
}

impl ConfigBridge for MockBridge {
    fn read_document(&self) -> Result<Option<Value>, BridgeError> {
        if *self.fail_reads.lock().expect("lock poisoned") {
            return Err(BridgeError::Read("injected failure".to_string()));
        }
        Ok(self.document.lock().expect("lock poisoned").clone())
    }

    fn write_document(&self, document: &Value) -> Result<(), BridgeError> {
        if *self.fail_writes.lock().expect("lock poisoned") {
            return Err(BridgeError::Write("injected failure".to_string()));
        }
        *self.document.lock().expect("lock poisoned") = Some(document.clone());
        *self.write_count.lock().expect("lock poisoned") += 1;
        Ok(())
    }
}
