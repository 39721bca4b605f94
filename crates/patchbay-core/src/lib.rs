//! # patchbay-core
//!
//! Shared library for Patchbay containing the configuration document model,
//! the legacy-format migration, the clone-scoped config store, and the
//! persistence bridge port.
//!
//! This crate is used by the manager application and by the device-side
//! loader.  It has zero dependencies on OS APIs, UI frameworks, or sockets.
//!
//! # Architecture overview (for beginners)
//!
//! Patchbay is a modification framework for the Lumen chat app.  Users can
//! run several independently installed copies of Lumen ("clones") side by
//! side, and every clone keeps its own hook toggles and settings while a
//! small set of settings is shared across all of them.
//!
//! This crate (`patchbay-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure data types with no I/O.  The most important piece is
//!   the [`ConfigDocument`]: one JSON-shaped document holding the global
//!   settings at its root and a `clones` mapping with one entry per package.
//!   `domain::migration` restructures pre-multi-clone documents into this
//!   layout exactly once.
//!
//! - **`bridge`** – The [`ConfigBridge`] port through which the document is
//!   read and written.  The manager persists to a JSON file; the device-side
//!   loader talks to a content provider.  Both sit behind the same trait.
//!
//! - **`store`** – The [`ConfigStore`]: loads the document through a bridge,
//!   migrates it, and exposes scoped get/put plus the hook registry for one
//!   active package at a time.

// Declare the three top-level modules.  Rust will look for each in a
// subdirectory with the same name (e.g., src/domain/mod.rs).
pub mod bridge;
pub mod domain;
pub mod store;

// Re-export the most-used types at the crate root so callers can write
// `patchbay_core::ConfigStore` instead of `patchbay_core::store::ConfigStore`.
pub use bridge::mock::MockBridge;
pub use bridge::{BridgeError, ConfigBridge};
pub use domain::document::{
    is_global_setting, CloneSettings, ConfigDocument, HookState, PackageId, SettingValue,
    GLOBAL_SETTINGS, PRIMARY_PACKAGE,
};
pub use domain::migration::{migrate_to_multi_clone, needs_migration};
pub use store::ConfigStore;
