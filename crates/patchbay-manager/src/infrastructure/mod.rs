//! Infrastructure layer for the manager application.
//!
//! Contains OS-facing adapters: the JSON file implementation of the config
//! bridge and the launcher-icon switcher used in headless runs.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `patchbay_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod file_bridge;
pub mod icons;
