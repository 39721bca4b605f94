//! The clone-scoped config store.
//!
//! [`ConfigStore`] owns the in-memory [`ConfigDocument`], mediates every read
//! and write against a [`ConfigBridge`], and routes setting access by name:
//! the four [`GLOBAL_SETTINGS`](crate::GLOBAL_SETTINGS) live at the document
//! root and are shared by all clones, everything else is scoped to the
//! currently active package.
//!
//! # Write-back and failure behaviour
//!
//! Every mutation flows through one private `commit` point that serializes
//! the whole document and hands it to the bridge.  Bridge failures never
//! surface to callers: a failed read falls back to a default document, a
//! failed write is logged and the mutation stays in memory.  All getters are
//! total and return the caller's default on absence or type mismatch.
//!
//! # Single-writer assumption
//!
//! One `ConfigStore` instance owns the document from initialization until
//! drop.  Mutations take `&mut self`, and nothing here guards against another
//! process writing the same backing medium concurrently; the last writer
//! wins at the bridge.  Callers that share a store across tasks must
//! serialize access themselves (the manager keeps it behind one async mutex).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::bridge::ConfigBridge;
use crate::domain::document::{
    is_global_setting, ConfigDocument, HookState, PackageId, SettingValue,
};
use crate::domain::migration::migrate_to_multi_clone;

/// The clone-scoped configuration store.
pub struct ConfigStore {
    bridge: Arc<dyn ConfigBridge>,
    document: ConfigDocument,
    active_package: PackageId,
}

impl ConfigStore {
    /// Loads the document through `bridge` and prepares it for use.
    ///
    /// A missing document starts empty and is seeded by the migration; a
    /// legacy document is restructured into the multi-clone layout.  Either
    /// change is written back once.  Read failures and malformed documents
    /// fall back to a default document containing only the primary package,
    /// without a write-back, so an intact remote copy is not clobbered.
    ///
    /// The active package defaults to the primary install when `package` is
    /// `None`; its entry is created (and persisted) if absent.
    pub fn initialize(bridge: Arc<dyn ConfigBridge>, package: Option<PackageId>) -> Self {
        let mut dirty = false;

        let mut document = match bridge.read_document() {
            Ok(raw) => {
                let mut raw = raw.unwrap_or_else(|| {
                    info!("no config document found, starting from an empty one");
                    Value::Object(Map::new())
                });
                let migrated = migrate_to_multi_clone(&mut raw, &PackageId::primary());
                match serde_json::from_value::<ConfigDocument>(raw) {
                    Ok(doc) => {
                        if migrated {
                            info!("migrated legacy config document to the multi-clone layout");
                            dirty = true;
                        }
                        doc
                    }
                    Err(e) => {
                        error!("config document is malformed, falling back to defaults: {e}");
                        ConfigDocument::with_primary()
                    }
                }
            }
            Err(e) => {
                error!("failed to read config document, falling back to defaults: {e}");
                ConfigDocument::with_primary()
            }
        };

        let active_package = package.unwrap_or_else(PackageId::primary);
        if document.ensure_package(&active_package) {
            debug!("created config entry for package {active_package}");
            dirty = true;
        }

        let store = Self {
            bridge,
            document,
            active_package,
        };
        if dirty {
            store.commit();
        }
        store
    }

    // ── Package context ───────────────────────────────────────────────────────

    /// Returns the package whose settings get/put currently operate on.
    pub fn active_package(&self) -> &PackageId {
        &self.active_package
    }

    /// Switches the active package, creating its entry when missing.
    ///
    /// Only a newly created entry triggers a write-back.
    pub fn set_active_package(&mut self, package: PackageId) {
        let created = self.document.ensure_package(&package);
        self.active_package = package;
        if created {
            debug!("created config entry for package {}", self.active_package);
            self.commit();
        }
    }

    /// Package identifiers present in the document, in sorted order.
    ///
    /// Whether a package is actually installed on the device is the cloning
    /// subsystem's call; this lists the config side only.
    pub fn known_packages(&self) -> Vec<PackageId> {
        self.document.clones.keys().cloned().collect()
    }

    /// Read-only view of the in-memory document.
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    // ── Settings ──────────────────────────────────────────────────────────────

    /// Returns the value stored under `name`, or `default` when absent.
    ///
    /// Global setting names read from the document root; all other names read
    /// from the active package.  Never persists anything.
    pub fn get(&self, name: &str, default: impl Into<SettingValue>) -> SettingValue {
        match self.lookup(name) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Like [`get`](Self::get), but writes `default` back when `name` is absent.
    pub fn get_or_insert(&mut self, name: &str, default: impl Into<SettingValue>) -> SettingValue {
        if let Some(value) = self.lookup(name) {
            return value.clone();
        }
        let default = default.into();
        self.put(name, default.clone());
        default
    }

    /// Boolean getter: returns `default` on absence and on type mismatch.
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        self.lookup(name)
            .and_then(SettingValue::as_bool)
            .unwrap_or(default)
    }

    /// Integer getter: returns `default` on absence and on type mismatch.
    pub fn get_i64(&self, name: &str, default: i64) -> i64 {
        self.lookup(name)
            .and_then(SettingValue::as_i64)
            .unwrap_or(default)
    }

    /// String getter: returns `default` on absence and on type mismatch.
    pub fn get_str(&self, name: &str, default: &str) -> String {
        match self.lookup(name).and_then(SettingValue::as_str) {
            Some(value) => value.to_string(),
            None => default.to_string(),
        }
    }

    /// Stores `value` under `name` and writes the document back.
    ///
    /// Routing mirrors [`get`](Self::get): global names go to the root,
    /// everything else to the active package.
    pub fn put(&mut self, name: &str, value: impl Into<SettingValue>) {
        let value = value.into();
        if is_global_setting(name) {
            self.document.globals.insert(name.to_string(), value);
        } else {
            self.document
                .clones
                .entry(self.active_package.clone())
                .or_default()
                .settings
                .insert(name.to_string(), value);
        }
        self.commit();
    }

    // ── Hook registry ─────────────────────────────────────────────────────────

    /// Enables or disables a hook for the active package.
    ///
    /// An unknown hook name changes nothing, but the document is still
    /// written back, matching the behaviour relied on since the single-clone
    /// format.
    pub fn set_hook_enabled(&mut self, hook: &str, enabled: bool) {
        if let Some(state) = self
            .document
            .clones
            .get_mut(&self.active_package)
            .and_then(|clone| clone.hooks.get_mut(hook))
        {
            state.enabled = enabled;
        }
        self.commit();
    }

    /// Returns whether `hook` is enabled for the active package.
    ///
    /// Unknown hooks are disabled.
    pub fn is_hook_enabled(&self, hook: &str) -> bool {
        self.document
            .clones
            .get(&self.active_package)
            .and_then(|clone| clone.hooks.get(hook))
            .map(|state| state.enabled)
            .unwrap_or(false)
    }

    /// Registers a hook's description and default state for the active package.
    ///
    /// Idempotent: an already registered hook keeps its current state and no
    /// write happens.
    pub fn register_hook(&mut self, hook: &str, description: &str, default_enabled: bool) {
        let clone = self
            .document
            .clones
            .entry(self.active_package.clone())
            .or_default();
        if clone.hooks.contains_key(hook) {
            return;
        }
        clone.hooks.insert(
            hook.to_string(),
            HookState {
                description: description.to_string(),
                enabled: default_enabled,
            },
        );
        self.commit();
    }

    /// The hook registry of the active package, in sorted order.
    pub fn hook_settings(&self) -> BTreeMap<String, HookState> {
        self.document
            .clones
            .get(&self.active_package)
            .map(|clone| clone.hooks.clone())
            .unwrap_or_default()
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn lookup(&self, name: &str) -> Option<&SettingValue> {
        if is_global_setting(name) {
            self.document.globals.get(name)
        } else {
            self.document
                .clones
                .get(&self.active_package)
                .and_then(|clone| clone.settings.get(name))
        }
    }

    /// The single write-back point.  Bridge failures are logged, never raised.
    fn commit(&self) {
        let value = match serde_json::to_value(&self.document) {
            Ok(value) => value,
            Err(e) => {
                warn!("failed to serialize config document, skipping write: {e}");
                return;
            }
        };
        if let Err(e) = self.bridge.write_document(&value) {
            warn!("failed to persist config document, keeping changes in memory: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
