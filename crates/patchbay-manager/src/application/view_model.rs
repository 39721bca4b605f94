//! Observable settings state and the mutations the UI can perform.
//!
//! [`SettingsViewModel`] owns the [`ConfigStore`] for the manager process and
//! exposes two `tokio::sync::watch` channels: the current catalog groups and
//! a loading flag.  Renderers subscribe once and re-render whenever a value
//! changes; mutations go through the typed methods here, which persist
//! through the store and then republish the rebuilt groups.
//!
//! # Why watch channels? (for beginners)
//!
//! A `watch` channel always holds exactly one latest value.  Subscribers that
//! fall behind skip straight to the newest state instead of replaying every
//! intermediate one, which is exactly the contract a settings screen wants.
//! Publishing uses [`watch::Sender::send_replace`], which succeeds even with
//! zero subscribers, so the headless CLI can drive the same view-model
//! without ever subscribing.
//!
//! The store sits behind a `tokio::sync::Mutex`: mutations are short and
//! infrequent (user interactions), so one async lock is simpler and safe.

use std::sync::Arc;

use patchbay_core::{ConfigStore, PackageId};
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::info;

use crate::application::settings_catalog::{
    build_groups, find_spec, Capabilities, InputHint, SettingGroup, SettingKind,
};

// ── App icon port ─────────────────────────────────────────────────────────────

/// Launcher icon variants the manager can present as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppIcon {
    /// The regular Patchbay icon and name.
    Default,
    /// A neutral icon and name that does not reveal the app's purpose.
    Discreet,
}

/// Port for switching the manager's launcher icon.
///
/// The real implementation talks to the launcher; tests record calls.
/// Switching is fire-and-forget because a failed switch leaves the previous
/// icon in place, which is always a usable state.
pub trait IconSwitcher: Send + Sync {
    fn set_icon(&self, icon: AppIcon);
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Rejected view-model mutations.
///
/// These cover caller mistakes only.  Persistence failures never surface
/// here; the store keeps changes in memory and logs the bridge error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown setting: {0}")]
    UnknownSetting(String),
    #[error("setting {id} is not a {expected} setting")]
    KindMismatch { id: String, expected: &'static str },
}

// ── View-model ────────────────────────────────────────────────────────────────

/// Settings screen state holder.
pub struct SettingsViewModel {
    store: Mutex<ConfigStore>,
    icons: Arc<dyn IconSwitcher>,
    capabilities: Capabilities,
    groups_tx: watch::Sender<Vec<SettingGroup>>,
    loading_tx: watch::Sender<bool>,
}

impl SettingsViewModel {
    /// Wraps `store` and publishes the initial catalog state.
    pub fn new(
        store: ConfigStore,
        icons: Arc<dyn IconSwitcher>,
        capabilities: Capabilities,
    ) -> Self {
        let (groups_tx, _) = watch::channel(build_groups(&store, &capabilities));
        let (loading_tx, _) = watch::channel(false);
        Self {
            store: Mutex::new(store),
            icons,
            capabilities,
            groups_tx,
            loading_tx,
        }
    }

    // ── Observables ───────────────────────────────────────────────────────────

    /// Subscribes to catalog group updates.  The receiver immediately holds
    /// the current state.
    pub fn subscribe_groups(&self) -> watch::Receiver<Vec<SettingGroup>> {
        self.groups_tx.subscribe()
    }

    /// Subscribes to the loading flag driven by [`reload`](Self::reload).
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading_tx.subscribe()
    }

    /// One-off snapshot of the current groups.
    pub fn groups(&self) -> Vec<SettingGroup> {
        self.groups_tx.borrow().clone()
    }

    /// Rebuilds the groups from the store and republishes them.
    pub async fn reload(&self) {
        let store = self.store.lock().await;
        self.publish(&store);
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Persists a toggle and republishes.
    ///
    /// Flipping `discreet_icon` also switches the launcher icon, once per
    /// call.
    pub async fn set_toggle(&self, id: &str, value: bool) -> Result<(), SettingsError> {
        let spec = find_spec(id).ok_or_else(|| SettingsError::UnknownSetting(id.to_string()))?;
        if !matches!(spec.kind, SettingKind::Toggle { .. }) {
            return Err(SettingsError::KindMismatch {
                id: id.to_string(),
                expected: "toggle",
            });
        }

        let mut store = self.store.lock().await;
        store.put(id, value);
        if id == "discreet_icon" {
            let icon = if value { AppIcon::Discreet } else { AppIcon::Default };
            info!("switching launcher icon to {icon:?}");
            self.icons.set_icon(icon);
        }
        self.publish(&store);
        Ok(())
    }

    /// Persists a text setting and republishes.
    ///
    /// Number-hinted settings are stored as integers; input that does not
    /// parse falls back to the catalog default rather than erroring, since
    /// validation advice was already available while typing.
    pub async fn set_text(&self, id: &str, value: &str) -> Result<(), SettingsError> {
        let spec = find_spec(id).ok_or_else(|| SettingsError::UnknownSetting(id.to_string()))?;
        let SettingKind::Text { default, hint, .. } = spec.kind else {
            return Err(SettingsError::KindMismatch {
                id: id.to_string(),
                expected: "text",
            });
        };

        let mut store = self.store.lock().await;
        match hint {
            InputHint::Text => store.put(id, value),
            InputHint::Number => {
                let fallback = default.parse().unwrap_or(0);
                store.put(id, value.parse::<i64>().unwrap_or(fallback));
            }
        }
        self.publish(&store);
        Ok(())
    }

    /// Enables or disables a hook for the active package and republishes.
    ///
    /// Hook names come from the store's registry rather than the catalog, so
    /// unknown names are a no-op instead of an error.
    pub async fn set_hook_enabled(&self, hook: &str, enabled: bool) {
        let mut store = self.store.lock().await;
        store.set_hook_enabled(hook, enabled);
        self.publish(&store);
    }

    /// Runs the catalog validator for a text setting against `input`.
    ///
    /// Returns the validator's advice (`None` means acceptable).  Advice
    /// never gates [`set_text`](Self::set_text); the presentation layer owns
    /// the decision to reject input.
    pub fn validate_text(&self, id: &str, input: &str) -> Result<Option<String>, SettingsError> {
        let spec = find_spec(id).ok_or_else(|| SettingsError::UnknownSetting(id.to_string()))?;
        match spec.kind {
            SettingKind::Text { validator, .. } => Ok(validator(input)),
            SettingKind::Toggle { .. } => Err(SettingsError::KindMismatch {
                id: id.to_string(),
                expected: "text",
            }),
        }
    }

    // ── Package context ───────────────────────────────────────────────────────

    /// Packages present in the config document, in sorted order.
    pub async fn known_packages(&self) -> Vec<PackageId> {
        self.store.lock().await.known_packages()
    }

    /// Switches which clone the per-clone settings operate on, then
    /// republishes that clone's view.
    pub async fn set_active_package(&self, package: PackageId) {
        let mut store = self.store.lock().await;
        info!("switching settings scope to package {package}");
        store.set_active_package(package);
        self.publish(&store);
    }

    /// Publishes a freshly built catalog, flagging loading around the
    /// rebuild.  Every mutation funnels through here, so subscribers always
    /// see a fully rebuilt list rather than a patched item.
    fn publish(&self, store: &ConfigStore) {
        self.loading_tx.send_replace(true);
        self.groups_tx
            .send_replace(build_groups(store, &self.capabilities));
        self.loading_tx.send_replace(false);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
