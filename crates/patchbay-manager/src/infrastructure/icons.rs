//! Launcher icon adapter for headless runs.
//!
//! The CLI has no launcher to re-register, so switching the icon only records
//! the intent in the log.  The on-device manager supplies the real adapter
//! that swaps the launcher alias.

use tracing::info;

use crate::application::view_model::{AppIcon, IconSwitcher};

/// Icon switcher that logs instead of touching a launcher.
pub struct LoggingIconSwitcher;

impl IconSwitcher for LoggingIconSwitcher {
    fn set_icon(&self, icon: AppIcon) {
        info!("launcher icon set to {icon:?} (headless run, nothing to update)");
    }
}
