//! Patchbay manager CLI — entry point.
//!
//! This binary is the headless counterpart of the on-device manager app.  It
//! opens the same JSON config document, runs the same migration, and drives
//! the same settings view-model, so everything a device user can toggle can
//! also be inspected and changed from a terminal or a script.
//!
//! # Usage
//!
//! ```text
//! patchbay-manager [OPTIONS]
//!
//! Options:
//!   --config-path <PATH>         Config file [default: platform location]
//!   --package <PACKAGE>          Clone package to operate on
//!   --set <KEY=VALUE>            Apply a setting (repeatable)
//!   --toggle-hook <NAME=on|off>  Enable or disable a hook (repeatable)
//!   --list-packages              List known packages and exit
//!   --json                       Print the catalog as JSON
//! ```
//!
//! With no action flags the current settings catalog is printed.  `--set`
//! assignments are applied first (in the order given), then hook toggles,
//! then the resulting catalog is printed.
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable           | Default                  | Description            |
//! |--------------------|--------------------------|------------------------|
//! | `PATCHBAY_CONFIG`  | platform config location | Config file path       |
//! | `PATCHBAY_PACKAGE` | `com.lumenchat.android`  | Clone package to use   |
//! | `RUST_LOG`         | `info`                   | `tracing` log filter   |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use patchbay_core::{ConfigBridge, ConfigStore, PackageId};
use patchbay_manager::application::settings_catalog::{
    find_spec, Capabilities, SettingGroup, SettingItem, SettingKind,
};
use patchbay_manager::application::view_model::{IconSwitcher, SettingsViewModel};
use patchbay_manager::infrastructure::file_bridge::{default_config_path, FileBridge};
use patchbay_manager::infrastructure::icons::LoggingIconSwitcher;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Patchbay settings manager.
///
/// Inspects and edits the per-clone configuration document used by patched
/// Lumen installs.
#[derive(Debug, Parser)]
#[command(
    name = "patchbay-manager",
    about = "Inspect and edit Patchbay clone settings from the terminal",
    version
)]
struct Cli {
    /// Path to the config document.
    ///
    /// Defaults to the platform config location, e.g.
    /// `~/.config/patchbay/config.json` on Linux.
    #[arg(long, value_name = "PATH", env = "PATCHBAY_CONFIG")]
    config_path: Option<PathBuf>,

    /// Clone package whose settings to operate on.
    ///
    /// Defaults to the primary install.  An unknown package gets a fresh
    /// config entry, which is how new clones are adopted.
    #[arg(long, value_name = "PACKAGE", env = "PATCHBAY_PACKAGE")]
    package: Option<String>,

    /// Apply a setting before printing, as `KEY=VALUE`.
    ///
    /// Toggles take `on`/`off` (or `true`/`false`); text settings are
    /// validated the same way the settings screen validates them.  May be
    /// repeated; assignments apply in order.
    #[arg(long, value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Enable or disable a hook, as `NAME=on|off`.
    ///
    /// Hook names come from whatever the clone has registered; a name the
    /// clone never registered changes nothing.  May be repeated.
    #[arg(long, value_name = "NAME=on|off")]
    toggle_hook: Vec<String>,

    /// List the packages present in the config document and exit.
    #[arg(long)]
    list_packages: bool,

    /// Print the catalog as pretty JSON instead of text.
    #[arg(long)]
    json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `EnvFilter::try_from_default_env()` reads the `RUST_LOG` environment
    // variable.  If it is absent or invalid, we fall back to `info` level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = match cli.config_path.clone() {
        Some(path) => path,
        None => default_config_path()
            .context("could not determine the platform config directory; pass --config-path")?,
    };
    info!("using config document at {}", config_path.display());

    let bridge = Arc::new(FileBridge::new(&config_path)) as Arc<dyn ConfigBridge>;
    let package = cli.package.clone().map(PackageId::new);
    let store = ConfigStore::initialize(bridge, package);

    if cli.list_packages {
        for package in store.known_packages() {
            println!("{package}");
        }
        return Ok(());
    }

    let view_model = SettingsViewModel::new(
        store,
        Arc::new(LoggingIconSwitcher) as Arc<dyn IconSwitcher>,
        Capabilities::headless(),
    );

    for assignment in &cli.set {
        let (key, value) = split_assignment(assignment)?;
        apply_set(&view_model, key, value).await?;
    }
    for assignment in &cli.toggle_hook {
        let (name, switch) = split_assignment(assignment)?;
        view_model.set_hook_enabled(name, parse_switch(switch)?).await;
    }

    let groups = view_model.groups();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        println!("{}", render_groups(&groups).trim_end());
    }
    Ok(())
}

// ── Assignment handling ───────────────────────────────────────────────────────

/// Splits a `KEY=VALUE` argument at the first `=`.
fn split_assignment(raw: &str) -> anyhow::Result<(&str, &str)> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{raw}'"))
}

/// Parses a toggle value: `on`/`true` or `off`/`false`, case-insensitive.
fn parse_switch(raw: &str) -> anyhow::Result<bool> {
    if raw.eq_ignore_ascii_case("on") || raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("off") || raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        bail!("expected on|off, got '{raw}'")
    }
}

/// Applies one `--set` assignment through the view-model.
///
/// Unlike the settings screen, which shows validation advice while the user
/// types and lets them proceed anyway, the CLI treats advice as a hard error:
/// a script has no one watching the warning.
async fn apply_set(view_model: &SettingsViewModel, key: &str, value: &str) -> anyhow::Result<()> {
    let spec = find_spec(key).ok_or_else(|| anyhow!("unknown setting: {key}"))?;
    match spec.kind {
        SettingKind::Toggle { .. } => {
            view_model.set_toggle(key, parse_switch(value)?).await?;
        }
        SettingKind::Text { .. } => {
            if let Some(advice) = view_model.validate_text(key, value)? {
                bail!("invalid value for {key}: {advice}");
            }
            view_model.set_text(key, value).await?;
        }
    }
    info!("applied {key}={value}");
    Ok(())
}

// ── Text rendering ────────────────────────────────────────────────────────────

/// Renders the catalog groups as indented text, one group per block.
fn render_groups(groups: &[SettingGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&group.title);
        out.push('\n');
        if group.settings.is_empty() {
            out.push_str("  (none)\n");
        }
        for item in &group.settings {
            match item {
                SettingItem::Toggle { id, title, value, .. } => {
                    let mark = if *value { "x" } else { " " };
                    out.push_str(&format!("  [{mark}] {}\n", label(id, title)));
                }
                SettingItem::Text { id, title, value, .. } => {
                    out.push_str(&format!("      {} = {value:?}\n", label(id, title)));
                }
            }
        }
        out.push('\n');
    }
    out
}

/// Hook entries use their name as both id and title; everything else shows
/// the title with the settable id in brackets.
fn label(id: &str, title: &str) -> String {
    if id == title {
        id.to_string()
    } else {
        format!("{title} [{id}]")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
