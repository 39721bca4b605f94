//! The fixed catalog of user-facing settings.
//!
//! Everything the manager lets the user configure is declared here as static
//! data: setting ids, display titles, defaults, input validators, and the
//! capability gates that decide whether an entry appears at all.  The
//! [`build_groups`] function turns that table plus a [`ConfigStore`] snapshot
//! into the three groups the presentation layer renders:
//!
//! 1. **hooks** – one toggle per hook registered for the active clone,
//!    except hooks that have a dedicated editor screen elsewhere.
//! 2. **other** – per-clone settings (text fields and toggles).
//! 3. **manager** – global settings shared by every clone.
//!
//! # Why a static table? (for beginners)
//!
//! The manager UI is a dumb renderer: it shows whatever groups it is handed
//! and calls back with a setting id when the user edits something.  Keeping
//! the catalog as one `const` table means adding a setting is a one-line
//! diff, the view-model can look up a setting's kind and validator by id,
//! and tests can exercise the whole catalog without a UI.
//!
//! Validators are plain `fn(&str) -> Option<String>` pointers (error message
//! or `None`), so the table stays `const`-constructible.  They advise the
//! presentation layer while the user types; the apply path does not gate on
//! them, because the UI owns the decision to reject input.

use patchbay_core::ConfigStore;
use serde::{Deserialize, Serialize};

// ── Catalog value types ───────────────────────────────────────────────────────

/// Which on-screen keyboard a text setting asks the presentation layer for.
///
/// `Number`-hinted settings are stored as JSON integers, not strings: the
/// manager reads them with a numeric getter and parses input before writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputHint {
    Text,
    Number,
}

/// Input validator: returns an error message, or `None` when acceptable.
pub type Validator = fn(&str) -> Option<String>;

/// The value shape of one catalog entry.
#[derive(Debug, Clone, Copy)]
pub enum SettingKind {
    /// Free-form text field.
    Text {
        default: &'static str,
        hint: InputHint,
        validator: Validator,
    },
    /// Boolean switch.
    Toggle { default: bool },
}

/// Capability a catalog entry needs before it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Shown only in non-debug builds (debug builds force verbose logging).
    NonDebugBuild,
    /// Shown only when the presentation layer supports dynamic colors.
    DynamicColors,
}

/// Static descriptor of one user-facing setting.
#[derive(Debug, Clone, Copy)]
pub struct SettingSpec {
    /// Stable identifier, also the key in the config document.
    pub id: &'static str,
    /// Title shown in the manager UI.
    pub title: &'static str,
    /// One-line explanation shown under the title.
    pub description: &'static str,
    /// Value shape, default, and validator.
    pub kind: SettingKind,
    /// Capability gate, if the entry is conditional.
    pub requires: Option<Requirement>,
}

/// What the surrounding build and presentation layer can do.
///
/// Injected instead of probed from build flags or OS version so that every
/// combination is testable and the headless CLI can state its own abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// `true` when this is a debug build of the manager.
    pub debug_build: bool,
    /// `true` when the presentation layer can apply dynamic system colors.
    pub dynamic_colors: bool,
}

impl Capabilities {
    /// Capabilities of the terminal CLI: a release-style build with no
    /// dynamic-color surface.
    pub fn headless() -> Self {
        Self {
            debug_build: false,
            dynamic_colors: false,
        }
    }
}

// ── The catalog tables ────────────────────────────────────────────────────────

/// Hooks that have a dedicated editor screen and are therefore hidden from
/// the generic hooks group.
pub const MANAGED_ELSEWHERE_HOOKS: &[&str] = &["Saved phrases"];

/// Per-clone settings shown in the *other* group, in display order.
pub const OTHER_SETTINGS: &[SettingSpec] = &[
    SettingSpec {
        id: "maps_api_key",
        title: "Maps API Key",
        description: "Use a custom Maps API key for location features in patched builds",
        kind: SettingKind::Text {
            default: "",
            hint: InputHint::Text,
            validator: no_validation,
        },
        requires: None,
    },
    SettingSpec {
        id: "command_prefix",
        title: "Command Prefix",
        description: "Change the chat command prefix (default: /)",
        kind: SettingKind::Text {
            default: "/",
            hint: InputHint::Text,
            validator: validate_command_prefix,
        },
        requires: None,
    },
    SettingSpec {
        id: "date_format",
        title: "Date Format",
        description: "Format for displaying dates in the app (default: MM/dd/yyyy)",
        kind: SettingKind::Text {
            default: "MM/dd/yyyy",
            hint: InputHint::Text,
            validator: validate_date_format,
        },
        requires: None,
    },
    SettingSpec {
        id: "online_indicator",
        title: "Online indicator duration (mins)",
        description: "Control when the online dot disappears after inactivity",
        kind: SettingKind::Text {
            default: "5",
            hint: InputHint::Number,
            validator: validate_online_indicator,
        },
        requires: None,
    },
    SettingSpec {
        id: "enable_profile_notes",
        title: "Enable profile notes",
        description: "Show the personal notes section on profiles",
        kind: SettingKind::Toggle { default: true },
        requires: None,
    },
    SettingSpec {
        id: "disable_profile_swipe",
        title: "Disable profile swipe",
        description: "Disable swiping between profiles and open them on tap instead",
        kind: SettingKind::Toggle { default: false },
        requires: None,
    },
    SettingSpec {
        id: "force_legacy_anti_block",
        title: "Force legacy AntiBlock behavior",
        description: "Use the legacy AntiBlock detection path (only needed for testing)",
        kind: SettingKind::Toggle { default: false },
        requires: None,
    },
    SettingSpec {
        id: "anti_block_use_toasts",
        title: "Use toasts for AntiBlock",
        description: "Show block and unblock events as toasts instead of notifications",
        kind: SettingKind::Toggle { default: false },
        requires: None,
    },
    SettingSpec {
        id: "reset_database",
        title: "Reset local database on next start",
        description: "Deletes all locally stored data the next time the clone starts",
        kind: SettingKind::Toggle { default: false },
        requires: None,
    },
];

/// Global settings shown in the *manager* group, in display order.
pub const MANAGER_SETTINGS: &[SettingSpec] = &[
    SettingSpec {
        id: "analytics",
        title: "Opt-in analytics",
        description: "Help improve Patchbay by sending anonymous usage data",
        kind: SettingKind::Toggle { default: true },
        requires: None,
    },
    SettingSpec {
        id: "discreet_icon",
        title: "Camouflage app",
        description: "Hide the Patchbay icon and use a neutral name",
        kind: SettingKind::Toggle { default: false },
        requires: None,
    },
    SettingSpec {
        id: "debug_mode",
        title: "Enable debug mode",
        description: "Enable verbose logging for debugging purposes",
        kind: SettingKind::Toggle { default: false },
        requires: Some(Requirement::NonDebugBuild),
    },
    SettingSpec {
        id: "material_you",
        title: "Enable dynamic colors",
        description: "Use system dynamic colors for the manager (restart to apply)",
        kind: SettingKind::Toggle { default: false },
        requires: Some(Requirement::DynamicColors),
    },
];

/// Looks up a catalog entry by setting id.
///
/// Hook names are not catalog entries; they come from the store's hook
/// registry and are toggled through their own path.
pub fn find_spec(id: &str) -> Option<&'static SettingSpec> {
    OTHER_SETTINGS
        .iter()
        .chain(MANAGER_SETTINGS.iter())
        .find(|spec| spec.id == id)
}

fn is_included(spec: &SettingSpec, capabilities: &Capabilities) -> bool {
    match spec.requires {
        None => true,
        Some(Requirement::NonDebugBuild) => !capabilities.debug_build,
        Some(Requirement::DynamicColors) => capabilities.dynamic_colors,
    }
}

// ── Built items (presentation layer contract) ──────────────────────────────────

/// One rendered catalog entry with its current value.
///
/// These DTOs are the contract with the presentation layer; they carry only
/// JSON-friendly fields.  The `kind` tag lets a renderer pick the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettingItem {
    Toggle {
        id: String,
        title: String,
        description: String,
        value: bool,
    },
    Text {
        id: String,
        title: String,
        description: String,
        value: String,
        hint: InputHint,
    },
}

impl SettingItem {
    /// The setting id, regardless of kind.
    pub fn id(&self) -> &str {
        match self {
            SettingItem::Toggle { id, .. } => id,
            SettingItem::Text { id, .. } => id,
        }
    }
}

/// One titled group of settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingGroup {
    pub id: String,
    pub title: String,
    pub settings: Vec<SettingItem>,
}

// ── Catalog building ──────────────────────────────────────────────────────────

/// Builds the grouped catalog from the current store state.
///
/// Pure read: never mutates the store.  Returns the three fixed groups in
/// render order (hooks, other, manager).  Hook entries come from the active
/// clone's registry in sorted order, minus [`MANAGED_ELSEWHERE_HOOKS`].
pub fn build_groups(store: &ConfigStore, capabilities: &Capabilities) -> Vec<SettingGroup> {
    let hooks = store
        .hook_settings()
        .into_iter()
        .filter(|(name, _)| !MANAGED_ELSEWHERE_HOOKS.contains(&name.as_str()))
        .map(|(name, state)| SettingItem::Toggle {
            id: name.clone(),
            title: name,
            description: state.description,
            value: state.enabled,
        })
        .collect();

    let other = OTHER_SETTINGS
        .iter()
        .map(|spec| build_item(store, spec))
        .collect();

    let manager = MANAGER_SETTINGS
        .iter()
        .filter(|spec| is_included(spec, capabilities))
        .map(|spec| build_item(store, spec))
        .collect();

    vec![
        SettingGroup {
            id: "hooks".to_string(),
            title: "Manage Hooks".to_string(),
            settings: hooks,
        },
        SettingGroup {
            id: "other".to_string(),
            title: "Other Settings".to_string(),
            settings: other,
        },
        SettingGroup {
            id: "manager".to_string(),
            title: "Manager Settings".to_string(),
            settings: manager,
        },
    ]
}

fn build_item(store: &ConfigStore, spec: &SettingSpec) -> SettingItem {
    match spec.kind {
        SettingKind::Toggle { default } => SettingItem::Toggle {
            id: spec.id.to_string(),
            title: spec.title.to_string(),
            description: spec.description.to_string(),
            value: store.get_bool(spec.id, default),
        },
        SettingKind::Text { default, hint, .. } => {
            let value = match hint {
                InputHint::Text => store.get_str(spec.id, default),
                // Number-hinted settings live in the document as integers.
                InputHint::Number => store
                    .get_i64(spec.id, default.parse().unwrap_or(0))
                    .to_string(),
            };
            SettingItem::Text {
                id: spec.id.to_string(),
                title: spec.title.to_string(),
                description: spec.description.to_string(),
                value,
                hint,
            }
        }
    }
}

// ── Validators ────────────────────────────────────────────────────────────────

fn no_validation(_input: &str) -> Option<String> {
    None
}

/// Valid command prefixes are exactly one non-alphanumeric character.
fn validate_command_prefix(input: &str) -> Option<String> {
    if input.trim().is_empty() {
        return Some("Invalid command prefix".to_string());
    }
    if input.chars().count() > 1 {
        return Some("Command prefix must be a single character".to_string());
    }
    match input.chars().next() {
        Some(c) if c.is_ascii_alphanumeric() => {
            Some("Command prefix must be a special character".to_string())
        }
        _ => None,
    }
}

/// Date formats must name a month, a day, and a year token.
fn validate_date_format(input: &str) -> Option<String> {
    if input.trim().is_empty() {
        return Some("Date format cannot be empty".to_string());
    }
    if !input.contains('M') {
        return Some("Format must include month (M or MM)".to_string());
    }
    if !input.contains('d') {
        return Some("Format must include day (d or dd)".to_string());
    }
    if !input.contains("yy") {
        return Some("Format must include year (yy or yyyy)".to_string());
    }
    None
}

/// The online indicator duration is a positive whole number of minutes.
fn validate_online_indicator(input: &str) -> Option<String> {
    match input.parse::<i64>() {
        Ok(minutes) if minutes > 0 => None,
        _ => Some("Duration must be a positive number".to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
