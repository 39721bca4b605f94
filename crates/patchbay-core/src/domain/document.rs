//! Configuration document domain model.
//!
//! One JSON-shaped document is shared by every installed Lumen clone.  Global
//! settings (a fixed allow-list of four keys) live at the document root; all
//! other settings and the hook registry live under `clones.<package id>`:
//!
//! ```json
//! {
//!   "analytics": true,
//!   "clones": {
//!     "com.lumenchat.android": {
//!       "hooks": { "Chat indicators": { "description": "...", "enabled": true } },
//!       "command_prefix": "/"
//!     }
//!   }
//! }
//! ```
//!
//! # How the serde attributes map this shape (for beginners)
//!
//! The document is plain JSON with free-form keys, but the code wants typed
//! structs.  Three serde attributes close that gap:
//!
//! - `#[serde(untagged)]` on [`SettingValue`] makes each variant serialize as
//!   its bare JSON value (`true`, `5`, `"text"`) with no wrapper object.  On
//!   the way in, serde tries the variants in declaration order, so integers
//!   are matched before floats.
//!
//! - `#[serde(flatten)]` on a `BTreeMap` field captures every JSON key not
//!   consumed by the named fields.  That is how global settings sit directly
//!   at the root next to `"clones"`, and per-clone settings sit next to
//!   `"hooks"`, without a dedicated wrapper key.
//!
//! - `#[serde(transparent)]` on [`PackageId`] serializes the newtype as its
//!   inner string, so package ids can be used as JSON object keys.
//!
//! `BTreeMap` (not `HashMap`) keeps serialization order deterministic, which
//! keeps the persisted file diffable between writes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Package identifier of the unmodified Lumen install.
///
/// This package always exists in the `clones` mapping after migration, and is
/// the default active package when the caller does not name one.
pub const PRIMARY_PACKAGE: &str = "com.lumenchat.android";

/// Settings shared across all clones.  Everything else is per-clone.
///
/// The list is fixed: routing is decided by key name alone, so growing it
/// changes where existing values are looked up.
pub const GLOBAL_SETTINGS: [&str; 4] = ["analytics", "discreet_icon", "material_you", "debug_mode"];

/// Returns `true` if `name` is stored at the document root for all clones.
pub fn is_global_setting(name: &str) -> bool {
    GLOBAL_SETTINGS.contains(&name)
}

/// Reverse-DNS identifier of one installed clone (e.g. `com.lumenchat.android`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// Wraps a package identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier of the unmodified Lumen install.
    pub fn primary() -> Self {
        Self(PRIMARY_PACKAGE.to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PackageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One setting value, typed by variant rather than downcast at the call site.
///
/// Variant order matters: serde tries untagged variants top to bottom, so
/// `Int` must come before `Float` for whole JSON numbers to stay integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<SettingValue>),
    Document(BTreeMap<String, SettingValue>),
}

impl SettingValue {
    /// Returns the boolean payload, or `None` for any other variant.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer payload, or `None` for any other variant.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the numeric payload widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Int(n) => Some(*n as f64),
            SettingValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the string payload, or `None` for any other variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for [`SettingValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, SettingValue::Null)
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        SettingValue::Int(n)
    }
}

impl From<f64> for SettingValue {
    fn from(x: f64) -> Self {
        SettingValue::Float(x)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Str(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Str(s)
    }
}

/// Registered state of one hook within one clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookState {
    /// Human-readable description shown in the manager UI.
    pub description: String,
    /// Whether the hook is applied when the clone starts.
    pub enabled: bool,
}

/// Per-clone slice of the document: the hook registry plus this clone's settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloneSettings {
    /// Hooks registered for this clone, keyed by hook name.
    #[serde(default)]
    pub hooks: BTreeMap<String, HookState>,
    /// Every other per-clone setting, captured from the same JSON level.
    #[serde(flatten)]
    pub settings: BTreeMap<String, SettingValue>,
}

/// The whole shared configuration document.
///
/// Lifecycle: loaded once per store initialization from the bridge, mutated in
/// place on every setting change, and written back after each mutation.  There
/// is no batching and no transaction spanning multiple mutations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// One entry per known clone, keyed by package identifier.
    #[serde(default)]
    pub clones: BTreeMap<PackageId, CloneSettings>,
    /// Global settings, captured from the document root next to `clones`.
    #[serde(flatten)]
    pub globals: BTreeMap<String, SettingValue>,
}

impl ConfigDocument {
    /// An empty document with the primary package already present.
    ///
    /// This is the fallback shape used when the bridge cannot be read: it is
    /// already in multi-clone layout, so no migration write is triggered.
    pub fn with_primary() -> Self {
        let mut doc = Self::default();
        doc.clones.insert(PackageId::primary(), CloneSettings::default());
        doc
    }

    /// Creates an empty entry for `package` unless one already exists.
    ///
    /// Returns `true` when the entry was created, so the caller knows a
    /// write-back is needed.
    pub fn ensure_package(&mut self, package: &PackageId) -> bool {
        if self.clones.contains_key(package) {
            return false;
        }
        self.clones.insert(package.clone(), CloneSettings::default());
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ConfigDocument {
        serde_json::from_value(value).expect("document must parse")
    }

    // ── Global allow-list ─────────────────────────────────────────────────────

    #[test]
    fn test_all_four_global_settings_are_recognised() {
        assert!(is_global_setting("analytics"));
        assert!(is_global_setting("discreet_icon"));
        assert!(is_global_setting("material_you"));
        assert!(is_global_setting("debug_mode"));
    }

    #[test]
    fn test_non_global_setting_is_not_recognised() {
        assert!(!is_global_setting("command_prefix"));
        assert!(!is_global_setting("hooks"));
        assert!(!is_global_setting(""));
    }

    // ── SettingValue deserialization ──────────────────────────────────────────

    #[test]
    fn test_setting_value_parses_each_json_type() {
        let parsed: Vec<SettingValue> =
            serde_json::from_value(json!([null, true, 5, 2.5, "text", [1], { "k": 1 }]))
                .expect("values must parse");

        assert_eq!(parsed[0], SettingValue::Null);
        assert_eq!(parsed[1], SettingValue::Bool(true));
        assert_eq!(parsed[2], SettingValue::Int(5));
        assert_eq!(parsed[3], SettingValue::Float(2.5));
        assert_eq!(parsed[4], SettingValue::Str("text".to_string()));
        assert!(matches!(parsed[5], SettingValue::List(_)));
        assert!(matches!(parsed[6], SettingValue::Document(_)));
    }

    #[test]
    fn test_whole_json_number_parses_as_int_not_float() {
        let v: SettingValue = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(v, SettingValue::Int(42));
        assert_eq!(v.as_i64(), Some(42));
    }

    #[test]
    fn test_setting_value_serializes_untagged() {
        assert_eq!(serde_json::to_value(SettingValue::Bool(false)).unwrap(), json!(false));
        assert_eq!(serde_json::to_value(SettingValue::Int(7)).unwrap(), json!(7));
        assert_eq!(
            serde_json::to_value(SettingValue::Str("x".to_string())).unwrap(),
            json!("x")
        );
        assert_eq!(serde_json::to_value(SettingValue::Null).unwrap(), json!(null));
    }

    #[test]
    fn test_as_bool_rejects_other_variants() {
        assert_eq!(SettingValue::Str("true".to_string()).as_bool(), None);
        assert_eq!(SettingValue::Int(1).as_bool(), None);
        assert_eq!(SettingValue::Bool(true).as_bool(), Some(true));
    }

    #[test]
    fn test_as_f64_widens_integers() {
        assert_eq!(SettingValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(SettingValue::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(SettingValue::Bool(true).as_f64(), None);
    }

    // ── Document shape ────────────────────────────────────────────────────────

    #[test]
    fn test_globals_are_captured_from_document_root() {
        let doc = parse(json!({
            "analytics": true,
            "debug_mode": false,
            "clones": {}
        }));

        assert_eq!(doc.globals.get("analytics"), Some(&SettingValue::Bool(true)));
        assert_eq!(doc.globals.get("debug_mode"), Some(&SettingValue::Bool(false)));
        assert!(doc.clones.is_empty());
    }

    #[test]
    fn test_clone_settings_capture_keys_next_to_hooks() {
        let doc = parse(json!({
            "clones": {
                "com.lumenchat.android": {
                    "hooks": {
                        "Chat indicators": { "description": "Hide receipts", "enabled": true }
                    },
                    "command_prefix": "!"
                }
            }
        }));

        let clone = doc.clones.get(&PackageId::primary()).expect("primary must exist");
        assert_eq!(
            clone.hooks.get("Chat indicators"),
            Some(&HookState {
                description: "Hide receipts".to_string(),
                enabled: true
            })
        );
        assert_eq!(
            clone.settings.get("command_prefix"),
            Some(&SettingValue::Str("!".to_string()))
        );
    }

    #[test]
    fn test_missing_hooks_key_defaults_to_empty_registry() {
        let doc = parse(json!({
            "clones": { "com.lumenchat.android": { "command_prefix": "/" } }
        }));

        let clone = doc.clones.get(&PackageId::primary()).unwrap();
        assert!(clone.hooks.is_empty());
        assert_eq!(clone.settings.len(), 1);
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let original = parse(json!({
            "analytics": false,
            "clones": {
                "com.lumenchat.android": { "hooks": {}, "online_indicator": 5 },
                "com.lumenchat.android.clone1": { "hooks": {} }
            }
        }));

        let value = serde_json::to_value(&original).expect("serialize");
        let restored: ConfigDocument = serde_json::from_value(value).expect("deserialize");
        assert_eq!(original, restored);
    }

    #[test]
    fn test_serialized_document_keeps_globals_at_root() {
        let mut doc = ConfigDocument::with_primary();
        doc.globals.insert("analytics".to_string(), SettingValue::Bool(true));

        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["analytics"], json!(true));
        assert_eq!(value["clones"]["com.lumenchat.android"]["hooks"], json!({}));
    }

    #[test]
    fn test_non_object_document_fails_to_parse() {
        let result: Result<ConfigDocument, _> = serde_json::from_value(json!([1, 2, 3]));
        assert!(result.is_err());
    }

    // ── ensure_package ────────────────────────────────────────────────────────

    #[test]
    fn test_ensure_package_creates_missing_entry_with_empty_hooks() {
        let mut doc = ConfigDocument::default();
        let clone = PackageId::new("com.lumenchat.android.clone1");

        let created = doc.ensure_package(&clone);

        assert!(created);
        let entry = doc.clones.get(&clone).expect("entry must exist");
        assert!(entry.hooks.is_empty());
        assert!(entry.settings.is_empty());
    }

    #[test]
    fn test_ensure_package_is_a_no_op_for_existing_entry() {
        let mut doc = ConfigDocument::with_primary();
        doc.clones
            .get_mut(&PackageId::primary())
            .unwrap()
            .settings
            .insert("kept".to_string(), SettingValue::Int(1));

        let created = doc.ensure_package(&PackageId::primary());

        assert!(!created);
        // The existing entry, including its settings, is untouched.
        let entry = doc.clones.get(&PackageId::primary()).unwrap();
        assert_eq!(entry.settings.get("kept"), Some(&SettingValue::Int(1)));
    }

    #[test]
    fn test_with_primary_contains_exactly_the_primary_package() {
        let doc = ConfigDocument::with_primary();
        assert_eq!(doc.clones.len(), 1);
        assert!(doc.clones.contains_key(&PackageId::primary()));
        assert!(doc.globals.is_empty());
    }

    // ── PackageId ─────────────────────────────────────────────────────────────

    #[test]
    fn test_package_id_serializes_as_bare_string() {
        let id = PackageId::new("com.lumenchat.android.clone2");
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            json!("com.lumenchat.android.clone2")
        );
    }

    #[test]
    fn test_package_id_display_matches_inner_string() {
        let id = PackageId::primary();
        assert_eq!(id.to_string(), PRIMARY_PACKAGE);
        assert_eq!(id.as_str(), PRIMARY_PACKAGE);
    }
}
