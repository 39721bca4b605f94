//! One-time migration of legacy single-clone documents.
//!
//! Early Patchbay builds supported a single Lumen install, so the document
//! root held the hook registry and every setting directly:
//!
//! ```json
//! { "hooks": { ... }, "command_prefix": "!", "analytics": true }
//! ```
//!
//! The multi-clone layout nests everything per-clone under `clones`, keeping
//! only the global settings at the root.  This module restructures a legacy
//! document into that layout exactly once, on the raw JSON value before typed
//! deserialization, so unknown legacy keys are carried over untouched.

use serde_json::{Map, Value};

use super::document::{is_global_setting, PackageId};

/// Returns `true` when `root` is an object without a `clones` key, i.e. a
/// document still in the legacy single-clone layout.
///
/// Non-object roots return `false`; they cannot be migrated and are rejected
/// later by typed deserialization.
pub fn needs_migration(root: &Value) -> bool {
    match root.as_object() {
        Some(obj) => !obj.contains_key("clones"),
        None => false,
    }
}

/// Restructures a legacy document into the multi-clone layout in place.
///
/// When the root carries a `hooks` key, the hook registry and every
/// non-global root key are moved (not copied) into a new entry for `primary`
/// under `clones`.  Without a `hooks` key there is nothing to attribute to
/// the primary install, so an empty entry is seeded and any stray root keys
/// stay where they are.  Global settings never move.
///
/// Returns `true` when the document changed and needs a write-back.  Running
/// it again on the result is a no-op.
pub fn migrate_to_multi_clone(root: &mut Value, primary: &PackageId) -> bool {
    let Some(obj) = root.as_object_mut() else {
        return false;
    };
    if obj.contains_key("clones") {
        return false;
    }

    let mut clone_doc = Map::new();
    if let Some(hooks) = obj.remove("hooks") {
        clone_doc.insert("hooks".to_string(), hooks);

        let keys_to_move: Vec<String> = obj
            .keys()
            .filter(|key| !is_global_setting(key))
            .cloned()
            .collect();
        for key in keys_to_move {
            if let Some(value) = obj.remove(&key) {
                clone_doc.insert(key, value);
            }
        }
    } else {
        clone_doc.insert("hooks".to_string(), Value::Object(Map::new()));
    }

    let mut clones = Map::new();
    clones.insert(primary.as_str().to_string(), Value::Object(clone_doc));
    obj.insert("clones".to_string(), Value::Object(clones));
    true
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::PRIMARY_PACKAGE;
    use serde_json::json;

    fn primary() -> PackageId {
        PackageId::primary()
    }

    fn primary_entry(root: &Value) -> &Value {
        &root["clones"][PRIMARY_PACKAGE]
    }

    // ── Legacy documents with a hook registry ─────────────────────────────────

    #[test]
    fn test_hooks_and_other_keys_move_under_primary_clone() {
        let mut root = json!({
            "hooks": { "h1": { "description": "d", "enabled": true } },
            "other_key": 5
        });

        let changed = migrate_to_multi_clone(&mut root, &primary());

        assert!(changed);
        assert_eq!(
            root,
            json!({
                "clones": {
                    "com.lumenchat.android": {
                        "hooks": { "h1": { "description": "d", "enabled": true } },
                        "other_key": 5
                    }
                }
            })
        );
    }

    #[test]
    fn test_global_settings_stay_at_the_root() {
        let mut root = json!({
            "hooks": {},
            "analytics": true,
            "discreet_icon": false,
            "command_prefix": "!"
        });

        migrate_to_multi_clone(&mut root, &primary());

        assert_eq!(root["analytics"], json!(true));
        assert_eq!(root["discreet_icon"], json!(false));
        // The non-global key moved; it must not remain at the root.
        assert!(root.get("command_prefix").is_none());
        assert_eq!(primary_entry(&root)["command_prefix"], json!("!"));
    }

    #[test]
    fn test_every_original_key_survives_the_move() {
        let original = json!({
            "hooks": { "h1": { "description": "d", "enabled": false } },
            "analytics": true,
            "maps_api_key": "abc",
            "online_indicator": 5,
            "nested": { "a": [1, 2] }
        });
        let mut root = original.clone();

        migrate_to_multi_clone(&mut root, &primary());

        for (key, value) in original.as_object().unwrap() {
            if key == "hooks" || !is_global_setting(key) {
                assert_eq!(&primary_entry(&root)[key], value, "key {key} moved intact");
            } else {
                assert_eq!(&root[key], value, "global key {key} kept at root");
            }
        }
    }

    // ── Legacy documents without a hook registry ──────────────────────────────

    #[test]
    fn test_empty_document_is_seeded_with_primary_entry() {
        let mut root = json!({});

        let changed = migrate_to_multi_clone(&mut root, &primary());

        assert!(changed);
        assert_eq!(
            root,
            json!({ "clones": { "com.lumenchat.android": { "hooks": {} } } })
        );
    }

    #[test]
    fn test_without_hooks_key_stray_root_keys_are_left_in_place() {
        let mut root = json!({ "legacy_flag": 1 });

        migrate_to_multi_clone(&mut root, &primary());

        // No hook registry means nothing is attributed to the primary install.
        assert_eq!(root["legacy_flag"], json!(1));
        assert_eq!(primary_entry(&root)["hooks"], json!({}));
    }

    // ── Already migrated / malformed inputs ───────────────────────────────────

    #[test]
    fn test_migrated_document_is_left_untouched() {
        let mut root = json!({ "clones": { "com.other": { "hooks": {} } } });
        let before = root.clone();

        let changed = migrate_to_multi_clone(&mut root, &primary());

        assert!(!changed);
        assert_eq!(root, before);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let mut root = json!({ "hooks": {}, "some_key": "v" });

        assert!(migrate_to_multi_clone(&mut root, &primary()));
        let after_first = root.clone();
        assert!(!migrate_to_multi_clone(&mut root, &primary()));
        assert_eq!(root, after_first);
    }

    #[test]
    fn test_non_object_root_is_not_migrated() {
        let mut root = json!([1, 2, 3]);
        assert!(!migrate_to_multi_clone(&mut root, &primary()));
        assert_eq!(root, json!([1, 2, 3]));
    }

    #[test]
    fn test_needs_migration_matches_clones_key_presence() {
        assert!(needs_migration(&json!({})));
        assert!(needs_migration(&json!({ "hooks": {} })));
        assert!(!needs_migration(&json!({ "clones": {} })));
        assert!(!needs_migration(&json!(null)));
        assert!(!needs_migration(&json!("text")));
    }
}
