//! Action binding table with persistent overrides.
//!
//! Maps logical action names (`"jump"`, `"fire"`) to control-path strings
//! (`"key/space"`, `"pad/south"`). The table keeps two layers: the defaults a
//! host ships with, and user overrides from rebinding. Only the overrides are
//! persisted, as a JSON array of `{action, control}` entries, so shipping new
//! defaults never fights a stale save file.
//!
//! The control-path strings are opaque to this crate; the host input layer
//! resolves them to whatever device representation it uses.

use bevy_ecs::prelude::*;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One persisted rebind entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingOverride {
    /// Logical action name.
    pub action: String,
    /// Control path replacing the default for that action.
    pub control: String,
}

/// Resource mapping logical action names to control paths.
///
/// Resolution order is override first, then default. Unknown actions resolve
/// to `None`.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActionBindings {
    defaults: FxHashMap<String, String>,
    overrides: FxHashMap<String, String>,
}

impl ActionBindings {
    /// Create an empty binding table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style default registration.
    pub fn with_default(mut self, action: impl Into<String>, control: impl Into<String>) -> Self {
        self.set_default(action, control);
        self
    }

    /// Register or replace the shipped default for an action.
    pub fn set_default(&mut self, action: impl Into<String>, control: impl Into<String>) {
        self.defaults.insert(action.into(), control.into());
    }

    /// Install a user override for an action.
    pub fn rebind(&mut self, action: impl Into<String>, control: impl Into<String>) {
        self.overrides.insert(action.into(), control.into());
    }

    /// Drop the override for one action, falling back to its default.
    pub fn clear_override(&mut self, action: &str) {
        self.overrides.remove(action);
    }

    /// Drop every override.
    pub fn clear_all_overrides(&mut self) {
        self.overrides.clear();
    }

    /// Resolve an action to its control path (override wins).
    pub fn control_for(&self, action: &str) -> Option<&str> {
        self.overrides
            .get(action)
            .or_else(|| self.defaults.get(action))
            .map(String::as_str)
    }

    /// Whether the action currently carries a user override.
    pub fn is_overridden(&self, action: &str) -> bool {
        self.overrides.contains_key(action)
    }

    /// Serialize the current overrides as a JSON array.
    pub fn overrides_to_json(&self) -> Result<String, String> {
        let mut entries: Vec<BindingOverride> = self
            .overrides
            .iter()
            .map(|(action, control)| BindingOverride {
                action: action.clone(),
                control: control.clone(),
            })
            .collect();
        // Stable output regardless of hash order.
        entries.sort_by(|a, b| a.action.cmp(&b.action));
        serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("Failed to serialize binding overrides: {}", e))
    }

    /// Merge overrides parsed from a JSON array into the table.
    ///
    /// Existing overrides for actions not present in the JSON are kept.
    pub fn apply_overrides_json(&mut self, json: &str) -> Result<(), String> {
        let entries: Vec<BindingOverride> = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse binding overrides: {}", e))?;
        for entry in entries {
            self.overrides.insert(entry.action, entry.control);
        }
        Ok(())
    }

    /// Write the current overrides to `path` as JSON.
    pub fn save_overrides(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        let json = self.overrides_to_json()?;
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        info!(
            "Saved {} binding override(s) to {}",
            self.overrides.len(),
            path.display()
        );
        Ok(())
    }

    /// Load and merge overrides from a JSON file.
    ///
    /// Returns an error if the file cannot be read or parsed; the caller may
    /// ignore it to keep shipping defaults, mirroring how missing config
    /// files are treated at startup.
    pub fn load_overrides(&mut self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        self.apply_overrides_json(&json)?;
        info!("Loaded binding overrides from {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ActionBindings {
        ActionBindings::new()
            .with_default("jump", "key/space")
            .with_default("fire", "key/ctrl")
    }

    #[test]
    fn test_override_wins_over_default() {
        let mut bindings = table();
        assert_eq!(bindings.control_for("jump"), Some("key/space"));

        bindings.rebind("jump", "pad/south");
        assert_eq!(bindings.control_for("jump"), Some("pad/south"));
        assert!(bindings.is_overridden("jump"));

        bindings.clear_override("jump");
        assert_eq!(bindings.control_for("jump"), Some("key/space"));
        assert!(!bindings.is_overridden("jump"));
    }

    #[test]
    fn test_unknown_action_resolves_to_none() {
        let bindings = table();
        assert_eq!(bindings.control_for("crouch"), None);
    }

    #[test]
    fn test_json_merge_keeps_unrelated_overrides() {
        let mut bindings = table();
        bindings.rebind("fire", "pad/west");

        bindings
            .apply_overrides_json(r#"[{"action": "jump", "control": "pad/south"}]"#)
            .expect("valid JSON should apply");

        assert_eq!(bindings.control_for("jump"), Some("pad/south"));
        assert_eq!(bindings.control_for("fire"), Some("pad/west"));
    }

    #[test]
    fn test_bad_json_is_rejected() {
        let mut bindings = table();
        assert!(bindings.apply_overrides_json("not json").is_err());
    }

    #[test]
    fn test_save_and_load_overrides_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bindings.json");

        let mut bindings = table();
        bindings.rebind("jump", "pad/south");
        bindings.save_overrides(&path).expect("save should succeed");

        let mut fresh = table();
        fresh.load_overrides(&path).expect("load should succeed");
        assert_eq!(fresh.control_for("jump"), Some("pad/south"));
        assert_eq!(fresh.control_for("fire"), Some("key/ctrl"));
    }

    #[test]
    fn test_missing_file_reports_error_and_keeps_defaults() {
        let mut bindings = table();
        assert!(bindings.load_overrides("/nonexistent/bindings.json").is_err());
        assert_eq!(bindings.control_for("jump"), Some("key/space"));
    }
}
