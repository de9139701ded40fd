//! Layered environment lookup.
//!
//! Replaces ambient process-environment mutation with an explicit
//! object owned by the [`ConfigStore`](crate::store::ConfigStore).
//! Lookup order: overrides (process-env snapshot plus explicit sets)
//! then file-provided values. The real process environment is read
//! once and never written.

use std::collections::BTreeMap;

/// Two-layer key/value environment.
#[derive(Debug, Clone, Default)]
pub struct Env {
    overrides: BTreeMap<String, String>,
    file: BTreeMap<String, String>,
}

impl Env {
    /// Build an `Env` whose overrides layer is a snapshot of the
    /// process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            overrides: std::env::vars().collect(),
            file: BTreeMap::new(),
        }
    }

    /// An `Env` with no process snapshot. Used in tests and by callers
    /// that want fully explicit inputs.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a key, overrides first.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.overrides
            .get(key)
            .or_else(|| self.file.get(key))
            .map(String::as_str)
    }

    /// Like [`get`](Self::get), but an empty value counts as absent.
    #[must_use]
    pub fn get_nonempty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Look up a key, falling back to `default` when absent or empty.
    #[must_use]
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get_nonempty(key).unwrap_or(default).to_string()
    }

    /// Set a key in the overrides layer.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.overrides.insert(key.into(), value.into());
    }

    /// Merge file-provided pairs into the file layer. Keys already in
    /// the overrides layer keep winning on lookup; nothing is clobbered.
    pub fn merge_file_pairs(&mut self, pairs: impl IntoIterator<Item = (String, String)>) {
        self.file.extend(pairs);
    }
}
