//! Domain primitive types used across the rootforge workspace.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RootforgeError};

/// Set of supervised services: service name to literal shell command.
///
/// Names are used verbatim as path segments. Entries are independent of one
/// another; iteration is in name order so generated trees are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Services(BTreeMap<String, String>);

impl Services {
    /// Creates an empty service set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a service, returning the previous command if any.
    pub fn insert(&mut self, name: impl Into<String>, command: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), command.into())
    }

    /// Returns the command for a service.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, command)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Reads a service set from a JSON object of `name: command` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object
    /// of strings.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| RootforgeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl<K, V> FromIterator<(K, V)> for Services
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn services_collect_from_pairs() {
        let services: Services = [("web", "run-web"), ("db", "run-db")].into_iter().collect();
        assert_eq!(services.len(), 2);
        assert_eq!(services.get("web"), Some("run-web"));
    }

    #[test]
    fn services_iterate_in_name_order() {
        let services: Services = [("zeta", "z"), ("alpha", "a")].into_iter().collect();
        let names: Vec<_> = services.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn insert_replaces_existing_command() {
        let mut services = Services::new();
        assert!(services.insert("web", "old").is_none());
        assert_eq!(services.insert("web", "new").as_deref(), Some("old"));
        assert_eq!(services.get("web"), Some("new"));
    }

    #[test]
    fn services_load_from_json_object() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("services.json");
        std::fs::write(&path, r#"{"web": "run-web --port 8080"}"#).expect("write");

        let services = Services::from_json_file(&path).expect("load");
        assert_eq!(services.get("web"), Some("run-web --port 8080"));
    }

    #[test]
    fn services_reject_non_string_commands() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("services.json");
        std::fs::write(&path, r#"{"web": 8080}"#).expect("write");

        let err = Services::from_json_file(&path).unwrap_err();
        assert!(matches!(err, RootforgeError::Serialization { .. }));
    }
}
