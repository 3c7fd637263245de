use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix dependent columns carry when a suite does not configure its own.
pub const DEFAULT_DEPENDENT_PREFIX: &str = "result_";

/// Measurement parameters of one registered test suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Name of the independent variable column in the raw CSV files.
    #[serde(rename = "iv")]
    pub independent_variable: String,
    /// Prefix shared by all dependent columns, if it differs from
    /// [`DEFAULT_DEPENDENT_PREFIX`].
    #[serde(rename = "pre", default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl SuiteConfig {
    pub fn new(independent_variable: impl Into<String>) -> Self {
        Self {
            independent_variable: independent_variable.into(),
            prefix: None,
        }
    }

    pub fn dependent_prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_DEPENDENT_PREFIX)
    }
}

static BUILTIN: Lazy<SuiteRegistry> = Lazy::new(|| {
    let mut suites = BTreeMap::new();
    suites.insert(
        "OrthogonalHierarchyConnectionTestSuite".to_string(),
        SuiteConfig::new("size"),
    );
    suites.insert(
        "CompleteTransitionGraphTestSuite".to_string(),
        SuiteConfig::new("totalStateCount"),
    );
    suites.insert(
        "StateGridTestSuite".to_string(),
        SuiteConfig::new("totalStateCount"),
    );
    suites.insert(
        "RecursiveOrthogonalStateTestSuite".to_string(),
        SuiteConfig::new("depth"),
    );
    suites.insert(
        "OrthogonalStateGridTestSuite".to_string(),
        SuiteConfig::new("numberOfOrthogonalStates"),
    );
    suites.insert(
        "ChildStateChangeTestSuite".to_string(),
        SuiteConfig::new("size"),
    );
    SuiteRegistry { suites }
});

/// Maps suite identifiers, as embedded in run directory names, to their
/// measurement parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiteRegistry {
    suites: BTreeMap<String, SuiteConfig>,
}

impl SuiteRegistry {
    /// The suites known out of the box.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Loads a registry from a JSON file of the form
    /// `{"SuiteName": {"iv": "...", "pre": "..."}}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::InvalidRegistry {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn get(&self, suite_name: &str) -> Result<&SuiteConfig> {
        self.suites
            .get(suite_name)
            .ok_or_else(|| Error::UnknownSuite(suite_name.to_string()))
    }

    pub fn insert(&mut self, suite_name: impl Into<String>, config: SuiteConfig) {
        self.suites.insert(suite_name.into(), config);
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_builtin_suites() {
        let registry = SuiteRegistry::builtin();
        assert_eq!(registry.len(), 6);

        let config = registry.get("StateGridTestSuite").unwrap();
        assert_eq!(config.independent_variable, "totalStateCount");
        assert_eq!(config.dependent_prefix(), "result_");

        let config = registry.get("RecursiveOrthogonalStateTestSuite").unwrap();
        assert_eq!(config.independent_variable, "depth");
    }

    #[test]
    fn test_unknown_suite() {
        let registry = SuiteRegistry::builtin();
        let err = registry.get("NoSuchSuite").unwrap_err();
        assert!(matches!(err, Error::UnknownSuite(name) if name == "NoSuchSuite"));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suites.json");
        fs::write(
            &path,
            r#"{"LatencyTestSuite": {"iv": "nodes", "pre": "measured_"}, "PlainTestSuite": {"iv": "count"}}"#,
        )
        .unwrap();

        let registry = SuiteRegistry::from_json_file(&path).unwrap();
        assert_eq!(registry.len(), 2);

        let config = registry.get("LatencyTestSuite").unwrap();
        assert_eq!(config.independent_variable, "nodes");
        assert_eq!(config.dependent_prefix(), "measured_");

        let config = registry.get("PlainTestSuite").unwrap();
        assert_eq!(config.dependent_prefix(), "result_");
    }

    #[test]
    fn test_from_json_file_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suites.json");
        fs::write(&path, "not json").unwrap();

        let err = SuiteRegistry::from_json_file(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidRegistry { .. }));
    }

    #[test]
    fn test_missing_registry_file() {
        let err = SuiteRegistry::from_json_file("/nonexistent/suites.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
