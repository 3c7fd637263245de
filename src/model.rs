use std::collections::BTreeMap;

/// Aggregate series of one dependent column within one test step.
///
/// Values are keyed by the integer value the independent variable had when
/// the raw observations were taken, so iterating yields plot points in
/// ascending x order.
#[derive(Debug, Clone, PartialEq)]
pub struct TestStepResultItem {
    /// Column name as it appeared in the raw CSV header.
    pub result_value_name: String,
    /// Independent variable value mapped to the mean of all observations.
    pub values: BTreeMap<i64, f64>,
}

impl TestStepResultItem {
    pub fn new(result_value_name: impl Into<String>, values: BTreeMap<i64, f64>) -> Self {
        Self {
            result_value_name: result_value_name.into(),
            values,
        }
    }
}

/// All aggregate series measured during one step of a test suite.
#[derive(Debug, Clone, PartialEq)]
pub struct TestStepResult {
    pub step_number: u64,
    /// Items sorted by column name.
    pub result_items: Vec<TestStepResultItem>,
}

/// Interpreted results of one test suite, combined over every run
/// directory the suite appeared in.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSuiteResult {
    pub suite_name: String,
    /// Steps sorted by step number.
    pub steps: Vec<TestStepResult>,
    /// Metadata describing how the suite was measured, in the order it is
    /// written to the suite's `info.txt`.
    pub suite_info: Vec<(String, String)>,
}

impl TestSuiteResult {
    /// Looks up a metadata value by key.
    pub fn info(&self, key: &str) -> Option<&str> {
        self.suite_info
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_lookup() {
        let result = TestSuiteResult {
            suite_name: "StateGridTestSuite".to_string(),
            steps: vec![],
            suite_info: vec![
                ("suiteName".to_string(), "StateGridTestSuite".to_string()),
                ("prefix".to_string(), "result_".to_string()),
                (
                    "independentVariable".to_string(),
                    "totalStateCount".to_string(),
                ),
            ],
        };

        assert_eq!(result.info("independentVariable"), Some("totalStateCount"));
        assert_eq!(result.info("prefix"), Some("result_"));
        assert_eq!(result.info("nonexistent"), None);
    }
}
