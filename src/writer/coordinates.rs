use std::{fs, path::Path};

use crate::{
    error::{Error, Result},
    model::TestSuiteResult,
};

use super::{format_value, ResultRenderer};

/// Renders each series as a bare `(x,y)(x,y)...` coordinate list, ready to
/// be dropped into a pgfplots `\addplot coordinates` block.
///
/// Every step gets a `Step_<n>` directory holding one file per dependent
/// column, named `<n>_<column>`.
#[derive(Debug, Default)]
pub struct CoordinateRenderer;

impl ResultRenderer for CoordinateRenderer {
    fn render(&self, suite_dir: &Path, result: &TestSuiteResult) -> Result<()> {
        for step in &result.steps {
            let step_dir = suite_dir.join(format!("Step_{}", step.step_number));
            fs::create_dir_all(&step_dir).map_err(|e| Error::io(&step_dir, e))?;
            for item in &step.result_items {
                let path =
                    step_dir.join(format!("{}_{}", step.step_number, item.result_value_name));
                let mut contents = String::new();
                for (key, value) in &item.values {
                    contents.push_str(&format!("({},{})", key, format_value(*value)));
                }
                fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, fs};

    use super::*;
    use crate::model::{TestStepResult, TestStepResultItem};

    fn suite_result(steps: Vec<TestStepResult>) -> TestSuiteResult {
        TestSuiteResult {
            suite_name: "ChildStateChangeTestSuite".to_string(),
            steps,
            suite_info: vec![
                ("suiteName".to_string(), "ChildStateChangeTestSuite".to_string()),
                ("prefix".to_string(), "result_".to_string()),
                ("independentVariable".to_string(), "size".to_string()),
            ],
        }
    }

    #[test]
    fn test_coordinate_list() {
        let dir = tempfile::tempdir().unwrap();
        let result = suite_result(vec![TestStepResult {
            step_number: 0,
            result_items: vec![TestStepResultItem::new(
                "result_count",
                BTreeMap::from([(1, 15.0), (2, 5.0)]),
            )],
        }]);

        CoordinateRenderer.render(dir.path(), &result).unwrap();

        let contents = fs::read_to_string(dir.path().join("Step_0/0_result_count")).unwrap();
        assert_eq!(contents, "(1,15.0)(2,5.0)");
    }

    #[test]
    fn test_points_ascend_by_independent_value() {
        let dir = tempfile::tempdir().unwrap();
        let result = suite_result(vec![TestStepResult {
            step_number: 3,
            result_items: vec![TestStepResultItem::new(
                "result_ms",
                BTreeMap::from([(10, 1.5), (2, 0.25), (-1, 4.0)]),
            )],
        }]);

        CoordinateRenderer.render(dir.path(), &result).unwrap();

        let contents = fs::read_to_string(dir.path().join("Step_3/3_result_ms")).unwrap();
        assert_eq!(contents, "(-1,4.0)(2,0.25)(10,1.5)");
    }

    #[test]
    fn test_one_file_per_column() {
        let dir = tempfile::tempdir().unwrap();
        let result = suite_result(vec![TestStepResult {
            step_number: 1,
            result_items: vec![
                TestStepResultItem::new("result_count", BTreeMap::from([(1, 1.0)])),
                TestStepResultItem::new("result_ms", BTreeMap::from([(1, 2.0)])),
            ],
        }]);

        CoordinateRenderer.render(dir.path(), &result).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("Step_1/1_result_count")).unwrap(),
            "(1,1.0)"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("Step_1/1_result_ms")).unwrap(),
            "(1,2.0)"
        );
    }

    #[test]
    fn test_step_without_items_creates_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = suite_result(vec![TestStepResult {
            step_number: 0,
            result_items: vec![],
        }]);

        CoordinateRenderer.render(dir.path(), &result).unwrap();

        let step_dir = dir.path().join("Step_0");
        assert!(step_dir.is_dir());
        assert!(fs::read_dir(step_dir).unwrap().next().is_none());
    }
}
