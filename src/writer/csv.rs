use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use crate::{
    error::{Error, Result},
    model::TestSuiteResult,
};

use super::{format_value, ResultRenderer};

/// Renders each step as a flat `Step_<n>.csv` table.
///
/// The independent variable makes up the first column, followed by the
/// dependent columns sorted by name; rows ascend by independent value. A
/// column that has no observation for some independent value leaves that
/// cell empty.
#[derive(Debug, Default)]
pub struct CsvRenderer;

impl ResultRenderer for CsvRenderer {
    fn render(&self, suite_dir: &Path, result: &TestSuiteResult) -> Result<()> {
        let independent_name = result
            .info("independentVariable")
            .ok_or_else(|| Error::MissingSuiteInfo {
                suite: result.suite_name.clone(),
                key: "independentVariable".to_string(),
            })?;
        for step in &result.steps {
            let path = suite_dir.join(format!("Step_{}.csv", step.step_number));

            let column_names: Vec<&str> = step
                .result_items
                .iter()
                .map(|item| item.result_value_name.as_str())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            // Rearrange the per-column series into per-row cells.
            let mut rows: BTreeMap<i64, BTreeMap<&str, f64>> = BTreeMap::new();
            for item in &step.result_items {
                for (key, value) in &item.values {
                    rows.entry(*key)
                        .or_default()
                        .insert(item.result_value_name.as_str(), *value);
                }
            }

            let mut writer = ::csv::Writer::from_path(&path).map_err(|e| Error::csv(&path, e))?;
            let mut header = vec![independent_name];
            header.extend(&column_names);
            writer.write_record(&header).map_err(|e| Error::csv(&path, e))?;
            for (key, cells) in &rows {
                let mut record = vec![key.to_string()];
                for name in &column_names {
                    let cell = cells.get(name).map(|v| format_value(*v)).unwrap_or_default();
                    record.push(cell);
                }
                writer.write_record(&record).map_err(|e| Error::csv(&path, e))?;
            }
            writer.flush().map_err(|e| Error::io(&path, e))?;
        }
        Ok(())
    }
}
