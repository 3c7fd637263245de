use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;

use crate::{
    error::{Error, Result},
    model::TestStepResultItem,
};

/// Raw observations: column name -> raw independent value -> every raw
/// dependent value seen for that combination.
type RawObservations = FxHashMap<String, FxHashMap<String, Vec<String>>>;

/// Extracts aggregate series from the raw CSV files of one test step.
///
/// Each file is expected to carry a header row naming the independent
/// variable column plus any number of dependent columns sharing a common
/// prefix. Rows from all files are pooled before aggregation, so splitting
/// observations over multiple files (e.g. one per run) does not change the
/// outcome.
#[derive(Debug, Clone)]
pub struct CsvExtractor {
    independent_name: String,
    dependent_prefix: String,
}

impl CsvExtractor {
    pub fn new(independent_name: impl Into<String>, dependent_prefix: impl Into<String>) -> Self {
        Self {
            independent_name: independent_name.into(),
            dependent_prefix: dependent_prefix.into(),
        }
    }

    /// Reads every file and reduces the pooled observations to one item per
    /// dependent column, holding the arithmetic mean of all observations per
    /// independent variable value.
    ///
    /// Items come back sorted by column name; files without any data rows
    /// contribute nothing.
    pub fn extract(&self, paths: &[PathBuf]) -> Result<Vec<TestStepResultItem>> {
        let mut observations = RawObservations::default();
        for path in paths {
            self.extract_file(path, &mut observations)?;
        }
        aggregate(observations)
    }

    fn extract_file(&self, path: &Path, observations: &mut RawObservations) -> Result<()> {
        tracing::debug!("extracting {}", path.display());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::csv(path, e))?;
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record.map_err(|e| Error::csv(path, e))?,
            // A file without even a header row carries no observations.
            None => return Ok(()),
        };
        let independent_index = header
            .iter()
            .position(|column| column == self.independent_name)
            .ok_or_else(|| Error::MissingIndependentColumn {
                path: path.to_path_buf(),
                column: self.independent_name.clone(),
            })?;
        let dependent_columns: Vec<(usize, &str)> = header
            .iter()
            .enumerate()
            .filter(|(_, column)| column.starts_with(&self.dependent_prefix))
            .collect();

        for record in records {
            let record = record.map_err(|e| Error::csv(path, e))?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let independent_value = record.get(independent_index).ok_or_else(|| {
                Error::RowMissingIndependentColumn {
                    path: path.to_path_buf(),
                    line,
                    column: self.independent_name.clone(),
                }
            })?;
            for (index, column) in &dependent_columns {
                let value =
                    record
                        .get(*index)
                        .ok_or_else(|| Error::RowMissingDependentColumn {
                            path: path.to_path_buf(),
                            line,
                            column: (*column).to_string(),
                        })?;
                observations
                    .entry((*column).to_string())
                    .or_default()
                    .entry(independent_value.to_string())
                    .or_default()
                    .push(value.to_string());
            }
        }
        Ok(())
    }
}

/// Converts pooled raw observations into mean values keyed by the integer
/// independent variable value.
///
/// Raw independent values that spell the same integer differently (such as
/// `01` and `1`) end up in the same pool before the mean is taken.
fn aggregate(observations: RawObservations) -> Result<Vec<TestStepResultItem>> {
    let mut columns: Vec<(String, FxHashMap<String, Vec<String>>)> =
        observations.into_iter().collect();
    columns.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut items = Vec::with_capacity(columns.len());
    for (name, by_value) in columns {
        let mut pooled: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
        for (raw_key, raw_values) in by_value {
            let key: i64 =
                raw_key
                    .parse()
                    .map_err(|_| Error::IndependentValueNotAnInteger {
                        column: name.clone(),
                        value: raw_key.clone(),
                    })?;
            let values = pooled.entry(key).or_default();
            for raw in raw_values {
                let value: f64 = raw.parse().map_err(|_| Error::ValueNotANumber {
                    column: name.clone(),
                    value: raw.clone(),
                })?;
                values.push(value);
            }
        }
        let means = pooled
            .into_iter()
            .map(|(key, values)| (key, values.iter().sum::<f64>() / values.len() as f64))
            .collect();
        items.push(TestStepResultItem::new(name, means));
    }
    Ok(items)
}
