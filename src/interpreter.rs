use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use glob::{glob, Pattern};
use walkdir::WalkDir;

use crate::{
    error::{Error, Result},
    extractor::CsvExtractor,
    model::{TestStepResult, TestSuiteResult},
    suites::SuiteRegistry,
};

/// Turns a tree of raw run directories into per-suite aggregate results.
///
/// The input directory is expected to contain one subdirectory per suite
/// execution, named `<digits>_<SuiteName>` (the digits are typically a
/// timestamp). Each of those holds one CSV file per test step, named after
/// the step number. Results from repeated executions of the same suite are
/// pooled before aggregation.
pub struct ResultInterpreter {
    input_dir: PathBuf,
    registry: SuiteRegistry,
}

impl ResultInterpreter {
    pub fn new(input_dir: impl Into<PathBuf>, registry: SuiteRegistry) -> Self {
        Self {
            input_dir: input_dir.into(),
            registry,
        }
    }

    /// Scans the input directory for run directories and aggregates their
    /// contents, one result per suite, sorted by suite name.
    pub fn interpret_results(&self) -> Result<Vec<TestSuiteResult>> {
        if !self.input_dir.exists() {
            return Err(Error::InputMissing(self.input_dir.clone()));
        }
        if !self.input_dir.is_dir() {
            return Err(Error::InputNotADirectory(self.input_dir.clone()));
        }

        let mut run_dirs = Vec::new();
        for entry in WalkDir::new(&self.input_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| walk_error(&self.input_dir, e))?;
            // Symlinked run directories count as directories here.
            if !entry.path().is_dir() {
                continue;
            }
            if is_run_dir_name(&entry.file_name().to_string_lossy()) {
                run_dirs.push(entry.into_path());
            }
        }
        run_dirs.sort();

        self.process_directories(&run_dirs)
    }

    fn process_directories(&self, run_dirs: &[PathBuf]) -> Result<Vec<TestSuiteResult>> {
        // Group the run directories by the suite they belong to.
        let mut dirs_by_suite: BTreeMap<String, Vec<&Path>> = BTreeMap::new();
        for dir in run_dirs {
            if let Some(suite_name) = suite_name_of(dir) {
                dirs_by_suite.entry(suite_name).or_default().push(dir);
            }
        }

        let mut results = Vec::with_capacity(dirs_by_suite.len());
        for (suite_name, suite_dirs) in dirs_by_suite {
            let config = self.registry.get(&suite_name)?;
            let extractor =
                CsvExtractor::new(&config.independent_variable, config.dependent_prefix());
            let steps = process_suite_directories(&suite_dirs, &extractor)?;
            tracing::info!(
                "interpreted {} with {} step(s) from {} run(s)",
                suite_name,
                steps.len(),
                suite_dirs.len()
            );

            let suite_info = vec![
                ("suiteName".to_string(), suite_name.clone()),
                ("prefix".to_string(), config.dependent_prefix().to_string()),
                (
                    "independentVariable".to_string(),
                    config.independent_variable.clone(),
                ),
            ];
            results.push(TestSuiteResult {
                suite_name,
                steps,
                suite_info,
            });
        }
        Ok(results)
    }
}

/// Pools the CSV files of all run directories of one suite by step number
/// and aggregates each pool.
fn process_suite_directories(
    suite_dirs: &[&Path],
    extractor: &CsvExtractor,
) -> Result<Vec<TestStepResult>> {
    let mut files_by_step: BTreeMap<u64, Vec<PathBuf>> = BTreeMap::new();
    for dir in suite_dirs {
        let pattern = format!("{}/*.csv", Pattern::escape(&dir.display().to_string()));
        let entries = glob(&pattern)
            .map_err(|e| Error::io(*dir, io::Error::new(io::ErrorKind::InvalidInput, e)))?;
        for entry in entries {
            let file = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                Error::io(path, e.into_error())
            })?;
            let step_number = step_number_of(&file)?;
            files_by_step.entry(step_number).or_default().push(file);
        }
    }

    files_by_step
        .into_iter()
        .map(|(step_number, files)| {
            let result_items = extractor.extract(&files)?;
            Ok(TestStepResult {
                step_number,
                result_items,
            })
        })
        .collect()
}

/// A run directory is named `<digits>_<SuiteName>`.
fn is_run_dir_name(name: &str) -> bool {
    match name.split_once('_') {
        Some((timestamp, suite)) => {
            !timestamp.is_empty()
                && timestamp.chars().all(|c| c.is_ascii_digit())
                && suite.chars().next().is_some_and(is_word_char)
        }
        None => false,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The suite identifier is everything after the first underscore of the
/// directory name.
fn suite_name_of(dir: &Path) -> Option<String> {
    dir.file_name()?
        .to_str()?
        .split_once('_')
        .map(|(_, suite)| suite.to_string())
}

/// The step number is the run of digits a result file's name starts with.
fn step_number_of(file: &Path) -> Result<u64> {
    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let digits: String = stem.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(Error::MissingStepNumber(file.to_path_buf()));
    }
    // A non-empty digit run can only fail to parse by overflowing.
    digits
        .parse()
        .map_err(|_| Error::StepNumberOutOfRange(file.to_path_buf()))
}

fn walk_error(input_dir: &Path, e: walkdir::Error) -> Error {
    let path = e
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input_dir.to_path_buf());
    match e.into_io_error() {
        Some(source) => Error::io(path, source),
        None => Error::io(path, io::Error::new(io::ErrorKind::Other, "walk failed")),
    }
}
