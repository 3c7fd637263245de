use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong between reading raw result files and
/// writing the interpreted output.
#[derive(Debug, Error)]
pub enum Error {
    #[error("input directory {} cannot be found", .0.display())]
    InputMissing(PathBuf),
    #[error("input location {} is not a directory", .0.display())]
    InputNotADirectory(PathBuf),
    #[error("no suite configuration registered for {0}")]
    UnknownSuite(String),
    #[error("{}: invalid suite configuration: {}", .path.display(), .source)]
    InvalidRegistry {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{}: independent column {} missing from CSV header", .path.display(), .column)]
    MissingIndependentColumn { path: PathBuf, column: String },
    #[error("{}: row at line {} is too short for independent column {}", .path.display(), .line, .column)]
    RowMissingIndependentColumn {
        path: PathBuf,
        line: u64,
        column: String,
    },
    #[error("{}: row at line {} is too short for dependent column {}", .path.display(), .line, .column)]
    RowMissingDependentColumn {
        path: PathBuf,
        line: u64,
        column: String,
    },
    #[error("column {column}: value {value:?} is not a number")]
    ValueNotANumber { column: String, value: String },
    #[error("column {column}: independent value {value:?} is not an integer")]
    IndependentValueNotAnInteger { column: String, value: String },
    #[error("file name {} does not start with a step number", .0.display())]
    MissingStepNumber(PathBuf),
    #[error("file name {} starts with a step number that is too large", .0.display())]
    StepNumberOutOfRange(PathBuf),
    #[error("suite {suite}: metadata entry {key} is missing")]
    MissingSuiteInfo { suite: String, key: String },
    #[error("output location {} is not a directory", .0.display())]
    OutputNotADirectory(PathBuf),
    #[error("output directory {} already exists", .0.display())]
    OutputExists(PathBuf),
    #[error("{}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: io::Error },
    #[error("{}: {}", .path.display(), .source)]
    Csv { path: PathBuf, source: csv::Error },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
