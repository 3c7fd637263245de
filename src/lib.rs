//! Aggregation of raw benchmark results produced by the evaluation test
//! suites: raw per-run CSV files go in, mean values per independent
//! variable value come out, as CSV tables and pgfplots coordinate lists.

pub mod error;
pub mod extractor;
pub mod interpreter;
pub mod model;
pub mod runner;
pub mod suites;
pub mod writer;

pub use error::{Error, Result};
