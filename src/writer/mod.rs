pub mod coordinates;
pub mod csv;

use std::{fs, path::Path};

use crate::{
    error::{Error, Result},
    model::TestSuiteResult,
};

pub use self::coordinates::CoordinateRenderer;
pub use self::csv::CsvRenderer;

/// Renders the interpreted results of one suite beneath its freshly created
/// output directory.
pub trait ResultRenderer {
    fn render(&self, suite_dir: &Path, result: &TestSuiteResult) -> Result<()>;
}

/// Writes one suite result with the given renderer.
///
/// Creates `<output_root>/<suite name>/` and its `info.txt` before handing
/// over to the renderer. The suite directory must not exist yet; a previous
/// interpretation is never overwritten.
pub fn write_result(
    renderer: &dyn ResultRenderer,
    output_root: &Path,
    result: &TestSuiteResult,
) -> Result<()> {
    if output_root.exists() && !output_root.is_dir() {
        return Err(Error::OutputNotADirectory(output_root.to_path_buf()));
    }
    let suite_dir = output_root.join(&result.suite_name);
    if suite_dir.exists() {
        return Err(Error::OutputExists(suite_dir));
    }
    fs::create_dir_all(&suite_dir).map_err(|e| Error::io(&suite_dir, e))?;

    write_suite_info(&suite_dir, result)?;
    renderer.render(&suite_dir, result)?;
    tracing::info!("saved {}", suite_dir.display());
    Ok(())
}

/// `info.txt` carries the suite metadata as `key=value` lines.
fn write_suite_info(suite_dir: &Path, result: &TestSuiteResult) -> Result<()> {
    let path = suite_dir.join("info.txt");
    let mut contents = String::new();
    for (key, value) in &result.suite_info {
        contents.push_str(key);
        contents.push('=');
        contents.push_str(value);
        contents.push('\n');
    }
    fs::write(&path, contents).map_err(|e| Error::io(path, e))
}

/// Writes every suite result in every supported output format, each format
/// under its own subdirectory of the output root.
pub struct AggregateWriter {
    outputs: Vec<(&'static str, Box<dyn ResultRenderer>)>,
}

impl AggregateWriter {
    pub fn new() -> Self {
        Self {
            outputs: vec![
                ("tikz", Box::new(CoordinateRenderer)),
                ("csv", Box::new(CsvRenderer)),
            ],
        }
    }

    pub fn write_results(&self, output_root: &Path, results: &[TestSuiteResult]) -> Result<()> {
        for result in results {
            for (subdir, renderer) in &self.outputs {
                write_result(renderer.as_ref(), &output_root.join(subdir), result)?;
            }
        }
        Ok(())
    }
}

impl Default for AggregateWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats an aggregate value so that whole numbers keep a trailing `.0`,
/// making the column recognizable as a mean.
fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
