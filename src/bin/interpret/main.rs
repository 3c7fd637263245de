// std
use std::path::{Path, PathBuf};
// crates
use chrono::Local;
use clap::Parser;
// internal
use evalrunner::interpreter::ResultInterpreter;
use evalrunner::suites::SuiteRegistry;
use evalrunner::writer::AggregateWriter;

/// Interprets raw evaluation results
/// Aggregates every run directory beneath the input directory and writes
/// the results as CSV tables and pgfplots coordinate lists
#[derive(Parser)]
pub struct InterpreterApp {
    /// Directory holding the raw `<timestamp>_<SuiteName>` run directories
    input_dir: PathBuf,
    /// Output directory, a timestamped directory inside the input directory
    /// by default
    #[clap(long, short)]
    output: Option<PathBuf>,
    /// Json file with suite configurations, replacing the built-in registry
    #[clap(long)]
    suites: Option<PathBuf>,
}

impl InterpreterApp {
    pub fn run(self) -> anyhow::Result<()> {
        let Self {
            input_dir,
            output,
            suites,
        } = self;
        let registry = match suites {
            Some(path) => SuiteRegistry::from_json_file(path)?,
            None => SuiteRegistry::builtin(),
        };
        let output = output.unwrap_or_else(|| default_output_dir(&input_dir));

        let results = ResultInterpreter::new(&input_dir, registry).interpret_results()?;
        AggregateWriter::new().write_results(&output, &results)?;
        tracing::info!(
            "{} suite(s) interpreted into {}",
            results.len(),
            output.display()
        );
        Ok(())
    }
}

fn default_output_dir(input_dir: &Path) -> PathBuf {
    input_dir.join(format!(
        "_interpretation_{}",
        Local::now().format("%Y%m%d%H%M%S")
    ))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let app: InterpreterApp = InterpreterApp::parse();
    if let Err(e) = app.run() {
        tracing::error!("error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
