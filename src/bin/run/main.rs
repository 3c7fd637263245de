// std
use std::path::PathBuf;
// crates
use chrono::Local;
use clap::Parser;
// internal
use evalrunner::interpreter::ResultInterpreter;
use evalrunner::runner::TestSuiteRunner;
use evalrunner::suites::SuiteRegistry;
use evalrunner::writer::{self, CoordinateRenderer};

/// Runs the evaluation test suites through Gradle and interprets their
/// results in one go
/// Raw CSV files end up in `<dir>/raw`, coordinate lists in `<dir>/out`
#[derive(Parser)]
pub struct RunnerApp {
    /// Working directory for this measurement session
    #[clap(long, short)]
    dir: PathBuf,
    /// Append a `run_<timestamp>` component to the working directory
    #[clap(long)]
    current_datetime: bool,
    /// Gradle task that executes the test suites
    #[clap(long, short)]
    task: String,
    /// Test filter passed to Gradle via `--tests`
    #[clap(long, short = 'e', default_value = "*")]
    tests: String,
    /// How often to execute the suites before interpreting
    #[clap(long, short, default_value_t = 1)]
    num: u32,
    /// Json file with suite configurations, replacing the built-in registry
    #[clap(long)]
    suites: Option<PathBuf>,
}

impl RunnerApp {
    pub fn run(self) -> anyhow::Result<()> {
        let Self {
            dir,
            current_datetime,
            task,
            tests,
            num,
            suites,
        } = self;
        let registry = match suites {
            Some(path) => SuiteRegistry::from_json_file(path)?,
            None => SuiteRegistry::builtin(),
        };

        // Gradle runs with the project as working directory, so the output
        // path has to be absolute before it goes onto the command line.
        let mut work_dir = std::path::absolute(dir)?;
        if current_datetime {
            work_dir = work_dir.join(format!("run_{}", Local::now().format("%Y%m%d%H%M%S")));
        }
        let raw_dir = work_dir.join("raw");
        let out_dir = work_dir.join("out");

        let runner = TestSuiteRunner::new(None)?;
        for run_count in 1..=num {
            tracing::info!("run {} of {}", run_count, num);
            runner.run_task(&raw_dir, &task, &tests)?;
        }

        let results = ResultInterpreter::new(&raw_dir, registry).interpret_results()?;
        for result in &results {
            writer::write_result(&CoordinateRenderer, &out_dir, result)?;
        }
        tracing::info!("coordinate lists written to {}", out_dir.display());
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let app: RunnerApp = RunnerApp::parse();
    if let Err(e) = app.run() {
        tracing::error!("error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
