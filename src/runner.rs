use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{bail, ensure, Context};

/// Name of the Gradle wrapper script on this platform.
fn gradle_wrapper_name() -> &'static str {
    if cfg!(windows) {
        "gradlew.bat"
    } else {
        "gradlew"
    }
}

/// Locates the Gradle wrapper of the project under test.
///
/// With an explicit project root the wrapper must sit directly inside it.
/// Without one, the current working directory and each of its parents are
/// checked in turn, so the tool can be started from anywhere inside the
/// project tree.
pub fn find_gradle_wrapper(project_root: Option<&Path>) -> anyhow::Result<PathBuf> {
    let name = gradle_wrapper_name();
    if let Some(root) = project_root {
        let candidate = root.join(name);
        ensure!(
            candidate.is_file(),
            "no {} found in {}",
            name,
            root.display()
        );
        return Ok(candidate);
    }

    let start =
        std::env::current_dir().context("cannot determine the current working directory")?;
    let mut dir = start.as_path();
    loop {
        let candidate = dir.join(name);
        tracing::debug!("probing {}", candidate.display());
        if candidate.is_file() {
            return Ok(candidate);
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => bail!(
                "cannot find {} in {} or any of its parents",
                name,
                start.display()
            ),
        }
    }
}

/// Drives the external Gradle build that executes the test suites and
/// produces the raw result files.
pub struct TestSuiteRunner {
    gradle: PathBuf,
}

impl TestSuiteRunner {
    pub fn new(project_root: Option<&Path>) -> anyhow::Result<Self> {
        Ok(Self {
            gradle: find_gradle_wrapper(project_root)?,
        })
    }

    /// Runs the given Gradle task restricted to tests matching
    /// `test_pattern`, directing the raw CSV output to `output_dir`.
    ///
    /// The task is always rerun, even when Gradle considers it up to date,
    /// since repeated executions are the whole point of measuring.
    pub fn run_task(&self, output_dir: &Path, task: &str, test_pattern: &str) -> anyhow::Result<()> {
        tracing::info!("running {} for tests {}", task, test_pattern);
        let project_dir = self.gradle.parent().unwrap_or_else(|| Path::new("."));
        let status = Command::new(&self.gradle)
            .args(task_args(output_dir, task, test_pattern))
            .current_dir(project_dir)
            .status()
            .with_context(|| format!("failed to execute {}", self.gradle.display()))?;
        ensure!(
            status.success(),
            "{} exited with {} while running {}",
            self.gradle.display(),
            status,
            test_pattern
        );
        Ok(())
    }
}

fn task_args(output_dir: &Path, task: &str, test_pattern: &str) -> Vec<String> {
    vec![
        task.to_string(),
        "--rerun-tasks".to_string(),
        format!("-DoutDir={}", output_dir.display()),
        "--tests".to_string(),
        test_pattern.to_string(),
    ]
}
