use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use schemata::{Environment, FileTransport};

use crate::{CaseFile, Group, TestFailure, TestResults};

/// Remote documents live in this subdirectory and are never run as cases.
const REMOTES: &str = "remotes";

pub struct TestRunner {
    cases_dir: PathBuf,
    environment: Environment,
}

impl TestRunner {
    pub fn new(cases_dir: impl Into<PathBuf>) -> Self {
        let cases_dir = cases_dir.into();
        let environment =
            Environment::draft4().with_transport(FileTransport::new(cases_dir.join(REMOTES)));
        Self {
            cases_dir,
            environment,
        }
    }

    pub fn cases_dir(&self) -> &Path {
        &self.cases_dir
    }

    /// Discover and run all test cases
    pub fn run_all(&self) -> Result<TestResults> {
        let mut results = TestResults::new();
        for file in self.discover_test_files()? {
            results.merge(self.run_file(&file));
        }
        Ok(results)
    }

    /// Discover all case files, sorted by path.
    pub fn discover_test_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        self.walk_directory(&self.cases_dir, &mut files)?;
        files.sort();
        Ok(files)
    }

    fn walk_directory(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                if path != self.cases_dir.join(REMOTES) {
                    self.walk_directory(&path, files)?;
                }
            } else if path.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(path);
            }
        }

        Ok(())
    }

    /// The name of a case file relative to the cases directory, without
    /// extension.
    pub fn name_of(&self, path: &Path) -> String {
        path.strip_prefix(&self.cases_dir)
            .unwrap_or(path)
            .with_extension("")
            .display()
            .to_string()
    }

    /// Run every group of one case file. A file that cannot be loaded counts
    /// as a single failure.
    pub fn run_file(&self, path: &Path) -> TestResults {
        let name = self.name_of(path);
        let mut results = TestResults::new();
        match CaseFile::load(path) {
            Ok(case_file) => {
                for group in &case_file.groups {
                    self.run_group(&name, group, &mut results);
                }
            }
            Err(e) => results.add_failure(TestFailure::new(
                name,
                format!("Failed to load case file: {e:#}"),
            )),
        }
        results
    }

    /// Each group builds into its own clone so cached remotes never leak
    /// between groups.
    fn run_group(&self, file: &str, group: &Group, results: &mut TestResults) {
        let schema = match self.environment.clone().build_value("", &group.schema) {
            Ok(schema) => schema,
            Err(e) => {
                for test in &group.tests {
                    results.add_failure(TestFailure::new(
                        format!("{file}: {} / {}", group.description, test.description),
                        format!("Failed to build schema: {e}"),
                    ));
                }
                return;
            }
        };

        for test in &group.tests {
            let test_name = format!("{file}: {} / {}", group.description, test.description);
            match (schema.validate(&test.data), test.valid) {
                (Ok(()), true) | (Err(_), false) => results.add_pass(),
                (Err(e), true) => results.add_failure(TestFailure::new(
                    test_name,
                    format!("expected {} to be valid:\n{e}", test.data),
                )),
                (Ok(()), false) => results.add_failure(TestFailure::new(
                    test_name,
                    format!("expected {} to be invalid, but no errors were reported", test.data),
                )),
            }
        }
    }
}
