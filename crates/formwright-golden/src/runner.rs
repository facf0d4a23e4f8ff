//! Golden test runner for executing snapshot tests

use crate::{
    corpus::{CorpusManager, CorpusStatistics, TestCase},
    diff::DiffEngine,
    snapshot::SnapshotManager,
    GoldenConfig, GoldenError, Result,
};
use colored::*;
use formwright_core::{
    check_balance, generate_source, DiagnosticsTracker, FieldRecord, FormSchema, ReverseExtractor,
    SequentialIds,
};
use regex::Regex;
use std::time::Instant;

/// Result of running a golden test
#[derive(Debug)]
pub struct TestResult {
    /// `category/name` of the test
    pub name: String,

    /// Whether the test passed
    pub passed: bool,

    /// Error message if failed
    pub error: Option<String>,

    /// Diff output if comparison failed
    pub diff: Option<String>,

    /// Execution time in milliseconds
    pub duration_ms: u64,

    /// Whether snapshot was written
    pub updated: bool,
}

impl TestResult {
    /// Print the test result
    pub fn print(&self, verbose: bool) {
        let status = if self.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!("{} {} ({}ms)", status, self.name, self.duration_ms);

        if let Some(ref error) = self.error {
            println!("  {}: {}", "Error".red(), error);
        }

        if verbose || !self.passed {
            if let Some(ref diff) = self.diff {
                println!("{}", diff);
            }
        }

        if self.updated {
            println!("  {}", "Snapshot updated".yellow());
        }
    }
}

/// Outcome of one executed case: passed, diff, snapshot written
type Execution = (bool, Option<String>, bool);

/// Runner for golden tests
pub struct GoldenTestRunner {
    config: GoldenConfig,
    corpus_manager: CorpusManager,
    snapshot_manager: SnapshotManager,
}

impl GoldenTestRunner {
    pub fn new(config: GoldenConfig) -> Self {
        let corpus_manager = CorpusManager::new(&config.corpus_dir);
        let snapshot_manager = SnapshotManager::new(&config.snapshot_dir);

        Self {
            config,
            corpus_manager,
            snapshot_manager,
        }
    }

    /// Run a single test by `category/name`
    pub fn run_test(&self, test_name: &str) -> Result<TestResult> {
        let test_result = self.run_named(test_name);

        if self.config.verbose {
            test_result.print(true);
        }

        if test_result.passed {
            Ok(test_result)
        } else {
            let mut message = format!(
                "Test '{}' failed: {}",
                test_name,
                test_result.error.as_deref().unwrap_or("Unknown error")
            );
            if let Some(diff) = &test_result.diff {
                message.push('\n');
                message.push_str(diff);
            }
            Err(GoldenError::TestFailed(message))
        }
    }

    fn run_named(&self, test_name: &str) -> TestResult {
        let start = Instant::now();

        let test_path = self.config.corpus_dir.join(test_name).join("test.json");
        let result = self
            .corpus_manager
            .load_test_case(&test_path)
            .and_then(|test_case| self.execute_test(&test_case));

        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok((passed, diff, updated)) => TestResult {
                name: test_name.to_string(),
                passed,
                error: if passed {
                    None
                } else {
                    Some("Snapshot mismatch".to_string())
                },
                diff,
                duration_ms,
                updated,
            },
            Err(e) => TestResult {
                name: test_name.to_string(),
                passed: false,
                error: Some(e.to_string()),
                diff: None,
                duration_ms,
                updated: false,
            },
        }
    }

    /// Run every test whose name or category contains `pattern`; `*` runs all
    pub fn run_batch(&self, pattern: &str) -> Result<Vec<TestResult>> {
        let tests = self.corpus_manager.discover_tests()?;

        let filtered_tests: Vec<_> = if pattern == "*" {
            tests
        } else {
            tests
                .into_iter()
                .filter(|t| t.name.contains(pattern) || t.category.contains(pattern))
                .collect()
        };

        if filtered_tests.is_empty() {
            return Err(GoldenError::CorpusError(format!(
                "No tests found matching pattern '{}'",
                pattern
            )));
        }

        println!("Running {} tests...\n", filtered_tests.len());

        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        for test_case in filtered_tests {
            let result = self.run_named(&format!("{}/{}", test_case.category, test_case.name));

            if result.passed {
                passed += 1;
            } else {
                failed += 1;
            }

            result.print(self.config.verbose);
            results.push(result);
        }

        println!("\n{}", "=== Test Summary ===".bold());
        println!(
            "{}: {} passed, {} failed",
            "Results".bold(),
            passed.to_string().green(),
            failed.to_string().red()
        );

        if failed > 0 {
            Err(GoldenError::TestFailed(format!("{} test(s) failed", failed)))
        } else {
            Ok(results)
        }
    }

    fn execute_test(&self, test_case: &TestCase) -> Result<Execution> {
        if !test_case.metadata.enabled {
            return Ok((true, None, false));
        }

        let records: Vec<FieldRecord> = serde_json::from_value(test_case.input.fields.clone())?;
        let mut tracker = DiagnosticsTracker::new();
        let built = FormSchema::from_records(&records, test_case.input.mode, &mut tracker);

        let expectations = &test_case.expectations;
        let schema = match (built, expectations.should_succeed) {
            (Ok(schema), true) => schema,
            (Ok(_), false) => {
                return Err(GoldenError::TestFailed(
                    "Expected the field records to be rejected".to_string(),
                ))
            }
            (Err(e), true) => return Err(GoldenError::Core(e)),
            (Err(e), false) => {
                Self::check_error_pattern(expectations.error_pattern.as_deref(), &e.to_string())?;
                return Ok((true, None, false));
            }
        };

        let emitter_config = test_case.input.emitter.clone().unwrap_or_default();
        let generated = generate_source(&schema, &emitter_config)?;

        let again = generate_source(&schema, &emitter_config)?;
        if again.source != generated.source {
            return Err(GoldenError::TestFailed(
                "Emitting the same schema twice produced different text".to_string(),
            ));
        }

        check_balance(&generated.source)
            .map_err(|e| GoldenError::TestFailed(format!("Emitted source is unbalanced: {}", e)))?;

        let actual_diagnostics: Vec<String> = tracker
            .items()
            .iter()
            .chain(generated.diagnostics.iter())
            .map(|d| d.code.to_string())
            .collect();
        if actual_diagnostics != expectations.expected_diagnostics {
            return Err(GoldenError::TestFailed(format!(
                "Expected diagnostics {:?}, got {:?}",
                expectations.expected_diagnostics, actual_diagnostics
            )));
        }

        if expectations.round_trip {
            let recovered = ReverseExtractor::with_ids(SequentialIds::new("golden"))
                .extract(&generated.source)
                .into_schema()
                .unwrap_or_default();
            if recovered.names() != schema.names() {
                return Err(GoldenError::TestFailed(format!(
                    "Extraction recovered {:?}, expected {:?}",
                    recovered.names(),
                    schema.names()
                )));
            }
        }

        self.compare_snapshot(test_case, &generated.source)
    }

    fn check_error_pattern(pattern: Option<&str>, message: &str) -> Result<()> {
        let Some(pattern) = pattern else {
            return Ok(());
        };

        let regex = Regex::new(pattern)
            .map_err(|e| GoldenError::CorpusError(format!("Invalid error pattern: {}", e)))?;
        if regex.is_match(message) {
            Ok(())
        } else {
            Err(GoldenError::TestFailed(format!(
                "Error '{}' does not match pattern '{}'",
                message, pattern
            )))
        }
    }

    fn compare_snapshot(&self, test_case: &TestCase, source: &str) -> Result<Execution> {
        let snapshot_name = format!("{}/{}", test_case.category, test_case.name);

        if !self.snapshot_manager.exists(&snapshot_name) {
            if self.config.create_missing || self.config.update_snapshots {
                self.snapshot_manager.create(
                    &snapshot_name,
                    source,
                    Some(test_case.metadata.description.clone()),
                )?;

                return Ok((true, None, true));
            }

            return Err(GoldenError::SnapshotMismatch(format!(
                "Snapshot '{}' does not exist. Run with UPDATE_GOLDEN=1 to create it.",
                snapshot_name
            )));
        }

        let snapshot = self.snapshot_manager.load(&snapshot_name)?;
        let diff_engine = DiffEngine::new(self.config.diff_options.clone());
        let diff_result = diff_engine.compare(&snapshot.content, source);

        if diff_result.matches {
            Ok((true, None, false))
        } else if self.config.update_snapshots {
            self.snapshot_manager.backup(&snapshot_name)?;
            self.snapshot_manager.update(&snapshot_name, source)?;
            Ok((true, Some(diff_result.diff_output), true))
        } else {
            Ok((false, Some(diff_result.diff_output), false))
        }
    }

    /// Initialize the corpus with sample tests
    pub fn init_corpus(&self) -> Result<()> {
        self.corpus_manager.init_corpus()
    }

    /// List all available tests as `category/name`
    pub fn list_tests(&self) -> Result<Vec<String>> {
        let tests = self.corpus_manager.discover_tests()?;
        Ok(tests
            .into_iter()
            .map(|t| format!("{}/{}", t.category, t.name))
            .collect())
    }

    pub fn get_statistics(&self) -> Result<CorpusStatistics> {
        self.corpus_manager.get_statistics()
    }
}
