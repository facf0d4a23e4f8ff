//! Test corpus management for golden tests

use crate::{GoldenError, Result};
use formwright_core::{EmitterConfig, StrictMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A test case in the corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Name of the test case
    pub name: String,

    /// Category/group of the test
    pub category: String,

    pub input: TestInput,

    /// Expected behavior configuration
    pub expectations: TestExpectations,

    /// Test metadata
    pub metadata: TestMetadata,
}

/// Input for a test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestInput {
    /// Field records, or the name of a sibling `.json` file holding them
    pub fields: Value,

    /// How record conversion treats tolerable problems
    #[serde(default)]
    pub mode: StrictMode,

    /// Emitter settings; defaults when absent
    #[serde(default)]
    pub emitter: Option<EmitterConfig>,
}

/// Expected behavior for a test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestExpectations {
    /// Whether building the schema should succeed
    pub should_succeed: bool,

    /// Expected error pattern if should_succeed is false
    #[serde(default)]
    pub error_pattern: Option<String>,

    /// Diagnostic codes, in order, from loading and compiling
    #[serde(default)]
    pub expected_diagnostics: Vec<String>,

    /// Whether extraction from the emitted source must recover every name
    #[serde(default = "default_true")]
    pub round_trip: bool,
}

/// Metadata about a test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestMetadata {
    /// Description of what this tests
    pub description: String,

    /// Tags for categorization
    #[serde(default)]
    pub tags: Vec<String>,

    /// Whether this test is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Priority level (lower = higher priority)
    #[serde(default = "default_priority")]
    pub priority: u32,
}

fn default_true() -> bool {
    true
}

fn default_priority() -> u32 {
    100
}

/// Manages the test corpus
pub struct CorpusManager {
    corpus_dir: PathBuf,
}

impl CorpusManager {
    pub fn new(corpus_dir: impl AsRef<Path>) -> Self {
        Self {
            corpus_dir: corpus_dir.as_ref().to_path_buf(),
        }
    }

    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    /// Discover all test cases in the corpus
    pub fn discover_tests(&self) -> Result<Vec<TestCase>> {
        let mut tests = Vec::new();

        if !self.corpus_dir.exists() {
            return Ok(tests);
        }

        for entry in WalkDir::new(&self.corpus_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() && path.file_name() == Some(std::ffi::OsStr::new("test.json")) {
                match self.load_test_case(path) {
                    Ok(test_case) => tests.push(test_case),
                    Err(e) => {
                        eprintln!("Warning: Failed to load test case {:?}: {}", path, e);
                    }
                }
            }
        }

        // Stable sort keeps file-name order within a priority
        tests.sort_by_key(|t| t.metadata.priority);

        Ok(tests)
    }

    /// Load a specific test case
    pub fn load_test_case(&self, path: &Path) -> Result<TestCase> {
        let content = fs::read_to_string(path)?;
        let mut test_case: TestCase = serde_json::from_str(&content)?;

        let test_dir = path.parent().ok_or_else(|| {
            GoldenError::CorpusError(format!("Test case path has no parent: {:?}", path))
        })?;

        if let Value::String(ref filename) = test_case.input.fields {
            if filename.ends_with(".json") {
                let input_content = fs::read_to_string(test_dir.join(filename))?;
                test_case.input.fields = serde_json::from_str(&input_content)?;
            }
        }

        Ok(test_case)
    }

    /// Filter tests by category
    pub fn filter_by_category(&self, tests: Vec<TestCase>, category: &str) -> Vec<TestCase> {
        tests
            .into_iter()
            .filter(|t| t.category == category || category == "*")
            .collect()
    }

    /// Filter tests by tags
    pub fn filter_by_tags(&self, tests: Vec<TestCase>, tags: &[String]) -> Vec<TestCase> {
        if tags.is_empty() {
            return tests;
        }

        tests
            .into_iter()
            .filter(|t| tags.iter().any(|tag| t.metadata.tags.contains(tag)))
            .collect()
    }

    /// Get enabled tests only
    pub fn filter_enabled(&self, tests: Vec<TestCase>) -> Vec<TestCase> {
        tests.into_iter().filter(|t| t.metadata.enabled).collect()
    }

    /// Create the corpus directory structure
    pub fn init_corpus(&self) -> Result<()> {
        let dirs = ["basic", "conditions", "validation", "invalid", "regression"];

        for dir in &dirs {
            fs::create_dir_all(self.corpus_dir.join(dir))?;
        }

        self.create_sample_test()?;

        Ok(())
    }

    fn create_sample_test(&self) -> Result<()> {
        let test_dir = self.corpus_dir.join("basic/single-input");
        fs::create_dir_all(&test_dir)?;

        let test_case = TestCase {
            name: "single-input".to_string(),
            category: "basic".to_string(),
            input: TestInput {
                fields: serde_json::json!([
                    {
                        "name": "email",
                        "label": "Email",
                        "type": "input",
                        "validation": { "required": true }
                    }
                ]),
                mode: StrictMode::Warn,
                emitter: None,
            },
            expectations: TestExpectations {
                should_succeed: true,
                error_pattern: None,
                expected_diagnostics: vec![],
                round_trip: true,
            },
            metadata: TestMetadata {
                description: "One required text input".to_string(),
                tags: vec!["basic".to_string(), "smoke".to_string()],
                enabled: true,
                priority: 1,
            },
        };

        let content = serde_json::to_string_pretty(&test_case)?;
        fs::write(test_dir.join("test.json"), content)?;

        Ok(())
    }

    /// List all test categories
    pub fn list_categories(&self) -> Result<Vec<String>> {
        let mut categories = Vec::new();

        if !self.corpus_dir.exists() {
            return Ok(categories);
        }

        for entry in fs::read_dir(&self.corpus_dir)? {
            let path = entry?.path();

            if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                    if name != "snapshots" {
                        categories.push(name.to_string());
                    }
                }
            }
        }

        categories.sort();
        Ok(categories)
    }

    /// Get statistics about the corpus
    pub fn get_statistics(&self) -> Result<CorpusStatistics> {
        let tests = self.discover_tests()?;

        let mut stats = CorpusStatistics {
            total_tests: tests.len(),
            ..Default::default()
        };

        for test in tests {
            if test.metadata.enabled {
                stats.enabled_tests += 1;
            } else {
                stats.disabled_tests += 1;
            }

            *stats.tests_by_category.entry(test.category).or_insert(0) += 1;

            for tag in test.metadata.tags {
                *stats.tests_by_tag.entry(tag).or_insert(0) += 1;
            }
        }

        Ok(stats)
    }
}

/// Statistics about the test corpus
#[derive(Debug, Default)]
pub struct CorpusStatistics {
    pub total_tests: usize,
    pub enabled_tests: usize,
    pub disabled_tests: usize,
    pub tests_by_category: HashMap<String, usize>,
    pub tests_by_tag: HashMap<String, usize>,
}

impl CorpusStatistics {
    /// Print statistics to stdout
    pub fn print(&self) {
        println!("=== Corpus Statistics ===");
        println!("Total tests: {}", self.total_tests);
        println!("Enabled: {}", self.enabled_tests);
        println!("Disabled: {}", self.disabled_tests);

        if !self.tests_by_category.is_empty() {
            println!("\nTests by category:");
            let mut categories: Vec<_> = self.tests_by_category.iter().collect();
            categories.sort_by_key(|(k, _)| k.as_str());
            for (category, count) in categories {
                println!("  {}: {}", category, count);
            }
        }

        if !self.tests_by_tag.is_empty() {
            println!("\nTests by tag:");
            let mut tags: Vec<_> = self.tests_by_tag.iter().collect();
            tags.sort_by_key(|(k, _)| k.as_str());
            for (tag, count) in tags {
                println!("  {}: {}", tag, count);
            }
        }
    }
}
