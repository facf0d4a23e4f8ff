//! Line diff of emitted source against a snapshot

use crate::{GoldenError, Result};
use colored::*;
use regex::Regex;
use similar::{ChangeTag, TextDiff};

const MASK: &str = "***MASKED***";

/// Options for diff comparison
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Whether to use colored output
    pub colored: bool,

    /// Context lines to show around changes
    pub context_lines: usize,

    /// Whether to show every line or only changes with context
    pub full_diff: bool,

    /// Maximum diff lines to show (0 = unlimited)
    pub max_diff_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            colored: true,
            context_lines: 3,
            full_diff: false,
            max_diff_lines: 100,
        }
    }
}

/// Result of a diff operation
#[derive(Debug)]
pub struct DiffResult {
    /// Whether the texts match after masking
    pub matches: bool,

    /// Human-readable diff output
    pub diff_output: String,

    pub summary: DiffSummary,
}

/// Summary of diff changes
#[derive(Debug, Default, PartialEq)]
pub struct DiffSummary {
    /// Number of added lines
    pub added: usize,

    /// Number of removed lines
    pub removed: usize,

    /// 1-based line of the expected text where the first change starts
    pub first_difference: Option<usize>,
}

/// Engine for comparing source text
pub struct DiffEngine {
    options: DiffOptions,
    volatile_patterns: Vec<Regex>,
}

impl DiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            volatile_patterns: Vec::new(),
        }
    }

    /// Mask every match of `pattern` on both sides before comparing
    pub fn add_volatile_pattern(&mut self, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern)
            .map_err(|e| GoldenError::CorpusError(format!("Invalid regex pattern: {}", e)))?;

        self.volatile_patterns.push(regex);
        Ok(())
    }

    /// Compare two texts line by line
    pub fn compare(&self, expected: &str, actual: &str) -> DiffResult {
        let expected = self.mask_volatile(expected);
        let actual = self.mask_volatile(actual);

        if expected == actual {
            return DiffResult {
                matches: true,
                diff_output: String::new(),
                summary: DiffSummary::default(),
            };
        }

        let text_diff = TextDiff::from_lines(expected.as_str(), actual.as_str());

        DiffResult {
            matches: false,
            diff_output: self.generate_diff_output(&text_diff),
            summary: Self::collect_diff_summary(&text_diff),
        }
    }

    fn generate_diff_output<'a>(&self, text_diff: &TextDiff<'a, 'a, 'a, str>) -> String {
        let mut output = String::new();

        if self.options.colored {
            output.push_str(&"=== Diff Output ===\n".bold().to_string());
        } else {
            output.push_str("=== Diff Output ===\n");
        }

        let groups = if self.options.full_diff {
            vec![text_diff.ops().to_vec()]
        } else {
            text_diff.grouped_ops(self.options.context_lines)
        };

        let mut line_count = 0;

        for (index, group) in groups.iter().enumerate() {
            if index > 0 {
                output.push_str("...\n");
            }

            for op in group {
                for change in text_diff.iter_changes(op) {
                    if self.options.max_diff_lines > 0 && line_count >= self.options.max_diff_lines {
                        output.push_str("... (diff truncated) ...\n");
                        return output;
                    }

                    let line = match change.tag() {
                        ChangeTag::Delete if self.options.colored => {
                            format!("{}{}", "-".red(), change.to_string().red())
                        }
                        ChangeTag::Delete => format!("-{}", change),
                        ChangeTag::Insert if self.options.colored => {
                            format!("{}{}", "+".green(), change.to_string().green())
                        }
                        ChangeTag::Insert => format!("+{}", change),
                        ChangeTag::Equal => format!(" {}", change),
                    };

                    output.push_str(&line);
                    line_count += 1;
                }
            }
        }

        output
    }

    fn collect_diff_summary<'a>(text_diff: &TextDiff<'a, 'a, 'a, str>) -> DiffSummary {
        let mut summary = DiffSummary::default();

        for change in text_diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Delete => summary.removed += 1,
                ChangeTag::Insert => summary.added += 1,
                ChangeTag::Equal => continue,
            }

            if summary.first_difference.is_none() {
                summary.first_difference = Some(match change.old_index() {
                    Some(index) => index + 1,
                    None => change.new_index().map(|i| i + 1).unwrap_or(1),
                });
            }
        }

        summary
    }

    fn mask_volatile(&self, text: &str) -> String {
        let mut masked = text.to_string();
        for pattern in &self.volatile_patterns {
            masked = pattern.replace_all(&masked, MASK).into_owned();
        }
        masked
    }

    /// Create a simple text diff for error messages
    pub fn simple_diff(&self, expected: &str, actual: &str) -> String {
        let diff = TextDiff::from_lines(expected, actual);
        let mut output = String::new();

        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            output.push_str(&format!("{}{}", sign, change));
        }

        output
    }
}
