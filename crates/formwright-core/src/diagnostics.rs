//! Diagnostics for malformed but tolerable input
//!
//! Compilation and lenient record conversion never fail on these problems.
//! They are recorded here so the caller can surface them.

use crate::error::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of tolerated problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// A condition or cross-field rule names a field that is not in the form
    DanglingReference,
    /// `min` is greater than `max`
    ContradictoryBounds,
    /// Select field without options
    EmptyOptions,
    /// Column span moved into 1..=3
    ColumnsClamped,
    /// Name outside the identifier charset the extractor recognizes
    NonIdentifierName,
}

impl DiagnosticCode {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticCode::DanglingReference => Severity::Error,
            DiagnosticCode::ContradictoryBounds => Severity::Warning,
            DiagnosticCode::EmptyOptions => Severity::Warning,
            DiagnosticCode::ColumnsClamped => Severity::Info,
            DiagnosticCode::NonIdentifierName => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::DanglingReference => write!(f, "DanglingReference"),
            DiagnosticCode::ContradictoryBounds => write!(f, "ContradictoryBounds"),
            DiagnosticCode::EmptyOptions => write!(f, "EmptyOptions"),
            DiagnosticCode::ColumnsClamped => write!(f, "ColumnsClamped"),
            DiagnosticCode::NonIdentifierName => write!(f, "NonIdentifierName"),
        }
    }
}

/// A single recorded problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    /// JSON path of the offending value, e.g. `$[1].conditions[0].field`
    pub path: String,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} at {}: {}", self.severity, self.code, self.path, self.message)
    }
}

/// Collects diagnostics while records are converted and forms are compiled
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsTracker {
    items: Vec<Diagnostic>,
}

impl DiagnosticsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, code: DiagnosticCode, path: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            code,
            path: path.into(),
            message: message.into(),
            severity: code.severity(),
        };
        tracing::warn!(
            code = %diagnostic.code,
            path = %diagnostic.path,
            "{}",
            diagnostic.message
        );
        self.items.push(diagnostic);
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.items.iter().any(|d| d.code == code)
    }

    /// Highest severity recorded so far
    pub fn max_severity(&self) -> Option<Severity> {
        self.items.iter().map(|d| d.severity).max()
    }

    pub fn extend(&mut self, other: DiagnosticsTracker) {
        self.items.extend(other.items);
    }

    pub fn into_items(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_records_severity_from_code() {
        let mut tracker = DiagnosticsTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.max_severity(), None);

        tracker.add(DiagnosticCode::ColumnsClamped, "$[0].columns", "clamped 5 to 3");
        tracker.add(DiagnosticCode::DanglingReference, "$[1].conditions[0].field", "missing 'x'");

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.items()[0].severity, Severity::Info);
        assert_eq!(tracker.max_severity(), Some(Severity::Error));
        assert!(tracker.has_code(DiagnosticCode::DanglingReference));
        assert!(!tracker.has_code(DiagnosticCode::EmptyOptions));
    }

    #[test]
    fn test_diagnostic_display() {
        let mut tracker = DiagnosticsTracker::new();
        tracker.add(DiagnosticCode::EmptyOptions, "$[2].options", "select has no options");
        assert_eq!(
            tracker.items()[0].to_string(),
            "[warning] EmptyOptions at $[2].options: select has no options"
        );
    }
}
