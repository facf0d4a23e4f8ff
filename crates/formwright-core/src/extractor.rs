//! Reverse extraction of field stubs from pasted source
//!
//! This is a scan, not a parser. Every `name="..."`, `name='...'` or
//! `name={"..."}` assignment contributes one input stub, in order of first
//! appearance. If the text mentions a numeric widget anywhere, every stub
//! becomes a number field.

use crate::types::{FieldKind, FieldSchema, FormSchema, IdSource, RandomIds};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Widget tags recognized in pasted text
pub const WIDGET_TAGS: [&str; 6] = [
    "Input",
    "InputNumber",
    "Select",
    "Checkbox",
    "DatePicker",
    "TextArea",
];

/// Tag whose presence forces every stub to a number field
pub const NUMERIC_WIDGET_TAG: &str = "InputNumber";

static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn name_pattern() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| {
        Regex::new(
            r#"name\s*=\s*(?:"([A-Za-z0-9_-]+)"|'([A-Za-z0-9_-]+)'|\{\s*"([A-Za-z0-9_-]+)"\s*\})"#,
        )
        .expect("Valid regex pattern")
    })
}

/// Fields recovered from text
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub schema: FormSchema,
    /// Recognized widget tags, in [`WIDGET_TAGS`] order
    pub detected_widgets: Vec<&'static str>,
    /// Whether the numeric widget forced every stub to `number`
    pub forced_numeric: bool,
}

/// Result of scanning a text
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Recognized(Extraction),
    /// No `name=` assignment found; not the same as an empty form
    NothingRecognized,
}

impl ExtractionOutcome {
    pub fn is_recognized(&self) -> bool {
        matches!(self, ExtractionOutcome::Recognized(_))
    }

    pub fn extraction(&self) -> Option<&Extraction> {
        match self {
            ExtractionOutcome::Recognized(extraction) => Some(extraction),
            ExtractionOutcome::NothingRecognized => None,
        }
    }

    pub fn into_schema(self) -> Option<FormSchema> {
        match self {
            ExtractionOutcome::Recognized(extraction) => Some(extraction.schema),
            ExtractionOutcome::NothingRecognized => None,
        }
    }
}

/// Heuristic extractor with an injectable id source
#[derive(Debug, Clone, Default)]
pub struct ReverseExtractor<I = RandomIds> {
    ids: I,
}

impl ReverseExtractor<RandomIds> {
    pub fn new() -> Self {
        Self { ids: RandomIds }
    }
}

impl<I: IdSource> ReverseExtractor<I> {
    pub fn with_ids(ids: I) -> Self {
        Self { ids }
    }

    /// Distinct assigned names in order of first appearance
    pub fn scan_names(text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        name_pattern()
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
            .map(|m| m.as_str())
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }

    /// Widget tags mentioned anywhere in the text, ignoring case
    pub fn scan_widgets(text: &str) -> Vec<&'static str> {
        let lowered = text.to_lowercase();
        WIDGET_TAGS
            .iter()
            .copied()
            .filter(|tag| lowered.contains(&tag.to_lowercase()))
            .collect()
    }

    pub fn extract(&mut self, text: &str) -> ExtractionOutcome {
        let names = Self::scan_names(text);
        if names.is_empty() {
            tracing::debug!(bytes = text.len(), "No field names recognized");
            return ExtractionOutcome::NothingRecognized;
        }

        let detected_widgets = Self::scan_widgets(text);
        let forced_numeric = detected_widgets.contains(&NUMERIC_WIDGET_TAG);

        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            let kind = if forced_numeric {
                FieldKind::Number
            } else {
                FieldKind::Input
            };
            match FieldSchema::builder(name, kind).id(self.ids.next_id()).build() {
                Ok(field) => fields.push(field),
                Err(e) => tracing::warn!(error = %e, "Skipping unusable field stub"),
            }
        }

        tracing::debug!(
            fields = fields.len(),
            widgets = ?detected_widgets,
            forced_numeric,
            "Extracted field stubs"
        );

        ExtractionOutcome::Recognized(Extraction {
            schema: FormSchema::from_unique(fields),
            detected_widgets,
            forced_numeric,
        })
    }
}

/// `first_name` → `First Name`, `zip-code` → `Zip Code`
///
/// Underscores and hyphens become spaces, then every ASCII word character
/// that starts a word is uppercased.
pub fn humanize_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for c in name.chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric();
        if is_word && !in_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        in_word = is_word;
    }
    out
}
