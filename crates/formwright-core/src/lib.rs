//! Formwright Core - bidirectional compiler between form field schemas and component source
//!
//! A form is described as an ordered sequence of typed fields with
//! validation rules and visibility conditions. This crate turns that
//! description into a deterministic Formik + yup + antd component, and
//! recovers a rough field list from pasted source.
//!
//! # Main Components
//!
//! - **Types**: the typed field model ([`FieldSchema`], [`FormSchema`])
//! - **Records**: the persisted JSON shape and lenient conversion from it
//! - **Compiler**: validation chains and visibility expressions, with evaluation
//! - **Emitter**: escaping, deterministic rendering and balance checking
//! - **Extractor**: heuristic recovery of field stubs from text
//!
//! # Example
//!
//! ```no_run
//! use formwright_core::{generate_source, EmitterConfig, FieldKind, FieldSchema, FormSchema, Result};
//!
//! fn example() -> Result<()> {
//!     let schema = FormSchema::new(vec![
//!         FieldSchema::builder("email", FieldKind::Input).build()?,
//!     ])?;
//!     let generated = generate_source(&schema, &EmitterConfig::default())?;
//!     println!("{}", generated.source);
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod config;
pub mod design;
pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod record;
pub mod types;

// Re-export main types for convenience
pub use compiler::{
    compile_form, BaseRule, BoolExpr, ClauseKind, CompiledField, CompiledForm, ConditionCompiler,
    FormValue, FormValues, Operand, Predicate, RuleClause, ValidationChain, ValidationRuleCompiler,
    Visibility,
};
pub use config::{Config, EmitterConfig, SchemaConfig};
pub use design::{Design, DesignId, DESIGNS_STORAGE_KEY, FIELDS_STORAGE_KEY};
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticsTracker};
pub use emitter::{check_balance, CodeEmitter, GeneratedSource, StructureError};
pub use error::{Error, Result, Severity, StrictMode};
pub use extractor::{humanize_identifier, Extraction, ExtractionOutcome, ReverseExtractor};
pub use record::{ConditionRecord, CrossFieldRecord, FieldRecord, ValidationRecord};
pub use types::{
    Columns, ComparisonOp, Condition, FieldId, FieldKind, FieldSchema, FieldSchemaBuilder,
    FieldType, FormSchema, IdSource, LogicOp, RandomIds, SequentialIds, ValidationRule,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compile one field's validation settings
pub fn compile_validation(field_type: FieldType, rule: &ValidationRule) -> ValidationChain {
    ValidationRuleCompiler::new().compile(field_type, rule)
}

/// Compile one field's visibility conditions
pub fn compile_conditions(conditions: &[Condition]) -> Visibility {
    ConditionCompiler::new().compile(conditions)
}

/// Compile and emit `schema`; fails only on an invalid configuration
pub fn generate_source(schema: &FormSchema, config: &EmitterConfig) -> Result<GeneratedSource> {
    let span = logging::operation_span("generate");
    let _guard = span.enter();
    span.record("fields", schema.len() as u64);

    let emitter = CodeEmitter::new(config.clone())?;
    let compiled = compile_form(schema);
    let source = emitter.emit(&compiled);

    Ok(GeneratedSource {
        source,
        diagnostics: compiled.diagnostics.into_items(),
    })
}

/// Emit `schema` with the default configuration
pub fn emit_source(schema: &FormSchema) -> String {
    CodeEmitter::default().emit(&compile_form(schema))
}

/// Recover field stubs from arbitrary text, with random ids
pub fn extract_fields(text: &str) -> ExtractionOutcome {
    let span = logging::operation_span("extract");
    let _guard = span.enter();

    let outcome = ReverseExtractor::new().extract(text);
    if let Some(extraction) = outcome.extraction() {
        span.record("fields", extraction.schema.len() as u64);
    }
    outcome
}
