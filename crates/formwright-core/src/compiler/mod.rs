//! Schema compilers
//!
//! Validation settings become [`ValidationChain`]s and visibility conditions
//! become [`Visibility`] expressions. Compilation never fails; problems that
//! the output tolerates (dangling references, contradictory bounds, empty
//! select options) are reported through [`DiagnosticsTracker`].

pub mod ast;
pub mod condition;
pub mod eval;
pub mod validation;

pub use ast::{
    BaseRule, BoolExpr, ClauseKind, Operand, Predicate, RuleClause, ValidationChain, Visibility,
};
pub use condition::ConditionCompiler;
pub use eval::{FormValue, FormValues};
pub use validation::ValidationRuleCompiler;

use crate::diagnostics::{DiagnosticCode, DiagnosticsTracker};
use crate::types::{FieldKind, FieldSchema, FormSchema};

/// One field together with its compiled expressions
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledField<'a> {
    pub field: &'a FieldSchema,
    pub validation: ValidationChain,
    pub visibility: Visibility,
}

/// Every field of a form compiled, in declaration order
#[derive(Debug, Clone)]
pub struct CompiledForm<'a> {
    pub fields: Vec<CompiledField<'a>>,
    pub diagnostics: DiagnosticsTracker,
}

impl<'a> CompiledForm<'a> {
    pub fn get(&self, name: &str) -> Option<&CompiledField<'a>> {
        self.fields.iter().find(|c| c.field.name() == name)
    }

    /// Names of fields whose visibility holds for `values`
    pub fn visible_fields(&self, values: &FormValues) -> Vec<&'a str> {
        self.fields
            .iter()
            .filter(|c| c.visibility.is_visible(values))
            .map(|c| c.field.name())
            .collect()
    }
}

/// Compile every field of `schema`
pub fn compile_form(schema: &FormSchema) -> CompiledForm<'_> {
    let rules = ValidationRuleCompiler::new();
    let conditions = ConditionCompiler::new();
    let mut diagnostics = DiagnosticsTracker::new();

    let fields: Vec<CompiledField<'_>> = schema
        .iter()
        .enumerate()
        .map(|(index, field)| {
            check_field(schema, index, field, &mut diagnostics);
            CompiledField {
                field,
                validation: rules.compile(field.field_type(), field.validation()),
                visibility: conditions.compile(field.conditions()),
            }
        })
        .collect();

    tracing::debug!(
        fields = fields.len(),
        conditional = fields.iter().filter(|c| !c.visibility.is_always()).count(),
        diagnostics = diagnostics.len(),
        "Compiled form"
    );

    CompiledForm { fields, diagnostics }
}

fn check_field(
    schema: &FormSchema,
    index: usize,
    field: &FieldSchema,
    diagnostics: &mut DiagnosticsTracker,
) {
    for (position, condition) in field.conditions().iter().enumerate() {
        if !schema.contains(&condition.field) {
            diagnostics.add(
                DiagnosticCode::DanglingReference,
                format!("$[{}].conditions[{}].field", index, position),
                format!(
                    "Condition on '{}' references unknown field '{}'",
                    field.name(),
                    condition.field
                ),
            );
        }
    }

    let rule = field.validation();
    if let Some(other) = rule.cross_field.as_deref() {
        if !schema.contains(other) {
            diagnostics.add(
                DiagnosticCode::DanglingReference,
                format!("$[{}].validation.crossField", index),
                format!(
                    "Cross-field rule on '{}' references unknown field '{}'",
                    field.name(),
                    other
                ),
            );
        }
    }

    if let (Some(min), Some(max)) = (rule.min, rule.max) {
        if min > max {
            diagnostics.add(
                DiagnosticCode::ContradictoryBounds,
                format!("$[{}].validation", index),
                format!("min {} is greater than max {} on '{}'", min, max, field.name()),
            );
        }
    }

    if let FieldKind::Select { options } = field.kind() {
        if options.is_empty() {
            diagnostics.add(
                DiagnosticCode::EmptyOptions,
                format!("$[{}].options", index),
                format!("Select field '{}' has no options", field.name()),
            );
        }
    }
}
