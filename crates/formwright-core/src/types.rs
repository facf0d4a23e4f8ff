//! Core types for the Formwright field model
//!
//! A form is an ordered [`FormSchema`] of [`FieldSchema`] values. Field kinds
//! form a closed set; options only exist on select fields. Invariants are
//! enforced when values are built, so compilers can take them as given.

use crate::error::{Error, Result};
use crate::extractor::humanize_identifier;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Opaque, immutable field identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Random v4 UUID identifier
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of identifiers for newly created fields
pub trait IdSource {
    fn next_id(&mut self) -> FieldId;
}

/// Random UUIDs, the default for interactive use
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> FieldId {
        FieldId::random()
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... identifiers
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> FieldId {
        let id = FieldId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Wire-level field type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Input,
    Number,
    Select,
    Checkbox,
    Textarea,
    Date,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Input,
        FieldType::Number,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::Textarea,
        FieldType::Date,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Input => "input",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Textarea => "textarea",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of field kinds with their type-specific data
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Input,
    Number,
    Select { options: Vec<String> },
    Checkbox,
    Textarea,
    Date,
}

impl FieldKind {
    /// Build a kind from its tag; `options` is discarded for non-select kinds
    pub fn from_type(field_type: FieldType, options: Vec<String>) -> Self {
        match field_type {
            FieldType::Input => FieldKind::Input,
            FieldType::Number => FieldKind::Number,
            FieldType::Select => FieldKind::Select { options },
            FieldType::Checkbox => FieldKind::Checkbox,
            FieldType::Textarea => FieldKind::Textarea,
            FieldType::Date => FieldKind::Date,
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Input => FieldType::Input,
            FieldKind::Number => FieldType::Number,
            FieldKind::Select { .. } => FieldType::Select,
            FieldKind::Checkbox => FieldType::Checkbox,
            FieldKind::Textarea => FieldType::Textarea,
            FieldKind::Date => FieldType::Date,
        }
    }

    /// Select options, empty for every other kind
    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::Select { options } => options,
            _ => &[],
        }
    }
}

/// Grid span of a field, always within 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Columns(u8);

impl Columns {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub fn new(span: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&span) {
            Some(Self(span as u8))
        } else {
            None
        }
    }

    pub fn clamped(span: i64) -> Self {
        Self(span.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

/// Validation configuration for one field
///
/// `min` and `max` mean magnitude for numbers and length for strings; the
/// compiler does not distinguish. `custom_message` only applies to the
/// required clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationRule {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<String>,
    pub custom_message: Option<String>,
    pub cross_field: Option<String>,
}

/// How a condition joins the result accumulated before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogicOp {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicOp::And => f.write_str("AND"),
            LogicOp::Or => f.write_str("OR"),
        }
    }
}

/// Comparison applied between a runtime value and a condition value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "contains")]
    Contains,
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOp::Eq => f.write_str("=="),
            ComparisonOp::Ne => f.write_str("!="),
            ComparisonOp::Gt => f.write_str(">"),
            ComparisonOp::Lt => f.write_str("<"),
            ComparisonOp::Contains => f.write_str("contains"),
        }
    }
}

/// Visibility condition against another field's runtime value
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Ignored for the first condition of a sequence
    pub logic: LogicOp,
    pub field: String,
    pub operator: ComparisonOp,
    pub value: String,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: ComparisonOp, value: impl Into<String>) -> Self {
        Self {
            logic: LogicOp::And,
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn with_logic(mut self, logic: LogicOp) -> Self {
        self.logic = logic;
        self
    }
}

/// One declared form field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    id: FieldId,
    name: String,
    label: String,
    kind: FieldKind,
    columns: Columns,
    validation: ValidationRule,
    conditions: Vec<Condition>,
    group: Option<String>,
}

impl FieldSchema {
    pub fn builder(name: impl Into<String>, kind: FieldKind) -> FieldSchemaBuilder {
        FieldSchemaBuilder::new(name, kind)
    }

    pub fn id(&self) -> &FieldId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn columns(&self) -> Columns {
        self.columns
    }

    pub fn validation(&self) -> &ValidationRule {
        &self.validation
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

/// Builder for [`FieldSchema`]
#[derive(Debug, Clone)]
pub struct FieldSchemaBuilder {
    id: Option<FieldId>,
    name: String,
    label: Option<String>,
    kind: FieldKind,
    columns: Columns,
    validation: ValidationRule,
    conditions: Vec<Condition>,
    group: Option<String>,
}

impl FieldSchemaBuilder {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            label: None,
            kind,
            columns: Columns::default(),
            validation: ValidationRule::default(),
            conditions: Vec::new(),
            group: None,
        }
    }

    pub fn id(mut self, id: FieldId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn columns(mut self, columns: Columns) -> Self {
        self.columns = columns;
        self
    }

    pub fn validation(mut self, validation: ValidationRule) -> Self {
        self.validation = validation;
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Validate and build the field
    pub fn build(self) -> Result<FieldSchema> {
        if self.name.trim().is_empty() {
            return Err(Error::validation(
                "name",
                "Field name cannot be empty",
                Some("non-empty identifier"),
            ));
        }

        if let Some(index) = self.conditions.iter().position(|c| c.field == self.name) {
            return Err(Error::validation(
                format!("conditions[{}].field", index),
                format!("Field '{}' has a condition on itself", self.name),
                Some("a different field of the same form"),
            ));
        }

        let label = self
            .label
            .unwrap_or_else(|| humanize_identifier(&self.name));

        Ok(FieldSchema {
            id: self.id.unwrap_or_else(FieldId::random),
            name: self.name,
            label,
            kind: self.kind,
            columns: self.columns,
            validation: self.validation,
            conditions: self.conditions,
            group: self.group,
        })
    }
}

/// Ordered field sequence with unique names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSchema {
    fields: Vec<FieldSchema>,
}

impl FormSchema {
    /// Build a schema, rejecting duplicate names
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (index, field) in fields.iter().enumerate() {
            if !seen.insert(field.name()) {
                return Err(Error::validation(
                    format!("$[{}].name", index),
                    format!("Duplicate field name '{}'", field.name()),
                    Some("unique field names"),
                ));
            }
        }
        Ok(Self { fields })
    }

    /// Callers guarantee unique names
    pub(crate) fn from_unique(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSchema> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(FieldSchema::name).collect()
    }
}

impl<'a> IntoIterator for &'a FormSchema {
    type Item = &'a FieldSchema;
    type IntoIter = std::slice::Iter<'a, FieldSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
