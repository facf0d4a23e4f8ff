//! Persisted field records and their conversion to the typed model
//!
//! Records mirror the JSON the builder front end stores: camelCase keys,
//! empty strings standing in for absent patterns and messages, and options
//! present on every field regardless of type.

use crate::diagnostics::{DiagnosticCode, DiagnosticsTracker};
use crate::error::{Error, Result, StrictMode};
use crate::types::{
    Columns, ComparisonOp, Condition, FieldId, FieldKind, FieldSchema, FieldType, FormSchema,
    LogicOp, ValidationRule,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Option list written for fields that carry no options of their own
pub const DEFAULT_OPTIONS: &[&str] = &["Option 1"];

/// Stored shape of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub columns: Option<i64>,
    #[serde(default)]
    pub validation: ValidationRecord,
    #[serde(default)]
    pub conditions: Vec<ConditionRecord>,
    #[serde(default)]
    pub group: Option<String>,
}

fn default_field_type() -> FieldType {
    FieldType::Input
}

/// Stored validation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationRecord {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<String>,
    pub custom_message: Option<String>,
    pub cross_field: Option<CrossFieldRecord>,
}

/// Cross-field reference, stored either as `{"field": "x"}` or as `"x"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrossFieldRecord {
    Ref { field: String },
    Name(String),
}

impl CrossFieldRecord {
    pub fn field(&self) -> &str {
        match self {
            CrossFieldRecord::Ref { field } => field,
            CrossFieldRecord::Name(field) => field,
        }
    }
}

/// Stored visibility condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRecord {
    /// Missing or null means AND
    #[serde(default)]
    pub logic: Option<LogicOp>,
    #[serde(default)]
    pub field: String,
    #[serde(default = "default_operator")]
    pub operator: ComparisonOp,
    #[serde(default)]
    pub value: String,
}

fn default_operator() -> ComparisonOp {
    ComparisonOp::Eq
}

/// True when `name` only uses characters the reverse extractor can recover
pub fn is_identifier_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// Fail in strict mode, record a diagnostic otherwise
fn tolerate(
    mode: StrictMode,
    tracker: &mut DiagnosticsTracker,
    code: DiagnosticCode,
    path: String,
    message: String,
) -> Result<()> {
    match mode {
        StrictMode::Strict => Err(Error::validation(path, message, None)),
        StrictMode::Warn => {
            tracker.add(code, path, message);
            Ok(())
        }
    }
}

impl FieldRecord {
    /// Convert into a typed field; `path` prefixes error and diagnostic paths
    pub fn to_field(
        &self,
        path: &str,
        mode: StrictMode,
        tracker: &mut DiagnosticsTracker,
    ) -> Result<FieldSchema> {
        if self.name.trim().is_empty() {
            return Err(Error::validation(
                format!("{}.name", path),
                "Field name cannot be empty",
                Some("non-empty identifier"),
            ));
        }

        if !is_identifier_name(&self.name) {
            tolerate(
                mode,
                tracker,
                DiagnosticCode::NonIdentifierName,
                format!("{}.name", path),
                format!("Field name '{}' is not a plain identifier", self.name),
            )?;
        }

        if self.field_type == FieldType::Select && self.options.is_empty() {
            tolerate(
                mode,
                tracker,
                DiagnosticCode::EmptyOptions,
                format!("{}.options", path),
                format!("Select field '{}' has no options", self.name),
            )?;
        }

        let columns = match self.columns {
            None => Columns::default(),
            Some(span) => match Columns::new(span) {
                Some(columns) => columns,
                None => {
                    let clamped = Columns::clamped(span);
                    tolerate(
                        mode,
                        tracker,
                        DiagnosticCode::ColumnsClamped,
                        format!("{}.columns", path),
                        format!("Column span {} moved to {}", span, clamped.get()),
                    )?;
                    clamped
                }
            },
        };

        if let Some(index) = self.conditions.iter().position(|c| c.field == self.name) {
            return Err(Error::validation(
                format!("{}.conditions[{}].field", path, index),
                format!("Field '{}' has a condition on itself", self.name),
                Some("a different field of the same form"),
            ));
        }

        let validation = ValidationRule {
            required: self.validation.required,
            min: self.validation.min,
            max: self.validation.max,
            pattern: non_empty(&self.validation.pattern),
            custom_message: non_empty(&self.validation.custom_message),
            cross_field: self
                .validation
                .cross_field
                .as_ref()
                .map(|c| c.field().to_string())
                .filter(|f| !f.is_empty()),
        };

        let conditions = self
            .conditions
            .iter()
            .map(|c| Condition {
                logic: c.logic.unwrap_or_default(),
                field: c.field.clone(),
                operator: c.operator,
                value: c.value.clone(),
            })
            .collect();

        let mut builder = FieldSchema::builder(
            self.name.clone(),
            FieldKind::from_type(self.field_type, self.options.clone()),
        )
        .columns(columns)
        .validation(validation)
        .conditions(conditions);

        if let Some(id) = self.id.as_ref().filter(|id| !id.is_empty()) {
            builder = builder.id(FieldId::new(id.clone()));
        }
        if let Some(label) = &self.label {
            builder = builder.label(label.clone());
        }
        if let Some(group) = &self.group {
            builder = builder.group(group.clone());
        }

        builder.build()
    }
}

impl From<&FieldSchema> for FieldRecord {
    fn from(field: &FieldSchema) -> Self {
        let rule = field.validation();
        let options = match field.kind() {
            FieldKind::Select { options } => options.clone(),
            _ => DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect(),
        };

        FieldRecord {
            id: Some(field.id().to_string()),
            name: field.name().to_string(),
            label: Some(field.label().to_string()),
            field_type: field.field_type(),
            options,
            columns: Some(i64::from(field.columns().get())),
            validation: ValidationRecord {
                required: rule.required,
                min: rule.min,
                max: rule.max,
                pattern: Some(rule.pattern.clone().unwrap_or_default()),
                custom_message: Some(rule.custom_message.clone().unwrap_or_default()),
                cross_field: rule
                    .cross_field
                    .as_ref()
                    .map(|f| CrossFieldRecord::Ref { field: f.clone() }),
            },
            conditions: field
                .conditions()
                .iter()
                .map(|c| ConditionRecord {
                    logic: Some(c.logic),
                    field: c.field.clone(),
                    operator: c.operator,
                    value: c.value.clone(),
                })
                .collect(),
            group: field.group().map(str::to_string),
        }
    }
}

impl FormSchema {
    /// Convert stored records into a validated schema
    pub fn from_records(
        records: &[FieldRecord],
        mode: StrictMode,
        tracker: &mut DiagnosticsTracker,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let path = format!("$[{}]", index);
            let field = record.to_field(&path, mode, tracker)?;
            if !seen.insert(field.name().to_string()) {
                return Err(Error::validation(
                    format!("{}.name", path),
                    format!("Duplicate field name '{}'", field.name()),
                    Some("unique field names"),
                ));
            }
            fields.push(field);
        }

        tracing::debug!(fields = fields.len(), mode = %mode, "Loaded field records");
        Ok(FormSchema::from_unique(fields))
    }

    /// Parse a JSON array of field records
    pub fn from_json(
        json: &str,
        mode: StrictMode,
        tracker: &mut DiagnosticsTracker,
    ) -> Result<Self> {
        let records: Vec<FieldRecord> = serde_json::from_str(json)?;
        Self::from_records(&records, mode, tracker)
    }

    pub fn to_records(&self) -> Vec<FieldRecord> {
        self.iter().map(FieldRecord::from).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_records())?)
    }
}
