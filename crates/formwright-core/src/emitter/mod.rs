//! Source emitter
//!
//! Renders a [`CompiledForm`] into a single Formik + yup + antd component.
//! Output depends only on the compiled form and the [`EmitterConfig`]:
//! no timestamps, no ids, fields in declaration order. Every interpolated
//! user string goes through [`escape`].

pub mod escape;
pub mod expr;
pub mod structure;
pub mod widgets;
pub mod writer;

pub use structure::{check_balance, StructureError};
pub use writer::SourceWriter;

use crate::compiler::{CompiledField, CompiledForm};
use crate::config::EmitterConfig;
use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::types::FieldType;
use escape::{js_string, jsx_attr, jsx_text, object_key};

const IMPORTS: &[&str] = &[
    "import React from 'react';",
    "import { Formik, Form, Field } from 'formik';",
    "import * as yup from 'yup';",
    "import { Input, InputNumber, Select, Checkbox, DatePicker, Button } from 'antd';",
];

/// Emitted source together with the diagnostics gathered on the way
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSource {
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders compiled forms into component source
#[derive(Debug, Clone)]
pub struct CodeEmitter {
    config: EmitterConfig,
}

impl Default for CodeEmitter {
    fn default() -> Self {
        Self {
            config: EmitterConfig::default(),
        }
    }
}

impl CodeEmitter {
    pub fn new(config: EmitterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn emit(&self, form: &CompiledForm<'_>) -> String {
        let mut w = SourceWriter::new(self.config.indent_width);

        for import in IMPORTS {
            w.line(import);
        }
        w.blank();

        self.write_validation_schema(&mut w, form);
        w.blank();

        w.line(format!("export default function {}() {{", self.config.component_name));
        w.nested(|w| {
            w.line("return (");
            w.nested(|w| {
                w.line("<Formik");
                w.nested(|w| {
                    self.write_initial_values(w, form);
                    w.line("validationSchema={validationSchema}");
                    w.line("onSubmit={(values) => console.log('submit', values)}");
                });
                w.line(">");
                w.nested(|w| {
                    w.line("{({ handleSubmit, values }) => (");
                    w.nested(|w| {
                        w.line("<Form onSubmit={handleSubmit}>");
                        w.nested(|w| {
                            for compiled in &form.fields {
                                self.write_field_block(w, compiled);
                            }
                            w.line(format!(
                                "<Button type=\"primary\" htmlType=\"submit\">{}</Button>",
                                jsx_text(&self.config.submit_label)
                            ));
                        });
                        w.line("</Form>");
                    });
                    w.line(")}");
                });
                w.line("</Formik>");
            });
            w.line(");");
        });
        w.line("}");

        let source = w.finish();
        tracing::debug!(
            fields = form.fields.len(),
            bytes = source.len(),
            component = %self.config.component_name,
            "Emitted form source"
        );
        source
    }

    fn write_validation_schema(&self, w: &mut SourceWriter, form: &CompiledForm<'_>) {
        w.line("const validationSchema = yup.object().shape({");
        w.nested(|w| {
            let last = form.fields.len().saturating_sub(1);
            for (index, compiled) in form.fields.iter().enumerate() {
                w.line(format!(
                    "{}: {}{}",
                    object_key(compiled.field.name()),
                    compiled.validation,
                    if index < last { "," } else { "" }
                ));
            }
        });
        w.line("});");
    }

    fn write_initial_values(&self, w: &mut SourceWriter, form: &CompiledForm<'_>) {
        w.line("initialValues={{");
        w.nested(|w| {
            let last = form.fields.len().saturating_sub(1);
            for (index, compiled) in form.fields.iter().enumerate() {
                let initial = match compiled.field.field_type() {
                    FieldType::Checkbox => "false".to_string(),
                    _ => js_string(""),
                };
                w.line(format!(
                    "{}: {}{}",
                    object_key(compiled.field.name()),
                    initial,
                    if index < last { "," } else { "" }
                ));
            }
        });
        w.line("}}");
    }

    fn write_field_block(&self, w: &mut SourceWriter, compiled: &CompiledField<'_>) {
        let field = compiled.field;
        w.line(format!(
            "<div style={{{{ marginBottom: 12 }}}} {}>",
            jsx_attr("key", field.name())
        ));
        w.nested(|w| {
            w.line(format!(
                "<label style={{{{ display: 'block', marginBottom: 6 }}}}>{}</label>",
                jsx_text(field.label())
            ));
            match compiled.visibility.expr() {
                None => widgets::render_widget(w, field),
                Some(expr) => {
                    w.line(format!("{{({}) && (", expr));
                    w.nested(|w| widgets::render_widget(w, field));
                    w.line(")}");
                }
            }
        });
        w.line("</div>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_form;
    use crate::types::{ComparisonOp, Condition, FieldKind, FieldSchema, FormSchema, ValidationRule};
    use pretty_assertions::assert_eq;

    fn contact_schema() -> FormSchema {
        FormSchema::new(vec![
            FieldSchema::builder("first_name", FieldKind::Input)
                .validation(ValidationRule {
                    required: true,
                    ..Default::default()
                })
                .build()
                .unwrap(),
            FieldSchema::builder("subscribe", FieldKind::Checkbox)
                .condition(Condition::new("first_name", ComparisonOp::Contains, "a"))
                .build()
                .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_emit_full_layout() {
        let schema = contact_schema();
        let source = CodeEmitter::default().emit(&compile_form(&schema));
        let expected = r#"import React from 'react';
import { Formik, Form, Field } from 'formik';
import * as yup from 'yup';
import { Input, InputNumber, Select, Checkbox, DatePicker, Button } from 'antd';

const validationSchema = yup.object().shape({
  first_name: yup.string().required("Required"),
  subscribe: yup.boolean()
});

export default function GeneratedForm() {
  return (
    <Formik
      initialValues={{
        first_name: "",
        subscribe: false
      }}
      validationSchema={validationSchema}
      onSubmit={(values) => console.log('submit', values)}
    >
      {({ handleSubmit, values }) => (
        <Form onSubmit={handleSubmit}>
          <div style={{ marginBottom: 12 }} key="first_name">
            <label style={{ display: 'block', marginBottom: 6 }}>First Name</label>
            <Field name="first_name">{({ field }) => (<Input {...field} />)}</Field>
          </div>
          <div style={{ marginBottom: 12 }} key="subscribe">
            <label style={{ display: 'block', marginBottom: 6 }}>Subscribe</label>
            {(String(values.first_name ?? "").includes("a")) && (
              <Field type="checkbox" name="subscribe">{({ field }) => (<Checkbox {...field} checked={field.value} />)}</Field>
            )}
          </div>
          <Button type="primary" htmlType="submit">Submit</Button>
        </Form>
      )}
    </Formik>
  );
}
"#;
        assert_eq!(source, expected);
    }

    #[test]
    fn test_emit_is_deterministic_and_balanced() {
        let schema = contact_schema();
        let emitter = CodeEmitter::default();
        let first = emitter.emit(&compile_form(&schema));
        let second = emitter.emit(&compile_form(&schema));
        assert_eq!(first, second);
        assert_eq!(check_balance(&first), Ok(()));
    }

    #[test]
    fn test_hostile_strings_stay_balanced() {
        let schema = FormSchema::new(vec![
            FieldSchema::builder("x", FieldKind::Select {
                options: vec!["\"})}<".to_string(), "it's".to_string()],
            })
            .label("</label>{oops}")
            .validation(ValidationRule {
                required: true,
                pattern: Some("^(a|b\"$".to_string()),
                custom_message: Some("'); alert(1); ('".to_string()),
                ..Default::default()
            })
            .build()
            .unwrap(),
        ])
        .unwrap();

        let source = CodeEmitter::default().emit(&compile_form(&schema));
        assert_eq!(check_balance(&source), Ok(()));
        assert!(source.contains(r#"<label style={{ display: 'block', marginBottom: 6 }}>{"</label>{oops}"}</label>"#));
        assert!(source.contains(r#".required("\'); alert(1); (\'")"#));
    }

    #[test]
    fn test_custom_config() {
        let emitter = CodeEmitter::new(EmitterConfig {
            component_name: "SignupForm".to_string(),
            indent_width: 4,
            submit_label: "Sign up!".to_string(),
        })
        .unwrap();
        let source = emitter.emit(&compile_form(&FormSchema::empty()));
        assert!(source.contains("export default function SignupForm() {\n    return (\n"));
        assert!(source.contains("<Button type=\"primary\" htmlType=\"submit\">Sign up!</Button>"));
        assert!(source.contains("const validationSchema = yup.object().shape({\n});\n"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EmitterConfig {
            indent_width: 0,
            ..Default::default()
        };
        assert!(CodeEmitter::new(config).is_err());
    }
}
