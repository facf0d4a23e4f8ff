//! Widget blocks for the six field kinds

use super::escape::{js_string, jsx_attr, jsx_text};
use super::writer::SourceWriter;
use crate::types::{FieldKind, FieldSchema};

const FULL_WIDTH: &str = "style={{ width: '100%' }}";

/// Write the widget lines for `field` at the writer's current level
pub fn render_widget(writer: &mut SourceWriter, field: &FieldSchema) {
    let name_attr = jsx_attr("name", field.name());
    let set_value = |params: &str, value: &str| {
        format!(
            "onChange={{({}) => form.setFieldValue({}, {})}}",
            params,
            js_string(field.name()),
            value
        )
    };

    match field.kind() {
        FieldKind::Input => {
            writer.line(format!(
                "<Field {}>{{({{ field }}) => (<Input {{...field}} />)}}</Field>",
                name_attr
            ));
        }
        FieldKind::Textarea => {
            writer.line(format!(
                "<Field {}>{{({{ field }}) => (<Input.TextArea {{...field}} />)}}</Field>",
                name_attr
            ));
        }
        FieldKind::Checkbox => {
            writer.line(format!(
                "<Field type=\"checkbox\" {}>{{({{ field }}) => (<Checkbox {{...field}} checked={{field.value}} />)}}</Field>",
                name_attr
            ));
        }
        FieldKind::Number => {
            writer.line(format!("<Field {}>{{({{ field, form }}) => (", name_attr));
            writer.nested(|w| {
                w.line(format!(
                    "<InputNumber {{...field}} {} {} />",
                    set_value("v", "v"),
                    FULL_WIDTH
                ));
            });
            writer.line(")}</Field>");
        }
        FieldKind::Select { options } => {
            writer.line(format!("<Field {}>{{({{ field, form }}) => (", name_attr));
            writer.nested(|w| {
                w.line(format!(
                    "<Select value={{field.value}} {} {}>",
                    set_value("v", "v"),
                    FULL_WIDTH
                ));
                w.nested(|w| {
                    for option in options {
                        w.line(format!(
                            "<Select.Option {} {}>{}</Select.Option>",
                            jsx_attr("key", option),
                            jsx_attr("value", option),
                            jsx_text(option)
                        ));
                    }
                });
                w.line("</Select>");
            });
            writer.line(")}</Field>");
        }
        FieldKind::Date => {
            writer.line(format!("<Field {}>{{({{ field, form }}) => (", name_attr));
            writer.nested(|w| {
                w.line(format!(
                    "<DatePicker value={{field.value}} {} {} />",
                    set_value("date, dateString", "dateString"),
                    FULL_WIDTH
                ));
            });
            writer.line(")}</Field>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(field: FieldSchema) -> String {
        let mut writer = SourceWriter::new(2);
        render_widget(&mut writer, &field);
        writer.finish()
    }

    fn field(name: &str, kind: FieldKind) -> FieldSchema {
        FieldSchema::builder(name, kind).build().unwrap()
    }

    #[test]
    fn test_single_line_widgets() {
        assert_eq!(
            render(field("email", FieldKind::Input)),
            "<Field name=\"email\">{({ field }) => (<Input {...field} />)}</Field>\n"
        );
        assert_eq!(
            render(field("bio", FieldKind::Textarea)),
            "<Field name=\"bio\">{({ field }) => (<Input.TextArea {...field} />)}</Field>\n"
        );
        assert_eq!(
            render(field("agree", FieldKind::Checkbox)),
            "<Field type=\"checkbox\" name=\"agree\">{({ field }) => (<Checkbox {...field} checked={field.value} />)}</Field>\n"
        );
    }

    #[test]
    fn test_number_widget() {
        assert_eq!(
            render(field("age", FieldKind::Number)),
            "<Field name=\"age\">{({ field, form }) => (\n\
             \x20 <InputNumber {...field} onChange={(v) => form.setFieldValue(\"age\", v)} style={{ width: '100%' }} />\n\
             )}</Field>\n"
        );
    }

    #[test]
    fn test_select_widget_escapes_options() {
        let select = field(
            "color",
            FieldKind::Select {
                options: vec!["Red".to_string(), "Blue & Green".to_string()],
            },
        );
        assert_eq!(
            render(select),
            "<Field name=\"color\">{({ field, form }) => (\n\
             \x20 <Select value={field.value} onChange={(v) => form.setFieldValue(\"color\", v)} style={{ width: '100%' }}>\n\
             \x20   <Select.Option key=\"Red\" value=\"Red\">Red</Select.Option>\n\
             \x20   <Select.Option key={\"Blue & Green\"} value={\"Blue & Green\"}>{\"Blue & Green\"}</Select.Option>\n\
             \x20 </Select>\n\
             )}</Field>\n"
        );
    }

    #[test]
    fn test_date_widget() {
        assert_eq!(
            render(field("start", FieldKind::Date)),
            "<Field name=\"start\">{({ field, form }) => (\n\
             \x20 <DatePicker value={field.value} onChange={(date, dateString) => form.setFieldValue(\"start\", dateString)} style={{ width: '100%' }} />\n\
             )}</Field>\n"
        );
    }
}
