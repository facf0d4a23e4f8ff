//! Integration tests for reverse extraction


use formwright_core::{
    emit_source, extract_fields, generate_source, ComparisonOp, EmitterConfig, ExtractionOutcome,
    FieldKind, FieldType, ReverseExtractor,
};
use std::collections::BTreeSet;
use test_support::{conditional, field, schema, select, sequential_ids, signup_schema, when};

#[test]
fn test_round_trip_recovers_every_name() {
    let original = signup_schema();
    let source = emit_source(&original);

    let recovered = extract_fields(&source).into_schema().unwrap();
    assert_eq!(recovered.names(), original.names());
}

#[test]
fn test_round_trip_with_custom_emitter_config() {
    let original = schema(vec![
        field("zip-code", FieldKind::Input),
        select("size", &["S", "M", "L"]),
        conditional(
            "gift_note",
            FieldKind::Textarea,
            vec![when("zip-code", ComparisonOp::Contains, "name=\"x\"")],
        ),
    ]);
    let config = EmitterConfig {
        component_name: "OrderForm".to_string(),
        indent_width: 3,
        submit_label: "Order".to_string(),
    };
    let generated = generate_source(&original, &config).unwrap();

    let recovered = extract_fields(&generated.source).into_schema().unwrap();
    let names: BTreeSet<_> = recovered.names().into_iter().collect();
    let expected: BTreeSet<_> = original.names().into_iter().collect();
    assert_eq!(names, expected);
}

#[test]
fn test_emitted_source_forces_numeric_stubs() {
    // The import line always mentions InputNumber
    let source = emit_source(&schema(vec![field("title", FieldKind::Input)]));
    let outcome = ReverseExtractor::with_ids(sequential_ids()).extract(&source);
    let extraction = outcome.extraction().unwrap();

    assert!(extraction.forced_numeric);
    assert_eq!(
        extraction.detected_widgets,
        vec!["Input", "InputNumber", "Select", "Checkbox", "DatePicker"]
    );
    let stub = &extraction.schema.fields()[0];
    assert_eq!(stub.field_type(), FieldType::Number);
    assert_eq!(stub.label(), "Title");
    assert_eq!(stub.id().as_str(), "stub-1");
}

#[test]
fn test_hand_written_snippet() {
    let snippet = r#"
        <Formik initialValues={{ first_name: '', city: '' }}>
          <Form>
            <Field name="first_name" component={Input} />
            <Field name='city' />
            <Field name="first_name" />
          </Form>
        </Formik>
    "#;

    let outcome = ReverseExtractor::with_ids(sequential_ids()).extract(snippet);
    let extraction = outcome.extraction().unwrap();
    assert!(!extraction.forced_numeric);
    assert_eq!(extraction.detected_widgets, vec!["Input"]);
    assert_eq!(extraction.schema.names(), vec!["first_name", "city"]);

    let labels: Vec<_> = extraction.schema.iter().map(|f| f.label()).collect();
    assert_eq!(labels, vec!["First Name", "City"]);
    assert!(extraction
        .schema
        .iter()
        .all(|f| f.field_type() == FieldType::Input && f.conditions().is_empty()));
}

#[test]
fn test_text_without_names_is_explicitly_empty() {
    for text in ["", "plain prose", "<Input placeholder=\"Email\" />", "name = nothing"] {
        let outcome = extract_fields(text);
        assert_eq!(outcome, ExtractionOutcome::NothingRecognized);
        assert!(outcome.into_schema().is_none());
    }
}

#[test]
fn test_escaped_literals_are_not_assignments() {
    // A label that looks like an assignment is escaped on emission
    let original = schema(vec![formwright_core::FieldSchema::builder("real", FieldKind::Input)
        .label("name=\"fake\" name='also_fake'")
        .build()
        .unwrap()]);
    let recovered = extract_fields(&emit_source(&original)).into_schema().unwrap();
    assert_eq!(recovered.names(), vec!["real"]);
}
