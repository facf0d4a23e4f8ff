//! Runtime evaluation of compiled expressions
//!
//! Mirrors what the generated code does in the browser: strict equality for
//! `==`/`!=`, numeric coercion for `>`/`<` where anything unparsable becomes
//! NaN and every NaN comparison is false, and string containment over the
//! stringified value with a missing value read as the empty string.

use super::ast::{BoolExpr, Operand, Predicate, ValidationChain, Visibility};
use crate::emitter::escape::js_number;
use crate::error::{Error, Result};
use crate::types::{ComparisonOp, LogicOp};
use std::collections::BTreeMap;

/// A runtime form value
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl FormValue {
    /// Numeric coercion of a runtime value
    pub fn to_number(&self) -> f64 {
        match self {
            FormValue::Text(text) => string_to_number(text),
            FormValue::Number(n) => *n,
            FormValue::Bool(true) => 1.0,
            FormValue::Bool(false) => 0.0,
            FormValue::Null => 0.0,
        }
    }

    /// String coercion of a runtime value
    pub fn to_text(&self) -> String {
        match self {
            FormValue::Text(text) => text.clone(),
            FormValue::Number(n) => number_to_string(*n),
            FormValue::Bool(b) => b.to_string(),
            FormValue::Null => "null".to_string(),
        }
    }

    /// `===` between two present values
    pub fn strict_eq(&self, other: &FormValue) -> bool {
        match (self, other) {
            (FormValue::Number(a), FormValue::Number(b)) => a == b,
            _ => self == other,
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        FormValue::Number(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Bool(value)
    }
}

/// Form values keyed by field name; an absent key is undefined
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    values: BTreeMap<String, FormValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FormValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.values.get(name)
    }

    /// Read a flat JSON object of scalar values
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::validation("$", "Form values must be a JSON object", Some("object"))
        })?;

        let mut values = Self::new();
        for (name, raw) in object {
            let value = match raw {
                serde_json::Value::String(s) => FormValue::Text(s.clone()),
                serde_json::Value::Number(n) => FormValue::Number(n.as_f64().unwrap_or(f64::NAN)),
                serde_json::Value::Bool(b) => FormValue::Bool(*b),
                serde_json::Value::Null => FormValue::Null,
                _ => {
                    return Err(Error::validation(
                        format!("$.{}", name),
                        "Form values must be scalars",
                        Some("string, number, boolean or null"),
                    ))
                }
            };
            values.insert(name.clone(), value);
        }
        Ok(values)
    }
}

impl Predicate {
    pub fn evaluate(&self, values: &FormValues) -> bool {
        let actual = values.get(&self.field);
        match self.operator {
            ComparisonOp::Eq => text_equals(actual, &self.operand),
            ComparisonOp::Ne => !text_equals(actual, &self.operand),
            ComparisonOp::Gt => {
                let (left, right) = numeric_pair(actual, &self.operand);
                left > right
            }
            ComparisonOp::Lt => {
                let (left, right) = numeric_pair(actual, &self.operand);
                left < right
            }
            ComparisonOp::Contains => {
                let haystack = match actual {
                    None | Some(FormValue::Null) => String::new(),
                    Some(value) => value.to_text(),
                };
                haystack.contains(operand_text(&self.operand).as_str())
            }
        }
    }
}

impl BoolExpr {
    pub fn evaluate(&self, values: &FormValues) -> bool {
        match self {
            BoolExpr::Predicate(predicate) => predicate.evaluate(values),
            BoolExpr::Combine { left, logic, right } => match logic {
                LogicOp::And => left.evaluate(values) && right.evaluate(values),
                LogicOp::Or => left.evaluate(values) || right.evaluate(values),
            },
        }
    }
}

impl Visibility {
    pub fn is_visible(&self, values: &FormValues) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::When(expr) => expr.evaluate(values),
        }
    }
}

impl ValidationChain {
    /// Whether the cross-field clause, if any, holds for `field`
    ///
    /// Two absent values compare equal.
    pub fn cross_field_holds(&self, field: &str, values: &FormValues) -> bool {
        let Some(other) = self.cross_field() else {
            return true;
        };
        match (values.get(field), values.get(other)) {
            (None, None) => true,
            (Some(a), Some(b)) => a.strict_eq(b),
            _ => false,
        }
    }
}

fn operand_text(operand: &Operand) -> String {
    match operand {
        Operand::Text(text) | Operand::Coerced(text) => text.clone(),
        Operand::Number(n) => js_number(*n),
    }
}

fn text_equals(actual: Option<&FormValue>, operand: &Operand) -> bool {
    matches!(actual, Some(FormValue::Text(text)) if *text == operand_text(operand))
}

fn numeric_pair(actual: Option<&FormValue>, operand: &Operand) -> (f64, f64) {
    let left = actual.map(FormValue::to_number).unwrap_or(f64::NAN);
    let right = match operand {
        Operand::Number(n) => *n,
        Operand::Text(text) | Operand::Coerced(text) => string_to_number(text),
    };
    (left, right)
}

/// Number-to-string conversion with browser semantics
///
/// Shortest round-trip digits, written positionally for decimal exponents in
/// `-7..21` and as `d.ddde±x` outside that range.
pub fn number_to_string(value: f64) -> String {
    if !value.is_finite() {
        return js_number(value);
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        format!("{}.{}", &digits[..n as usize], &digits[n as usize..])
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let exponent_sign = if n - 1 < 0 { '-' } else { '+' };
        let fraction = if k > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits.clone()
        };
        format!("{}e{}{}", fraction, exponent_sign, (n - 1).abs())
    };

    format!("{}{}", sign, body)
}

/// String-to-number conversion with browser semantics
pub fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)];
    for (prefix, base) in radix {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return u64::from_str_radix(digits, base)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }

    super::condition::parse_number(trimmed).unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::condition::ConditionCompiler;
    use crate::compiler::validation::ValidationRuleCompiler;
    use crate::types::{Condition, FieldType, ValidationRule};

    fn visibility(conditions: &[Condition]) -> Visibility {
        ConditionCompiler::new().compile(conditions)
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("  "), 0.0);
        assert_eq!(string_to_number(" 42 "), 42.0);
        assert_eq!(string_to_number("0x10"), 16.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("abc").is_nan());
        assert!(string_to_number("12px").is_nan());
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(0.0), "0");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(-1.5), "-1.5");
        assert_eq!(number_to_string(0.1), "0.1");
        assert_eq!(number_to_string(123.456), "123.456");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(1e-7), "1e-7");
        assert_eq!(number_to_string(1.25e-7), "1.25e-7");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(-1.5e300), "-1.5e+300");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_contains_uses_exponent_form_for_large_numbers() {
        let vis = visibility(&[Condition::new("x", ComparisonOp::Contains, "e+21")]);
        assert!(vis.is_visible(&FormValues::new().with("x", 1e21)));
        assert!(!vis.is_visible(&FormValues::new().with("x", 1e20)));

        let small = visibility(&[Condition::new("x", ComparisonOp::Contains, "e-7")]);
        assert!(small.is_visible(&FormValues::new().with("x", 3e-7)));
    }

    #[test]
    fn test_greater_than_coerces_text() {
        let vis = visibility(&[Condition::new("age", ComparisonOp::Gt, "18")]);
        assert!(vis.is_visible(&FormValues::new().with("age", "21")));
        assert!(vis.is_visible(&FormValues::new().with("age", 30.0)));
        assert!(!vis.is_visible(&FormValues::new().with("age", "18")));
        assert!(!vis.is_visible(&FormValues::new().with("age", "adult")));
        assert!(!vis.is_visible(&FormValues::new()));
    }

    #[test]
    fn test_non_numeric_operand_is_never_ordered() {
        let lt = visibility(&[Condition::new("age", ComparisonOp::Lt, "abc")]);
        let gt = visibility(&[Condition::new("age", ComparisonOp::Gt, "abc")]);
        for value in [FormValue::from("1"), FormValue::from(-5.0), FormValue::from(true)] {
            let values = FormValues::new().with("age", value);
            assert!(!lt.is_visible(&values));
            assert!(!gt.is_visible(&values));
        }
    }

    #[test]
    fn test_equality_is_strict() {
        let vis = visibility(&[Condition::new("age", ComparisonOp::Eq, "18")]);
        assert!(vis.is_visible(&FormValues::new().with("age", "18")));
        assert!(!vis.is_visible(&FormValues::new().with("age", 18.0)));

        let ne = visibility(&[Condition::new("age", ComparisonOp::Ne, "18")]);
        assert!(ne.is_visible(&FormValues::new().with("age", 18.0)));
        assert!(ne.is_visible(&FormValues::new()));
    }

    #[test]
    fn test_contains_stringifies_value() {
        let vis = visibility(&[Condition::new("notes", ComparisonOp::Contains, "ur")]);
        assert!(vis.is_visible(&FormValues::new().with("notes", "urgent")));
        assert!(!vis.is_visible(&FormValues::new()));

        let digits = visibility(&[Condition::new("code", ComparisonOp::Contains, "23")]);
        assert!(digits.is_visible(&FormValues::new().with("code", 1234.0)));

        let empty = visibility(&[Condition::new("notes", ComparisonOp::Contains, "")]);
        assert!(empty.is_visible(&FormValues::new()));
    }

    #[test]
    fn test_left_fold_without_precedence() {
        // ((a == "x") || (b == "y")) && (c == "z")
        let vis = visibility(&[
            Condition::new("a", ComparisonOp::Eq, "x"),
            Condition::new("b", ComparisonOp::Eq, "y").with_logic(LogicOp::Or),
            Condition::new("c", ComparisonOp::Eq, "z").with_logic(LogicOp::And),
        ]);
        // Precedence-based reading would be a || (b && c) and show this
        let values = FormValues::new().with("a", "x").with("b", "n").with("c", "n");
        assert!(!vis.is_visible(&values));

        let values = FormValues::new().with("a", "n").with("b", "y").with("c", "z");
        assert!(vis.is_visible(&values));
    }

    #[test]
    fn test_first_logic_is_ignored() {
        let with_or = visibility(&[Condition::new("a", ComparisonOp::Eq, "x").with_logic(LogicOp::Or)]);
        let with_and = visibility(&[Condition::new("a", ComparisonOp::Eq, "x")]);
        assert_eq!(with_or, with_and);
    }

    #[test]
    fn test_cross_field() {
        let rule = ValidationRule {
            cross_field: Some("password".to_string()),
            ..Default::default()
        };
        let chain = ValidationRuleCompiler::new().compile(FieldType::Input, &rule);

        let same = FormValues::new().with("confirm", "s3cret").with("password", "s3cret");
        let different = FormValues::new().with("confirm", "s3cret").with("password", "other");
        let one_missing = FormValues::new().with("confirm", "s3cret");

        assert!(chain.cross_field_holds("confirm", &same));
        assert!(!chain.cross_field_holds("confirm", &different));
        assert!(!chain.cross_field_holds("confirm", &one_missing));
        assert!(chain.cross_field_holds("confirm", &FormValues::new()));
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({"name": "Ada", "age": 36, "agree": true, "note": null});
        let values = FormValues::from_json(&json).unwrap();
        assert_eq!(values.get("age"), Some(&FormValue::Number(36.0)));
        assert_eq!(values.get("note"), Some(&FormValue::Null));

        assert!(FormValues::from_json(&serde_json::json!([1])).is_err());
        assert!(FormValues::from_json(&serde_json::json!({"tags": ["a"]})).is_err());
    }
}
