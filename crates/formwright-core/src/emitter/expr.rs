//! Text rendering of the compiled IR
//!
//! Validation chains render as yup builder calls, visibility expressions as
//! JavaScript boolean expressions over `values`. Combined expressions are
//! fully parenthesized so the left-to-right fold survives any reader.

use super::escape::{js_number, js_string, member_access};
use crate::compiler::ast::{BaseRule, BoolExpr, Operand, Predicate, RuleClause, ValidationChain};
use crate::types::{ComparisonOp, LogicOp};
use std::fmt;

/// Runtime value lookup every predicate reads from
pub const VALUES_BINDING: &str = "values";

impl fmt::Display for BaseRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseRule::String => write!(f, "yup.string()"),
            BaseRule::Number => write!(f, "yup.number()"),
            BaseRule::Date => write!(f, "yup.date()"),
            BaseRule::Boolean => write!(f, "yup.boolean()"),
        }
    }
}

impl fmt::Display for RuleClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleClause::Required { message } => write!(f, ".required({})", js_string(message)),
            RuleClause::Min { limit, message } => {
                write!(f, ".min({}, {})", js_number(*limit), js_string(message))
            }
            RuleClause::Max { limit, message } => {
                write!(f, ".max({}, {})", js_number(*limit), js_string(message))
            }
            RuleClause::Pattern { source, message } => write!(
                f,
                ".matches(new RegExp({}), {})",
                js_string(source),
                js_string(message)
            ),
            RuleClause::CrossField { other, message } => write!(
                f,
                ".test(\"crossField\", {}, function (value) {{ return value === {}; }})",
                js_string(message),
                member_access("this.parent", other)
            ),
        }
    }
}

impl fmt::Display for ValidationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for clause in &self.clauses {
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Text(text) => write!(f, "{}", js_string(text)),
            Operand::Number(n) => write!(f, "{}", js_number(*n)),
            Operand::Coerced(text) => write!(f, "Number({})", js_string(text)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = member_access(VALUES_BINDING, &self.field);
        match self.operator {
            ComparisonOp::Eq => write!(f, "{} === {}", value, self.operand),
            ComparisonOp::Ne => write!(f, "{} !== {}", value, self.operand),
            ComparisonOp::Gt => write!(f, "{} > {}", value, self.operand),
            ComparisonOp::Lt => write!(f, "{} < {}", value, self.operand),
            ComparisonOp::Contains => {
                write!(f, "String({} ?? \"\").includes({})", value, self.operand)
            }
        }
    }
}

struct LogicOpSymbol(LogicOp);

impl fmt::Display for LogicOpSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            LogicOp::And => write!(f, "&&"),
            LogicOp::Or => write!(f, "||"),
        }
    }
}

impl fmt::Display for BoolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolExpr::Predicate(predicate) => write!(f, "{}", predicate),
            BoolExpr::Combine { left, logic, right } => {
                write!(f, "({}) {} ({})", left, LogicOpSymbol(*logic), right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::condition::ConditionCompiler;
    use crate::compiler::validation::ValidationRuleCompiler;
    use crate::types::{Condition, FieldType, ValidationRule};

    fn render(conditions: &[Condition]) -> String {
        ConditionCompiler::new()
            .compile(conditions)
            .expr()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    #[test]
    fn test_single_numeric_predicate() {
        let text = render(&[Condition::new("age", ComparisonOp::Gt, "18")]);
        assert_eq!(text, "values.age > 18");
    }

    #[test]
    fn test_two_predicates_left_associative() {
        let text = render(&[
            Condition::new("a", ComparisonOp::Eq, "x"),
            Condition::new("b", ComparisonOp::Ne, "y").with_logic(LogicOp::Or),
        ]);
        assert_eq!(text, "(values.a === \"x\") || (values.b !== \"y\")");
    }

    #[test]
    fn test_three_predicates_nest_to_the_left() {
        let text = render(&[
            Condition::new("a", ComparisonOp::Eq, "x"),
            Condition::new("b", ComparisonOp::Ne, "y").with_logic(LogicOp::Or),
            Condition::new("c", ComparisonOp::Lt, "3").with_logic(LogicOp::And),
        ]);
        assert_eq!(
            text,
            "((values.a === \"x\") || (values.b !== \"y\")) && (values.c < 3)"
        );
    }

    #[test]
    fn test_operand_rendering() {
        assert_eq!(
            render(&[Condition::new("age", ComparisonOp::Lt, "ten")]),
            "values.age < Number(\"ten\")"
        );
        assert_eq!(
            render(&[Condition::new("notes", ComparisonOp::Contains, "\"urgent\"")]),
            "String(values.notes ?? \"\").includes(\"\\\"urgent\\\"\")"
        );
        assert_eq!(
            render(&[Condition::new("zip-code", ComparisonOp::Eq, "1")]),
            "values[\"zip-code\"] === \"1\""
        );
    }

    #[test]
    fn test_chain_rendering() {
        let rule = ValidationRule {
            required: true,
            min: Some(2.0),
            max: Some(5.0),
            pattern: Some("^\\d+$".to_string()),
            custom_message: None,
            cross_field: Some("password".to_string()),
        };
        let chain = ValidationRuleCompiler::new().compile(FieldType::Input, &rule);
        assert_eq!(
            chain.to_string(),
            "yup.string().required(\"Required\").min(2, \"Value too small\").max(5, \"Value too large\")\
             .matches(new RegExp(\"^\\\\d+$\"), \"Invalid format\")\
             .test(\"crossField\", \"Cross-field validation failed\", function (value) { return value === this.parent.password; })"
        );
    }

    #[test]
    fn test_required_starts_string_chain() {
        let rule = ValidationRule {
            required: true,
            ..Default::default()
        };
        let chain = ValidationRuleCompiler::new().compile(FieldType::Input, &rule);
        assert!(chain.to_string().starts_with("yup.string().required("));
    }

    #[test]
    fn test_custom_message_is_escaped() {
        let rule = ValidationRule {
            required: true,
            custom_message: Some("Don't \"skip\"".to_string()),
            ..Default::default()
        };
        let chain = ValidationRuleCompiler::new().compile(FieldType::Checkbox, &rule);
        assert_eq!(
            chain.to_string(),
            "yup.boolean().required(\"Don\\'t \\\"skip\\\"\")"
        );
    }
}
