//! Condition compiler
//!
//! Conditions fold strictly left to right: each condition joins the result
//! accumulated so far with its own logic operator. `[p1, OR p2, AND p3]`
//! becomes `((p1) OR (p2)) AND (p3)`. There is no AND-over-OR precedence.

use super::ast::{BoolExpr, Operand, Predicate, Visibility};
use crate::types::{ComparisonOp, Condition};

/// Turns a field's conditions into a [`Visibility`]
#[derive(Debug, Default, Clone, Copy)]
pub struct ConditionCompiler;

impl ConditionCompiler {
    pub fn new() -> Self {
        Self
    }

    pub fn compile(&self, conditions: &[Condition]) -> Visibility {
        let mut iter = conditions.iter();
        let Some(first) = iter.next() else {
            return Visibility::Always;
        };

        // The first condition's logic has nothing to join and is ignored
        let mut expr = BoolExpr::Predicate(Self::predicate(first));
        for condition in iter {
            expr = BoolExpr::Combine {
                left: Box::new(expr),
                logic: condition.logic,
                right: Box::new(BoolExpr::Predicate(Self::predicate(condition))),
            };
        }

        Visibility::When(expr)
    }

    pub fn predicate(condition: &Condition) -> Predicate {
        Predicate {
            field: condition.field.clone(),
            operator: condition.operator,
            operand: Self::operand(condition.operator, &condition.value),
        }
    }

    fn operand(operator: ComparisonOp, value: &str) -> Operand {
        match operator {
            ComparisonOp::Gt | ComparisonOp::Lt => match parse_number(value) {
                Some(number) => Operand::Number(number),
                None => Operand::Coerced(value.to_string()),
            },
            ComparisonOp::Eq | ComparisonOp::Ne | ComparisonOp::Contains => {
                Operand::Text(value.to_string())
            }
        }
    }
}

/// Finite decimal number, ignoring surrounding whitespace
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    // Rust accepts spellings such as "inf" and "NaN" that are not numeric literals
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
