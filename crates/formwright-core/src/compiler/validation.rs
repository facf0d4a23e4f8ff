//! Validation rule compiler
//!
//! Clause order is fixed: required, min, max, pattern, cross-field.
//! Bounds are not checked against each other here.

use super::ast::{
    BaseRule, RuleClause, ValidationChain, CROSS_FIELD_MESSAGE, MAX_MESSAGE, MIN_MESSAGE,
    PATTERN_MESSAGE, REQUIRED_MESSAGE,
};
use crate::types::{FieldType, ValidationRule};

/// Turns one field's validation settings into a [`ValidationChain`]
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidationRuleCompiler;

impl ValidationRuleCompiler {
    pub fn new() -> Self {
        Self
    }

    pub fn base_rule(field_type: FieldType) -> BaseRule {
        match field_type {
            FieldType::Number => BaseRule::Number,
            FieldType::Date => BaseRule::Date,
            FieldType::Checkbox => BaseRule::Boolean,
            FieldType::Input | FieldType::Select | FieldType::Textarea => BaseRule::String,
        }
    }

    pub fn compile(&self, field_type: FieldType, rule: &ValidationRule) -> ValidationChain {
        let mut chain = ValidationChain::new(Self::base_rule(field_type));

        if rule.required {
            let message = rule
                .custom_message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(REQUIRED_MESSAGE);
            chain.clauses.push(RuleClause::Required {
                message: message.to_string(),
            });
        }

        if let Some(limit) = rule.min {
            chain.clauses.push(RuleClause::Min {
                limit,
                message: MIN_MESSAGE.to_string(),
            });
        }

        if let Some(limit) = rule.max {
            chain.clauses.push(RuleClause::Max {
                limit,
                message: MAX_MESSAGE.to_string(),
            });
        }

        if let Some(source) = rule.pattern.as_deref().filter(|p| !p.is_empty()) {
            chain.clauses.push(RuleClause::Pattern {
                source: source.to_string(),
                message: PATTERN_MESSAGE.to_string(),
            });
        }

        if let Some(other) = rule.cross_field.as_deref().filter(|f| !f.is_empty()) {
            chain.clauses.push(RuleClause::CrossField {
                other: other.to_string(),
                message: CROSS_FIELD_MESSAGE.to_string(),
            });
        }

        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ast::ClauseKind;

    fn full_rule() -> ValidationRule {
        ValidationRule {
            required: true,
            min: Some(2.0),
            max: Some(40.0),
            pattern: Some("^[a-z]+$".to_string()),
            custom_message: Some("Please fill this in".to_string()),
            cross_field: Some("other".to_string()),
        }
    }

    #[test]
    fn test_base_rule_by_type() {
        assert_eq!(ValidationRuleCompiler::base_rule(FieldType::Number), BaseRule::Number);
        assert_eq!(ValidationRuleCompiler::base_rule(FieldType::Date), BaseRule::Date);
        assert_eq!(ValidationRuleCompiler::base_rule(FieldType::Checkbox), BaseRule::Boolean);
        assert_eq!(ValidationRuleCompiler::base_rule(FieldType::Input), BaseRule::String);
        assert_eq!(ValidationRuleCompiler::base_rule(FieldType::Select), BaseRule::String);
        assert_eq!(ValidationRuleCompiler::base_rule(FieldType::Textarea), BaseRule::String);
    }

    #[test]
    fn test_clause_order_is_fixed() {
        let chain = ValidationRuleCompiler::new().compile(FieldType::Input, &full_rule());
        assert_eq!(
            chain.clause_kinds(),
            vec![
                ClauseKind::Required,
                ClauseKind::Min,
                ClauseKind::Max,
                ClauseKind::Pattern,
                ClauseKind::CrossField,
            ]
        );
    }

    #[test]
    fn test_custom_message_only_on_required() {
        let chain = ValidationRuleCompiler::new().compile(FieldType::Input, &full_rule());
        let messages: Vec<&str> = chain.clauses.iter().map(RuleClause::message).collect();
        assert_eq!(
            messages,
            vec![
                "Please fill this in",
                MIN_MESSAGE,
                MAX_MESSAGE,
                PATTERN_MESSAGE,
                CROSS_FIELD_MESSAGE,
            ]
        );
    }

    #[test]
    fn test_default_required_message() {
        let rule = ValidationRule {
            required: true,
            custom_message: Some(String::new()),
            ..Default::default()
        };
        let chain = ValidationRuleCompiler::new().compile(FieldType::Input, &rule);
        assert_eq!(chain.clauses[0].message(), REQUIRED_MESSAGE);
    }

    #[test]
    fn test_empty_rule_keeps_only_base() {
        let chain = ValidationRuleCompiler::new().compile(FieldType::Date, &ValidationRule::default());
        assert_eq!(chain.base, BaseRule::Date);
        assert!(chain.clauses.is_empty());
    }

    #[test]
    fn test_contradictory_bounds_compile_as_given() {
        let rule = ValidationRule {
            min: Some(10.0),
            max: Some(1.0),
            ..Default::default()
        };
        let chain = ValidationRuleCompiler::new().compile(FieldType::Number, &rule);
        assert_eq!(
            chain.clauses,
            vec![
                RuleClause::Min { limit: 10.0, message: MIN_MESSAGE.to_string() },
                RuleClause::Max { limit: 1.0, message: MAX_MESSAGE.to_string() },
            ]
        );
    }

    #[test]
    fn test_zero_bounds_are_kept() {
        let rule = ValidationRule {
            min: Some(0.0),
            ..Default::default()
        };
        let chain = ValidationRuleCompiler::new().compile(FieldType::Number, &rule);
        assert_eq!(chain.clause_kinds(), vec![ClauseKind::Min]);
    }
}
