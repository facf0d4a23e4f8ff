//! Intermediate representation produced by the compilers
//!
//! Nothing in here knows about output syntax. Text rendering lives in
//! `emitter::expr`, evaluation in `compiler::eval`.

use crate::types::{ComparisonOp, LogicOp};

pub const REQUIRED_MESSAGE: &str = "Required";
pub const MIN_MESSAGE: &str = "Value too small";
pub const MAX_MESSAGE: &str = "Value too large";
pub const PATTERN_MESSAGE: &str = "Invalid format";
pub const CROSS_FIELD_MESSAGE: &str = "Cross-field validation failed";

/// Schema type a validation chain starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseRule {
    String,
    Number,
    Date,
    Boolean,
}

/// One appended rule in a validation chain
#[derive(Debug, Clone, PartialEq)]
pub enum RuleClause {
    Required { message: String },
    Min { limit: f64, message: String },
    Max { limit: f64, message: String },
    Pattern { source: String, message: String },
    /// The field's value must equal the named sibling's value
    CrossField { other: String, message: String },
}

/// Clause discriminant, for order assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClauseKind {
    Required,
    Min,
    Max,
    Pattern,
    CrossField,
}

impl RuleClause {
    pub fn kind(&self) -> ClauseKind {
        match self {
            RuleClause::Required { .. } => ClauseKind::Required,
            RuleClause::Min { .. } => ClauseKind::Min,
            RuleClause::Max { .. } => ClauseKind::Max,
            RuleClause::Pattern { .. } => ClauseKind::Pattern,
            RuleClause::CrossField { .. } => ClauseKind::CrossField,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RuleClause::Required { message }
            | RuleClause::Min { message, .. }
            | RuleClause::Max { message, .. }
            | RuleClause::Pattern { message, .. }
            | RuleClause::CrossField { message, .. } => message,
        }
    }
}

/// Ordered validation chain: base rule followed by clauses
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationChain {
    pub base: BaseRule,
    pub clauses: Vec<RuleClause>,
}

impl ValidationChain {
    pub fn new(base: BaseRule) -> Self {
        Self {
            base,
            clauses: Vec::new(),
        }
    }

    pub fn clause_kinds(&self) -> Vec<ClauseKind> {
        self.clauses.iter().map(RuleClause::kind).collect()
    }

    /// Name of the sibling field referenced by the cross-field clause
    pub fn cross_field(&self) -> Option<&str> {
        self.clauses.iter().find_map(|clause| match clause {
            RuleClause::CrossField { other, .. } => Some(other.as_str()),
            _ => None,
        })
    }
}

/// Right-hand side of a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Compared as a string
    Text(String),
    /// Numeric literal for `>` and `<`
    Number(f64),
    /// Non-numeric text under `>` or `<`, coerced to a number at runtime
    Coerced(String),
}

/// `values.<field> <operator> <operand>`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub operator: ComparisonOp,
    pub operand: Operand,
}

/// Boolean expression over runtime form values
#[derive(Debug, Clone, PartialEq)]
pub enum BoolExpr {
    Predicate(Predicate),
    /// Left-associative fold step: `(left) logic (right)`
    Combine {
        left: Box<BoolExpr>,
        logic: LogicOp,
        right: Box<BoolExpr>,
    },
}

impl BoolExpr {
    /// Predicates in source order
    pub fn predicates(&self) -> Vec<&Predicate> {
        match self {
            BoolExpr::Predicate(predicate) => vec![predicate],
            BoolExpr::Combine { left, right, .. } => {
                let mut found = left.predicates();
                found.extend(right.predicates());
                found
            }
        }
    }

    /// Field names the expression reads
    pub fn referenced_fields(&self) -> Vec<&str> {
        self.predicates().into_iter().map(|p| p.field.as_str()).collect()
    }
}

/// Compiled visibility of a field
#[derive(Debug, Clone, PartialEq)]
pub enum Visibility {
    Always,
    When(BoolExpr),
}

impl Visibility {
    pub fn is_always(&self) -> bool {
        matches!(self, Visibility::Always)
    }

    pub fn expr(&self) -> Option<&BoolExpr> {
        match self {
            Visibility::Always => None,
            Visibility::When(expr) => Some(expr),
        }
    }
}
