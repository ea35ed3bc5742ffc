//! Condition expression trees and three-valued truth.
//!
//! A condition is a boolean expression over fact lookups, comparisons,
//! and logical connectives. Evaluating against a fact set that is missing
//! a referenced key yields Unknown rather than an error; Unknown
//! propagates through the connectives by Kleene three-valued logic and
//! gates treat it as "did not fire". The trace records Unknown distinctly
//! from False so an auditor can tell "rule did not apply" from "rule's
//! premise could not be determined".

use crate::value::Scalar;

/// Three-valued condition outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    /// Kleene conjunction: False dominates, Unknown absorbs True.
    pub fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    /// Kleene disjunction: True dominates, Unknown absorbs False.
    pub fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    /// Kleene negation: Unknown stays Unknown.
    pub fn negate(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }

    /// Whether a rule guarded by this outcome fires. Unknown gates to
    /// false without being conflated with False in the trace.
    pub fn is_true(self) -> bool {
        self == Truth::True
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Truth::True => "true",
            Truth::False => "false",
            Truth::Unknown => "unknown",
        }
    }
}

impl From<bool> for Truth {
    fn from(b: bool) -> Truth {
        if b {
            Truth::True
        } else {
            Truth::False
        }
    }
}

/// One side of a comparison: a fact lookup or a literal scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Fact(String),
    Literal(Scalar),
}

/// Comparison operators. Ordering operators apply to Int values only;
/// tags compare by exact identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    pub fn from_str(s: &str) -> Option<CmpOp> {
        match s {
            "=" => Some(CmpOp::Eq),
            "!=" => Some(CmpOp::Ne),
            "<" => Some(CmpOp::Lt),
            "<=" => Some(CmpOp::Le),
            ">" => Some(CmpOp::Gt),
            ">=" => Some(CmpOp::Ge),
            _ => None,
        }
    }

    /// True for `<`, `<=`, `>`, `>=`.
    pub fn is_ordering(self) -> bool {
        !matches!(self, CmpOp::Eq | CmpOp::Ne)
    }
}

/// A boolean condition expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Binary comparison between two operands.
    Compare {
        left: Operand,
        op: CmpOp,
        right: Operand,
    },
    /// Membership test against a literal set.
    InSet { left: Operand, values: Vec<Scalar> },
    /// Logical AND.
    And {
        left: Box<Condition>,
        right: Box<Condition>,
    },
    /// Logical OR.
    Or {
        left: Box<Condition>,
        right: Box<Condition>,
    },
    /// Logical NOT.
    Not { operand: Box<Condition> },
}

impl Condition {
    /// Visit every comparison leaf in the tree.
    pub fn for_each_leaf<'a>(&'a self, visit: &mut impl FnMut(&'a Condition)) {
        match self {
            Condition::Compare { .. } | Condition::InSet { .. } => visit(self),
            Condition::And { left, right } | Condition::Or { left, right } => {
                left.for_each_leaf(visit);
                right.for_each_leaf(visit);
            }
            Condition::Not { operand } => operand.for_each_leaf(visit),
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kleene_and() {
        assert_eq!(Truth::Unknown.and(Truth::False), Truth::False);
        assert_eq!(Truth::Unknown.and(Truth::True), Truth::Unknown);
        assert_eq!(Truth::True.and(Truth::True), Truth::True);
    }

    #[test]
    fn kleene_or() {
        assert_eq!(Truth::Unknown.or(Truth::True), Truth::True);
        assert_eq!(Truth::Unknown.or(Truth::False), Truth::Unknown);
        assert_eq!(Truth::False.or(Truth::False), Truth::False);
    }

    #[test]
    fn kleene_not() {
        assert_eq!(Truth::Unknown.negate(), Truth::Unknown);
        assert_eq!(Truth::True.negate(), Truth::False);
    }

    #[test]
    fn unknown_never_fires() {
        assert!(!Truth::Unknown.is_true());
        assert!(!Truth::False.is_true());
        assert!(Truth::True.is_true());
    }

    #[test]
    fn cmp_op_round_trip() {
        for op in [CmpOp::Eq, CmpOp::Ne, CmpOp::Lt, CmpOp::Le, CmpOp::Gt, CmpOp::Ge] {
            assert_eq!(CmpOp::from_str(op.as_str()), Some(op));
        }
        assert_eq!(CmpOp::from_str("<>"), None);
    }

    #[test]
    fn ordering_classification() {
        assert!(CmpOp::Gt.is_ordering());
        assert!(!CmpOp::Eq.is_ordering());
        assert!(!CmpOp::Ne.is_ordering());
    }

    #[test]
    fn for_each_leaf_visits_comparisons() {
        let cond = Condition::And {
            left: Box::new(Condition::Compare {
                left: Operand::Fact("a".to_string()),
                op: CmpOp::Eq,
                right: Operand::Literal(Scalar::Bool(true)),
            }),
            right: Box::new(Condition::Not {
                operand: Box::new(Condition::InSet {
                    left: Operand::Fact("b".to_string()),
                    values: vec![Scalar::Int(1)],
                }),
            }),
        };
        let mut count = 0;
        cond.for_each_leaf(&mut |_| count += 1);
        assert_eq!(count, 2);
    }
}
