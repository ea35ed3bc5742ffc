//! Per-evaluation errors.
//!
//! A missing fact reference is NOT an error -- it resolves the enclosing
//! condition term to Unknown. The errors here are terminal for the run:
//! no trace and no decision are produced.

use std::fmt;

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// No fixpoint within the pass budget. A malformed ruleset (two rules
    /// flipping a fact back and forth), not a transient condition; the
    /// caller should route the case to manual review, not retry.
    CycleDetected { passes: u32 },
    /// A comparison was applied to runtime values it cannot order
    /// (validation catches what is statically knowable; input facts are
    /// only seen here).
    TypeMismatch { rule_id: String, message: String },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::CycleDetected { passes } => {
                write!(f, "no fixpoint reached within {} passes", passes)
            }
            EvalError::TypeMismatch { rule_id, message } => {
                write!(f, "type mismatch in rule '{}': {}", rule_id, message)
            }
        }
    }
}

impl std::error::Error for EvalError {}
