//! Condition evaluation over a fact set.
//!
//! Conditions evaluate to three-valued [`Truth`]: a comparison touching a
//! missing fact key yields Unknown, which propagates through the
//! connectives by Kleene logic. Equality across differing scalar types is
//! simply false (tags never equal text, booleans never equal integers);
//! ordering across non-Int values is a runtime type mismatch.

use guardrail_core::{CmpOp, Condition, FactSet, Operand, Scalar, Truth};

use crate::error::EvalError;

/// Evaluate a condition against a fact set. `rule_id` is carried for
/// error attribution only.
pub fn eval_condition(
    cond: &Condition,
    facts: &FactSet,
    rule_id: &str,
) -> Result<Truth, EvalError> {
    match cond {
        Condition::Compare { left, op, right } => {
            let left_val = match resolve(left, facts) {
                Some(v) => v,
                None => return Ok(Truth::Unknown),
            };
            let right_val = match resolve(right, facts) {
                Some(v) => v,
                None => return Ok(Truth::Unknown),
            };
            compare(left_val, *op, right_val, rule_id)
        }
        Condition::InSet { left, values } => {
            let left_val = match resolve(left, facts) {
                Some(v) => v,
                None => return Ok(Truth::Unknown),
            };
            Ok(Truth::from(values.iter().any(|v| v == left_val)))
        }
        Condition::And { left, right } => {
            let l = eval_condition(left, facts, rule_id)?;
            if l == Truth::False {
                // False dominates; skip the right side
                return Ok(Truth::False);
            }
            let r = eval_condition(right, facts, rule_id)?;
            Ok(l.and(r))
        }
        Condition::Or { left, right } => {
            let l = eval_condition(left, facts, rule_id)?;
            if l == Truth::True {
                // True dominates; skip the right side
                return Ok(Truth::True);
            }
            let r = eval_condition(right, facts, rule_id)?;
            Ok(l.or(r))
        }
        Condition::Not { operand } => Ok(eval_condition(operand, facts, rule_id)?.negate()),
    }
}

fn resolve<'a>(operand: &'a Operand, facts: &'a FactSet) -> Option<&'a Scalar> {
    match operand {
        Operand::Fact(key) => facts.lookup(key),
        Operand::Literal(value) => Some(value),
    }
}

fn compare(left: &Scalar, op: CmpOp, right: &Scalar, rule_id: &str) -> Result<Truth, EvalError> {
    if op.is_ordering() {
        let (l, r) = match (left.as_int(), right.as_int()) {
            (Some(l), Some(r)) => (l, r),
            _ => {
                return Err(EvalError::TypeMismatch {
                    rule_id: rule_id.to_string(),
                    message: format!(
                        "'{}' requires Int operands, got {} and {}",
                        op.as_str(),
                        left.type_name(),
                        right.type_name()
                    ),
                });
            }
        };
        let result = match op {
            CmpOp::Lt => l < r,
            CmpOp::Le => l <= r,
            CmpOp::Gt => l > r,
            CmpOp::Ge => l >= r,
            CmpOp::Eq | CmpOp::Ne => unreachable!("handled below"),
        };
        return Ok(Truth::from(result));
    }
    // Equality is total: values of different scalar types are never equal.
    let equal = left == right;
    Ok(Truth::from(match op {
        CmpOp::Eq => equal,
        CmpOp::Ne => !equal,
        _ => unreachable!("ordering handled above"),
    }))
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
