//! Policy bundle loading.
//!
//! The policy store supplies rulesets as JSON documents:
//!
//! ```json
//! {
//!   "version": "cross_border_bond@2026-02",
//!   "rules": [
//!     {
//!       "id": "R2",
//!       "priority": 20,
//!       "kind": "derivation",
//!       "condition": {
//!         "left": { "fact_ref": "prior_complex_derivatives_rejected" },
//!         "op": "=",
//!         "right": { "literal": true }
//!       },
//!       "actions": [
//!         { "kind": "set_fact", "key": "max_complexity_tier", "value": 2 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Loading parses the document and runs whole-ruleset validation; a
//! bundle that fails either step is rejected wholesale.

use crate::condition::{CmpOp, Condition, Operand};
use crate::error::ValidationError;
use crate::rule::{Action, Rule, RuleKind, Ruleset};
use crate::validate::validate;
use crate::value::Scalar;

/// Load and validate a ruleset bundle from JSON.
pub fn load_ruleset(v: &serde_json::Value) -> Result<Ruleset, ValidationError> {
    let ruleset = parse_ruleset(v)?;
    validate(&ruleset)?;
    Ok(ruleset)
}

/// Parse a ruleset bundle without validating it. Exposed for tooling that
/// wants to inspect a bundle before rejecting it; the engine itself only
/// accepts validated rulesets.
pub fn parse_ruleset(v: &serde_json::Value) -> Result<Ruleset, ValidationError> {
    let version = get_str(v, "version")?;
    let rules_arr = v
        .get("rules")
        .and_then(|r| r.as_array())
        .ok_or_else(|| ValidationError::Malformed {
            message: "bundle missing 'rules' array".to_string(),
        })?;
    let rules = rules_arr
        .iter()
        .map(parse_rule)
        .collect::<Result<Vec<Rule>, ValidationError>>()?;
    Ok(Ruleset::new(version, rules))
}

// ──────────────────────────────────────────────
// JSON parsing helpers
// ──────────────────────────────────────────────

fn get_str(obj: &serde_json::Value, field: &str) -> Result<String, ValidationError> {
    obj.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| ValidationError::Malformed {
            message: format!("missing string field '{}'", field),
        })
}

fn parse_rule(v: &serde_json::Value) -> Result<Rule, ValidationError> {
    let id = get_str(v, "id")?;
    let priority =
        v.get("priority")
            .and_then(|p| p.as_i64())
            .ok_or_else(|| ValidationError::Malformed {
                message: format!("rule '{}' missing integer 'priority'", id),
            })?;
    let kind = match get_str(v, "kind")?.as_str() {
        "derivation" => RuleKind::Derivation,
        "gate" => RuleKind::Gate,
        other => {
            return Err(ValidationError::Malformed {
                message: format!("rule '{}': unknown kind '{}'", id, other),
            });
        }
    };
    let condition_val = v
        .get("condition")
        .ok_or_else(|| ValidationError::Malformed {
            message: format!("rule '{}' missing 'condition'", id),
        })?;
    let condition = parse_condition(condition_val)?;
    let actions_arr = v
        .get("actions")
        .and_then(|a| a.as_array())
        .ok_or_else(|| ValidationError::Malformed {
            message: format!("rule '{}' missing 'actions' array", id),
        })?;
    let actions = actions_arr
        .iter()
        .map(parse_action)
        .collect::<Result<Vec<Action>, ValidationError>>()?;
    Ok(Rule {
        id,
        priority,
        kind,
        condition,
        actions,
    })
}

fn parse_action(v: &serde_json::Value) -> Result<Action, ValidationError> {
    match get_str(v, "kind")?.as_str() {
        "set_fact" => {
            let key = get_str(v, "key")?;
            let value_val = v.get("value").ok_or_else(|| ValidationError::Malformed {
                message: format!("set_fact action for '{}' missing 'value'", key),
            })?;
            let value = Scalar::from_json(value_val)?;
            Ok(Action::SetFact { key, value })
        }
        "require_action" => {
            let tag = get_str(v, "tag")?;
            Ok(Action::RequireAction { tag })
        }
        "veto" => {
            let reason = get_str(v, "reason")?;
            Ok(Action::Veto { reason })
        }
        other => Err(ValidationError::Malformed {
            message: format!("unknown action kind: {}", other),
        }),
    }
}

/// Parse a condition expression node.
pub fn parse_condition(v: &serde_json::Value) -> Result<Condition, ValidationError> {
    let op = get_str(v, "op")?;
    match op.as_str() {
        "and" | "or" => {
            let left = parse_condition(v.get("left").ok_or_else(|| ValidationError::Malformed {
                message: format!("{} missing 'left'", op),
            })?)?;
            let right =
                parse_condition(v.get("right").ok_or_else(|| ValidationError::Malformed {
                    message: format!("{} missing 'right'", op),
                })?)?;
            if op == "and" {
                Ok(Condition::And {
                    left: Box::new(left),
                    right: Box::new(right),
                })
            } else {
                Ok(Condition::Or {
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
        }
        "not" => {
            let operand =
                parse_condition(v.get("operand").ok_or_else(|| ValidationError::Malformed {
                    message: "not missing 'operand'".to_string(),
                })?)?;
            Ok(Condition::Not {
                operand: Box::new(operand),
            })
        }
        "in" => {
            let left = parse_operand(v.get("left").ok_or_else(|| ValidationError::Malformed {
                message: "in missing 'left'".to_string(),
            })?)?;
            let values_arr =
                v.get("values")
                    .and_then(|a| a.as_array())
                    .ok_or_else(|| ValidationError::Malformed {
                        message: "in missing 'values' array".to_string(),
                    })?;
            let values = values_arr
                .iter()
                .map(Scalar::from_json)
                .collect::<Result<Vec<Scalar>, ValidationError>>()?;
            Ok(Condition::InSet { left, values })
        }
        other => {
            let cmp = CmpOp::from_str(other).ok_or_else(|| ValidationError::Malformed {
                message: format!("unknown operator: {}", other),
            })?;
            let left = parse_operand(v.get("left").ok_or_else(|| ValidationError::Malformed {
                message: "compare missing 'left'".to_string(),
            })?)?;
            let right = parse_operand(v.get("right").ok_or_else(|| ValidationError::Malformed {
                message: "compare missing 'right'".to_string(),
            })?)?;
            Ok(Condition::Compare {
                left,
                op: cmp,
                right,
            })
        }
    }
}

fn parse_operand(v: &serde_json::Value) -> Result<Operand, ValidationError> {
    if let Some(fr) = v.get("fact_ref") {
        let key = fr.as_str().ok_or_else(|| ValidationError::Malformed {
            message: "fact_ref must be a string".to_string(),
        })?;
        return Ok(Operand::Fact(key.to_string()));
    }
    if let Some(lit) = v.get("literal") {
        return Ok(Operand::Literal(Scalar::from_json(lit)?));
    }
    Err(ValidationError::Malformed {
        message: format!("operand must carry 'fact_ref' or 'literal': {}", v),
    })
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
