//! Whole-ruleset validation, performed once at load time.
//!
//! Checks: unique rule ids; GATE rules contain only Veto actions and
//! DERIVATION rules only SetFact/RequireAction; IN lists are non-empty
//! and homogeneous; ordering comparisons are Int-only; and every literal
//! comparison agrees with the statically-knowable type of the fact key it
//! binds to (the types implied by SetFact actions elsewhere in the
//! ruleset). A ruleset failing any check is rejected wholesale -- the
//! engine never runs a partially-invalid ruleset.

use std::collections::{BTreeMap, BTreeSet};

use crate::condition::{Condition, Operand};
use crate::error::ValidationError;
use crate::rule::{Action, Rule, RuleKind, Ruleset};

/// Validate a ruleset. Returns the first violation found, in rule order.
pub fn validate(ruleset: &Ruleset) -> Result<(), ValidationError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for rule in ruleset.rules() {
        if !seen.insert(rule.id.as_str()) {
            return Err(ValidationError::DuplicateRuleId {
                rule_id: rule.id.clone(),
            });
        }
        check_actions(rule)?;
    }

    let declared = declared_fact_types(ruleset)?;
    for rule in ruleset.rules() {
        check_condition(rule, &declared)?;
    }
    Ok(())
}

fn check_actions(rule: &Rule) -> Result<(), ValidationError> {
    if rule.actions.is_empty() {
        return Err(ValidationError::EmptyActions {
            rule_id: rule.id.clone(),
        });
    }
    for action in &rule.actions {
        let permitted = match (rule.kind, action) {
            (RuleKind::Derivation, Action::SetFact { .. }) => true,
            (RuleKind::Derivation, Action::RequireAction { .. }) => true,
            (RuleKind::Gate, Action::Veto { .. }) => true,
            _ => false,
        };
        if !permitted {
            return Err(ValidationError::ActionKindMismatch {
                rule_id: rule.id.clone(),
                kind: rule.kind.as_str(),
                action: action.kind_str(),
            });
        }
    }
    Ok(())
}

/// Collect the fact types established by SetFact actions. Two rules
/// setting the same key with different scalar types is an authoring bug.
fn declared_fact_types(
    ruleset: &Ruleset,
) -> Result<BTreeMap<String, &'static str>, ValidationError> {
    let mut declared: BTreeMap<String, &'static str> = BTreeMap::new();
    for rule in ruleset.rules() {
        for action in &rule.actions {
            if let Action::SetFact { key, value } = action {
                let ty = value.type_name();
                match declared.get(key.as_str()) {
                    Some(existing) if *existing != ty => {
                        return Err(ValidationError::TypeConflict {
                            rule_id: rule.id.clone(),
                            key: key.clone(),
                            declared: (*existing).to_string(),
                            found: ty.to_string(),
                        });
                    }
                    _ => {
                        declared.insert(key.clone(), ty);
                    }
                }
            }
        }
    }
    Ok(declared)
}

fn check_condition(
    rule: &Rule,
    declared: &BTreeMap<String, &'static str>,
) -> Result<(), ValidationError> {
    let mut violation: Option<ValidationError> = None;
    rule.condition.for_each_leaf(&mut |leaf| {
        if violation.is_some() {
            return;
        }
        violation = check_leaf(rule, leaf, declared).err();
    });
    match violation {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn check_leaf(
    rule: &Rule,
    leaf: &Condition,
    declared: &BTreeMap<String, &'static str>,
) -> Result<(), ValidationError> {
    match leaf {
        Condition::InSet { left, values } => {
            let first = match values.first() {
                Some(v) => v.type_name(),
                None => {
                    return Err(ValidationError::BadInList {
                        rule_id: rule.id.clone(),
                    });
                }
            };
            if values.iter().any(|v| v.type_name() != first) {
                return Err(ValidationError::BadInList {
                    rule_id: rule.id.clone(),
                });
            }
            if let Operand::Fact(key) = left {
                if let Some(declared_ty) = declared.get(key.as_str()) {
                    if *declared_ty != first {
                        return Err(ValidationError::TypeConflict {
                            rule_id: rule.id.clone(),
                            key: key.clone(),
                            declared: (*declared_ty).to_string(),
                            found: first.to_string(),
                        });
                    }
                }
            }
            Ok(())
        }
        Condition::Compare { left, op, right } => {
            if op.is_ordering() {
                for side in [left, right] {
                    match side {
                        Operand::Literal(v) if v.type_name() != "Int" => {
                            return Err(ValidationError::NonIntOrdering {
                                rule_id: rule.id.clone(),
                                found: v.type_name().to_string(),
                            });
                        }
                        Operand::Fact(key) => {
                            if let Some(declared_ty) = declared.get(key.as_str()) {
                                if *declared_ty != "Int" {
                                    return Err(ValidationError::NonIntOrdering {
                                        rule_id: rule.id.clone(),
                                        found: (*declared_ty).to_string(),
                                    });
                                }
                            }
                        }
                        _ => {}
                    }
                }
                return Ok(());
            }
            // Equality: a literal must agree with the statically-known
            // type of the fact key on the other side.
            let pairs = [(left, right), (right, left)];
            for (a, b) in pairs {
                if let (Operand::Fact(key), Operand::Literal(v)) = (a, b) {
                    if let Some(declared_ty) = declared.get(key.as_str()) {
                        if *declared_ty != v.type_name() {
                            return Err(ValidationError::TypeConflict {
                                rule_id: rule.id.clone(),
                                key: key.clone(),
                                declared: (*declared_ty).to_string(),
                                found: v.type_name().to_string(),
                            });
                        }
                    }
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::CmpOp;
    use crate::value::Scalar;

    fn compare(key: &str, op: CmpOp, literal: Scalar) -> Condition {
        Condition::Compare {
            left: Operand::Fact(key.to_string()),
            op,
            right: Operand::Literal(literal),
        }
    }

    fn derivation(id: &str, condition: Condition, actions: Vec<Action>) -> Rule {
        Rule {
            id: id.to_string(),
            priority: 10,
            kind: RuleKind::Derivation,
            condition,
            actions,
        }
    }

    fn gate(id: &str, condition: Condition) -> Rule {
        Rule {
            id: id.to_string(),
            priority: 10,
            kind: RuleKind::Gate,
            condition,
            actions: vec![Action::Veto {
                reason: "blocked".to_string(),
            }],
        }
    }

    #[test]
    fn accepts_well_formed_ruleset() {
        let rs = Ruleset::new(
            "v1",
            vec![
                derivation(
                    "d1",
                    compare("flagged", CmpOp::Eq, Scalar::Bool(true)),
                    vec![Action::SetFact {
                        key: "ceiling".to_string(),
                        value: Scalar::Int(2),
                    }],
                ),
                gate("g1", compare("tier", CmpOp::Gt, Scalar::Int(2))),
            ],
        );
        assert!(validate(&rs).is_ok());
    }

    #[test]
    fn rejects_duplicate_rule_ids() {
        let rs = Ruleset::new(
            "v1",
            vec![
                gate("same", compare("a", CmpOp::Eq, Scalar::Bool(true))),
                gate("same", compare("b", CmpOp::Eq, Scalar::Bool(true))),
            ],
        );
        assert!(matches!(
            validate(&rs),
            Err(ValidationError::DuplicateRuleId { .. })
        ));
    }

    #[test]
    fn rejects_gate_with_set_fact() {
        let mut bad = gate("g1", compare("a", CmpOp::Eq, Scalar::Bool(true)));
        bad.actions = vec![Action::SetFact {
            key: "x".to_string(),
            value: Scalar::Int(1),
        }];
        let rs = Ruleset::new("v1", vec![bad]);
        assert!(matches!(
            validate(&rs),
            Err(ValidationError::ActionKindMismatch { kind: "gate", .. })
        ));
    }

    #[test]
    fn rejects_derivation_with_veto() {
        let bad = derivation(
            "d1",
            compare("a", CmpOp::Eq, Scalar::Bool(true)),
            vec![Action::Veto {
                reason: "no".to_string(),
            }],
        );
        let rs = Ruleset::new("v1", vec![bad]);
        assert!(matches!(
            validate(&rs),
            Err(ValidationError::ActionKindMismatch {
                kind: "derivation",
                ..
            })
        ));
    }

    #[test]
    fn rejects_empty_actions() {
        let bad = derivation("d1", compare("a", CmpOp::Eq, Scalar::Bool(true)), vec![]);
        let rs = Ruleset::new("v1", vec![bad]);
        assert!(matches!(
            validate(&rs),
            Err(ValidationError::EmptyActions { .. })
        ));
    }

    #[test]
    fn rejects_heterogeneous_in_list() {
        let bad = gate(
            "g1",
            Condition::InSet {
                left: Operand::Fact("x".to_string()),
                values: vec![Scalar::Int(1), Scalar::Text("two".to_string())],
            },
        );
        let rs = Ruleset::new("v1", vec![bad]);
        assert!(matches!(
            validate(&rs),
            Err(ValidationError::BadInList { .. })
        ));
    }

    #[test]
    fn rejects_ordering_over_text_literal() {
        let bad = gate("g1", compare("name", CmpOp::Lt, Scalar::Text("z".to_string())));
        let rs = Ruleset::new("v1", vec![bad]);
        assert!(matches!(
            validate(&rs),
            Err(ValidationError::NonIntOrdering { .. })
        ));
    }

    #[test]
    fn rejects_literal_conflicting_with_derived_type() {
        // d1 establishes ceiling: Int; g1 compares it against a Bool literal
        let rs = Ruleset::new(
            "v1",
            vec![
                derivation(
                    "d1",
                    compare("flagged", CmpOp::Eq, Scalar::Bool(true)),
                    vec![Action::SetFact {
                        key: "ceiling".to_string(),
                        value: Scalar::Int(2),
                    }],
                ),
                gate("g1", compare("ceiling", CmpOp::Eq, Scalar::Bool(true))),
            ],
        );
        assert!(matches!(
            validate(&rs),
            Err(ValidationError::TypeConflict { .. })
        ));
    }

    #[test]
    fn rejects_conflicting_set_fact_types() {
        let rs = Ruleset::new(
            "v1",
            vec![
                derivation(
                    "d1",
                    compare("a", CmpOp::Eq, Scalar::Bool(true)),
                    vec![Action::SetFact {
                        key: "ceiling".to_string(),
                        value: Scalar::Int(2),
                    }],
                ),
                derivation(
                    "d2",
                    compare("b", CmpOp::Eq, Scalar::Bool(true)),
                    vec![Action::SetFact {
                        key: "ceiling".to_string(),
                        value: Scalar::Text("low".to_string()),
                    }],
                ),
            ],
        );
        assert!(matches!(
            validate(&rs),
            Err(ValidationError::TypeConflict { .. })
        ));
    }

    #[test]
    fn ordering_against_derived_int_is_accepted() {
        let rs = Ruleset::new(
            "v1",
            vec![
                derivation(
                    "d1",
                    compare("flagged", CmpOp::Eq, Scalar::Bool(true)),
                    vec![Action::SetFact {
                        key: "ceiling".to_string(),
                        value: Scalar::Int(2),
                    }],
                ),
                gate(
                    "g1",
                    Condition::Compare {
                        left: Operand::Fact("tier".to_string()),
                        op: CmpOp::Gt,
                        right: Operand::Fact("ceiling".to_string()),
                    },
                ),
            ],
        );
        assert!(validate(&rs).is_ok());
    }
}
