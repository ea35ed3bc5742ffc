//! Guardrail rule evaluator -- accepts a validated ruleset + fact
//! snapshot, produces a full evaluation trace and a decision.
//!
//! Evaluation is a pure, synchronous computation: no I/O, no suspension
//! points, no shared mutable state beyond the read-only
//! [`Ruleset`](guardrail_core::Ruleset).
//! Multiple evaluations for different fact sets may run fully in parallel
//! against the same loaded ruleset.

pub mod decision;
pub mod engine;
pub mod error;
pub mod predicate;
pub mod trace;

pub use decision::{decide, Decision, Outcome};
pub use engine::{evaluate, Engine, Evaluation, MAX_PASSES};
pub use error::EvalError;
pub use trace::{EffectRecord, EvaluationTrace, TraceEntry};

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod integration_tests {
    use super::*;
    use guardrail_core::{bundle, FactSet};

    /// The cross-border bond scenario, end to end: a prior rejection
    /// derives a complexity ceiling, and the gate vetoes the tier-3
    /// product against it.
    #[test]
    fn bond_scenario_vetoes_with_full_causal_chain() {
        let ruleset = bundle::load_ruleset(&serde_json::json!({
            "version": "cross_border_bond@test",
            "rules": [
                {
                    "id": "R1",
                    "priority": 10,
                    "kind": "derivation",
                    "condition": {
                        "op": "and",
                        "left": {
                            "left": { "fact_ref": "citizenship" },
                            "op": "=",
                            "right": { "literal": "US" }
                        },
                        "right": {
                            "op": "in",
                            "left": { "fact_ref": "account_domicile" },
                            "values": ["Germany", "France", "Netherlands"]
                        }
                    },
                    "actions": [
                        { "kind": "require_action", "tag": "apply_tax_treaty_402B" }
                    ]
                },
                {
                    "id": "R2",
                    "priority": 20,
                    "kind": "derivation",
                    "condition": {
                        "left": { "fact_ref": "prior_complex_derivatives_rejected" },
                        "op": "=",
                        "right": { "literal": true }
                    },
                    "actions": [
                        { "kind": "set_fact", "key": "max_complexity_tier", "value": 2 }
                    ]
                },
                {
                    "id": "R3",
                    "priority": 30,
                    "kind": "gate",
                    "condition": {
                        "left": { "fact_ref": "product_complexity_tier" },
                        "op": ">",
                        "right": { "fact_ref": "max_complexity_tier" }
                    },
                    "actions": [
                        {
                            "kind": "veto",
                            "reason": "complexity_tier 3 exceeds max_complexity_tier 2"
                        }
                    ]
                }
            ]
        }))
        .unwrap();

        let facts = FactSet::from_json(&serde_json::json!({
            "citizenship": "US",
            "account_domicile": "Germany",
            "product": { "kind": "tag_value", "value": "EM_HY_bond" },
            "product_complexity_tier": 3,
            "prior_complex_derivatives_rejected": true
        }))
        .unwrap();

        let result = evaluate(&ruleset, &facts).unwrap();
        let decision = decide(&result.trace);

        assert_eq!(decision.outcome, Outcome::Rejected);
        assert!(decision.veto_reason.as_deref().unwrap().contains("exceeds"));
        // Causal chain: R1 and R2 fired before the gate, in firing order
        assert_eq!(decision.contributing_rule_ids, vec!["R1", "R2", "R3"]);
    }

    /// Same ruleset, no prior rejection: the ceiling is never derived, so
    /// the gate condition resolves to Unknown and the case is approved.
    #[test]
    fn unknown_gate_premise_approves() {
        let ruleset = bundle::load_ruleset(&serde_json::json!({
            "version": "cross_border_bond@test",
            "rules": [
                {
                    "id": "R2",
                    "priority": 20,
                    "kind": "derivation",
                    "condition": {
                        "left": { "fact_ref": "prior_complex_derivatives_rejected" },
                        "op": "=",
                        "right": { "literal": true }
                    },
                    "actions": [
                        { "kind": "set_fact", "key": "max_complexity_tier", "value": 2 }
                    ]
                },
                {
                    "id": "R3",
                    "priority": 30,
                    "kind": "gate",
                    "condition": {
                        "left": { "fact_ref": "product_complexity_tier" },
                        "op": ">",
                        "right": { "fact_ref": "max_complexity_tier" }
                    },
                    "actions": [
                        { "kind": "veto", "reason": "tier exceeds ceiling" }
                    ]
                }
            ]
        }))
        .unwrap();

        let facts = FactSet::from_json(&serde_json::json!({
            "citizenship": "US",
            "product_complexity_tier": 3,
            "prior_complex_derivatives_rejected": false
        }))
        .unwrap();

        let result = evaluate(&ruleset, &facts).unwrap();
        let gate_entry = result
            .trace
            .entries()
            .iter()
            .find(|e| e.rule_id == "R3")
            .unwrap();
        assert_eq!(gate_entry.condition, guardrail_core::Truth::Unknown);
        assert!(!gate_entry.fired);

        let decision = decide(&result.trace);
        assert_eq!(decision.outcome, Outcome::Approved);
        assert_eq!(decision.veto_reason, None);
    }
}
