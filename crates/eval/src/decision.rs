//! Decision construction from a completed trace.
//!
//! `decide` is a pure function of the trace -- no hidden state and no
//! re-evaluation of conditions. Gates were checked in `(priority, id)`
//! order, so the first fired gate entry in trace order is the
//! highest-priority veto.

use std::collections::BTreeSet;

use guardrail_core::{Action, RuleKind};

use crate::trace::EvaluationTrace;

/// Final outcome of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Approved,
    Rejected,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Approved => "APPROVED",
            Outcome::Rejected => "REJECTED",
        }
    }
}

/// The user-facing decision.
///
/// `contributing_rule_ids` is the full causal chain -- every rule that
/// fired during the run, derivations included, in firing order -- so an
/// auditor can see why a veto condition became true, not just which gate
/// pulled the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub outcome: Outcome,
    pub required_actions: BTreeSet<String>,
    pub veto_reason: Option<String>,
    pub contributing_rule_ids: Vec<String>,
}

impl Decision {
    /// Serialize to the stable audit JSON shape.
    pub fn to_json(&self) -> serde_json::Value {
        let required: Vec<&String> = self.required_actions.iter().collect();
        serde_json::json!({
            "outcome": self.outcome.as_str(),
            "required_actions": required,
            "veto_reason": self.veto_reason,
            "contributing_rule_ids": self.contributing_rule_ids,
        })
    }
}

/// Build the decision for a completed evaluation trace.
pub fn decide(trace: &EvaluationTrace) -> Decision {
    let contributing_rule_ids = trace.fired_rule_ids();

    // First fired gate in trace order = highest-priority fired gate.
    let veto_reason = trace
        .entries()
        .iter()
        .find(|e| e.kind == RuleKind::Gate && e.fired)
        .and_then(|entry| {
            entry.effects.iter().find_map(|eff| match &eff.action {
                Action::Veto { reason } => Some(reason.clone()),
                _ => None,
            })
        });

    if let Some(reason) = veto_reason {
        return Decision {
            outcome: Outcome::Rejected,
            required_actions: BTreeSet::new(),
            veto_reason: Some(reason),
            contributing_rule_ids,
        };
    }

    let mut required_actions = BTreeSet::new();
    for entry in trace.entries() {
        if !entry.fired {
            continue;
        }
        for eff in &entry.effects {
            if let Action::RequireAction { tag } = &eff.action {
                required_actions.insert(tag.clone());
            }
        }
    }

    Decision {
        outcome: Outcome::Approved,
        required_actions,
        veto_reason: None,
        contributing_rule_ids,
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
