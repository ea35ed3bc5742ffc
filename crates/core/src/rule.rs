//! Rules and rulesets.
//!
//! A rule pairs a condition with an ordered action sequence. DERIVATION
//! rules add facts and required actions during forward chaining; GATE
//! rules can only veto and run once against the fixpoint. The kind/action
//! pairing is a static validity invariant checked at load time.

use crate::condition::Condition;
use crate::value::Scalar;

/// What a rule is allowed to do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Derivation,
    Gate,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Derivation => "derivation",
            RuleKind::Gate => "gate",
        }
    }
}

/// A rule action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Derivation only: set (or overwrite) a working fact.
    SetFact { key: String, value: Scalar },
    /// Derivation only: accumulate a required-action tag.
    RequireAction { tag: String },
    /// Gate only: terminal veto with a human-readable reason.
    Veto { reason: String },
}

impl Action {
    pub fn kind_str(&self) -> &'static str {
        match self {
            Action::SetFact { .. } => "set_fact",
            Action::RequireAction { .. } => "require_action",
            Action::Veto { .. } => "veto",
        }
    }

    /// Serialize to the canonical kind-tagged JSON form used in traces
    /// and audit records.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Action::SetFact { key, value } => serde_json::json!({
                "kind": "set_fact",
                "key": key,
                "value": value.to_json(),
            }),
            Action::RequireAction { tag } => serde_json::json!({
                "kind": "require_action",
                "tag": tag,
            }),
            Action::Veto { reason } => serde_json::json!({
                "kind": "veto",
                "reason": reason,
            }),
        }
    }
}

/// A single policy rule.
///
/// `id` is globally unique and stable across ruleset versions; `priority`
/// orders evaluation (ascending, ties broken by lexical id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: String,
    pub priority: i64,
    pub kind: RuleKind,
    pub condition: Condition,
    pub actions: Vec<Action>,
}

/// An ordered, versioned, immutable collection of rules.
///
/// Rules are held in the deterministic `(priority, id)` total order from
/// the moment of construction; evaluation never re-sorts. A Ruleset is
/// safe for concurrent read-only use once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    version: String,
    rules: Vec<Rule>,
}

impl Ruleset {
    /// Assemble a ruleset, establishing the `(priority, id)` order.
    pub fn new(version: impl Into<String>, mut rules: Vec<Rule>) -> Ruleset {
        rules.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));
        Ruleset {
            version: version.into(),
            rules,
        }
    }

    /// Opaque version identifier, recorded in audit records.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Derivation rules in evaluation order.
    pub fn derivations(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.kind == RuleKind::Derivation)
    }

    /// Gate rules in evaluation order.
    pub fn gates(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.kind == RuleKind::Gate)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
