//! Evaluation traces.
//!
//! The trace is the engine's complete account of a run: one entry per
//! rule per pass, recorded whether or not the rule fired, with the
//! three-valued condition outcome and every applied effect. The decision
//! builder and the audit recorder both consume the trace; neither
//! re-evaluates anything.

use guardrail_core::{Action, RuleKind, Scalar, Truth};

/// A single applied effect. For SetFact, `previous` records the value
/// being overwritten so overwrites are visible in the trace rather than
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectRecord {
    pub action: Action,
    pub previous: Option<Scalar>,
}

impl EffectRecord {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "action": self.action.to_json(),
            "previous": match &self.previous {
                Some(v) => v.to_json(),
                None => serde_json::Value::Null,
            },
        })
    }
}

/// One rule evaluation within one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    /// Pass number, starting at 1. Gate entries carry the pass number
    /// following the final derivation pass.
    pub pass: u32,
    pub rule_id: String,
    pub kind: RuleKind,
    pub priority: i64,
    pub condition: Truth,
    pub fired: bool,
    pub effects: Vec<EffectRecord>,
}

impl TraceEntry {
    pub fn to_json(&self) -> serde_json::Value {
        let effects: Vec<serde_json::Value> =
            self.effects.iter().map(EffectRecord::to_json).collect();
        serde_json::json!({
            "pass": self.pass,
            "rule_id": self.rule_id,
            "kind": self.kind.as_str(),
            "priority": self.priority,
            "condition": self.condition.as_str(),
            "fired": self.fired,
            "effects": effects,
        })
    }
}

/// Ordered log of every rule evaluation in a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvaluationTrace(pub Vec<TraceEntry>);

impl EvaluationTrace {
    pub fn new() -> Self {
        EvaluationTrace(Vec::new())
    }

    pub fn push(&mut self, entry: TraceEntry) {
        self.0.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rule ids that fired, in firing order, first firing only.
    pub fn fired_rule_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for entry in &self.0 {
            if entry.fired && !ids.contains(&entry.rule_id) {
                ids.push(entry.rule_id.clone());
            }
        }
        ids
    }

    /// Serialize to the stable audit JSON shape.
    pub fn to_json(&self) -> serde_json::Value {
        let entries: Vec<serde_json::Value> = self.0.iter().map(TraceEntry::to_json).collect();
        serde_json::json!({ "entries": entries })
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pass: u32, rule_id: &str, fired: bool) -> TraceEntry {
        TraceEntry {
            pass,
            rule_id: rule_id.to_string(),
            kind: RuleKind::Derivation,
            priority: 10,
            condition: if fired { Truth::True } else { Truth::False },
            fired,
            effects: vec![],
        }
    }

    #[test]
    fn fired_rule_ids_keeps_first_firing_only() {
        let mut trace = EvaluationTrace::new();
        trace.push(entry(1, "a", true));
        trace.push(entry(1, "b", false));
        trace.push(entry(2, "a", true));
        trace.push(entry(2, "b", true));
        assert_eq!(trace.fired_rule_ids(), vec!["a", "b"]);
    }

    #[test]
    fn entry_json_records_condition_distinctly() {
        let mut e = entry(1, "r1", false);
        e.condition = Truth::Unknown;
        let json = e.to_json();
        assert_eq!(json["condition"], "unknown");
        assert_eq!(json["fired"], false);
    }

    #[test]
    fn effect_json_records_overwrite() {
        let eff = EffectRecord {
            action: Action::SetFact {
                key: "ceiling".to_string(),
                value: Scalar::Int(2),
            },
            previous: Some(Scalar::Int(4)),
        };
        let json = eff.to_json();
        assert_eq!(json["action"]["kind"], "set_fact");
        assert_eq!(json["previous"]["value"], 4);
    }
}
