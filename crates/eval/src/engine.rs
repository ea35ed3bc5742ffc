//! Deterministic forward-chaining to fixpoint, then a single gate pass.
//!
//! Derivation rules run in `(priority, id)` order each pass, accumulating
//! derived facts into a private working copy of the input snapshot. When
//! a full pass changes nothing the derived state is stable, and every
//! gate rule is checked exactly once against it -- gates never derive
//! facts and never re-trigger derivation rules, so a derived constraint
//! is guaranteed stable before any terminal veto check runs.

use guardrail_core::{Action, FactSet, Rule, RuleKind, Ruleset};

use crate::error::EvalError;
use crate::predicate::eval_condition;
use crate::trace::{EffectRecord, EvaluationTrace, TraceEntry};

/// Default pass budget. Rulesets needing more passes than this to settle
/// are treated as cyclic.
pub const MAX_PASSES: u32 = 10;

/// Result of a completed evaluation: the full trace plus the fixpoint
/// fact set (input facts and everything derived from them).
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub trace: EvaluationTrace,
    pub facts: FactSet,
}

/// The evaluation engine. Construction-time configuration only; a single
/// engine value is immutable and may be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    max_passes: u32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Engine {
        Engine {
            max_passes: MAX_PASSES,
        }
    }

    /// Override the pass budget. This is an operator knob, never a
    /// per-request input.
    pub fn with_max_passes(max_passes: u32) -> Engine {
        Engine { max_passes }
    }

    /// Evaluate a ruleset against an input snapshot.
    ///
    /// Pure: the input fact set is never mutated, and repeated calls with
    /// the same inputs produce identical traces. Returns `CycleDetected`
    /// if the derivation rules do not reach a fixpoint within the pass
    /// budget; in that case no trace is returned.
    pub fn evaluate(&self, ruleset: &Ruleset, input: &FactSet) -> Result<Evaluation, EvalError> {
        let mut working = input.clone();
        let mut trace = EvaluationTrace::new();
        let mut settled_at: Option<u32> = None;

        for pass in 1..=self.max_passes {
            let mut changed = false;
            for rule in ruleset.derivations() {
                let condition = eval_condition(&rule.condition, &working, &rule.id)?;
                let fired = condition.is_true();
                let effects = if fired {
                    apply_derivation(rule, &mut working, &mut changed)
                } else {
                    Vec::new()
                };
                trace.push(TraceEntry {
                    pass,
                    rule_id: rule.id.clone(),
                    kind: RuleKind::Derivation,
                    priority: rule.priority,
                    condition,
                    fired,
                    effects,
                });
            }
            if !changed {
                settled_at = Some(pass);
                break;
            }
        }

        let fixpoint_pass = settled_at.ok_or(EvalError::CycleDetected {
            passes: self.max_passes,
        })?;

        // Single gate pass against the fixpoint facts.
        let gate_pass = fixpoint_pass + 1;
        for rule in ruleset.gates() {
            let condition = eval_condition(&rule.condition, &working, &rule.id)?;
            let fired = condition.is_true();
            let effects = if fired {
                rule.actions
                    .iter()
                    .map(|action| EffectRecord {
                        action: action.clone(),
                        previous: None,
                    })
                    .collect()
            } else {
                Vec::new()
            };
            trace.push(TraceEntry {
                pass: gate_pass,
                rule_id: rule.id.clone(),
                kind: RuleKind::Gate,
                priority: rule.priority,
                condition,
                fired,
                effects,
            });
        }

        Ok(Evaluation {
            trace,
            facts: working,
        })
    }
}

/// Apply a fired derivation rule's actions to the working facts.
/// A SetFact only marks the pass as changed when the value differs from
/// the prior value for that key; overwrites are recorded on the effect.
fn apply_derivation(rule: &Rule, working: &mut FactSet, changed: &mut bool) -> Vec<EffectRecord> {
    let mut effects = Vec::with_capacity(rule.actions.len());
    for action in &rule.actions {
        match action {
            Action::SetFact { key, value } => {
                let previous = working.insert(key.clone(), value.clone());
                if previous.as_ref() != Some(value) {
                    *changed = true;
                }
                effects.push(EffectRecord {
                    action: action.clone(),
                    previous,
                });
            }
            Action::RequireAction { .. } => {
                effects.push(EffectRecord {
                    action: action.clone(),
                    previous: None,
                });
            }
            // Validation guarantees no Veto on a derivation rule.
            Action::Veto { .. } => {}
        }
    }
    effects
}

/// Evaluate with the default pass budget.
pub fn evaluate(ruleset: &Ruleset, input: &FactSet) -> Result<Evaluation, EvalError> {
    Engine::new().evaluate(ruleset, input)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
