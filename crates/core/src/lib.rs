//! guardrail-core: policy data model for the Guardrail rule engine.
//!
//! Provides the typed fact store, the condition expression tree, the
//! rule/ruleset model, JSON bundle loading, and one-time load validation.
//! Evaluation lives in `guardrail-eval`; this crate only defines what a
//! well-formed policy is.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`Scalar`], [`FactSet`] -- typed key/value observations about a case
//! - [`Condition`], [`Truth`] -- three-valued condition expression trees
//! - [`Rule`], [`Ruleset`], [`Action`], [`RuleKind`] -- the policy model
//! - [`validate()`] -- whole-ruleset load-time validation
//! - [`ValidationError`] -- load/validation error type

pub mod bundle;
pub mod condition;
pub mod error;
pub mod facts;
pub mod rule;
pub mod validate;
pub mod value;

pub use bundle::{load_ruleset, parse_ruleset};
pub use condition::{CmpOp, Condition, Operand, Truth};
pub use error::ValidationError;
pub use facts::FactSet;
pub use rule::{Action, Rule, RuleKind, Ruleset};
pub use validate::validate;
pub use value::Scalar;
