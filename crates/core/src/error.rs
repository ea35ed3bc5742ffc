/// All errors that can be raised while loading or validating a ruleset.
///
/// Validation is fatal at load time: a ruleset failing any check is
/// rejected wholesale and evaluation never starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The bundle or facts document is structurally malformed JSON.
    #[error("malformed document: {message}")]
    Malformed { message: String },

    /// Two rules share an id. Rule ids must be globally unique and stable
    /// across ruleset versions.
    #[error("duplicate rule id: {rule_id}")]
    DuplicateRuleId { rule_id: String },

    /// A rule carries an action its kind does not permit.
    #[error("rule '{rule_id}': {kind} rule may not carry a {action} action")]
    ActionKindMismatch {
        rule_id: String,
        kind: &'static str,
        action: &'static str,
    },

    /// A rule declares no actions at all.
    #[error("rule '{rule_id}' has no actions")]
    EmptyActions { rule_id: String },

    /// An IN membership list is empty or mixes scalar types.
    #[error("rule '{rule_id}': IN list must be non-empty and homogeneous")]
    BadInList { rule_id: String },

    /// An ordering comparison is applied to a non-Int literal.
    #[error("rule '{rule_id}': ordering comparison requires Int operands, found {found}")]
    NonIntOrdering { rule_id: String, found: String },

    /// A literal comparison disagrees with the statically-known type of a
    /// fact key (established by a SetFact action elsewhere in the ruleset).
    #[error("rule '{rule_id}': fact '{key}' is {declared} but compared against a {found} literal")]
    TypeConflict {
        rule_id: String,
        key: String,
        declared: String,
        found: String,
    },
}
