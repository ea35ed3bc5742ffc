/// Errors raised while reading back a persisted audit record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    /// The document is missing a required field or carries the wrong type.
    #[error("malformed audit record: {message}")]
    MalformedRecord { message: String },
}
