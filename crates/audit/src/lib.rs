//! guardrail-audit: tamper-evident audit records.
//!
//! Serializes a full evaluation run -- inputs, trace, decision -- into an
//! immutable record whose integrity hash lets downstream consumers detect
//! post-hoc tampering before trusting it as evidence. Records are emitted
//! once per evaluation and are append-only from the caller's perspective.

pub mod error;
pub mod record;

pub use error::AuditError;
pub use record::{record, record_at, verify_json, AuditRecord};
