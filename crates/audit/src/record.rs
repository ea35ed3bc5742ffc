//! Immutable, hash-verifiable audit records.
//!
//! A record captures one evaluation end to end: the input snapshot, the
//! full trace, and the decision, under an integrity hash computed over
//! the canonical serialization of all preceding fields. The canonical
//! form is compact JSON with lexicographically sorted keys --
//! `serde_json::Map` is backed by `BTreeMap`, so insertion order does not
//! matter and the map itself guarantees sorted output. The exported JSON
//! shape is stable across engine versions so historical archives remain
//! verifiable.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use guardrail_core::FactSet;
use guardrail_eval::{Decision, EvaluationTrace};

use crate::error::AuditError;

/// One evaluation's immutable audit artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: String,
    pub ruleset_version: String,
    pub input_facts: Value,
    pub trace: Value,
    pub decision: Value,
    pub integrity_hash: String,
}

/// Assemble an audit record stamped with the current UTC time.
pub fn record(
    ruleset_version: &str,
    input_facts: &FactSet,
    trace: &EvaluationTrace,
    decision: &Decision,
) -> AuditRecord {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|e| panic!("timestamp formatting error: {}", e));
    record_at(timestamp, ruleset_version, input_facts, trace, decision)
}

/// Assemble an audit record with an explicit RFC 3339 timestamp.
pub fn record_at(
    timestamp: String,
    ruleset_version: &str,
    input_facts: &FactSet,
    trace: &EvaluationTrace,
    decision: &Decision,
) -> AuditRecord {
    let input_facts = input_facts.to_json();
    let trace = trace.to_json();
    let decision = decision.to_json();
    let integrity_hash = hash_hex(&canonical_body(
        &timestamp,
        ruleset_version,
        &input_facts,
        &trace,
        &decision,
    ));
    AuditRecord {
        timestamp,
        ruleset_version: ruleset_version.to_string(),
        input_facts,
        trace,
        decision,
        integrity_hash,
    }
}

impl AuditRecord {
    /// Recompute the hash over this record's own fields (excluding the
    /// hash itself) and compare. Consumers call this before trusting a
    /// record as evidence.
    pub fn verify(&self) -> bool {
        let recomputed = hash_hex(&canonical_body(
            &self.timestamp,
            &self.ruleset_version,
            &self.input_facts,
            &self.trace,
            &self.decision,
        ));
        recomputed == self.integrity_hash
    }

    /// The persisted/exported JSON shape.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self)
            .unwrap_or_else(|e| panic!("serialization error building audit record: {}", e))
    }

    /// Read back a persisted record. Malformed documents are rejected;
    /// tampering is a separate concern checked by [`AuditRecord::verify`].
    pub fn from_json(v: &Value) -> Result<AuditRecord, AuditError> {
        serde_json::from_value(v.clone()).map_err(|e| AuditError::MalformedRecord {
            message: e.to_string(),
        })
    }
}

/// Verify a persisted/exported audit document without keeping the parsed
/// record around.
pub fn verify_json(v: &Value) -> Result<bool, AuditError> {
    Ok(AuditRecord::from_json(v)?.verify())
}

/// Canonical serialization of the hashed fields: compact JSON, keys
/// sorted by the backing BTreeMap.
fn canonical_body(
    timestamp: &str,
    ruleset_version: &str,
    input_facts: &Value,
    trace: &Value,
    decision: &Value,
) -> String {
    let mut body = Map::new();
    body.insert("decision".to_string(), decision.clone());
    body.insert("input_facts".to_string(), input_facts.clone());
    body.insert("ruleset_version".to_string(), Value::String(ruleset_version.to_string()));
    body.insert("timestamp".to_string(), Value::String(timestamp.to_string()));
    body.insert("trace".to_string(), trace.clone());
    serde_json::to_string(&Value::Object(body))
        .unwrap_or_else(|e| panic!("serialization error computing integrity hash: {}", e))
}

/// Lowercase hex SHA-256.
fn hash_hex(canonical: &str) -> String {
    let hash = Sha256::digest(canonical.as_bytes());
    format!("{:x}", hash)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
