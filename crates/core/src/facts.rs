//! Fact sets: the immutable case snapshot handed to the engine.
//!
//! A FactSet is a mapping from unique keys to scalar values. Insertion
//! order is irrelevant; the backing BTreeMap gives deterministic,
//! lexicographic iteration and serialization order.

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::value::Scalar;

/// A set of fact values keyed by fact id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FactSet(BTreeMap<String, Scalar>);

impl FactSet {
    pub fn new() -> Self {
        FactSet(BTreeMap::new())
    }

    /// Look up a fact by key. A missing key is not an error; condition
    /// evaluation resolves it to Unknown.
    pub fn lookup(&self, key: &str) -> Option<&Scalar> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a fact in place. Used by the engine on its private working
    /// copy; callers holding a snapshot should prefer [`FactSet::with`].
    pub fn insert(&mut self, key: String, value: Scalar) -> Option<Scalar> {
        self.0.insert(key, value)
    }

    /// Copy-on-write insertion: returns a new FactSet with the fact set,
    /// leaving this snapshot untouched.
    pub fn with(&self, key: &str, value: Scalar) -> FactSet {
        let mut next = self.clone();
        next.0.insert(key.to_string(), value);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Scalar)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys present in this set, in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Parse a facts document: a flat JSON object mapping fact keys to
    /// scalar values (plain or kind-tagged).
    pub fn from_json(v: &serde_json::Value) -> Result<FactSet, ValidationError> {
        let obj = v.as_object().ok_or_else(|| ValidationError::Malformed {
            message: "facts document must be a JSON object".to_string(),
        })?;
        let mut facts = FactSet::new();
        for (key, value) in obj {
            let scalar = Scalar::from_json(value).map_err(|e| ValidationError::Malformed {
                message: format!("fact '{}': {}", key, e),
            })?;
            facts.0.insert(key.clone(), scalar);
        }
        Ok(facts)
    }

    /// Serialize to the canonical kind-tagged JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.0 {
            map.insert(key.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
