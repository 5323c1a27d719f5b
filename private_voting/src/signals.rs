//! The input contract of the vote circuit and the interface of the proving
//! engine that consumes it.

use indexmap::IndexMap;
use serde_json::Value;

/// Named circuit inputs, in circuit order. Every field element is a decimal
/// string reduced modulo the BN254 scalar field; arrays nest as JSON arrays.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct CircuitSignals(IndexMap<String, Value>);

impl CircuitSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: Value) {
        self.0.insert(name.to_owned(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

/// Public outputs of a proof, as decimal strings.
pub type PublicSignals = Vec<String>;

/// A zero knowledge proving system able to prove and verify the vote circuit.
pub trait ProvingEngine {
    type Proof;
    type VerificationKey;
    type Error: std::error::Error;

    /// Compute the witness for `signals` and prove it.
    fn full_prove(
        &self,
        signals: &CircuitSignals,
    ) -> Result<(Self::Proof, PublicSignals), Self::Error>;

    fn verify(
        &self,
        verification_key: &Self::VerificationKey,
        public_signals: &PublicSignals,
        proof: &Self::Proof,
    ) -> Result<bool, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signals_keep_insertion_order() {
        let mut signals = CircuitSignals::new();
        signals.insert("b", json!("2"));
        signals.insert("a", json!(["1", "3"]));
        signals.insert("voterIndex", json!(4));

        assert_eq!(signals.names().collect::<Vec<_>>(), vec!["b", "a", "voterIndex"]);
        assert_eq!(
            signals.to_json().unwrap(),
            r#"{"b":"2","a":["1","3"],"voterIndex":4}"#
        );
        assert_eq!(signals.get("a"), Some(&json!(["1", "3"])));
    }
}
