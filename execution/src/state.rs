//! Per-session strategy state.
//!
//! The engine hands each session's [`StrategyState`] to its strategy by exclusive reference every
//! round and otherwise never looks inside. Progressions, streak counters, session highs and
//! similar bookkeeping all live here under keys the strategy chooses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque key-value store owned by one strategy for one session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyState {
    entries: Map<String, Value>,
}

impl StrategyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_f64_or(&self, key: &str, default: f64) -> f64 {
        self.get_f64(key).unwrap_or(default)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Numeric list stored under `key` (e.g. a Labouchere line). Non-numeric items are skipped.
    pub fn get_f64_list(&self, key: &str) -> Option<Vec<f64>> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_f64).collect())
    }

    /// Add `delta` to the number under `key` (missing counts as 0) and return the new value.
    pub fn add_f64(&mut self, key: &str, delta: f64) -> f64 {
        let next = self.get_f64_or(key, 0.0) + delta;
        self.set(key, next);
        next
    }

    /// Increment the counter under `key` and return the new count.
    pub fn increment(&mut self, key: &str) -> u64 {
        let next = self.get_u64(key).unwrap_or(0).saturating_add(1);
        self.set(key, next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_accessors() {
        let mut state = StrategyState::new();
        assert!(state.is_empty());

        state.set("unit", 5.0);
        state.set("losses", 3u64);
        state.set("active", true);
        state.set("target", "red");
        state.set("line", json!([1, 2, 3]));

        assert_eq!(state.get_f64("unit"), Some(5.0));
        assert_eq!(state.get_u64("losses"), Some(3));
        assert_eq!(state.get_i64("losses"), Some(3));
        assert_eq!(state.get_bool("active"), Some(true));
        assert_eq!(state.get_str("target"), Some("red"));
        assert_eq!(state.get_f64_list("line"), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(state.get_f64("missing"), None);
        assert_eq!(state.get_f64_or("missing", 2.5), 2.5);
        assert_eq!(state.get_bool("unit"), None);
        assert_eq!(state.len(), 5);
    }

    #[test]
    fn test_counters() {
        let mut state = StrategyState::new();
        assert_eq!(state.increment("streak"), 1);
        assert_eq!(state.increment("streak"), 2);
        assert_eq!(state.add_f64("profit", 5.0), 5.0);
        assert_eq!(state.add_f64("profit", -7.5), -2.5);

        assert!(state.contains("streak"));
        state.remove("streak");
        assert!(!state.contains("streak"));
        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut state = StrategyState::new();
        state.set("step", 2u64);
        assert_eq!(serde_json::to_value(&state).unwrap(), json!({ "step": 2 }));
    }
}
