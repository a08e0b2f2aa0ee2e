//! Per-call operation configuration.
//!
//! A flat string-keyed map consumed by exactly one operation invocation.
//! Operations read the keys they recognize and fall back to documented
//! defaults; unrecognized keys are ignored. The map is built once and
//! never mutated afterwards — composite operations build a fresh value per
//! sub-step instead of patching shared state.

use std::collections::BTreeMap;

use serde_json::Value;

/// Read-only option map for a single operation invocation.
#[derive(Debug, Clone, Default)]
pub struct OpConfig {
    params: BTreeMap<String, Value>,
}

impl OpConfig {
    /// Create an empty configuration; every option falls back to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Consumes and returns `self` so configurations
    /// are assembled in one expression and stay immutable afterwards.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Raw value lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when no options are set.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Numeric option as f32. Integers are widened.
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.params.get(key)?.as_f64().map(|v| v as f32)
    }

    /// Numeric option as i64.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.params.get(key)?.as_i64()
    }

    /// Numeric option as u32. Negative or oversized values read as absent.
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.params
            .get(key)?
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
    }

    /// String option.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.params.get(key)?.as_str()
    }

    /// A `(width, height)` pair.
    ///
    /// Accepts a two-element array `[w, h]`, a single integer `n`
    /// (read as `(n, n)`), or a string of the form `"WxH"`.
    pub fn get_pair(&self, key: &str) -> Option<(u32, u32)> {
        match self.params.get(key)? {
            Value::Array(items) if items.len() == 2 => {
                let w = items[0].as_u64().and_then(|v| u32::try_from(v).ok())?;
                let h = items[1].as_u64().and_then(|v| u32::try_from(v).ok())?;
                Some((w, h))
            }
            Value::Number(n) => {
                let v = n.as_u64().and_then(|v| u32::try_from(v).ok())?;
                Some((v, v))
            }
            Value::String(s) => {
                let (w, h) = s.split_once('x')?;
                Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
            }
            _ => None,
        }
    }
}
