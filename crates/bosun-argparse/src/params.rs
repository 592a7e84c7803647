use indexmap::IndexMap;
use serde::Serialize;

use crate::value::Value;

/// Result of one parse: element name to parsed value, in the order the
/// values were resolved.
///
/// A name that is missing entirely was never resolved (for example an
/// optional option without a default), which is different from
/// [`Value::Null`] (a zero-or-more option triggered without values).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Params {
    values: IndexMap<String, Value>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    env: IndexMap<String, Value>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_list)
    }

    /// Whether a flag (or any other value) under `name` is truthy.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_truthy)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Value of a registered env var.
    pub fn env(&self, name: &str) -> Option<&Value> {
        self.env.get(name)
    }

    pub fn env_str(&self, name: &str) -> Option<&str> {
        self.env(name).and_then(Value::as_str)
    }

    pub fn env_vars(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.env.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Overwrite with every value of `other`, later values win.
    pub fn merge(&mut self, other: IndexMap<String, Value>) {
        self.values.extend(other);
    }

    pub(crate) fn set_env(&mut self, env: IndexMap<String, Value>) {
        self.env = env;
    }
}
