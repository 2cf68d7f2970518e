//! Delta records published to the data bus.

use serde::Serialize;
use serde_json::Value;

/// A single key/value fact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathValue {
    pub path: String,
    pub value: Value,
}

impl PathValue {
    pub fn new(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// A batch of facts published together.
///
/// Serializes as `{"updates":[{"values":[{"path":..,"value":..}, ...]}]}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta {
    values: Vec<PathValue>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    updates: [Update<'a>; 1],
}

#[derive(Serialize)]
struct Update<'a> {
    values: &'a [PathValue],
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, builder style.
    pub fn with(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(path, value);
        self
    }

    pub fn push(&mut self, path: impl Into<String>, value: impl Into<Value>) {
        self.values.push(PathValue::new(path, value));
    }

    pub fn values(&self) -> &[PathValue] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up the value published for a path, if any.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|v| v.path == path)
            .map(|v| &v.value)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&Envelope {
            updates: [Update {
                values: &self.values,
            }],
        })
    }
}
