use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{BuildError, BuildResult};

/// How to treat a present key whose value has the wrong type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldPolicy {
    /// Treat the key as absent and log a warning.
    #[default]
    Lenient,
    /// Fail with `BuildError::InvalidField`.
    Strict,
}

/// A loosely typed, string-keyed node description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Description {
    fields: Map<String, Value>,
    policy: FieldPolicy,
}

impl Description {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            policy: FieldPolicy::default(),
        }
    }

    pub fn from_value(value: Value) -> BuildResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            _ => Err(BuildError::InvalidField {
                key: "<root>".to_string(),
                expected: "a mapping",
            }),
        }
    }

    pub fn from_json_str(json: &str) -> BuildResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(|_| BuildError::InvalidField {
            key: "<root>".to_string(),
            expected: "a JSON mapping",
        })?;
        Self::from_value(value)
    }

    pub fn with_policy(mut self, policy: FieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FieldPolicy {
        self.policy
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &'static str,
        convert: impl FnOnce(&'a Value) -> Option<T>,
    ) -> BuildResult<Option<T>> {
        let Some(value) = self.fields.get(key) else {
            return Ok(None);
        };

        match convert(value) {
            Some(converted) => Ok(Some(converted)),
            None => match self.policy {
                FieldPolicy::Lenient => {
                    log::warn!("Ignoring field `{key}`: expected {expected}, got {value}");
                    Ok(None)
                }
                FieldPolicy::Strict => Err(BuildError::InvalidField {
                    key: key.to_string(),
                    expected,
                }),
            },
        }
    }

    pub fn get_str(&self, key: &str) -> BuildResult<Option<&str>> {
        self.typed(key, "a string", Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> BuildResult<Option<i64>> {
        self.typed(key, "an integer", Value::as_i64)
    }

    /// Integers are accepted wherever a float is expected.
    pub fn get_f64(&self, key: &str) -> BuildResult<Option<f64>> {
        self.typed(key, "a number", Value::as_f64)
    }

    pub fn get_f32(&self, key: &str) -> BuildResult<Option<f32>> {
        Ok(self.get_f64(key)?.map(|value| value as f32))
    }

    pub fn get_bool(&self, key: &str) -> BuildResult<Option<bool>> {
        self.typed(key, "a boolean", Value::as_bool)
    }

    /// Nested mappings inherit this description's policy.
    pub fn get_map(&self, key: &str) -> BuildResult<Option<Description>> {
        let policy = self.policy;
        self.typed(key, "a mapping", |value| {
            value
                .as_object()
                .map(|fields| Description::new(fields.clone()).with_policy(policy))
        })
    }

    /// Fixed-size numeric array, e.g. a 4x4 matrix or a 3-vector.
    pub fn get_f32_array_exact<const N: usize>(&self, key: &str) -> BuildResult<Option<[f32; N]>> {
        self.typed(key, "a fixed-size array of numbers", |value| {
            let items = value.as_array()?;
            if items.len() != N {
                return None;
            }
            let mut out = [0.0; N];
            for (slot, item) in out.iter_mut().zip(items) {
                *slot = item.as_f64()? as f32;
            }
            Some(out)
        })
    }

    pub fn get_array(&self, key: &str) -> BuildResult<Option<&Vec<Value>>> {
        self.typed(key, "an array", Value::as_array)
    }

    pub fn require_str(&self, key: &str) -> BuildResult<&str> {
        self.required(key, "a string", Value::as_str)
    }

    pub fn require_i64(&self, key: &str) -> BuildResult<i64> {
        self.required(key, "an integer", Value::as_i64)
    }

    /// Required fields always fail on a type mismatch, regardless of policy.
    fn required<'a, T>(
        &'a self,
        key: &str,
        expected: &'static str,
        convert: impl FnOnce(&'a Value) -> Option<T>,
    ) -> BuildResult<T> {
        let value = self
            .fields
            .get(key)
            .ok_or_else(|| BuildError::MissingField(key.to_string()))?;

        convert(value).ok_or_else(|| BuildError::InvalidField {
            key: key.to_string(),
            expected,
        })
    }
}
