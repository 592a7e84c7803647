//! Registered environment variables.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{ParseError, ParseResult};
use crate::value::{Value, ValueType};

#[derive(Debug, Clone, PartialEq)]
pub struct EnvVar {
    name: String,
    description: String,
    value_type: ValueType,
    required: bool,
    default: Option<Value>,
}

impl EnvVar {
    pub fn builder(name: impl Into<String>) -> EnvVarBuilder {
        EnvVarBuilder {
            var: EnvVar {
                name: name.into(),
                description: String::new(),
                value_type: ValueType::String,
                required: true,
                default: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Required unless marked otherwise or given a default.
    pub fn is_required(&self) -> bool {
        self.required && self.default.is_none()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct EnvVarBuilder {
    var: EnvVar,
}

impl EnvVarBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.var.description = description.into();
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.var.value_type = value_type;
        self
    }

    pub fn kind(self, name: &str) -> Self {
        self.value_type(ValueType::parse_name(name))
    }

    pub fn required(mut self, required: bool) -> Self {
        self.var.required = required;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.var.default = Some(value.into());
        self
    }

    pub fn build(self) -> ParseResult<EnvVar> {
        if self.var.name.trim().is_empty() {
            return Err(ParseError::config("every environment variable must have a name"));
        }
        Ok(self.var)
    }
}

/// Resolve `vars` against a snapshot of the environment.
///
/// An empty value counts as unset. Unset optional variables fall back to
/// their default or stay absent.
pub(crate) fn parse_env(
    source: &[(String, String)],
    vars: &[EnvVar],
) -> ParseResult<IndexMap<String, Value>> {
    let mut values = IndexMap::new();
    for var in vars {
        let raw = source
            .iter()
            .rev()
            .find(|(key, value)| key == &var.name && !value.is_empty())
            .map(|(_, value)| value.as_str());
        match raw {
            Some(raw) => {
                let value = var.value_type.coerce(raw).map_err(|e| {
                    ParseError::invalid(format!("Environment Variable {}: {}", var.name, e.message()))
                })?;
                trace!(name = %var.name, "env var resolved");
                values.insert(var.name.clone(), value);
            }
            None => {
                if let Some(default) = &var.default {
                    values.insert(var.name.clone(), default.clone());
                } else if var.required {
                    return Err(ParseError::invalid(format!(
                        "The Environment Variable {} must be set.",
                        var.name
                    )));
                }
            }
        }
    }
    Ok(values)
}
