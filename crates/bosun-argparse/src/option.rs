//! Value-taking switches and the extractor that consumes them.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{ParseError, ParseResult};
use crate::stream::TokenStream;
use crate::trigger;
use crate::value::{Value, ValueType};

/// How many value tokens an option consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arity {
    /// One value, stored as a scalar.
    #[default]
    One,
    /// Exactly N values, stored as a list.
    Fixed(usize),
    /// Any number of values; none is stored as null.
    ZeroOrMore,
    /// One or more values, stored as a list.
    AtLeastOne,
    /// The legacy `-1` length: any number of values stored as a list. An
    /// empty run fails only when the option is required.
    Unbounded,
}

impl FromStr for Arity {
    type Err = ParseError;

    /// `*`, `+`, a positive count, or the legacy `-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "*" => Ok(Self::ZeroOrMore),
            "-1" => Ok(Self::Unbounded),
            "+" => Ok(Self::AtLeastOne),
            other => match other.parse::<usize>() {
                Ok(0) => Err(ParseError::config(
                    "an option arity of 0 consumes nothing, use a flag instead",
                )),
                Ok(1) => Ok(Self::One),
                Ok(n) => Ok(Self::Fixed(n)),
                Err(_) => Err(ParseError::config(format!("'{other}' is not a valid arity"))),
            },
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("1"),
            Self::Fixed(n) => write!(f, "{n}"),
            Self::ZeroOrMore => f.write_str("*"),
            Self::AtLeastOne => f.write_str("+"),
            Self::Unbounded => f.write_str("-1"),
        }
    }
}

/// A registered option. Build one with [`OptionDef::builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDef {
    name: String,
    description: String,
    short: Option<String>,
    long: Option<String>,
    value_type: ValueType,
    arity: Arity,
    required: bool,
    default: Option<Value>,
}

impl OptionDef {
    pub fn builder(name: impl Into<String>) -> OptionBuilder {
        OptionBuilder {
            def: OptionDef {
                name: name.into(),
                description: String::new(),
                short: None,
                long: None,
                value_type: ValueType::String,
                arity: Arity::One,
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

    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Whether an absent trigger fails the parse. A default wins over this.
    pub fn is_required(&self) -> bool {
        self.required && self.default.is_none()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub(crate) fn triggers(&self) -> String {
        trigger::display(self.short(), self.long())
    }

    fn locate(&self, stream: &TokenStream) -> Option<usize> {
        self.short()
            .and_then(|s| stream.position(s))
            .or_else(|| self.long().and_then(|l| stream.position(l)))
    }

    fn coerce(&self, raw: &str) -> ParseResult<Value> {
        self.value_type
            .coerce(raw)
            .map_err(|e| ParseError::invalid(format!("Option {}: {}", self.triggers(), e.message())))
    }

    fn coerce_all(&self, raw: Vec<String>) -> ParseResult<Vec<Value>> {
        raw.iter().map(|r| self.coerce(r)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct OptionBuilder {
    def: OptionDef,
}

impl OptionBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.def.description = description.into();
        self
    }

    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.def.short = Some(short.into());
        self
    }

    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.def.long = Some(long.into());
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.def.value_type = value_type;
        self
    }

    /// Same as [`value_type`](Self::value_type) with a kind name such as `int`.
    pub fn kind(self, name: &str) -> Self {
        self.value_type(ValueType::parse_name(name))
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.def.arity = arity;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.def.required = required;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.def.default = Some(value.into());
        self
    }

    pub fn build(self) -> ParseResult<OptionDef> {
        let def = self.def;
        trigger::validate("option", &def.name, def.short(), def.long())?;
        if def.arity == Arity::Fixed(0) {
            return Err(ParseError::config(format!(
                "the option '{}' has an arity of 0, use a flag instead",
                def.name
            )));
        }
        Ok(def)
    }
}

/// Resolve every option of the scope, in registration order.
pub(crate) fn extract_options(
    stream: &mut TokenStream,
    options: &[&OptionDef],
) -> ParseResult<IndexMap<String, Value>> {
    let mut values = IndexMap::new();
    for option in options {
        let Some(index) = option.locate(stream) else {
            if let Some(default) = &option.default {
                trace!(option = %option.name, "option absent, using default");
                values.insert(option.name.clone(), default.clone());
            } else if option.required {
                return Err(ParseError::invalid(format!(
                    "{} is required, and wasn't found",
                    option.triggers()
                )));
            }
            continue;
        };

        stream.remove(index);
        let value = match option.arity {
            Arity::One => {
                let raw = stream.remove(index).ok_or_else(|| {
                    ParseError::invalid(format!("Option {} requires a value", option.triggers()))
                })?;
                option.coerce(&raw)?
            }
            Arity::AtLeastOne => {
                let raw = stream.take_values(index, None);
                if raw.is_empty() {
                    return Err(ParseError::invalid(format!(
                        "Option {} requires at least one value",
                        option.triggers()
                    )));
                }
                Value::List(option.coerce_all(raw)?)
            }
            Arity::ZeroOrMore => {
                let raw = stream.take_values(index, None);
                if raw.is_empty() {
                    Value::Null
                } else {
                    Value::List(option.coerce_all(raw)?)
                }
            }
            Arity::Unbounded => {
                let raw = stream.take_values(index, None);
                if raw.is_empty() && option.required {
                    return Err(ParseError::invalid(format!(
                        "Option {} requires at least one value",
                        option.triggers()
                    )));
                }
                Value::List(option.coerce_all(raw)?)
            }
            Arity::Fixed(n) => {
                let raw = stream.take_values(index, Some(n));
                if raw.len() < n {
                    let stopped = stream
                        .get(index)
                        .map(|t| format!("'{t}'"))
                        .unwrap_or_else(|| "end of input".to_string());
                    return Err(ParseError::invalid(format!(
                        "Option {} requires {n} values but stopped at {stopped}",
                        option.triggers()
                    )));
                }
                Value::List(option.coerce_all(raw)?)
            }
        };
        debug!(option = %option.name, %value, "option resolved");
        values.insert(option.name.clone(), value);
    }
    Ok(values)
}
