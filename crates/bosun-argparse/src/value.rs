//! Typed values and the string-to-value coercion used by options and env vars.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// A parsed value stored in [`Params`](crate::Params).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Whether a flag holding this value counts as "set".
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(_) => true,
        }
    }

    /// Numeric sum of two values, `None` if either side is not a number.
    pub fn checked_add(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(Self::Int(a.saturating_add(*b))),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                Some(Self::Float(a.as_float()? + b.as_float()?))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(" "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Declared type of an option or env var value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValueType {
    #[default]
    String,
    Int,
    Float,
    /// Resolved against the working directory.
    Path,
    /// Unrecognized kind name, values pass through unchanged.
    Other(String),
}

impl ValueType {
    /// Map a kind name (`int`, `number`, `path`, ...) to a type.
    pub fn parse_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Self::Int,
            "number" | "float" | "double" => Self::Float,
            "string" => Self::String,
            "path" => Self::Path,
            _ => Self::Other(name.trim().to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "number",
            Self::Path => "path",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Convert a raw token into a value of this type.
    pub fn coerce(&self, raw: &str) -> ParseResult<Value> {
        match self {
            Self::Int => {
                if !is_integer(raw) {
                    return Err(self.mismatch(raw));
                }
                raw.parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| self.mismatch(raw))
            }
            Self::Float => {
                if !is_decimal(raw) {
                    return Err(self.mismatch(raw));
                }
                raw.replace(',', ".")
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| self.mismatch(raw))
            }
            Self::Path => resolve_path(raw),
            Self::String | Self::Other(_) => Ok(Value::Str(raw.to_string())),
        }
    }

    fn mismatch(&self, raw: &str) -> ParseError {
        ParseError::invalid(format!("'{raw}' wasn't of type {}", self.name()))
    }
}

impl FromStr for ValueType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_name(s))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn strip_sign(raw: &str) -> &str {
    raw.strip_prefix(['+', '-']).unwrap_or(raw)
}

// [-+]?[0-9]+
fn is_integer(raw: &str) -> bool {
    let digits = strip_sign(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// [-+]?[0-9]*([.,][0-9]+)? with at least one digit somewhere
fn is_decimal(raw: &str) -> bool {
    let body = strip_sign(raw);
    let (int_part, frac_part) = match body.find(['.', ',']) {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (body, None),
    };
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        Some(frac) => !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()),
        None => !int_part.is_empty(),
    }
}

fn resolve_path(raw: &str) -> ParseResult<Value> {
    let path = Path::new(raw);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| {
            ParseError::invalid(format!("cannot resolve path '{raw}': {e}"))
        })?;
        cwd.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(Value::Str(normalized.to_string_lossy().into_owned()))
}
