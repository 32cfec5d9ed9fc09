use std::error::Error as StdError;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

/// A converted capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// An unnamed group that did not take part in the match.
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeTz(DateTime<FixedOffset>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::DateTimeTz(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f%:z")),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::DateTimeTz(dt)
    }
}

pub type ConvertError = Box<dyn StdError + Send + Sync>;
pub type ConvertResult = Result<Value, ConvertError>;

/// Turns the text captured by a typed group into a [`Value`].
///
/// Any `Fn(&str) -> Result<V, E>` closure is a converter as long as `V`
/// converts into a [`Value`] and `E` into a boxed error:
///
/// ```
/// use qre::{Registry, Value};
///
/// let mut types = Registry::empty();
/// types
///     .register("answer", "yes|no", |s: &str| {
///         Ok::<_, String>(Value::Int(if s == "yes" { 1 } else { 0 }))
///     })
///     .unwrap();
/// assert!(types.resolve("answer").is_ok());
/// ```
pub trait Converter: Send + Sync {
    fn convert(&self, raw: &str) -> ConvertResult;
}

impl<F, V, E> Converter for F
where
    F: Fn(&str) -> Result<V, E> + Send + Sync,
    V: Into<Value>,
    E: Into<ConvertError>,
{
    fn convert(&self, raw: &str) -> ConvertResult {
        self(raw).map(Into::into).map_err(Into::into)
    }
}

/// Keeps the captured text as a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Converter for Identity {
    fn convert(&self, raw: &str) -> ConvertResult {
        Ok(Value::Str(raw.to_owned()))
    }
}
