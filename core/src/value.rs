//! Value model shared by the schema and the binding engine.
//!
//! [`ValueType`] is what a parameter declares, [`Value`] is what the resolver
//! produces after coercion (or what a formatter hook returns). Targets turn a
//! [`Value`] back into a concrete Rust field through the `TryFrom<Value>`
//! conversions defined here.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared type of a bindable field.
///
/// # Examples
///
/// ```
/// use argbind_core::ValueType;
///
/// let vt = ValueType::array_of(ValueType::Int);
/// assert_eq!(vt.to_string(), "array<int>");
/// assert!(!vt.is_bool());
/// assert_eq!(ValueType::default(), ValueType::String);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Presence flag; never consumes a value.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 32-bit unsigned integer.
    #[serde(rename = "uint")]
    UInt,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Raw string, assigned unchanged (the default).
    #[default]
    String,
    /// Comma-separated list coerced element-wise.
    Array(Box<ValueType>),
}

impl ValueType {
    /// Shorthand for `ValueType::Array(Box::new(element))`.
    pub fn array_of(element: ValueType) -> Self {
        ValueType::Array(Box::new(element))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, ValueType::Bool)
    }

    /// Element type for array fields.
    pub fn element(&self) -> Option<&ValueType> {
        match self {
            ValueType::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Short name without the element type, matching [`Value::kind`].
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Array(_) => "array",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::UInt => write!(f, "uint"),
            Self::Long => write!(f, "long"),
            Self::Float => write!(f, "float"),
            Self::Double => write!(f, "double"),
            Self::String => write!(f, "string"),
            Self::Array(element) => write!(f, "array<{element}>"),
        }
    }
}

/// A resolved field value.
///
/// Serializes untagged, so a bound target prints as plain JSON/YAML scalars
/// and sequences. Deserialized numbers take the first variant that holds
/// them: integers become `Int`, `UInt` or `Long`, fractions always `Double`.
/// Use [`Value::conform`] to settle a deserialized value on a declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i32),
    UInt(u32),
    Long(i64),
    Double(f64),
    Float(f32),
    Str(String),
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a loosely typed value, such as one read from a document, into
    /// the variant `value_type` declares.
    ///
    /// Integers convert when they fit, any number converts to `float` or
    /// `double`, and arrays convert element-wise. A `double` outside the
    /// `float` range is rejected instead of becoming infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::{Value, ValueType};
    ///
    /// assert_eq!(Value::Int(2).conform(&ValueType::Double), Ok(Value::Double(2.0)));
    /// assert_eq!(Value::Int(7).conform(&ValueType::Long), Ok(Value::Long(7)));
    /// assert!(Value::Long(-1).conform(&ValueType::UInt).is_err());
    /// ```
    pub fn conform(self, value_type: &ValueType) -> Result<Value, ValueError> {
        let mismatch = |value: &Value| ValueError::new(value_type.kind(), value);
        match value_type {
            ValueType::Bool | ValueType::String => match (value_type, self) {
                (ValueType::Bool, Value::Bool(v)) => Ok(Value::Bool(v)),
                (ValueType::String, Value::Str(v)) => Ok(Value::Str(v)),
                (_, other) => Err(mismatch(&other)),
            },
            ValueType::Int => self
                .integer()
                .and_then(|n| i32::try_from(n).ok())
                .map(Value::Int)
                .ok_or_else(|| mismatch(&self)),
            ValueType::UInt => self
                .integer()
                .and_then(|n| u32::try_from(n).ok())
                .map(Value::UInt)
                .ok_or_else(|| mismatch(&self)),
            ValueType::Long => self.integer().map(Value::Long).ok_or_else(|| mismatch(&self)),
            ValueType::Double => self.number().map(Value::Double).ok_or_else(|| mismatch(&self)),
            ValueType::Float => match self {
                Value::Float(v) => Ok(Value::Float(v)),
                _ => self
                    .number()
                    .filter(|n| !n.is_finite() || n.abs() <= f64::from(f32::MAX))
                    .map(|n| Value::Float(n as f32))
                    .ok_or_else(|| mismatch(&self)),
            },
            ValueType::Array(element) => match self {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| item.conform(element))
                    .collect::<Result<_, _>>()
                    .map(Value::Array),
                other => Err(mismatch(&other)),
            },
        }
    }

    fn integer(&self) -> Option<i64> {
        match *self {
            Value::Int(v) => Some(i64::from(v)),
            Value::UInt(v) => Some(i64::from(v)),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    fn number(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(f64::from(v)),
            Value::Double(v) => Some(v),
            _ => self.integer().map(|n| n as f64),
        }
    }

    /// Builds a string array value, the shape of positional lists.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Array(items.into_iter().map(|s| Value::Str(s.into())).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// A [`Value`] could not be converted into the requested Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ValueError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl ValueError {
    fn new(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            found: found.kind(),
        }
    }
}

/// Errors raised by a target's setter capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The target has no field with this binding key.
    #[error("unknown field: {0}")]
    Unknown(String),
    /// The field exists but cannot hold the supplied value.
    #[error("value type mismatch: {0}")]
    Mismatch(#[from] ValueError),
}

macro_rules! scalar_from_value {
    ($ty:ty, $expected:literal, $own:ident $(, $widen:ident)*) => {
        impl TryFrom<Value> for $ty {
            type Error = ValueError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$own(v) => Ok(v),
                    $(Value::$widen(v) => Ok(<$ty>::from(v)),)*
                    other => Err(ValueError::new($expected, &other)),
                }
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$own(v)
            }
        }
    };
}

scalar_from_value!(i32, "int", Int);
scalar_from_value!(u32, "uint", UInt);
scalar_from_value!(i64, "long", Long, Int, UInt);
scalar_from_value!(bool, "bool", Bool);

impl TryFrom<Value> for f32 {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(ValueError::new("float", &other)),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl TryFrom<Value> for f64 {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Double(v) => Ok(v),
            Value::Float(v) => Ok(f64::from(v)),
            other => Err(ValueError::new("double", &other)),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl TryFrom<Value> for String {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(ValueError::new("string", &other)),
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = ValueError>,
{
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => items.into_iter().map(T::try_from).collect(),
            other => Err(ValueError::new("array", &other)),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
