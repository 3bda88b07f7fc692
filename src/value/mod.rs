//! Provides the value types that records are made of.

mod from;

pub use from::{as_mapping, to_fields};

use crate::Result;

/// The map type used for records and mappings. Iteration follows insertion order.
pub type Map<K, V> = indexmap::IndexMap<K, V>;

/// Represents a number, either integer or float.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Number {
    /// Represents an integer.
    Int(i64),
    /// Represents an unsigned integer that does not fit into `i64`.
    UInt(u64),
    /// Represents a float.
    Float(f64),
}

/// Represents any value a record field can hold.
#[derive(Debug, PartialEq, Clone)]
pub enum FieldValue {
    /// A string. Rendered quoted unless it looks like a raw expression.
    String(String),
    /// A boolean.
    Bool(bool),
    /// A number, either integer or float.
    Number(Number),
    /// An expression that is emitted verbatim, e.g. a function call or a reference to another
    /// block.
    Raw(String),
    /// A nested record, rendered as a nested block.
    Record(Map<String, FieldValue>),
    /// A string-keyed map, rendered as a map block.
    Mapping(Map<String, FieldValue>),
    /// A list of values.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Creates a raw expression which is emitted without quotes.
    ///
    /// ```
    /// use hcl_composer::{format, FieldValue};
    ///
    /// let value = FieldValue::raw("var.instance_count");
    /// assert_eq!(format(&value).unwrap(), "var.instance_count");
    /// ```
    pub fn raw<S>(expr: S) -> Self
    where
        S: Into<String>,
    {
        Self::Raw(expr.into())
    }

    /// Creates a mapping from an iterator of key-value pairs.
    pub fn mapping<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::Mapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Creates a nested record from an iterator of field name-value pairs.
    pub fn record<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::Record(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the descriptive name of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Raw(_) => "raw expression",
            Self::Record(_) => "record",
            Self::Mapping(_) => "mapping",
            Self::List(_) => "list",
        }
    }
}

/// A type that can expose its fields as an ordered sequence of name-value pairs.
///
/// This is the only thing the serializer needs to know about a record. The order of the returned
/// map is the order in which fields are emitted.
///
/// ```
/// use hcl_composer::{FieldValue, Map, Record, Result};
///
/// struct Instance {
///     cores: i64,
///     memory: i64,
/// }
///
/// impl Record for Instance {
///     fn fields(&self) -> Result<Map<String, FieldValue>> {
///         let mut fields = Map::new();
///         fields.insert("cores".into(), self.cores.into());
///         fields.insert("memory".into(), self.memory.into());
///         Ok(fields)
///     }
/// }
/// ```
pub trait Record {
    /// Returns the record's fields in declaration order.
    fn fields(&self) -> Result<Map<String, FieldValue>>;
}

impl Record for Map<String, FieldValue> {
    fn fields(&self) -> Result<Map<String, FieldValue>> {
        Ok(self.clone())
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(n: $ty) -> Self {
                    Self::Number(Number::Int(i64::from(n)))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Self::Number(Number::Int(i)),
            Err(_) => Self::Number(Number::UInt(n)),
        }
    }
}

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        Self::Number(Number::Float(f64::from(f)))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Number(Number::Float(f))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Number> for FieldValue {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl<T> From<Vec<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(vec: Vec<T>) -> Self {
        Self::List(vec.into_iter().map(Into::into).collect())
    }
}
