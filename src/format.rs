//! Renders single values as markup literals.

use crate::value::{FieldValue, Number};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Strings matching this pattern are treated as raw expressions: function calls to `file(...)` and
/// anything that references a data source.
static RAW_EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^file\(|data\.").expect("valid raw expression pattern"));

/// Formats single values as literals.
///
/// ## Example
///
/// ```
/// use hcl_composer::{format::ValueFormatter, FieldValue};
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let formatter = ValueFormatter::new();
///
/// assert_eq!(formatter.format(&FieldValue::from("ubuntu"))?, r#""ubuntu""#);
/// assert_eq!(formatter.format(&FieldValue::from(true))?, "true");
/// assert_eq!(formatter.format(&FieldValue::from("file(\"init.sh\")"))?, "file(\"init.sh\")");
///
/// let strict = ValueFormatter::new().detect_raw_expressions(false);
/// assert_eq!(strict.format(&FieldValue::from("data.x"))?, r#""data.x""#);
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ValueFormatter {
    detect_raw_expressions: bool,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self {
            detect_raw_expressions: true,
        }
    }
}

impl ValueFormatter {
    /// Creates a new `ValueFormatter` with raw expression detection enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls whether strings that look like function calls or data source references are
    /// emitted verbatim instead of quoted.
    pub fn detect_raw_expressions(mut self, yes: bool) -> Self {
        self.detect_raw_expressions = yes;
        self
    }

    /// Formats a scalar or raw expression as a literal.
    ///
    /// ## Errors
    ///
    /// Returns `Error::UnsupportedValueType` for records, mappings and lists as well as for
    /// non-finite floats, none of which have a literal representation.
    pub fn format(&self, value: &FieldValue) -> Result<String> {
        match value {
            FieldValue::Raw(expr) => Ok(expr.clone()),
            FieldValue::String(s) if self.detect_raw_expressions && is_raw_expression(s) => {
                Ok(s.clone())
            }
            FieldValue::String(s) => Ok(quote(s)),
            FieldValue::Bool(b) => Ok(b.to_string()),
            FieldValue::Number(n) => format_number(n),
            value => Err(Error::unsupported(value.type_name())),
        }
    }
}

/// Formats a value with the default `ValueFormatter`.
pub fn format(value: &FieldValue) -> Result<String> {
    ValueFormatter::new().format(value)
}

/// Returns `true` if the string would be emitted verbatim by the raw expression heuristic.
pub fn is_raw_expression(s: &str) -> bool {
    RAW_EXPRESSION.is_match(s)
}

fn format_number(n: &Number) -> Result<String> {
    match n {
        Number::Int(i) => Ok(i.to_string()),
        Number::UInt(u) => Ok(u.to_string()),
        Number::Float(f) if !f.is_finite() => Err(Error::unsupported("non-finite number")),
        Number::Float(f) if f.fract() == 0.0 => Ok(format!("{:.1}", f)),
        Number::Float(f) => Ok(f.to_string()),
    }
}

pub(crate) fn quote(s: &str) -> String {
    let mut buf = String::with_capacity(s.len() + 2);
    buf.push('"');

    for ch in s.chars() {
        match ch {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            ch => buf.push(ch),
        }
    }

    buf.push('"');
    buf
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_scalars() {
        assert_eq!(format(&true.into()).unwrap(), "true");
        assert_eq!(format(&false.into()).unwrap(), "false");
        assert_eq!(format(&2.into()).unwrap(), "2");
        assert_eq!(format(&(-17).into()).unwrap(), "-17");
        assert_eq!(format(&u64::MAX.into()).unwrap(), "18446744073709551615");
        assert_eq!(format(&0.25.into()).unwrap(), "0.25");
        assert_eq!(format(&4.0.into()).unwrap(), "4.0");
        assert_eq!(format(&"number".into()).unwrap(), r#""number""#);
        assert_eq!(format(&"".into()).unwrap(), r#""""#);
    }

    #[test]
    fn test_format_raw_expressions() {
        assert_eq!(
            format(&FieldValue::raw("var.instance_count")).unwrap(),
            "var.instance_count"
        );
        assert_eq!(
            format(&"data.nebius_compute_image.ubuntu-2204.id".into()).unwrap(),
            "data.nebius_compute_image.ubuntu-2204.id"
        );
        assert_eq!(
            format(&r#"file("~/.ssh/id_rsa.pub")"#.into()).unwrap(),
            r#"file("~/.ssh/id_rsa.pub")"#
        );
        assert_eq!(
            format(&"my-file(1)".into()).unwrap(),
            r#""my-file(1)""#
        );
    }

    #[test]
    fn test_format_strict_strings() {
        let formatter = ValueFormatter::new().detect_raw_expressions(false);

        assert_eq!(
            formatter.format(&"metadata.json".into()).unwrap(),
            r#""metadata.json""#
        );
        assert_eq!(
            formatter.format(&FieldValue::raw("data.foo.id")).unwrap(),
            "data.foo.id"
        );
    }

    #[test]
    fn test_format_escapes() {
        assert_eq!(
            format(&"say \"hi\"\n\tbye\\".into()).unwrap(),
            r#""say \"hi\"\n\tbye\\""#
        );
        assert_eq!(
            format(&"${var.name}-suffix".into()).unwrap(),
            r#""${var.name}-suffix""#
        );
    }

    #[test]
    fn test_format_unsupported() {
        let cases = vec![
            (FieldValue::from(vec![1]), "list"),
            (FieldValue::record([("a", 1)]), "record"),
            (FieldValue::mapping([("a", 1)]), "mapping"),
            (FieldValue::from(f64::NAN), "non-finite number"),
            (FieldValue::from(f64::INFINITY), "non-finite number"),
        ];

        for (value, expected) in cases {
            match format(&value) {
                Err(Error::UnsupportedValueType(name)) => assert_eq!(name, expected),
                other => panic!("expected unsupported value type error, got {:?}", other),
            }
        }
    }
}
