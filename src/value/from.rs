use super::{FieldValue, Map, Number};
use crate::{Error, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

/// Marker key of a single-key object that holds a raw expression.
const RAW_KEY: &str = "$raw";

/// Marker key of a single-key object that holds a mapping.
const MAP_KEY: &str = "$map";

impl TryFrom<&Value> for FieldValue {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Null => Err(Error::unsupported("null")),
            Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FieldValue::Number(Number::Int(i)))
                } else if let Some(u) = n.as_u64() {
                    Ok(FieldValue::Number(Number::UInt(u)))
                } else {
                    n.as_f64()
                        .map(|f| FieldValue::Number(Number::Float(f)))
                        .ok_or_else(|| Error::unsupported("number"))
                }
            }
            Value::String(s) => Ok(FieldValue::String(s.clone())),
            Value::Array(array) => array
                .iter()
                .map(FieldValue::try_from)
                .collect::<Result<Vec<_>>>()
                .map(FieldValue::List),
            Value::Object(object) if object.len() == 1 => match object.iter().next() {
                Some((key, Value::String(expr))) if key == RAW_KEY => {
                    Ok(FieldValue::Raw(expr.clone()))
                }
                Some((key, Value::Object(inner))) if key == MAP_KEY => mapping_from_object(inner),
                Some((key, _)) if key == RAW_KEY || key == MAP_KEY => Err(Error::new(format!(
                    "invalid value for `{}` marker",
                    key
                ))),
                _ => record_from_object(object).map(FieldValue::Record),
            },
            Value::Object(object) => record_from_object(object).map(FieldValue::Record),
        }
    }
}

impl TryFrom<Value> for FieldValue {
    type Error = Error;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        TryFrom::try_from(&v)
    }
}

fn record_from_object(object: &serde_json::Map<String, Value>) -> Result<Map<String, FieldValue>> {
    object
        .iter()
        .map(|(key, value)| Ok((key.clone(), FieldValue::try_from(value)?)))
        .collect()
}

// Objects nested in a mapping are mappings themselves; the `$map` marker is only needed once.
fn mapping_from_object(object: &serde_json::Map<String, Value>) -> Result<FieldValue> {
    object
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Object(inner) if !is_marker(inner) => mapping_from_object(inner)?,
                value => FieldValue::try_from(value)?,
            };

            Ok((key.clone(), value))
        })
        .collect::<Result<Map<_, _>>>()
        .map(FieldValue::Mapping)
}

fn is_marker(object: &serde_json::Map<String, Value>) -> bool {
    object.len() == 1 && (object.contains_key(RAW_KEY) || object.contains_key(MAP_KEY))
}

/// Serializes a map-like field so that `to_fields` turns it into a `FieldValue::Mapping`.
///
/// Use it with `#[serde(serialize_with = "hcl_composer::as_mapping")]`. Without it, maps are
/// indistinguishable from nested structs and become records.
///
/// ```
/// use hcl_composer::{to_fields, FieldValue};
/// use serde::Serialize;
/// use std::collections::BTreeMap;
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// #[derive(Serialize)]
/// struct Bucket {
///     #[serde(serialize_with = "hcl_composer::as_mapping")]
///     tags: BTreeMap<String, String>,
/// }
///
/// let tags = BTreeMap::from([("env".to_string(), "prod".to_string())]);
/// let fields = to_fields(&Bucket { tags })?;
///
/// assert_eq!(fields["tags"], FieldValue::mapping([("env", "prod")]));
/// #     Ok(())
/// # }
/// ```
pub fn as_mapping<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize + ?Sized,
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(MAP_KEY, value)?;
    map.end()
}

/// Converts any serializable value into ordered record fields.
///
/// Struct fields keep their declaration order. Nested structs and maps become records unless the
/// field is marked with `as_mapping`. Integers keep their exact value, including those beyond
/// `i64::MAX`. Returns an error if the value does not serialize to a map or if any field holds a
/// value without a markup representation, e.g. `None`.
///
/// ```
/// use hcl_composer::{to_fields, FieldValue};
/// use serde::Serialize;
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// #[derive(Serialize)]
/// struct Resources {
///     memory: u32,
///     cores: u32,
/// }
///
/// let fields = to_fields(&Resources { memory: 4, cores: 2 })?;
///
/// assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["memory", "cores"]);
/// assert_eq!(fields["cores"], FieldValue::from(2));
/// #     Ok(())
/// # }
/// ```
pub fn to_fields<T>(value: &T) -> Result<Map<String, FieldValue>>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(value)? {
        Value::Object(object) => record_from_object(&object),
        value => Err(Error::new(format!(
            "expected a value that serializes to a map, got {}",
            json_type_name(&value)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ser::{serialize, BlockDescriptor, BlockKind, MapStyle, SerializerBuilder};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_try_from_scalars() {
        assert_eq!(
            FieldValue::try_from(json!(2)).unwrap(),
            FieldValue::Number(Number::Int(2))
        );
        assert_eq!(
            FieldValue::try_from(json!(2.5)).unwrap(),
            FieldValue::Number(Number::Float(2.5))
        );
        assert_eq!(
            FieldValue::try_from(json!("foo")).unwrap(),
            FieldValue::String("foo".into())
        );
        assert_eq!(
            FieldValue::try_from(json!([true, false])).unwrap(),
            FieldValue::from(vec![true, false])
        );
    }

    #[test]
    fn test_try_from_null() {
        assert!(matches!(
            FieldValue::try_from(json!({"a": null})),
            Err(Error::UnsupportedValueType(name)) if name == "null"
        ));
    }

    #[test]
    fn test_try_from_markers() {
        assert_eq!(
            FieldValue::try_from(json!({"$raw": "var.region"})).unwrap(),
            FieldValue::raw("var.region")
        );
        assert_eq!(
            FieldValue::try_from(json!({"$map": {"env": "prod", "nested": {"team": "ops"}}}))
                .unwrap(),
            FieldValue::mapping([
                ("env", FieldValue::from("prod")),
                ("nested", FieldValue::mapping([("team", "ops")])),
            ])
        );
        assert!(FieldValue::try_from(json!({"$raw": 1})).is_err());
    }

    #[test]
    fn test_try_from_object_is_record() {
        assert_eq!(
            FieldValue::try_from(json!({"b": 1, "a": {"c": "d"}})).unwrap(),
            FieldValue::record([
                ("b", FieldValue::from(1)),
                ("a", FieldValue::record([("c", "d")])),
            ])
        );
    }

    #[test]
    fn test_to_fields() {
        #[derive(Serialize)]
        struct Node {
            name: String,
            platform_id: String,
            resources: Resources,
        }

        #[derive(Serialize)]
        struct Resources {
            cores: u32,
            memory: u32,
        }

        let node = Node {
            name: "new-node".into(),
            platform_id: "ec2".into(),
            resources: Resources {
                cores: 2,
                memory: 4,
            },
        };

        let fields = to_fields(&node).unwrap();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["name", "platform_id", "resources"]);
        assert_eq!(
            fields["resources"],
            FieldValue::record([("cores", 2), ("memory", 4)])
        );
        assert!(to_fields(&vec![1, 2]).is_err());
    }

    #[test]
    fn test_to_fields_large_unsigned() {
        #[derive(Serialize)]
        struct Quota {
            limit: u64,
        }

        let fields = to_fields(&Quota { limit: u64::MAX }).unwrap();
        assert_eq!(fields["limit"], FieldValue::Number(Number::UInt(u64::MAX)));

        let descriptor = BlockDescriptor::new(BlockKind::Resource).with_type("quota");
        assert_eq!(
            serialize(&descriptor, &fields).unwrap().as_deref(),
            Some("resource \"quota\" {\n  limit = 18446744073709551615\n}")
        );
    }

    #[test]
    fn test_to_fields_mapping() {
        #[derive(Serialize)]
        struct Bucket {
            #[serde(serialize_with = "as_mapping")]
            tags: BTreeMap<String, String>,
            labels: BTreeMap<String, String>,
        }

        let env = BTreeMap::from([("env".to_string(), "prod".to_string())]);
        let bucket = Bucket {
            tags: env.clone(),
            labels: env,
        };

        let fields = to_fields(&bucket).unwrap();
        assert_eq!(fields["tags"].type_name(), "mapping");
        assert_eq!(fields["labels"].type_name(), "record");

        let descriptor = BlockDescriptor::new(BlockKind::Resource)
            .with_type("aws_s3_bucket")
            .with_name("logs");

        assert_eq!(
            serialize(&descriptor, &fields).unwrap().as_deref(),
            Some(
                r#"resource "aws_s3_bucket" "logs" {
  tags {
    env = "prod"
  }
  labels {
    env = "prod"
  }
}"#
            )
        );

        let serializer = SerializerBuilder::new()
            .map_style(MapStyle::Attribute)
            .build();

        assert_eq!(
            serializer.serialize(&descriptor, &fields).unwrap().as_deref(),
            Some(
                r#"resource "aws_s3_bucket" "logs" {
  tags = {
    env = "prod"
  }
  labels {
    env = "prod"
  }
}"#
            )
        );
    }
}
