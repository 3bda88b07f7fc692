//! This module provides a `Serializer` which turns records into block text.

use crate::format::{quote, ValueFormatter};
use crate::value::{FieldValue, Map, Record};
use crate::Result;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt::{self, Write};

/// The kind of a block. Determines the keyword the block header starts with.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// No header at all. The fields are emitted at the top level, e.g. for `.tfvars` files.
    Bare,
    /// A `resource` block.
    Resource,
    /// A `data` block.
    Data,
    /// A `provider` block.
    Provider,
    /// A `terraform` block.
    Terraform,
    /// A `module` block.
    Module,
    /// A `variable` block.
    Variable,
    /// An `output` block.
    Output,
}

impl BlockKind {
    /// Returns the keyword of the block kind or `None` for `BlockKind::Bare`.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::Bare => None,
            Self::Resource => Some("resource"),
            Self::Data => Some("data"),
            Self::Provider => Some("provider"),
            Self::Terraform => Some("terraform"),
            Self::Module => Some("module"),
            Self::Variable => Some("variable"),
            Self::Output => Some("output"),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("bare"))
    }
}

/// Describes the header of a block: its kind and optional labels.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct BlockDescriptor {
    /// The block kind.
    pub kind: BlockKind,
    /// The first label, e.g. the resource type.
    #[serde(default, rename = "type")]
    pub type_label: Option<String>,
    /// The reference name. Only emitted when `type_label` is present too.
    #[serde(default, rename = "name")]
    pub reference_name: Option<String>,
}

impl BlockDescriptor {
    /// Creates a descriptor without labels.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            type_label: None,
            reference_name: None,
        }
    }

    /// Sets the type label.
    pub fn with_type<S>(mut self, type_label: S) -> Self
    where
        S: Into<String>,
    {
        self.type_label = Some(type_label.into());
        self
    }

    /// Sets the reference name.
    pub fn with_name<S>(mut self, reference_name: S) -> Self
    where
        S: Into<String>,
    {
        self.reference_name = Some(reference_name.into());
        self
    }

    /// Returns `true` if a block with this descriptor has no markup representation. This is the
    /// case for all non-bare kinds without any label.
    pub fn is_skipped(&self) -> bool {
        self.kind != BlockKind::Bare && self.type_label.is_none() && self.reference_name.is_none()
    }
}

/// Controls how `FieldValue::Mapping` fields are rendered.
#[derive(ValueEnum, Debug, Default, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    /// Brace-nested blocks without equals sign: `tags {`.
    #[default]
    Block,
    /// Map literals assigned with an equals sign: `tags = {`.
    Attribute,
}

/// Options for the `Serializer`.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializeOptions {
    /// Emit strings that look like function calls or data source references without quotes.
    pub detect_raw_expressions: bool,
    /// How mapping fields are rendered.
    pub map_style: MapStyle,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            detect_raw_expressions: true,
            map_style: MapStyle::Block,
        }
    }
}

impl SerializeOptions {
    /// Creates new `SerializeOptions`.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A `SerializerBuilder` can be used to build a `Serializer` with certain `SerializeOptions`.
///
/// ## Example
///
/// ```
/// use hcl_composer::ser::{MapStyle, SerializerBuilder};
///
/// let serializer = SerializerBuilder::new()
///     .map_style(MapStyle::Attribute)
///     .detect_raw_expressions(false)
///     .build();
/// ```
#[derive(Debug, Default, Clone)]
pub struct SerializerBuilder {
    opts: SerializeOptions,
}

impl SerializerBuilder {
    /// Creates a new `SerializerBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit strings that look like function calls or data source references without quotes.
    pub fn detect_raw_expressions(&mut self, yes: bool) -> &mut Self {
        self.opts.detect_raw_expressions = yes;
        self
    }

    /// Sets the style mapping fields are rendered in.
    pub fn map_style(&mut self, style: MapStyle) -> &mut Self {
        self.opts.map_style = style;
        self
    }

    /// Builds the `Serializer`.
    pub fn build(&self) -> Serializer {
        Serializer::new(self.opts.clone())
    }
}

/// A `Serializer` renders the fields of a record as a block.
#[derive(Debug, Default, Clone)]
pub struct Serializer {
    opts: SerializeOptions,
    formatter: ValueFormatter,
}

impl Serializer {
    /// Creates a new `Serializer` with options.
    pub fn new(opts: SerializeOptions) -> Self {
        let formatter = ValueFormatter::new().detect_raw_expressions(opts.detect_raw_expressions);

        Self { opts, formatter }
    }

    /// Serializes fields into a block.
    ///
    /// Returns `Ok(None)` without looking at the fields if the descriptor is skipped (see
    /// `BlockDescriptor::is_skipped`). The returned text does not end with a line break.
    ///
    /// ## Example
    ///
    /// ```
    /// use hcl_composer::{ser::Serializer, BlockDescriptor, BlockKind, FieldValue, Map};
    /// # use std::error::Error;
    /// #
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let descriptor = BlockDescriptor::new(BlockKind::Resource)
    ///     .with_type("ec2-instance")
    ///     .with_name("vm1");
    ///
    /// let mut fields = Map::new();
    /// fields.insert("cores".to_string(), FieldValue::from(2));
    /// fields.insert("memory".to_string(), FieldValue::from(4));
    ///
    /// let block = Serializer::default().serialize(&descriptor, &fields)?;
    ///
    /// assert_eq!(
    ///     block.as_deref(),
    ///     Some("resource \"ec2-instance\" \"vm1\" {\n  cores = 2\n  memory = 4\n}")
    /// );
    /// #     Ok(())
    /// # }
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns `Error::UnsupportedValueType` if any value cannot be rendered. No partial block is
    /// produced in this case.
    pub fn serialize(
        &self,
        descriptor: &BlockDescriptor,
        fields: &Map<String, FieldValue>,
    ) -> Result<Option<String>> {
        if descriptor.is_skipped() {
            return Ok(None);
        }

        let mut buf = String::new();

        match descriptor.kind.keyword() {
            Some(keyword) => {
                write_header(&mut buf, keyword, descriptor)?;
                self.write_body(&mut buf, fields, 1)?;
                buf.push('}');
            }
            None => {
                self.write_body(&mut buf, fields, 0)?;
                // Bare blocks have no closing brace to end on.
                if buf.ends_with('\n') {
                    buf.pop();
                }
            }
        }

        Ok(Some(buf))
    }

    /// Serializes a record into a block. The record's fields are only requested if the descriptor
    /// is not skipped.
    pub fn serialize_record<R>(
        &self,
        descriptor: &BlockDescriptor,
        record: &R,
    ) -> Result<Option<String>>
    where
        R: Record + ?Sized,
    {
        if descriptor.is_skipped() {
            return Ok(None);
        }

        self.serialize(descriptor, &record.fields()?)
    }

    fn write_body(
        &self,
        buf: &mut String,
        fields: &Map<String, FieldValue>,
        depth: usize,
    ) -> Result<()> {
        let pad = indent(depth);

        for (name, value) in fields {
            match value {
                FieldValue::Record(record) => {
                    writeln!(buf, "{}{} {{", pad, name)?;
                    self.write_body(buf, record, depth + 1)?;
                    writeln!(buf, "{}}}", pad)?;
                }
                FieldValue::Mapping(mapping) => {
                    self.write_mapping(buf, name, mapping, depth)?;
                }
                FieldValue::List(items) => {
                    let items = items
                        .iter()
                        .map(|item| self.formatter.format(item))
                        .collect::<Result<Vec<_>>>()?;

                    writeln!(buf, "{}{} = [{}]", pad, name, items.join(", "))?;
                }
                value => {
                    writeln!(buf, "{}{} = {}", pad, name, self.formatter.format(value)?)?;
                }
            }
        }

        Ok(())
    }

    fn write_mapping(
        &self,
        buf: &mut String,
        name: &str,
        mapping: &Map<String, FieldValue>,
        depth: usize,
    ) -> Result<()> {
        let pad = indent(depth);

        match self.opts.map_style {
            MapStyle::Block => writeln!(buf, "{}{} {{", pad, name)?,
            MapStyle::Attribute => writeln!(buf, "{}{} = {{", pad, name)?,
        }

        for (key, value) in mapping {
            match value {
                FieldValue::Mapping(nested) => self.write_mapping(buf, key, nested, depth + 1)?,
                value => writeln!(
                    buf,
                    "{}{} = {}",
                    indent(depth + 1),
                    key,
                    self.formatter.format(value)?
                )?,
            }
        }

        writeln!(buf, "{}}}", pad)?;
        Ok(())
    }
}

/// Serializes fields into a block using the default `Serializer`.
///
/// See `Serializer::serialize` for details.
pub fn serialize(
    descriptor: &BlockDescriptor,
    fields: &Map<String, FieldValue>,
) -> Result<Option<String>> {
    Serializer::default().serialize(descriptor, fields)
}

fn write_header(buf: &mut String, keyword: &str, descriptor: &BlockDescriptor) -> fmt::Result {
    match (&descriptor.type_label, &descriptor.reference_name) {
        (Some(type_label), Some(name)) => {
            writeln!(buf, "{} {} {} {{", keyword, quote(type_label), quote(name))
        }
        (Some(type_label), None) => writeln!(buf, "{} {} {{", keyword, quote(type_label)),
        (None, _) => writeln!(buf, "{} {{", keyword),
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
