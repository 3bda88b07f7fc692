//! Declarative block manifests.
//!
//! A manifest lists blocks together with their fields and optional files to splice into the
//! output:
//!
//! ```yaml
//! blocks:
//!   - kind: resource
//!     type: aws_instance
//!     name: web
//!     fields:
//!       ami: { $raw: data.aws_ami.ubuntu.id }
//!       tags: { $map: { env: prod } }
//! splice:
//!   - extra.tf
//! ```

use crate::block::Block;
use crate::encoding::Encoding;
use crate::ser::{BlockDescriptor, Serializer};
use crate::value::{FieldValue, Map, Record};
use crate::Result;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A list of blocks and files to splice.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// The blocks in output order.
    #[serde(default)]
    pub blocks: Vec<BlockSpec>,
    /// Files whose contents are appended after all blocks.
    #[serde(default)]
    pub splice: Vec<PathBuf>,
}

/// A single block of a manifest.
#[derive(Debug, Deserialize, PartialEq)]
pub struct BlockSpec {
    /// The block header.
    #[serde(flatten)]
    pub descriptor: BlockDescriptor,
    /// The block fields in declaration order.
    #[serde(default)]
    pub fields: serde_json::Map<String, Value>,
}

impl BlockSpec {
    /// Serializes the block.
    ///
    /// ## Errors
    ///
    /// Returns an error if a field cannot be converted into a `FieldValue` or serialized.
    pub fn to_block(&self, serializer: &Serializer) -> Result<Block> {
        Block::with_serializer(serializer, self.descriptor.clone(), self)
    }
}

impl Record for BlockSpec {
    fn fields(&self) -> Result<Map<String, FieldValue>> {
        self.fields
            .iter()
            .map(|(name, value)| Ok((name.clone(), FieldValue::try_from(value)?)))
            .collect()
    }
}

impl fmt::Display for BlockSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor.kind)?;

        for label in [&self.descriptor.type_label, &self.descriptor.reference_name]
            .into_iter()
            .flatten()
        {
            write!(f, " \"{}\"", label)?;
        }

        Ok(())
    }
}

impl Manifest {
    /// Reads a manifest with the given encoding.
    ///
    /// ## Example
    ///
    /// ```
    /// use hcl_composer::{manifest::Manifest, Encoding};
    /// # use std::error::Error;
    /// #
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let buf = r#"{"blocks": [{"kind": "provider", "type": "aws"}]}"#.as_bytes();
    ///
    /// let manifest = Manifest::from_reader(buf, Encoding::Json)?;
    /// assert_eq!(manifest.blocks.len(), 1);
    /// #     Ok(())
    /// # }
    /// ```
    pub fn from_reader<R>(mut reader: R, encoding: Encoding) -> Result<Self>
    where
        R: Read,
    {
        let manifest: Self = match encoding {
            Encoding::Json => serde_json::from_reader(reader)?,
            Encoding::Yaml => serde_yaml::from_reader(reader)?,
            Encoding::Toml => {
                let mut s = String::new();
                reader.read_to_string(&mut s)?;
                toml::from_str(&s)?
            }
        };

        Ok(manifest)
    }

    /// Resolves relative splice paths against `base`, usually the directory of the manifest file.
    pub fn resolve_paths<P>(&mut self, base: P)
    where
        P: AsRef<Path>,
    {
        for path in self.splice.iter_mut() {
            if path.is_relative() {
                *path = base.as_ref().join(&*path);
            }
        }
    }
}
