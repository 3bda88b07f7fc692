//! Serialized blocks and the identity of their sources.

use crate::ser::{BlockDescriptor, Serializer};
use crate::value::Record;
use crate::Result;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies the source a block was generated from.
///
/// Every call to `SourceId::new` returns a distinct id. Registries deduplicate by this id, not by
/// the block text.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    /// Allocates a new, unique `SourceId`.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A block generated from a record.
///
/// Clones share the `SourceId` of the original, so registering a clone after the original is a
/// no-op.
///
/// ## Example
///
/// ```
/// use hcl_composer::{Block, BlockDescriptor, BlockKind, FieldValue, Map};
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mut fields = Map::new();
/// fields.insert("region".to_string(), FieldValue::from("eu-west-1"));
///
/// let block = Block::new(BlockDescriptor::new(BlockKind::Provider).with_type("aws"), &fields)?;
/// assert_eq!(block.body(), Some("provider \"aws\" {\n  region = \"eu-west-1\"\n}"));
///
/// let skipped = Block::new(BlockDescriptor::new(BlockKind::Terraform), &fields)?;
/// assert_eq!(skipped.body(), None);
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    id: SourceId,
    descriptor: BlockDescriptor,
    body: Option<String>,
}

impl Block {
    /// Serializes a record with the default `Serializer` and wraps the result in a `Block` with a
    /// fresh `SourceId`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the record cannot be serialized.
    pub fn new<R>(descriptor: BlockDescriptor, record: &R) -> Result<Self>
    where
        R: Record + ?Sized,
    {
        Self::with_serializer(&Serializer::default(), descriptor, record)
    }

    /// Like `Block::new`, but uses the given `Serializer`.
    pub fn with_serializer<R>(
        serializer: &Serializer,
        descriptor: BlockDescriptor,
        record: &R,
    ) -> Result<Self>
    where
        R: Record + ?Sized,
    {
        let body = serializer.serialize_record(&descriptor, record)?;

        Ok(Self {
            id: SourceId::new(),
            descriptor,
            body,
        })
    }

    /// Returns the identity of the block's source.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Returns the descriptor the block was serialized with.
    pub fn descriptor(&self) -> &BlockDescriptor {
        &self.descriptor
    }

    /// Returns the block text, or `None` if the descriptor caused the block to be skipped.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{BlockKind, FieldValue, Map};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_ids_are_unique() {
        let a = SourceId::new();
        let b = SourceId::new();

        assert!(a != b);
        assert!(a < b);
    }

    #[test]
    fn test_clone_shares_identity() {
        let fields: Map<String, FieldValue> = Map::new();
        let descriptor = BlockDescriptor::new(BlockKind::Module).with_type("vpc");

        let block = Block::new(descriptor.clone(), &fields).unwrap();
        let twin = Block::new(descriptor, &fields).unwrap();

        assert_eq!(block.clone().id(), block.id());
        assert_eq!(block.body(), twin.body());
        assert!(block.id() != twin.id());
    }
}
