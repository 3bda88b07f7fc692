//! Collects serialized blocks and flushes them to a destination in one go.

use crate::block::{Block, SourceId};
use crate::io::{WriteMode, Writer};
use crate::{Error, Result};
use indexmap::IndexSet;
use std::fs;
use std::io::{self, Write};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A deferred step that runs when the registry is flushed, before any block is written.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PendingAction {
    /// Read the file and append its contents as an opaque, pre-rendered block. A file that cannot
    /// be read is logged and skipped.
    AppendFile(PathBuf),
}

impl PendingAction {
    fn run(&self, blocks: &mut Vec<String>) {
        match self {
            Self::AppendFile(path) => match fs::read_to_string(path) {
                Ok(contents) => blocks.push(contents),
                Err(source) => {
                    let err = Error::FileRead {
                        path: path.clone(),
                        source,
                    };
                    warn!("skipping file splice: {}", err);
                }
            },
        }
    }
}

/// An ordered collection of serialized blocks and deferred actions.
///
/// Blocks are deduplicated by the identity of their source. Every flush drains the registry, so
/// a second flush without new registrations writes nothing.
///
/// ## Example
///
/// ```
/// use hcl_composer::{Block, BlockDescriptor, BlockKind, BlockRegistry, FieldValue, Map};
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mut fields = Map::new();
/// fields.insert("cores".to_string(), FieldValue::from(2));
///
/// let vm = Block::new(
///     BlockDescriptor::new(BlockKind::Resource).with_type("vm").with_name("a"),
///     &fields,
/// )?;
///
/// let mut registry = BlockRegistry::new();
/// registry.register(&vm).register(&vm);
///
/// let mut out = Vec::new();
/// registry.write_to(&mut out)?;
///
/// assert_eq!(String::from_utf8(out)?, "resource \"vm\" \"a\" {\n  cores = 2\n}\n\n");
/// assert!(registry.is_empty());
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct BlockRegistry {
    seen: IndexSet<SourceId>,
    blocks: Vec<String>,
    actions: Vec<PendingAction>,
}

impl BlockRegistry {
    /// Creates an empty `BlockRegistry`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the text of a block. Registering a block whose source was already registered is
    /// a no-op, as is registering a skipped block.
    pub fn register(&mut self, block: &Block) -> &mut Self {
        self.register_text(block.id(), block.body().map(ToOwned::to_owned))
    }

    /// Registers block text for a source.
    ///
    /// If `id` was registered before, this is a no-op. If `body` is `None`, nothing is stored and
    /// the source is not marked as seen.
    pub fn register_text(&mut self, id: SourceId, body: Option<String>) -> &mut Self {
        if self.seen.contains(&id) {
            return self;
        }

        match body {
            Some(body) => {
                self.seen.insert(id);
                self.blocks.push(body);
            }
            None => debug!(source = %id, "skipping block without markup representation"),
        }

        self
    }

    /// Queues an action that appends the raw contents of the file at `path` when the registry is
    /// flushed.
    pub fn enqueue_file_append<P>(&mut self, path: P) -> &mut Self
    where
        P: Into<PathBuf>,
    {
        self.enqueue(PendingAction::AppendFile(path.into()))
    }

    /// Queues a `PendingAction`.
    pub fn enqueue(&mut self, action: PendingAction) -> &mut Self {
        self.actions.push(action);
        self
    }

    /// Returns the number of registered blocks. Actions that have not run yet are not counted.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if there are neither registered blocks nor pending actions.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.actions.is_empty()
    }

    /// Returns the registered block texts in registration order.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// Returns the queued actions in execution order.
    pub fn pending_actions(&self) -> &[PendingAction] {
        &self.actions
    }

    /// Alias for `BlockRegistry::export`.
    pub fn write<P>(&mut self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.export(path)
    }

    /// Runs all pending actions and writes all blocks to `path`, truncating it first. The path `-`
    /// writes to stdout.
    ///
    /// The registry is empty afterwards, even if writing failed.
    ///
    /// ## Errors
    ///
    /// Returns `Error::FileWrite` if the destination cannot be opened or written.
    pub fn export<P>(&mut self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.write_with_mode(path.as_ref(), WriteMode::Truncate)
    }

    /// Like `BlockRegistry::export`, but appends to `path` instead of truncating it.
    pub fn append<P>(&mut self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.write_with_mode(path.as_ref(), WriteMode::Append)
    }

    /// Runs all pending actions and writes all blocks to `writer`. Each block is followed by one
    /// blank line.
    ///
    /// The registry is empty afterwards, even if writing failed.
    pub fn write_to<W>(&mut self, mut writer: W) -> io::Result<()>
    where
        W: Write,
    {
        let blocks = self.drain();
        write_blocks(&mut writer, &blocks)
    }

    fn write_with_mode(&mut self, path: &Path, mode: WriteMode) -> Result<()> {
        let blocks = self.drain();

        debug!(
            blocks = blocks.len(),
            destination = %path.display(),
            ?mode,
            "writing blocks"
        );

        Writer::new(path, mode)
            .and_then(|mut writer| write_blocks(&mut writer, &blocks))
            .map_err(|source| Error::FileWrite {
                path: path.to_path_buf(),
                source,
            })
    }

    // Resets the registry and returns the blocks to write, including the output of all pending
    // actions.
    fn drain(&mut self) -> Vec<String> {
        let mut blocks = std::mem::take(&mut self.blocks);
        let actions = std::mem::take(&mut self.actions);
        self.seen.clear();

        for action in &actions {
            action.run(&mut blocks);
        }

        blocks
    }
}

impl AddAssign<&Block> for BlockRegistry {
    fn add_assign(&mut self, block: &Block) {
        self.register(block);
    }
}

impl<'a> Extend<&'a Block> for BlockRegistry {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = &'a Block>,
    {
        for block in iter {
            self.register(block);
        }
    }
}

// Blocks without content, e.g. a bare block without fields or an empty spliced file, are left out
// so they do not produce stray blank lines.
fn write_blocks<W>(writer: &mut W, blocks: &[String]) -> io::Result<()>
where
    W: Write,
{
    for block in blocks {
        let block = block.trim_end_matches(|c: char| c == '\n' || c == '\r');

        if block.is_empty() {
            continue;
        }

        writer.write_all(block.as_bytes())?;
        writer.write_all(b"\n\n")?;
    }

    writer.flush()
}
