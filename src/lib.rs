//! hcl-composer turns structured records into Terraform-style HCL blocks and collects them for
//! batched export.
//!
//! The main building blocks are:
//!
//! - `format`: renders single values as literals,
//! - `ser`: renders the fields of a record as a block,
//! - `registry`: collects serialized blocks and writes them to a destination in one go.
//!
//! ## Example
//!
//! ```
//! use hcl_composer::{Block, BlockDescriptor, BlockKind, BlockRegistry, FieldValue, Map};
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let mut fields = Map::new();
//! fields.insert("description".to_string(), FieldValue::from("Number of instances to create"));
//! fields.insert("type".to_string(), FieldValue::raw("number"));
//! fields.insert("default".to_string(), FieldValue::from(vec![1]));
//!
//! let variable = Block::new(
//!     BlockDescriptor::new(BlockKind::Variable).with_type("instance_count"),
//!     &fields,
//! )?;
//!
//! let mut registry = BlockRegistry::new();
//! registry.register(&variable);
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("variables.tf");
//! registry.write(&path)?;
//!
//! assert_eq!(
//!     std::fs::read_to_string(&path)?,
//!     r#"variable "instance_count" {
//!   description = "Number of instances to create"
//!   type = number
//!   default = [1]
//! }
//!
//! "#
//! );
//! #     Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod args;
pub mod block;
pub mod encoding;
mod error;
pub mod format;
pub mod io;
pub mod manifest;
pub mod registry;
pub mod ser;
pub mod value;

pub use block::{Block, SourceId};
pub use encoding::{detect_encoding, Encoding};
pub use error::*;
pub use format::format;
pub use registry::{BlockRegistry, PendingAction};
pub use ser::{serialize, BlockDescriptor, BlockKind, MapStyle};
pub use value::{as_mapping, to_fields, FieldValue, Map, Number, Record};
