//! Command line arguments for hcl-composer.

use crate::ser::{MapStyle, SerializeOptions};
use crate::Encoding;
use clap::{Args, Parser, ValueHint};
use std::path::PathBuf;

/// Compose HCL blocks from declarative manifests.
///
/// Every manifest lists blocks with their fields and files to splice into the output. The blocks
/// of all manifests are collected in argument order, deduplicated and written to the output in a
/// single pass. Spliced files are appended after all blocks.
#[derive(Parser, Debug)]
#[command(name = "hcl-composer", version)]
pub struct Options {
    /// Manifest files in JSON, YAML or TOML.
    ///
    /// Use `-` to read a manifest from stdin. The encoding of stdin must be set via
    /// --input-encoding.
    #[arg(value_name = "MANIFEST", required = true, value_hint = ValueHint::FilePath)]
    pub manifests: Vec<PathBuf>,

    /// Options for reading manifests.
    #[command(flatten)]
    pub input: InputOptions,

    /// Options for writing the generated blocks.
    #[command(flatten)]
    pub output: OutputOptions,

    /// Log what is being generated to stderr. `RUST_LOG` takes precedence if set.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options that configure how manifests are read.
#[derive(Args, Debug)]
#[command(next_help_heading = "Input options")]
pub struct InputOptions {
    /// Set the manifest encoding. If absent encoding will be detected from the file extension.
    #[arg(value_enum, short = 'i', long, hide_possible_values = true)]
    pub input_encoding: Option<Encoding>,
}

/// Options that configure how blocks are rendered and written.
#[derive(Args, Debug)]
#[command(next_help_heading = "Output options")]
pub struct OutputOptions {
    /// Output file. If absent, the blocks are written to stdout.
    #[arg(short = 'O', long, value_hint = ValueHint::FilePath)]
    #[arg(default_value = "-", hide_default_value = true)]
    pub output_file: PathBuf,

    /// Append to the output file instead of truncating it.
    #[arg(short = 'A', long)]
    pub append: bool,

    /// File whose contents are appended verbatim after all blocks. Can be specified multiple
    /// times.
    #[arg(short = 'a', long = "splice", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub splice: Vec<PathBuf>,

    /// Quote all strings, even those that look like `file(...)` calls or data source
    /// references. Use `{"$raw": "..."}` in manifests for expressions.
    #[arg(long)]
    pub no_raw_detection: bool,

    /// How map fields are rendered: `tags { ... }` (block) or `tags = { ... }` (attribute).
    #[arg(value_enum, short = 'm', long, default_value_t = MapStyle::Block)]
    pub map_style: MapStyle,
}

impl From<&OutputOptions> for SerializeOptions {
    fn from(opts: &OutputOptions) -> Self {
        Self {
            detect_raw_expressions: !opts.no_raw_detection,
            map_style: opts.map_style,
        }
    }
}
