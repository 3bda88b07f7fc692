//! hcl-composer renders declarative block manifests as Terraform-style HCL.

#![deny(missing_docs)]

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hcl_composer::{
    args::{InputOptions, Options, OutputOptions},
    detect_encoding,
    manifest::Manifest,
    ser::Serializer,
    BlockRegistry,
};

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logging: {}", err))
}

fn load_manifest(file: &Path, opts: &InputOptions) -> Result<Manifest> {
    let encoding = detect_encoding(opts.input_encoding, file)
        .context("unable to detect manifest encoding, please provide it explicitly via -i")?;

    if file.to_str() == Some("-") {
        return Manifest::from_reader(io::stdin(), encoding)
            .context(format!("failed to read {} manifest from stdin", encoding));
    }

    let reader = std::fs::File::open(file)
        .with_context(|| format!("failed to open manifest: {}", file.display()))?;

    let mut manifest = Manifest::from_reader(reader, encoding)
        .with_context(|| format!("failed to read {} manifest: {}", encoding, file.display()))?;

    if let Some(dir) = file.parent() {
        manifest.resolve_paths(dir);
    }

    Ok(manifest)
}

fn compose(
    registry: &mut BlockRegistry,
    manifest: &Manifest,
    serializer: &Serializer,
) -> Result<()> {
    for spec in &manifest.blocks {
        let block = spec
            .to_block(serializer)
            .with_context(|| format!("failed to compose block {}", spec))?;

        debug!(block = %spec, skipped = block.body().is_none(), "composed block");

        registry.register(&block);
    }

    for path in &manifest.splice {
        registry.enqueue_file_append(path);
    }

    Ok(())
}

fn write(registry: &mut BlockRegistry, opts: &OutputOptions) -> Result<()> {
    for path in &opts.splice {
        registry.enqueue_file_append(path);
    }

    let file = &opts.output_file;

    let result = if opts.append {
        registry.append(file)
    } else {
        registry.export(file)
    };

    result.context("failed to write blocks")
}

fn main() -> Result<()> {
    let opts = Options::parse();

    init_logging(opts.verbose)?;

    let serializer = Serializer::new((&opts.output).into());
    let mut registry = BlockRegistry::new();

    for file in &opts.manifests {
        let manifest = load_manifest(file, &opts.input)?;
        compose(&mut registry, &manifest, &serializer)?;
    }

    write(&mut registry, &opts.output)
}
