//! Manifest encodings and their detection from file extensions.

use clap::ValueEnum;
use std::fmt;
use std::path::Path;

/// Encodings a block manifest can be written in.
#[non_exhaustive]
#[derive(ValueEnum, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Encoding {
    /// JavaScript Object Notation
    Json,
    /// Yet Another Markup Language
    #[value(alias = "yml")]
    Yaml,
    /// TOML configuration format
    Toml,
}

impl Encoding {
    /// Creates an `Encoding` from a path by looking at the file extension.
    ///
    /// Returns `None` if the extension is absent or if the extension does not match any of the
    /// supported encodings.
    pub fn from_path<P>(path: P) -> Option<Encoding>
    where
        P: AsRef<Path>,
    {
        let ext = path.as_ref().extension()?.to_str()?;

        match ext {
            "json" => Some(Encoding::Json),
            "yaml" | "yml" => Some(Encoding::Yaml),
            "toml" => Some(Encoding::Toml),
            _ => None,
        }
    }

    /// Returns the name of the `Encoding`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::Yaml => "yaml",
            Encoding::Toml => "toml",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the explicitly requested encoding or falls back to detecting it from the path.
pub fn detect_encoding<P>(encoding: Option<Encoding>, path: P) -> Option<Encoding>
where
    P: AsRef<Path>,
{
    encoding.or_else(|| Encoding::from_path(path))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_path() {
        assert_eq!(Encoding::from_path("blocks.json"), Some(Encoding::Json));
        assert_eq!(Encoding::from_path("blocks.yml"), Some(Encoding::Yaml));
        assert_eq!(Encoding::from_path("dir/blocks.toml"), Some(Encoding::Toml));
        assert_eq!(Encoding::from_path("main.tf"), None);
        assert_eq!(Encoding::from_path("blocks"), None);
    }

    #[test]
    fn test_detect_encoding() {
        assert_eq!(
            detect_encoding(Some(Encoding::Yaml), "blocks.json"),
            Some(Encoding::Yaml)
        );
        assert_eq!(detect_encoding(None, "blocks.json"), Some(Encoding::Json));
        assert_eq!(detect_encoding(None, "-"), None);
    }
}
