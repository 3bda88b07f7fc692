//! IO helpers to write exported blocks to files or stdout.

use std::fs::{File, OpenOptions};
use std::io::{self, Stdout, Write};
use std::path::Path;

/// How an existing destination file is treated when writing.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum WriteMode {
    /// Truncate the destination before writing.
    #[default]
    Truncate,
    /// Append to the end of the destination.
    Append,
}

/// A writer that either writes to a `File` or `Stdout`.
#[derive(Debug)]
pub enum Writer {
    /// A file writer.
    File(File),
    /// Stdout writer.
    Stdout(Stdout),
}

impl Writer {
    /// Creates a new `Writer` for path. The file is created if it does not exist.
    ///
    /// ```
    /// use hcl_composer::io::{WriteMode, Writer};
    /// use tempfile::tempdir;
    /// # use std::error::Error;
    /// #
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let dir = tempdir()?;
    /// let writer = Writer::new(dir.path().join("main.tf"), WriteMode::Append);
    /// assert!(matches!(writer, Ok(Writer::File(_))));
    /// #     Ok(())
    /// # }
    /// ```
    ///
    /// A special case is made for the path `-` which creates a `Stdout` writer regardless of the
    /// mode.
    ///
    /// ```
    /// use hcl_composer::io::{WriteMode, Writer};
    ///
    /// assert!(matches!(Writer::new("-", WriteMode::Truncate), Ok(Writer::Stdout(_))));
    /// ```
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new<P>(path: P, mode: WriteMode) -> io::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        if path.to_str() == Some("-") {
            return Ok(Self::Stdout(io::stdout()));
        }

        let file = match mode {
            WriteMode::Truncate => File::create(path)?,
            WriteMode::Append => OpenOptions::new().create(true).append(true).open(path)?,
        };

        Ok(Self::File(file))
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File(ref mut file) => file.write(buf),
            Self::Stdout(ref mut stdout) => stdout.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File(ref mut file) => file.flush(),
            Self::Stdout(ref mut stdout) => stdout.flush(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_truncate_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tf");

        fs::write(&path, "old\n").unwrap();

        Writer::new(&path, WriteMode::Truncate)
            .unwrap()
            .write_all(b"a\n")
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n");

        Writer::new(&path, WriteMode::Append)
            .unwrap()
            .write_all(b"b\n")
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.tf");

        assert!(Writer::new(&path, WriteMode::Truncate).is_err());
        assert!(Writer::new(&path, WriteMode::Append).is_err());
    }
}
