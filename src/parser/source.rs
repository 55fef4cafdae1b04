//! Raw line sources for ingestion.
//!
//! Lines are returned with their terminators intact so the store can
//! reproduce them exactly. The underlying file handle is opened and
//! dropped within a single call.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PostcardError, Result};

/// Read buffer size for postcard files (64 KB).
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// A postcard file on disk.
///
/// Creating one verifies the file exists; reading happens in [`read_lines`].
///
/// [`read_lines`]: PostcardFile::read_lines
pub struct PostcardFile {
    path: PathBuf,
    file_size: u64,
}

impl PostcardFile {
    /// Open a postcard file for reading.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PostcardError::FileNotFound(path.clone())
            } else {
                PostcardError::io(&path, e)
            }
        })?;
        Ok(Self {
            path,
            file_size: metadata.len(),
        })
    }

    /// Total size of the underlying file in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Path to the postcard file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every line of the file, terminators included.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path).map_err(|e| PostcardError::io(&self.path, e))?;
        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        let lines = read_raw_lines(reader).map_err(|e| match e {
            PostcardError::Stream(source) => PostcardError::io(&self.path, source),
            other => other,
        })?;
        debug!(
            path = %self.path.display(),
            lines = lines.len(),
            bytes = self.file_size,
            "Read postcard file"
        );
        Ok(lines)
    }
}

/// Read all lines from `reader`, keeping `\n` / `\r\n` on each line.
///
/// A final line without a terminator is returned as-is. A line that is not
/// valid UTF-8 is a parse error at its 1-based line number.
pub fn read_raw_lines<R: BufRead>(mut reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8(std::mem::take(&mut buf))
            .map_err(|_| PostcardError::parse(lines.len() + 1, "line is not valid UTF-8"))?;
        lines.push(line);
    }
    Ok(lines)
}
