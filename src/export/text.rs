//! Save postcards back to a flat text file.
//!
//! Each postcard is written as its raw line, so a saved file re-loads into an
//! identical store. A raw line that arrived without a terminator (the last
//! line of a file, typically) gets a `\n` so it cannot run into the next one.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{PostcardError, Result};
use crate::model::postcard::Postcard;

/// How [`save_postcards`] treats an existing target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Truncate the file, then write.
    Overwrite,
    /// Keep the file's contents and write after them. Creates it if missing.
    Append,
}

/// Write `postcards` to `path` in order. Returns the number written.
pub fn save_postcards<'a>(
    postcards: impl IntoIterator<Item = &'a Postcard>,
    path: &Path,
    mode: SaveMode,
) -> Result<usize> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        SaveMode::Overwrite => options.write(true).truncate(true),
        SaveMode::Append => options.append(true),
    };
    let file = options.open(path).map_err(|e| PostcardError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let mut written = 0usize;
    for postcard in postcards {
        writer
            .write_all(postcard.raw.as_bytes())
            .map_err(|e| PostcardError::io(path, e))?;
        if !postcard.has_newline() {
            writer
                .write_all(b"\n")
                .map_err(|e| PostcardError::io(path, e))?;
        }
        written += 1;
    }
    writer.flush().map_err(|e| PostcardError::io(path, e))?;

    info!(path = %path.display(), written, ?mode, "Saved postcards");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::line::parse_line;

    fn cards(lines: &[&str]) -> Vec<Postcard> {
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| parse_line(l, i + 1).unwrap())
            .collect()
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old contents\n").unwrap();

        let list = cards(&["date:2010-06-23; from:Sneezy; to:Alice;\n"]);
        let n = save_postcards(&list, &path, SaveMode::Overwrite).unwrap();
        assert_eq!(n, 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "date:2010-06-23; from:Sneezy; to:Alice;\n"
        );
    }

    #[test]
    fn test_append_keeps_prior_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "date:2009-12-12; from:Dopey; to:Peter;\n").unwrap();

        let list = cards(&["date:2010-06-23; from:Sneezy; to:Alice;\n"]);
        save_postcards(&list, &path, SaveMode::Append).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "date:2009-12-12; from:Dopey; to:Peter;\ndate:2010-06-23; from:Sneezy; to:Alice;\n"
        );
    }

    #[test]
    fn test_missing_terminator_is_added() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let list = cards(&[
            "date:2010-06-23; from:Sneezy; to:Alice;",
            "date:2009-12-12; from:Dopey; to:Peter;\r\n",
        ]);
        save_postcards(&list, &path, SaveMode::Overwrite).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "date:2010-06-23; from:Sneezy; to:Alice;\ndate:2009-12-12; from:Dopey; to:Peter;\r\n"
        );
    }

    #[test]
    fn test_unwritable_path_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.txt");
        let err = save_postcards(&Vec::<Postcard>::new(), &path, SaveMode::Append).unwrap_err();
        assert!(matches!(err, PostcardError::Io { .. }));
    }
}
