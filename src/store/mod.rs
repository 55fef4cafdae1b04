//! The postcard store: an append-only record list plus its secondary indices.
//!
//! Ingestion is atomic per call. Every line of a source is parsed into a
//! staging vector first; only when all of them parse are the postcards
//! appended and indexed. A failed call leaves the store exactly as it was.
//!
//! Queries never fail. Unknown names and empty ranges yield empty results.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::Result;
use crate::export::text::{save_postcards, SaveMode};
use crate::index::PostcardIndex;
use crate::model::postcard::Postcard;
use crate::parser::line::parse_line;
use crate::parser::source::{read_raw_lines, PostcardFile};

/// In-memory postcard store.
///
/// A postcard's position in the list is its identity; the indices refer to
/// postcards by position only.
#[derive(Debug, Default, Clone)]
pub struct PostcardStore {
    postcards: Vec<Postcard>,
    index: PostcardIndex,
    source: Option<PathBuf>,
}

impl PostcardStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest every line of `reader`.
    ///
    /// Loading into a store that already holds postcards accumulates; it
    /// never discards what an earlier call ingested. Returns the number of
    /// postcards added.
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        self.ingest_reader(reader, "load")
    }

    /// Ingest more lines on top of the current contents.
    ///
    /// Existing buckets receive the new positions at their tail; nothing
    /// already indexed is revisited.
    pub fn append<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        self.ingest_reader(reader, "append")
    }

    /// Load a postcard file and remember it as the store's source.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        self.ingest_file(path.as_ref(), "load")
    }

    /// Append the postcards of another file and remember it as the source.
    pub fn append_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        self.ingest_file(path.as_ref(), "append")
    }

    fn ingest_reader<R: BufRead>(&mut self, reader: R, action: &str) -> Result<usize> {
        let lines = read_raw_lines(reader)?;
        self.ingest(&lines, action)
    }

    /// The source path changes only once every line has been committed.
    fn ingest_file(&mut self, path: &Path, action: &str) -> Result<usize> {
        let lines = PostcardFile::new(path)?.read_lines()?;
        let added = self.ingest(&lines, action)?;
        info!(path = %path.display(), action, added, total = self.count(), "Ingested postcard file");
        self.source = Some(path.to_path_buf());
        Ok(added)
    }

    /// Parse all lines, then commit them together.
    fn ingest(&mut self, lines: &[String], action: &str) -> Result<usize> {
        let staged = lines
            .iter()
            .enumerate()
            .map(|(i, raw)| parse_line(raw, i + 1))
            .collect::<Result<Vec<Postcard>>>()?;

        let added = staged.len();
        let start = self.postcards.len();
        for (offset, postcard) in staged.into_iter().enumerate() {
            self.index.insert(start + offset, &postcard);
            self.postcards.push(postcard);
        }

        debug!(action, added, total = self.postcards.len(), "Ingested postcards");
        Ok(added)
    }

    /// Number of postcards held.
    pub fn count(&self) -> usize {
        self.postcards.len()
    }

    /// Whether no postcards have been ingested.
    pub fn is_empty(&self) -> bool {
        self.postcards.is_empty()
    }

    /// Path of the file most recently loaded or appended, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Postcard at `position`.
    pub fn get(&self, position: usize) -> Option<&Postcard> {
        self.postcards.get(position)
    }

    /// All postcards in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Postcard> {
        self.postcards.iter()
    }

    /// The secondary indices.
    pub fn index(&self) -> &PostcardIndex {
        &self.index
    }

    /// Raw lines of postcards dated within `start..=end`.
    ///
    /// Sorted by date, then by insertion order within a date.
    pub fn query_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&str> {
        self.postcards_by_date_range(start, end)
            .into_iter()
            .map(|p| p.raw.as_str())
            .collect()
    }

    /// Raw lines of postcards sent by `sender`, in insertion order.
    pub fn query_by_sender(&self, sender: &str) -> Vec<&str> {
        self.postcards_by_sender(sender)
            .into_iter()
            .map(|p| p.raw.as_str())
            .collect()
    }

    /// Raw lines of postcards addressed to `receiver`, in insertion order.
    pub fn query_by_receiver(&self, receiver: &str) -> Vec<&str> {
        self.postcards_by_receiver(receiver)
            .into_iter()
            .map(|p| p.raw.as_str())
            .collect()
    }

    /// Postcards dated within `start..=end`.
    pub fn postcards_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Postcard> {
        self.resolve(&self.index.date_positions(start, end))
    }

    /// Postcards sent by `sender`.
    pub fn postcards_by_sender(&self, sender: &str) -> Vec<&Postcard> {
        self.resolve(self.index.sender_bucket(sender))
    }

    /// Postcards addressed to `receiver`.
    pub fn postcards_by_receiver(&self, receiver: &str) -> Vec<&Postcard> {
        self.resolve(self.index.receiver_bucket(receiver))
    }

    /// Map positions back to postcards.
    pub fn resolve(&self, positions: &[usize]) -> Vec<&Postcard> {
        positions
            .iter()
            .filter_map(|&pos| self.postcards.get(pos))
            .collect()
    }

    /// Replace the contents of `path` with every postcard, in store order.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        save_postcards(&self.postcards, path.as_ref(), SaveMode::Overwrite)
    }

    /// Add every postcard to the end of `path`, keeping what it held.
    pub fn update_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        save_postcards(&self.postcards, path.as_ref(), SaveMode::Append)
    }
}

impl<'a> IntoIterator for &'a PostcardStore {
    type Item = &'a Postcard;
    type IntoIter = std::slice::Iter<'a, Postcard>;

    fn into_iter(self) -> Self::IntoIter {
        self.postcards.iter()
    }
}
