//! Secondary indices over the postcard list.
//!
//! Each index maps a key to a bucket: the positions of the postcards sharing
//! that key, in insertion order. Positions index into the store's postcard
//! vector, which only ever grows, so a position stays valid forever.
//!
//! Dates live in an ordered map so range lookups walk only the matching
//! buckets and come back sorted by date. Names are looked up by exact match
//! and use hash maps.

pub mod stats;

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::model::postcard::Postcard;

/// The three field indices of a postcard store.
#[derive(Debug, Default, Clone)]
pub struct PostcardIndex {
    by_date: BTreeMap<NaiveDate, Vec<usize>>,
    by_sender: HashMap<String, Vec<usize>>,
    by_receiver: HashMap<String, Vec<usize>>,
}

impl PostcardIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `postcard`, stored at `position`, in all three indices.
    ///
    /// Callers must insert positions in increasing order so buckets stay
    /// sorted by insertion.
    pub fn insert(&mut self, position: usize, postcard: &Postcard) {
        self.by_date.entry(postcard.date).or_default().push(position);
        self.by_sender
            .entry(postcard.sender.clone())
            .or_default()
            .push(position);
        self.by_receiver
            .entry(postcard.receiver.clone())
            .or_default()
            .push(position);
    }

    /// Positions of postcards dated within `start..=end`.
    ///
    /// Ordered by date, then by insertion within a date. Empty when
    /// `start > end`.
    pub fn date_positions(&self, start: NaiveDate, end: NaiveDate) -> Vec<usize> {
        if start > end {
            return Vec::new();
        }
        self.by_date
            .range(start..=end)
            .flat_map(|(_, bucket)| bucket.iter().copied())
            .collect()
    }

    /// Bucket for a single date.
    pub fn date_bucket(&self, date: NaiveDate) -> &[usize] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    /// Bucket for a sender name (exact match).
    pub fn sender_bucket(&self, sender: &str) -> &[usize] {
        self.by_sender
            .get(sender)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Bucket for a receiver name (exact match).
    pub fn receiver_bucket(&self, receiver: &str) -> &[usize] {
        self.by_receiver
            .get(receiver)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Date buckets in ascending date order.
    pub fn dates(&self) -> impl Iterator<Item = (&NaiveDate, &[usize])> {
        self.by_date.iter().map(|(d, b)| (d, b.as_slice()))
    }

    /// Sender buckets in arbitrary order.
    pub fn senders(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.by_sender.iter().map(|(s, b)| (s.as_str(), b.as_slice()))
    }

    /// Receiver buckets in arbitrary order.
    pub fn receivers(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.by_receiver
            .iter()
            .map(|(r, b)| (r.as_str(), b.as_slice()))
    }

    /// Earliest and latest indexed dates.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.by_date.keys().next()?;
        let last = self.by_date.keys().next_back()?;
        Some((*first, *last))
    }
}
