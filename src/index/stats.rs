//! Summary statistics computed from the indices.

use super::PostcardIndex;

/// Return the top N senders by postcard count.
///
/// Ties are broken alphabetically so the output is stable.
pub fn top_senders(index: &PostcardIndex, n: usize) -> Vec<(String, usize)> {
    top_n(index.senders(), n)
}

/// Return the top N receivers by postcard count.
pub fn top_receivers(index: &PostcardIndex, n: usize) -> Vec<(String, usize)> {
    top_n(index.receivers(), n)
}

/// Number of distinct dates, senders and receivers.
pub fn distinct_keys(index: &PostcardIndex) -> (usize, usize, usize) {
    (
        index.dates().count(),
        index.senders().count(),
        index.receivers().count(),
    )
}

fn top_n<'a>(buckets: impl Iterator<Item = (&'a str, &'a [usize])>, n: usize) -> Vec<(String, usize)> {
    let mut sorted: Vec<(String, usize)> = buckets
        .map(|(name, bucket)| (name.to_string(), bucket.len()))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(n);
    sorted
}
