//! Postcard parsing: single-line field extraction and raw line sources.

pub mod line;
pub mod source;
