//! `postcards`: a small in-memory postcard record store.
//!
//! Postcards arrive as lines of the form
//! `date:YYYY-MM-DD; from:<sender>; to:<receiver>;`. The store keeps every
//! line verbatim, indexes it by date, sender and receiver, and answers
//! date-range and exact-name queries from those indices.
//!
//! ```
//! use std::io::Cursor;
//! use postcards::store::PostcardStore;
//!
//! let mut store = PostcardStore::new();
//! store.load(Cursor::new("date:2010-06-23; from:Sneezy; to:Alice;\n"))?;
//! assert_eq!(store.query_by_sender("Sneezy"), vec!["date:2010-06-23; from:Sneezy; to:Alice;\n"]);
//! # Ok::<(), postcards::error::PostcardError>(())
//! ```

pub mod bench;
pub mod config;
pub mod error;
pub mod export;
pub mod index;
pub mod model;
pub mod parser;
pub mod search;
pub mod store;

pub use error::{PostcardError, Result};
pub use model::postcard::Postcard;
pub use store::PostcardStore;
