//! Core data model types.

pub mod postcard;
