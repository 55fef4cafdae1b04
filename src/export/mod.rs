//! Export functionality: flat text save (overwrite / append) and CSV.

pub mod csv;
pub mod text;
