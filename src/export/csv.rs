//! Export postcard fields to CSV.

use std::io::Write;
use std::path::Path;

use crate::model::postcard::Postcard;

/// Export postcards to a CSV file with columns `Date,From,To`.
///
/// `separator` replaces the comma both between fields and in the header row.
pub fn export_csv(postcards: &[&Postcard], output_path: &Path, separator: char) -> anyhow::Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(output_path)?);

    writeln!(file, "Date{separator}From{separator}To")?;

    for postcard in postcards {
        let date = postcard.date.format("%Y-%m-%d").to_string();
        writeln!(
            file,
            "{}{sep}{}{sep}{}",
            csv_escape(&date, separator),
            csv_escape(&postcard.sender, separator),
            csv_escape(&postcard.receiver, separator),
            sep = separator,
        )?;
    }

    file.flush()?;
    tracing::info!(path = %output_path.display(), rows = postcards.len(), "Exported CSV");
    Ok(())
}

/// Escape a value for CSV (RFC 4180).
///
/// Wraps in double quotes if the value contains the separator, quotes, or newlines.
fn csv_escape(value: &str, separator: char) -> String {
    if value.contains(separator) || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
