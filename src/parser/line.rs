//! Parsing of a single postcard line.
//!
//! The layout is fixed:
//!
//! ```text
//! date:YYYY-MM-DD; from:<sender>; to:<receiver>;
//! ```
//!
//! Fields are located by their `;` delimiters and known prefixes rather than
//! by character offsets. The receiver is everything between ` to:` and the
//! final `;`, so it may itself contain `;`.

use chrono::NaiveDate;

use crate::error::{PostcardError, Result};
use crate::model::postcard::Postcard;

const DATE_PREFIX: &str = "date:";
const FROM_PREFIX: &str = " from:";
const TO_PREFIX: &str = " to:";

/// `strftime` format of the date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse one raw line into a [`Postcard`].
///
/// `raw` may end with `\n` or `\r\n`; it is stored unchanged in
/// [`Postcard::raw`]. `line_no` is only used for error reporting.
pub fn parse_line(raw: &str, line_no: usize) -> Result<Postcard> {
    let body = raw.trim_end_matches(['\n', '\r']);

    let body = body
        .strip_suffix(';')
        .ok_or_else(|| PostcardError::parse(line_no, "line must end with ';'"))?;

    let mut parts = body.splitn(3, ';');
    let date_part = parts.next().unwrap_or_default();
    let (Some(from_part), Some(to_part)) = (parts.next(), parts.next()) else {
        return Err(PostcardError::parse(
            line_no,
            "expected three ';'-delimited fields (date, from, to)",
        ));
    };

    let date_str = strip_field(date_part, DATE_PREFIX, line_no)?;
    let sender = strip_field(from_part, FROM_PREFIX, line_no)?;
    let receiver = strip_field(to_part, TO_PREFIX, line_no)?;

    let date = parse_date(date_str).ok_or_else(|| {
        PostcardError::parse(line_no, format!("invalid calendar date '{date_str}'"))
    })?;

    Ok(Postcard {
        raw: raw.to_string(),
        date,
        sender: sender.to_string(),
        receiver: receiver.to_string(),
    })
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

fn strip_field<'a>(part: &'a str, prefix: &str, line_no: usize) -> Result<&'a str> {
    part.strip_prefix(prefix).ok_or_else(|| {
        PostcardError::parse(
            line_no,
            format!("expected field starting with '{}'", prefix.trim_start()),
        )
    })
}
