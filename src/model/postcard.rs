//! The postcard record type.

use chrono::NaiveDate;

/// One ingested postcard.
///
/// The original text is kept verbatim (line terminator included) so that
/// query results and saved files reproduce it character for character.
/// The parsed fields exist only to key the secondary indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Postcard {
    /// The line exactly as it was read from the source.
    pub raw: String,

    /// Day the postcard was sent. Date-only, so equal days compare equal.
    pub date: NaiveDate,

    /// Sender name, as written between `from:` and the next `;`.
    pub sender: String,

    /// Receiver name, as written between `to:` and the final `;`.
    pub receiver: String,
}

impl Postcard {
    /// The raw line without its trailing line terminator.
    pub fn line(&self) -> &str {
        self.raw.trim_end_matches(['\n', '\r'])
    }

    /// Whether the raw text already ends with a newline.
    pub fn has_newline(&self) -> bool {
        self.raw.ends_with('\n')
    }
}

impl std::fmt::Display for Postcard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}  {} -> {}",
            self.date.format("%Y-%m-%d"),
            self.sender,
            self.receiver
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(raw: &str) -> Postcard {
        Postcard {
            raw: raw.to_string(),
            date: NaiveDate::from_ymd_opt(2010, 6, 23).unwrap(),
            sender: "Sneezy".to_string(),
            receiver: "Alice".to_string(),
        }
    }

    #[test]
    fn test_line_strips_terminator() {
        assert_eq!(
            card("date:2010-06-23; from:Sneezy; to:Alice;\r\n").line(),
            "date:2010-06-23; from:Sneezy; to:Alice;"
        );
        assert_eq!(
            card("date:2010-06-23; from:Sneezy; to:Alice;").line(),
            "date:2010-06-23; from:Sneezy; to:Alice;"
        );
    }

    #[test]
    fn test_display() {
        let c = card("date:2010-06-23; from:Sneezy; to:Alice;\n");
        assert!(c.has_newline());
        assert_eq!(c.to_string(), "2010-06-23  Sneezy -> Alice");
    }
}
