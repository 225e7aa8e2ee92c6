//! Flat pipe-delimited layout, one quote per row.
//!
//! ```text
//! time|prefix|time_phrase|suffix|title|author
//! time|time_phrase|full_quote|title|author
//! ```
//!
//! Fields are not escaped. A `|` inside a field shifts every later column, so such a row is
//! either rejected by its field count or loaded with misassigned fields. Corpora that need
//! the delimiter in quote text should use the per-minute JSON layout instead.

use std::fs;
use std::path::Path;

use literary_clock_core::{Quote, TimeKey};

use crate::{CorpusLoad, LoadError, LoadReport, ParseError};

pub const FIELD_DELIMITER: char = '|';

/// # Errors
/// Returns [`ParseError::FieldCount`] for anything but five or six fields,
/// [`ParseError::PhraseNotInQuote`] when a five-field row's phrase is blank or absent from its
/// quote, and [`ParseError::Invalid`] for a bad time or an unusable quote.
pub fn parse_row(row: &str) -> Result<Quote, ParseError> {
    let fields = row.split(FIELD_DELIMITER).collect::<Vec<_>>();
    let quote = match fields.as_slice() {
        [time, prefix, time_phrase, suffix, title, author] => Quote {
            time_key: TimeKey::parse(time)?,
            prefix: (*prefix).to_string(),
            time_phrase: (*time_phrase).to_string(),
            suffix: (*suffix).to_string(),
            title: title.trim().to_string(),
            author: author.trim().to_string(),
            sfw: None,
        },
        [time, time_phrase, full_quote, title, author] => {
            let time_key = TimeKey::parse(time)?;
            let found =
                if time_phrase.trim().is_empty() { None } else { full_quote.find(time_phrase) };
            let Some(start) = found else {
                return Err(ParseError::PhraseNotInQuote { phrase: (*time_phrase).to_string() });
            };
            let end = start + time_phrase.len();
            Quote {
                time_key,
                prefix: full_quote[..start].to_string(),
                time_phrase: (*time_phrase).to_string(),
                suffix: full_quote[end..].to_string(),
                title: title.trim().to_string(),
                author: author.trim().to_string(),
                sfw: None,
            }
        }
        other => return Err(ParseError::FieldCount { found: other.len() }),
    };
    quote.validate()?;
    Ok(quote)
}

/// Parse a whole table. Blank lines and lines starting with `#` are ignored; bad rows are
/// recorded in `report` under `origin:line`.
pub fn parse_table(contents: &str, origin: &str, report: &mut LoadReport) -> Vec<Quote> {
    let mut quotes = Vec::new();
    for (line_index, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_row(line) {
            Ok(quote) => {
                report.records_loaded += 1;
                quotes.push(quote);
            }
            Err(err) => report.skip_record(format!("{origin}:{}", line_index + 1), err),
        }
    }
    quotes
}

/// # Errors
/// Returns [`LoadError::Unreadable`] when `path` cannot be read as UTF-8 text.
pub fn load_table(path: &Path) -> Result<CorpusLoad, LoadError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(source) => return Err(LoadError::Unreadable { path: path.to_path_buf(), source }),
    };

    let mut report = LoadReport { files_read: 1, ..LoadReport::default() };
    let quotes = parse_table(&contents, &path.display().to_string(), &mut report);
    Ok(CorpusLoad { quotes, report })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(row: &str) -> Quote {
        match parse_row(row) {
            Ok(quote) => quote,
            Err(err) => panic!("row should parse: {err}\nrow: {row}"),
        }
    }

    #[test]
    fn six_field_row_keeps_parts_verbatim() {
        let quote = parsed("09:41|The screen read |9:41 A.M.| when it lit up.|Keynote|Anon");

        assert_eq!(quote.time_key.to_string(), "09:41");
        assert_eq!(quote.prefix, "The screen read ");
        assert_eq!(quote.time_phrase, "9:41 A.M.");
        assert_eq!(quote.suffix, " when it lit up.");
        assert_eq!(quote.full_text(), "The screen read 9:41 A.M. when it lit up.");
    }

    #[test]
    fn five_field_row_splits_full_quote_at_phrase() {
        let full = "At half past six the lamps came on, and by half past six the street was empty.";
        let quote = parsed(&format!("18:30|half past six|{full}|Evening|P. Writer"));

        assert_eq!(quote.prefix, "At ");
        assert_eq!(quote.time_phrase, "half past six");
        assert_eq!(quote.full_text(), full);
    }

    #[test]
    fn five_field_row_without_phrase_is_rejected() {
        let err = match parse_row("18:30|seven o'clock|Nothing about the hour here.|T|A") {
            Ok(quote) => panic!("row should be rejected, got {quote:?}"),
            Err(err) => err,
        };
        assert_eq!(err, ParseError::PhraseNotInQuote { phrase: "seven o'clock".to_string() });
    }

    #[test]
    fn five_field_row_with_blank_phrase_is_rejected() {
        for row in ["12:00||It was noon.|T|A", "12:00|  |It was noon.|T|A"] {
            match parse_row(row) {
                Err(ParseError::PhraseNotInQuote { .. }) => {}
                other => panic!("blank phrase should be rejected, got {other:?}\nrow: {row}"),
            }
        }
    }

    #[test]
    fn delimiter_inside_field_changes_field_count() {
        let err = match parse_row("12:00|It was |noon| (or 12|00)|Title|Author") {
            Ok(quote) => panic!("row should be rejected, got {quote:?}"),
            Err(err) => err,
        };
        assert_eq!(err, ParseError::FieldCount { found: 7 });
    }

    #[test]
    fn table_skips_comments_blanks_and_bad_rows() {
        let contents = "# time|phrase|quote|title|author\n\
                        \n\
                        12:00|noon|It was noon.|Clocks|A\n\
                        25:00|noon|It was noon.|Clocks|A\n\
                        12:00|only|three\n\
                        12:00|midday|By midday it was over.|Clocks II|B\n";
        let mut report = LoadReport::default();

        let quotes = parse_table(contents, "quotes.psv", &mut report);

        assert_eq!(quotes.len(), 2);
        assert_eq!(report.records_loaded, 2);
        assert_eq!(report.records_skipped, 2);
        let locations =
            report.skipped.iter().map(|skipped| skipped.location.as_str()).collect::<Vec<_>>();
        assert_eq!(locations, vec!["quotes.psv:4", "quotes.psv:5"]);
    }

    #[test]
    fn load_table_reads_file_from_disk() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(err) => panic!("failed to create temp dir: {err}"),
        };
        let path = dir.path().join("quotes.psv");
        if let Err(err) = fs::write(&path, "09:41|9:41 A.M.|It was 9:41 A.M.|Keynote|Anon\r\n") {
            panic!("failed to write fixture: {err}");
        }

        let load = match load_table(&path) {
            Ok(load) => load,
            Err(err) => panic!("table should load: {err}"),
        };

        assert_eq!(load.report.files_read, 1);
        assert_eq!(load.quotes.len(), 1);
        assert_eq!(load.quotes[0].author, "Anon");
        assert_eq!(load.quotes[0].suffix, "");
    }
}
