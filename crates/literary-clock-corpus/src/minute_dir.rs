//! Per-minute JSON layout: `<dir>/HH_mm.json`, each an array of quote records.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use literary_clock_core::{ContentRating, Quote, TimeKey};
use serde::Deserialize;

use crate::{CorpusLoad, LoadError, LoadReport, ParseError};

/// On-disk record shape. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
struct QuoteRecord {
    time: String,
    quote_first: String,
    quote_time_case: String,
    quote_last: String,
    title: String,
    author: String,
    #[serde(default)]
    sfw: Option<String>,
}

impl QuoteRecord {
    fn into_quote(self) -> Result<Quote, ParseError> {
        let quote = Quote {
            time_key: TimeKey::parse(&self.time)?,
            prefix: self.quote_first,
            time_phrase: self.quote_time_case,
            suffix: self.quote_last,
            title: self.title,
            author: self.author,
            sfw: self.sfw.as_deref().and_then(ContentRating::parse),
        };
        quote.validate()?;
        Ok(quote)
    }
}

/// A minute without a file contributes no candidates and only bumps
/// [`LoadReport::missing_minutes`].
///
/// # Errors
/// Returns [`LoadError::Unreadable`] when `dir` itself cannot be listed.
pub fn load_minute_directory(dir: &Path) -> Result<CorpusLoad, LoadError> {
    if let Err(source) = fs::read_dir(dir) {
        return Err(LoadError::Unreadable { path: dir.to_path_buf(), source });
    }

    let mut quotes = Vec::new();
    let mut report = LoadReport::default();

    for key in TimeKey::all() {
        let path = dir.join(format!("{}.json", key.file_stem()));
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                report.missing_minutes += 1;
                continue;
            }
            Err(err) => {
                let location = path.display().to_string();
                report.reject_file(location, ParseError::Unreadable(err.to_string()));
                continue;
            }
        };
        report.files_read += 1;
        parse_minute_file(key, &path.display().to_string(), &contents, &mut quotes, &mut report);
    }

    Ok(CorpusLoad { quotes, report })
}

/// Parse one minute file, decoding each array element on its own so a bad record does not
/// take its siblings down with it.
fn parse_minute_file(
    key: TimeKey,
    location: &str,
    contents: &str,
    quotes: &mut Vec<Quote>,
    report: &mut LoadReport,
) {
    let values = match serde_json::from_str::<Vec<serde_json::Value>>(contents) {
        Ok(values) => values,
        Err(err) => {
            report.reject_file(location.to_string(), ParseError::NotAnArray(err.to_string()));
            return;
        }
    };

    for (position, value) in values.into_iter().enumerate() {
        let record_location = format!("{location}#{position}");
        let quote = serde_json::from_value::<QuoteRecord>(value)
            .map_err(|err| ParseError::Record(err.to_string()))
            .and_then(QuoteRecord::into_quote);

        match quote {
            Ok(quote) => {
                if quote.time_key != key {
                    tracing::debug!(
                        "Record {} is tagged {} but stored under {}; indexing by its own time",
                        record_location,
                        quote.time_key,
                        key
                    );
                }
                report.records_loaded += 1;
                quotes.push(quote);
            }
            Err(err) => report.skip_record(record_location, err),
        }
    }
}
