//! Corpus loading for the literary clock.
//!
//! Two on-disk layouts are supported:
//! - a directory of per-minute JSON files named `HH_mm.json`, each holding an array of records
//! - a single pipe-delimited table with one quote per row
//!
//! Loading is tolerant: missing minute files, unreadable files, and malformed records are
//! counted in the [`LoadReport`] and skipped. Only a source that cannot be opened at all, or
//! one that yields no usable quote, is a [`LoadError`].

pub mod minute_dir;
pub mod table;

use std::fs;
use std::path::{Path, PathBuf};

use literary_clock_core::{CoreError, Quote, QuoteIndex};
use thiserror::Error;

pub use minute_dir::load_minute_directory;
pub use table::{load_table, parse_row, parse_table, FIELD_DELIMITER};

/// Skipped records kept with their reasons; anything beyond is only counted.
pub const MAX_SKIPPED_DETAILS: usize = 64;

/// Why a single record or file was rejected.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("unreadable file: {0}")]
    Unreadable(String),
    #[error("malformed record: {0}")]
    Record(String),
    #[error("file is not a JSON array of quote records: {0}")]
    NotAnArray(String),
    #[error("expected 5 or 6 `|`-separated fields, found {found}")]
    FieldCount { found: usize },
    #[error("time phrase `{phrase}` does not occur in the quote text")]
    PhraseNotInQuote { phrase: String },
    #[error("{0}")]
    Invalid(#[from] CoreError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("corpus source {} is unreadable: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "corpus source {} yielded no usable quotes ({} records skipped, {} files unreadable)",
        .path.display(),
        .report.records_skipped,
        .report.unreadable_files
    )]
    Empty { path: PathBuf, report: LoadReport },
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SkippedRecord {
    /// `path#n` for the n-th element of a JSON file, `path:line` for a table row.
    pub location: String,
    pub error: ParseError,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct LoadReport {
    pub files_read: usize,
    pub records_loaded: usize,
    pub records_skipped: usize,
    pub missing_minutes: usize,
    pub unreadable_files: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub(crate) fn skip_record(&mut self, location: String, error: ParseError) {
        tracing::warn!("Skipping quote record at {}: {}", location, error);
        self.records_skipped += 1;
        self.keep_detail(location, error);
    }

    pub(crate) fn reject_file(&mut self, location: String, error: ParseError) {
        tracing::warn!("Skipping corpus file {}: {}", location, error);
        self.unreadable_files += 1;
        self.keep_detail(location, error);
    }

    fn keep_detail(&mut self, location: String, error: ParseError) {
        if self.skipped.len() < MAX_SKIPPED_DETAILS {
            self.skipped.push(SkippedRecord { location, error });
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorpusLoad {
    pub quotes: Vec<Quote>,
    pub report: LoadReport,
}

impl CorpusLoad {
    #[must_use]
    pub fn into_index(self) -> QuoteIndex {
        QuoteIndex::build(self.quotes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    MinuteDirectory(PathBuf),
    Table(PathBuf),
}

impl CorpusSource {
    /// Pick the layout from what `path` is on disk.
    ///
    /// # Errors
    /// Returns [`LoadError::Unreadable`] when `path` does not exist or cannot be inspected.
    pub fn detect(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(source) => return Err(LoadError::Unreadable { path, source }),
        };
        if metadata.is_dir() {
            Ok(Self::MinuteDirectory(path))
        } else {
            Ok(Self::Table(path))
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::MinuteDirectory(path) | Self::Table(path) => path,
        }
    }

    /// # Errors
    /// See [`load`].
    pub fn load(&self) -> Result<CorpusLoad, LoadError> {
        load(self)
    }
}

/// Read every quote from `source`.
///
/// # Errors
/// Returns [`LoadError::Unreadable`] when the source root cannot be read, or
/// [`LoadError::Empty`] when it was read but no quote survived parsing.
pub fn load(source: &CorpusSource) -> Result<CorpusLoad, LoadError> {
    let load = match source {
        CorpusSource::MinuteDirectory(path) => load_minute_directory(path)?,
        CorpusSource::Table(path) => load_table(path)?,
    };

    if load.quotes.is_empty() {
        return Err(LoadError::Empty { path: source.path().to_path_buf(), report: load.report });
    }

    tracing::info!(
        "Loaded {} quotes from {} ({} skipped, {} minutes without a file)",
        load.report.records_loaded,
        source.path().display(),
        load.report.records_skipped,
        load.report.missing_minutes
    );
    Ok(load)
}
