use std::sync::Arc;

use literary_clock_core::{is_fallback, Quote, Resolution, ResolutionOrigin, TimeKey};
use serde::{Serialize, Serializer};

use crate::config::Theme;

/// Everything a renderer needs for one tick.
///
/// `time_key` is the minute being told. It differs from `quote.time_key` when the quote was
/// carried over from an earlier minute or is the fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteFrame {
    pub time_key: TimeKey,
    #[serde(serialize_with = "serialize_quote")]
    pub quote: Arc<Quote>,
    pub origin: ResolutionOrigin,
    pub reused: bool,
    pub theme: Theme,
}

impl QuoteFrame {
    #[must_use]
    pub fn new(resolution: Resolution, theme: Theme) -> Self {
        Self {
            time_key: resolution.time_key,
            quote: resolution.quote,
            origin: resolution.origin,
            reused: resolution.reused,
            theme,
        }
    }

    /// `- Title, Author`, dropping whichever half is blank.
    #[must_use]
    pub fn attribution(&self) -> String {
        let title = self.quote.title.trim();
        let author = self.quote.author.trim();
        match (title.is_empty(), author.is_empty()) {
            (false, false) => format!("- {title}, {author}"),
            (false, true) => format!("- {title}"),
            (true, false) => format!("- {author}"),
            (true, true) => String::new(),
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        is_fallback(&self.quote)
    }
}

fn serialize_quote<S>(quote: &Arc<Quote>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    quote.as_ref().serialize(serializer)
}
