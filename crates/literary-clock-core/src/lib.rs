use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, Time};

pub mod index;
pub mod resolver;

pub use index::QuoteIndex;
pub use resolver::{resolve, Resolution, ResolutionOrigin, ResolverState, SelectionPolicy};

pub const MINUTES_PER_DAY: usize = 24 * 60;

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum CoreError {
    #[error("invalid time key `{0}`: expected HH:mm between 00:00 and 23:59")]
    TimeKey(String),
    #[error("validation error: {0}")]
    Validation(String),
}

/// A minute of the day, the join key between clock readings and quotes.
///
/// The canonical text form is zero-padded 24-hour `HH:mm`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct TimeKey {
    hour: u8,
    minute: u8,
}

impl TimeKey {
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    /// # Errors
    /// Returns [`CoreError::TimeKey`] when `hour` is not in `0..24` or `minute` is not in `0..60`.
    pub fn new(hour: u8, minute: u8) -> Result<Self, CoreError> {
        if hour >= 24 || minute >= 60 {
            return Err(CoreError::TimeKey(format!("{hour}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    /// # Errors
    /// Returns [`CoreError::TimeKey`] when `minute_of_day` is not below [`MINUTES_PER_DAY`].
    pub fn from_minute_of_day(minute_of_day: usize) -> Result<Self, CoreError> {
        if minute_of_day >= MINUTES_PER_DAY {
            return Err(CoreError::TimeKey(format!("minute {minute_of_day}")));
        }
        let hour = u8::try_from(minute_of_day / 60)
            .map_err(|_| CoreError::TimeKey(format!("minute {minute_of_day}")))?;
        let minute = u8::try_from(minute_of_day % 60)
            .map_err(|_| CoreError::TimeKey(format!("minute {minute_of_day}")))?;
        Ok(Self { hour, minute })
    }

    #[must_use]
    pub fn from_time(time: Time) -> Self {
        Self { hour: time.hour(), minute: time.minute() }
    }

    #[must_use]
    pub fn from_datetime(datetime: OffsetDateTime) -> Self {
        Self::from_time(datetime.time())
    }

    /// Parse `HH:mm`, `H:mm`, or the file-stem form `HH_mm`.
    ///
    /// # Errors
    /// Returns [`CoreError::TimeKey`] for anything else, including out-of-range values.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let malformed = || CoreError::TimeKey(value.to_string());
        let trimmed = value.trim();
        let (hour, minute) = trimmed
            .split_once(':')
            .or_else(|| trimmed.split_once('_'))
            .ok_or_else(malformed)?;

        let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
        if !(1..=2).contains(&hour.len()) || minute.len() != 2 {
            return Err(malformed());
        }
        if !all_digits(hour) || !all_digits(minute) {
            return Err(malformed());
        }

        let hour = hour.parse::<u8>().map_err(|_| malformed())?;
        let minute = minute.parse::<u8>().map_err(|_| malformed())?;
        Self::new(hour, minute).map_err(|_| malformed())
    }

    #[must_use]
    pub fn hour(self) -> u8 {
        self.hour
    }

    #[must_use]
    pub fn minute(self) -> u8 {
        self.minute
    }

    #[must_use]
    pub fn minute_of_day(self) -> usize {
        usize::from(self.hour) * 60 + usize::from(self.minute)
    }

    #[must_use]
    pub fn file_stem(self) -> String {
        format!("{:02}_{:02}", self.hour, self.minute)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..24_u8).flat_map(|hour| (0..60_u8).map(move |minute| Self { hour, minute }))
    }
}

impl Display for TimeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeKey {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for TimeKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeKey> for String {
    fn from(value: TimeKey) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum ContentRating {
    #[serde(rename = "yes")]
    SafeForWork,
    #[serde(rename = "no")]
    NotSafeForWork,
}

impl ContentRating {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SafeForWork => "yes",
            Self::NotSafeForWork => "no",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(Self::SafeForWork),
            "no" => Some(Self::NotSafeForWork),
            _ => None,
        }
    }
}

/// One quotation with the phrase naming its minute split out for styling.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Quote {
    #[serde(rename = "time")]
    pub time_key: TimeKey,
    #[serde(rename = "quote_first")]
    pub prefix: String,
    #[serde(rename = "quote_time_case")]
    pub time_phrase: String,
    #[serde(rename = "quote_last")]
    pub suffix: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sfw: Option<ContentRating>,
}

impl Quote {
    #[must_use]
    pub fn full_text(&self) -> String {
        let mut text =
            String::with_capacity(self.prefix.len() + self.time_phrase.len() + self.suffix.len());
        text.push_str(&self.prefix);
        text.push_str(&self.time_phrase);
        text.push_str(&self.suffix);
        text
    }

    /// Unrated quotes count as safe; only an explicit `"no"` rating excludes a quote.
    #[must_use]
    pub fn is_safe_for_work(&self) -> bool {
        self.sfw != Some(ContentRating::NotSafeForWork)
    }

    /// # Errors
    /// Returns [`CoreError::Validation`] when the quote has no displayable text.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.prefix.trim().is_empty()
            && self.time_phrase.trim().is_empty()
            && self.suffix.trim().is_empty()
        {
            return Err(CoreError::Validation("quote text MUST be non-empty".to_string()));
        }

        if self.title.trim().is_empty() && self.author.trim().is_empty() {
            return Err(CoreError::Validation(
                "title or author MUST be provided for attribution".to_string(),
            ));
        }

        Ok(())
    }
}

const FALLBACK_TEXT: &str = "You would measure time the measureless and the immeasurable.\n\
You would adjust your conduct and even direct the course of your spirit according to hours and seasons.\n\
Of time you would make a stream upon whose bank you would sit and watch its flowing.\n\
Yet the timeless in you is aware of life\u{2019}s timelessness,\n\
And knows that yesterday is but today\u{2019}s memory and tomorrow is today\u{2019}s dream.";

/// The quote shown when nothing else can be resolved.
///
/// Every call returns the same allocation, so [`is_fallback`] can compare by pointer.
#[must_use]
pub fn fallback_quote() -> Arc<Quote> {
    static FALLBACK: OnceLock<Arc<Quote>> = OnceLock::new();
    Arc::clone(FALLBACK.get_or_init(|| {
        Arc::new(Quote {
            time_key: TimeKey::MIDNIGHT,
            prefix: String::new(),
            time_phrase: String::new(),
            suffix: FALLBACK_TEXT.to_string(),
            title: "The Prophet".to_string(),
            author: "Khalil Gibran".to_string(),
            sfw: Some(ContentRating::SafeForWork),
        })
    }))
}

#[must_use]
pub fn is_fallback(quote: &Arc<Quote>) -> bool {
    Arc::ptr_eq(quote, &fallback_quote())
}
