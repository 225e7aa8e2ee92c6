use time::{Duration, OffsetDateTime, UtcOffset};

use literary_clock_core::TimeKey;

pub trait ClockSource: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// The system clock at the machine's local offset.
///
/// The offset is captured once in [`LocalClock::detect`]. On Unix the offset can only be read
/// safely while the process is single-threaded, so detection has to happen before any runtime
/// starts.
#[derive(Debug, Clone, Copy)]
pub struct LocalClock {
    offset: UtcOffset,
}

impl LocalClock {
    /// Falls back to UTC with a warning when the local offset cannot be determined.
    #[must_use]
    pub fn detect() -> Self {
        match UtcOffset::current_local_offset() {
            Ok(offset) => Self { offset },
            Err(err) => {
                tracing::warn!("Local UTC offset unavailable ({}); telling time in UTC", err);
                Self { offset: UtcOffset::UTC }
            }
        }
    }

    #[must_use]
    pub fn with_offset(offset: UtcOffset) -> Self {
        Self { offset }
    }

    #[must_use]
    pub fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl ClockSource for LocalClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// Always reports the same instant. Used for `--at` and in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(OffsetDateTime);

impl FixedClock {
    #[must_use]
    pub fn new(at: OffsetDateTime) -> Self {
        Self(at)
    }

    /// The given minute on 1970-01-01 UTC.
    #[must_use]
    pub fn at_key(key: TimeKey) -> Self {
        let minutes = i64::from(key.hour()) * 60 + i64::from(key.minute());
        Self(OffsetDateTime::UNIX_EPOCH + Duration::minutes(minutes))
    }
}

impl ClockSource for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
