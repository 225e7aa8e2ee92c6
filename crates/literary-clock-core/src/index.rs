use std::sync::Arc;

use crate::{Quote, TimeKey, MINUTES_PER_DAY};

/// Read-only mapping from minute of day to the quotes sharing it.
///
/// Buckets are addressed directly by [`TimeKey::minute_of_day`], so lookup cost does not
/// depend on corpus size. Quotes keep their corpus order within a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteIndex {
    buckets: Vec<Vec<Arc<Quote>>>,
    len: usize,
}

impl QuoteIndex {
    #[must_use]
    pub fn empty() -> Self {
        Self { buckets: vec![Vec::new(); MINUTES_PER_DAY], len: 0 }
    }

    pub fn build<I>(quotes: I) -> Self
    where
        I: IntoIterator<Item = Quote>,
    {
        Self::from_shared(quotes.into_iter().map(Arc::new))
    }

    pub fn from_shared<I>(quotes: I) -> Self
    where
        I: IntoIterator<Item = Arc<Quote>>,
    {
        let mut index = Self::empty();
        for quote in quotes {
            index.buckets[quote.time_key.minute_of_day()].push(quote);
            index.len += 1;
        }
        index
    }

    #[must_use]
    pub fn lookup(&self, key: TimeKey) -> &[Arc<Quote>] {
        match self.buckets.get(key.minute_of_day()) {
            Some(bucket) => bucket,
            None => &[],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn covered_minutes(&self) -> usize {
        self.buckets.iter().filter(|bucket| !bucket.is_empty()).count()
    }

    #[must_use]
    pub fn uncovered_keys(&self) -> Vec<TimeKey> {
        TimeKey::all().filter(|key| self.lookup(*key).is_empty()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Quote>> {
        self.buckets.iter().flatten()
    }

    /// New index holding only the quotes accepted by `keep`. Quotes are shared, not copied.
    #[must_use]
    pub fn filtered<F>(&self, keep: F) -> Self
    where
        F: Fn(&Quote) -> bool,
    {
        Self::from_shared(self.iter().filter(|quote| keep(quote)).cloned())
    }
}

impl Default for QuoteIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Quote> for QuoteIndex {
    fn from_iter<T: IntoIterator<Item = Quote>>(iter: T) -> Self {
        Self::build(iter)
    }
}
