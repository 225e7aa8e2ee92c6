use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{fallback_quote, Quote, QuoteIndex, TimeKey};

/// How one quote is picked when a minute has several candidates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Uniform over the candidates, drawn once per minute transition.
    #[default]
    Random,
    /// Corpus order; reproducible output for previews.
    First,
}

impl SelectionPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::First => "first",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "random" => Some(Self::Random),
            "first" => Some(Self::First),
            _ => None,
        }
    }

    /// A lone candidate is returned without drawing from `rng`.
    pub fn select<'a, R>(self, candidates: &'a [Arc<Quote>], rng: &mut R) -> Option<&'a Arc<Quote>>
    where
        R: Rng + ?Sized,
    {
        match (self, candidates) {
            (_, []) => None,
            (_, [only]) => Some(only),
            (Self::First, [first, ..]) => Some(first),
            (Self::Random, _) => candidates.choose(rng),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionOrigin {
    Selected { candidates: usize },
    /// The minute had no candidates; the previous quote stays on screen.
    CarriedOver,
    Fallback,
}

impl ResolutionOrigin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Selected { .. } => "selected",
            Self::CarriedOver => "carried_over",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub time_key: TimeKey,
    pub quote: Arc<Quote>,
    pub origin: ResolutionOrigin,
    /// `true` when the minute was already resolved and the earlier choice was returned.
    pub reused: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolverState {
    last: Option<Resolution>,
}

impl ResolverState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn time_key(&self) -> Option<TimeKey> {
        self.last.as_ref().map(|last| last.time_key)
    }

    #[must_use]
    pub fn quote(&self) -> Option<&Arc<Quote>> {
        self.last.as_ref().map(|last| &last.quote)
    }

    #[must_use]
    pub fn last(&self) -> Option<&Resolution> {
        self.last.as_ref()
    }
}

/// Resolve the quote to show for `time_key`.
///
/// Within one minute the prior choice is returned unchanged; selection only runs when the
/// minute changes. An empty candidate set keeps the prior quote, or yields the fallback quote
/// when there is none. Never fails.
pub fn resolve<R>(
    index: &QuoteIndex,
    time_key: TimeKey,
    prior: &ResolverState,
    policy: SelectionPolicy,
    rng: &mut R,
) -> (Resolution, ResolverState)
where
    R: Rng + ?Sized,
{
    if let Some(last) = prior.last.as_ref().filter(|last| last.time_key == time_key) {
        let resolution = Resolution { reused: true, ..last.clone() };
        return (resolution, prior.clone());
    }

    let candidates = index.lookup(time_key);
    let (quote, origin) = match policy.select(candidates, rng) {
        Some(chosen) => {
            (Arc::clone(chosen), ResolutionOrigin::Selected { candidates: candidates.len() })
        }
        None => match prior.quote() {
            Some(previous) => (Arc::clone(previous), ResolutionOrigin::CarriedOver),
            None => (fallback_quote(), ResolutionOrigin::Fallback),
        },
    };

    tracing::debug!(
        time_key = %time_key,
        candidates = candidates.len(),
        origin = origin.as_str(),
        "resolved quote for new minute"
    );

    let resolution = Resolution { time_key, quote, origin, reused: false };
    let state = ResolverState { last: Some(resolution.clone()) };
    (resolution, state)
}
