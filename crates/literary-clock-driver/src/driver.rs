use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use literary_clock_core::{resolve, ContentRating, Quote, QuoteIndex, ResolverState, SelectionPolicy, TimeKey};
use literary_clock_corpus::CorpusSource;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::time::MissedTickBehavior;

use crate::clock::ClockSource;
use crate::config::{ClockConfig, Theme, DEFAULT_TICK_INTERVAL_SECS};
use crate::frame::QuoteFrame;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render target failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("render failed: {0}")]
    Other(String),
}

pub trait Renderer {
    /// # Errors
    /// Returns [`RenderError`] when the frame cannot be shown. The run loop stops on error.
    fn render(&mut self, frame: &QuoteFrame) -> Result<(), RenderError>;
}

struct DriverState {
    resolver: ResolverState,
    rng: StdRng,
}

pub struct ClockDriver {
    index: Arc<QuoteIndex>,
    policy: SelectionPolicy,
    theme: Theme,
    tick_interval: Duration,
    state: Mutex<DriverState>,
    running: AtomicBool,
}

impl ClockDriver {
    /// A config that fails [`ClockConfig::validate`] runs at the default cadence instead.
    #[must_use]
    pub fn new(index: Arc<QuoteIndex>, config: &ClockConfig) -> Self {
        let tick_interval = match config.validate() {
            Ok(()) => config.tick_interval(),
            Err(err) => {
                tracing::warn!(
                    "{}; ticking every {}s instead",
                    err,
                    DEFAULT_TICK_INTERVAL_SECS
                );
                Duration::from_secs(DEFAULT_TICK_INTERVAL_SECS)
            }
        };

        Self {
            index,
            policy: config.selection,
            theme: config.theme,
            tick_interval,
            state: Mutex::new(DriverState {
                resolver: ResolverState::new(),
                rng: StdRng::from_entropy(),
            }),
            running: AtomicBool::new(true),
        }
    }

    /// Load the configured corpus and build a driver over it. Never fails: a missing or
    /// unusable corpus leaves the index empty and every tick shows the fallback quote.
    #[must_use]
    pub fn from_config(config: &ClockConfig) -> Self {
        Self::new(Arc::new(load_index(config)), config)
    }

    /// Replace the random source with a seeded one so selections are reproducible.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        self.state.lock().rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn index(&self) -> &Arc<QuoteIndex> {
        &self.index
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn tick(&self, now: OffsetDateTime) -> QuoteFrame {
        self.tick_key(TimeKey::from_datetime(now))
    }

    pub fn tick_key(&self, time_key: TimeKey) -> QuoteFrame {
        let mut state = self.state.lock();
        let DriverState { resolver, rng } = &mut *state;
        let (resolution, next) = resolve(&self.index, time_key, resolver, self.policy, rng);
        *resolver = next;
        QuoteFrame::new(resolution, self.theme)
    }

    /// The frame most recently resolved, marked as reused. `None` before the first tick.
    #[must_use]
    pub fn current(&self) -> Option<QuoteFrame> {
        let state = self.state.lock();
        state.resolver.last().map(|last| {
            let mut resolution = last.clone();
            resolution.reused = true;
            QuoteFrame::new(resolution, self.theme)
        })
    }

    /// No further ticks are delivered once this returns. The current frame stays readable.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Tick on a fixed cadence until [`ClockDriver::stop`] is called or rendering fails.
    ///
    /// The first tick fires immediately. Ticks missed while the process was suspended are
    /// skipped, not replayed. Returns the number of frames delivered.
    ///
    /// # Errors
    /// Returns the first [`RenderError`]; the driver is stopped when that happens.
    pub async fn run<C, R>(&self, clock: &C, renderer: &mut R) -> Result<u64, RenderError>
    where
        C: ClockSource + ?Sized,
        R: Renderer + ?Sized,
    {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut delivered = 0_u64;

        tracing::info!(
            "Clock running: {} quotes over {} minutes, ticking every {}s ({} selection, {} theme)",
            self.index.len(),
            self.index.covered_minutes(),
            self.tick_interval.as_secs(),
            self.policy.as_str(),
            self.theme.as_str()
        );

        while self.is_running() {
            interval.tick().await;
            if !self.is_running() {
                break;
            }

            let frame = self.tick(clock.now());
            if let Err(err) = renderer.render(&frame) {
                tracing::error!("Renderer failed at {}: {}", frame.time_key, err);
                self.stop();
                return Err(err);
            }
            delivered += 1;
        }

        tracing::info!("Clock stopped after {} frames", delivered);
        Ok(delivered)
    }
}

/// Build the index for `config`, or an empty one when the corpus is missing or unusable.
#[must_use]
pub fn load_index(config: &ClockConfig) -> QuoteIndex {
    let Some(path) = config.corpus.as_ref() else {
        tracing::warn!("No corpus configured; every minute will show the fallback quote");
        return QuoteIndex::empty();
    };

    let index = match CorpusSource::detect(path).and_then(|source| source.load()) {
        Ok(load) => load.into_index(),
        Err(err) => {
            tracing::warn!("Corpus unavailable, showing the fallback quote: {}", err);
            return QuoteIndex::empty();
        }
    };

    if config.sfw_only {
        let filtered = index.filtered(Quote::is_safe_for_work);
        tracing::info!(
            "Dropped quotes rated sfw={:?}: kept {} of {}",
            ContentRating::NotSafeForWork.as_str(),
            filtered.len(),
            index.len()
        );
        filtered
    } else {
        index
    }
}
