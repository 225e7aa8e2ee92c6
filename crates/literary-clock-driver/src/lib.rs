//! Drives the literary clock: reads the configuration and loads the corpus. Then, on every
//! tick, it resolves the current minute into a [`QuoteFrame`] for a [`Renderer`].

pub mod clock;
pub mod config;
pub mod driver;
pub mod frame;

pub use clock::{ClockSource, FixedClock, LocalClock};
pub use config::{ClockConfig, ConfigError, Theme, DEFAULT_TICK_INTERVAL_SECS};
pub use driver::{load_index, ClockDriver, RenderError, Renderer};
pub use frame::QuoteFrame;
