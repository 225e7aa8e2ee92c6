mod render;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use literary_clock_core::{SelectionPolicy, TimeKey};
use literary_clock_driver::{
    ClockConfig, ClockDriver, ClockSource, FixedClock, LocalClock, Renderer, Theme,
};
use tracing_subscriber::EnvFilter;

use crate::render::{OutputFormat, TerminalRenderer};

#[derive(Debug, Parser)]
#[command(name = "literary-clock")]
#[command(about = "Tells the time with a line from a book that names the current minute")]
struct Args {
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Corpus directory of `HH_mm.json` files or a pipe-delimited table. Overrides the config.
    #[arg(long)]
    corpus: Option<PathBuf>,
    #[arg(long, value_parser = parse_theme)]
    theme: Option<Theme>,
    #[arg(long, value_parser = parse_selection)]
    selection: Option<SelectionPolicy>,
    #[arg(long)]
    sfw_only: bool,
    #[arg(long)]
    tick_interval_secs: Option<u64>,
    /// Pretend the clock reads this minute (`HH:MM`).
    #[arg(long, value_parser = parse_time_key)]
    at: Option<TimeKey>,
    /// Print a single frame and exit.
    #[arg(long)]
    once: bool,
    /// One JSON object per frame instead of text.
    #[arg(long)]
    json: bool,
    /// Seed the quote selection for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Used when `RUST_LOG` is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    Theme::parse(value).ok_or_else(|| format!("unknown theme `{value}` (expected light or dark)"))
}

fn parse_selection(value: &str) -> Result<SelectionPolicy, String> {
    SelectionPolicy::parse(value)
        .ok_or_else(|| format!("unknown selection `{value}` (expected random or first)"))
}

fn parse_time_key(value: &str) -> Result<TimeKey, String> {
    TimeKey::parse(value).map_err(|err| err.to_string())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn build_config(args: &Args) -> Result<ClockConfig> {
    let mut config = match &args.config {
        Some(path) => ClockConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ClockConfig::default(),
    };

    if let Some(corpus) = &args.corpus {
        config.corpus = Some(corpus.clone());
    }
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    if let Some(selection) = args.selection {
        config.selection = selection;
    }
    if let Some(secs) = args.tick_interval_secs {
        config.tick_interval_secs = secs;
    }
    config.sfw_only |= args.sfw_only;

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    // The local offset has to be read before the runtime starts any threads.
    let clock: Box<dyn ClockSource> = match args.at {
        Some(key) => Box::new(FixedClock::at_key(key)),
        None => Box::new(LocalClock::detect()),
    };

    let config = build_config(&args)?;
    let mut driver = ClockDriver::from_config(&config);
    if let Some(seed) = args.seed {
        driver = driver.with_seed(seed);
    }

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text { styled: io::stdout().is_terminal() }
    };
    let mut renderer = TerminalRenderer::new(io::stdout().lock(), format);

    if args.once {
        let frame = driver.tick(clock.now());
        renderer.render(&frame)?;
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async {
        tokio::select! {
            result = driver.run(clock.as_ref(), &mut renderer) => result.map(|_| ()),
            _ = tokio::signal::ctrl_c() => {
                driver.stop();
                tracing::info!("Interrupted; stopping the clock");
                Ok(())
            }
        }
    })?;

    Ok(())
}
