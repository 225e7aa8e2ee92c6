use std::io::Write;

use literary_clock_driver::{QuoteFrame, RenderError, Renderer, Theme};

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

fn emphasis(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "\x1b[1m",
        Theme::Dark => "\x1b[1;97m",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text { styled: bool },
    Json,
}

/// Writes frames to a terminal or pipe. A frame is only written when it differs from the one
/// on screen, so same-minute ticks produce no output.
pub struct TerminalRenderer<W> {
    out: W,
    format: OutputFormat,
    frames_written: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format, frames_written: 0 }
    }

    #[must_use]
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn write_text(&mut self, frame: &QuoteFrame, styled: bool) -> Result<(), RenderError> {
        let quote = &frame.quote;
        if styled {
            let strong = emphasis(frame.theme);
            writeln!(self.out, "{DIM}[{}]{RESET}", frame.time_key)?;
            writeln!(self.out, "{}{strong}{}{RESET}{}", quote.prefix, quote.time_phrase, quote.suffix)?;
            writeln!(self.out, "    {DIM}{}{RESET}", frame.attribution())?;
        } else {
            writeln!(self.out, "[{}]", frame.time_key)?;
            writeln!(self.out, "{}", quote.full_text())?;
            writeln!(self.out, "    {}", frame.attribution())?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &QuoteFrame) -> Result<(), RenderError> {
        if frame.reused && self.frames_written > 0 {
            return Ok(());
        }

        match self.format {
            OutputFormat::Text { styled } => self.write_text(frame, styled)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, frame)
                    .map_err(|err| RenderError::Other(err.to_string()))?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        self.frames_written += 1;
        Ok(())
    }
}
