//! Destinations for rendered frames.

use crate::error::Result;
use crate::render::{Color, Frame};
use crate::topology::{Position, NUM_PIXELS};
use crate::Location;
use std::io::Write;

/// An addressable LED strip, or anything standing in for one.
pub trait PixelSink {
    /// Sets the colour of one pixel in the pending buffer.
    fn set_pixel(&mut self, index: Location, color: Color);

    /// Makes the pending buffer visible.
    fn show(&mut self) -> Result<()>;

    /// Writes a whole frame, pixel by pixel, then shows it.
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        for (index, color) in frame.iter() {
            self.set_pixel(index, color);
        }
        self.show()
    }
}

/// A strip held in memory, which remembers the last frame shown.
#[derive(Clone, Debug)]
pub struct MemoryStrip {
    pending: [Color; NUM_PIXELS],
    shown: [Color; NUM_PIXELS],
    shows: usize,
}

impl MemoryStrip {
    pub fn new() -> Self {
        Self {
            pending: [Color::OFF; NUM_PIXELS],
            shown: [Color::OFF; NUM_PIXELS],
            shows: 0,
        }
    }

    /// The pixels as of the last call to [PixelSink::show].
    pub fn shown(&self) -> &[Color] {
        &self.shown
    }

    /// The number of times the strip has been shown.
    pub fn shows(&self) -> usize {
        self.shows
    }
}

impl Default for MemoryStrip {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelSink for MemoryStrip {
    fn set_pixel(&mut self, index: Location, color: Color) {
        if let Some(pixel) = self.pending.get_mut(index) {
            *pixel = color;
        }
    }

    fn show(&mut self) -> Result<()> {
        self.shown = self.pending;
        self.shows += 1;
        Ok(())
    }
}

/// Draws each frame as a line of coloured blocks on an ANSI terminal.
pub struct TerminalStrip<W> {
    out: W,
    pending: [Color; NUM_PIXELS],
}

impl<W: Write> TerminalStrip<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: [Color::OFF; NUM_PIXELS],
        }
    }

    /// Consumes the strip, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PixelSink for TerminalStrip<W> {
    fn set_pixel(&mut self, index: Location, color: Color) {
        if let Some(pixel) = self.pending.get_mut(index) {
            *pixel = color;
        }
    }

    fn show(&mut self) -> Result<()> {
        let mut line = String::with_capacity(NUM_PIXELS * 24);
        for (index, color) in self.pending.iter().enumerate() {
            let street_start = Position::from_location(index)
                .map(|position| position.address() == 0)
                .unwrap_or(false);
            if street_start && index > 0 {
                line.push(' ');
            }
            if *color == Color::OFF {
                line.push('\u{00b7}');
            } else {
                line.push_str(&format!(
                    "\x1b[38;2;{};{};{}m\u{25cf}\x1b[0m",
                    color.r, color.g, color.b
                ));
            }
        }
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }
}
