//! LED strip drivers

use core::iter;

use falcon_hal::{LedStrip, Rgb, StripError};
use smart_leds::SmartLedsWrite;

const OFF: Rgb = Rgb::new(0, 0, 0);

/// Strip of `len` pixels behind any `smart-leds` writer
///
/// Every write sends a full frame: pixels beyond the given colors are
/// padded dark.
pub struct SmartStrip<W> {
    writer: W,
    len: usize,
}

impl<W: SmartLedsWrite<Color = Rgb>> SmartStrip<W> {
    /// Create a new strip driver
    pub fn new(writer: W, len: usize) -> Self {
        Self { writer, len }
    }

    /// Underlying writer
    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: SmartLedsWrite<Color = Rgb>> LedStrip for SmartStrip<W> {
    fn len(&self) -> usize {
        self.len
    }

    fn write(&mut self, colors: &[Rgb]) -> Result<(), StripError> {
        if colors.len() > self.len {
            return Err(StripError::TooManyPixels);
        }
        let frame = colors
            .iter()
            .copied()
            .chain(iter::repeat(OFF))
            .take(self.len);
        self.writer.write(frame).map_err(|_| StripError::Transfer)
    }
}

/// Rig without a strip
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStrip;

impl LedStrip for NoStrip {
    fn len(&self) -> usize {
        0
    }

    fn write(&mut self, colors: &[Rgb]) -> Result<(), StripError> {
        if colors.is_empty() {
            Ok(())
        } else {
            Err(StripError::TooManyPixels)
        }
    }
}
