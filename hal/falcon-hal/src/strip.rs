//! Addressable LED strip abstraction

/// One strip pixel
pub type Rgb = smart_leds::RGB8;

/// Errors reported by strip backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripError {
    /// More colors than the strip has pixels
    TooManyPixels,
    /// Transfer to the strip failed
    Transfer,
}

/// Addressable LED strip
///
/// A write replaces the whole strip in one transfer, so a frame is never
/// shown half-updated.
pub trait LedStrip {
    /// Number of pixels on the strip
    fn len(&self) -> usize;

    /// Check if the strip has no pixels
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write colors starting at pixel 0
    ///
    /// Pixels beyond `colors.len()` are left dark.
    fn write(&mut self, colors: &[Rgb]) -> Result<(), StripError>;

    /// Turn every pixel off
    fn clear(&mut self) -> Result<(), StripError> {
        self.write(&[])
    }
}
