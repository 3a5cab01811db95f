//! Per-channel histograms of a [`PixelBuffer`].
//!
//! Used by Otsu thresholding (red channel) and by hosts that want to show
//! the distribution of the current image.

use crate::buffer::PixelBuffer;

/// 256-bin counts for each color channel and the channel average.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    /// Red channel histogram (256 bins)
    pub red: [u32; 256],
    /// Green channel histogram (256 bins)
    pub green: [u32; 256],
    /// Blue channel histogram (256 bins)
    pub blue: [u32; 256],
    /// Histogram of `(r + g + b) / 3`
    pub gray: [u32; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
            gray: [0; 256],
        }
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Count every pixel of `image` into a [`Histogram`].
///
/// Single pass over the RGBA bytes; alpha is ignored.
pub fn compute_histogram(image: &PixelBuffer) -> Histogram {
    let mut hist = Histogram::new();

    for p in image.pixels() {
        hist.red[p.r as usize] += 1;
        hist.green[p.g as usize] += 1;
        hist.blue[p.b as usize] += 1;
        let gray = (p.r as u32 + p.g as u32 + p.b as u32) / 3;
        hist.gray[gray as usize] += 1;
    }

    hist
}
