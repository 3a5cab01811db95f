//! Edge highlighting with bounding-box tracking.
//!
//! Marks every pixel whose 3x3 gray neighborhood spans more than
//! [`EDGE_DIFFERENCE_THRESHOLD`] levels as an edge pixel and records the
//! bounding box of all edge pixels in an [`EdgeBounds`] owned by the caller.
//! The box is later used to crop the image down to the region of interest.

use crate::buffer::{blue, green, pack_rgb, red, with_alpha_of, PixelBuffer};
use crate::cancel::CancelToken;
use crate::error::ProcessResult;

/// Minimum gray spread inside a 3x3 window for an edge pixel.
pub const EDGE_DIFFERENCE_THRESHOLD: u32 = 150;

const EDGE_GRAY: u32 = 50;
const BACKGROUND_GRAY: u32 = 200;

/// Bounding box of the edge pixels seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeBounds {
    extent: Option<(u32, u32, u32, u32)>,
}

impl EdgeBounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the box to include `(x, y)`.
    pub fn include(&mut self, x: u32, y: u32) {
        self.extent = Some(match self.extent {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    /// Crop rectangle as `(from_x, from_y, to_x, to_y)` with exclusive ends.
    pub fn as_crop(&self) -> Option<(u32, u32, u32, u32)> {
        self.extent.map(|(x0, y0, x1, y1)| (x0, y0, x1 + 1, y1 + 1))
    }
}

/// Render edge pixels dark gray (50) and everything else light gray (200).
///
/// Neighborhood slots outside the image stay at gray 0, so border pixels of
/// a bright image register as edges. Every edge pixel is added to `bounds`.
pub fn highlight_edges(
    image: &PixelBuffer,
    bounds: &mut EdgeBounds,
    cancel: &CancelToken,
) -> ProcessResult<PixelBuffer> {
    let (width, height) = image.dimensions();
    let pixels = image.to_packed();
    let mut output = vec![0u32; pixels.len()];
    let (w, h) = (width as i64, height as i64);

    for y in 0..height {
        cancel.check()?;
        for x in 0..width {
            let mut window = [0u32; 9];
            let mut slot = 0;
            for dy in -1..=1i64 {
                for dx in -1..=1i64 {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let p = pixels[(ny * w + nx) as usize];
                    window[slot] = (red(p) + green(p) + blue(p)) / 3;
                    slot += 1;
                }
            }

            let max = window.iter().copied().max().unwrap_or(0);
            let min = window.iter().copied().min().unwrap_or(0);
            let gray = if max - min > EDGE_DIFFERENCE_THRESHOLD {
                bounds.include(x, y);
                EDGE_GRAY
            } else {
                BACKGROUND_GRAY
            };

            let index = y as usize * width as usize + x as usize;
            output[index] = with_alpha_of(pack_rgb(gray, gray, gray), pixels[index]);
        }
    }

    Ok(PixelBuffer::from_packed(width, height, &output)?)
}
