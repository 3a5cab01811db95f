//! Block-averaging mosaic.
//!
//! A simple box pixelation: every pixel inside a block is replaced by the
//! mean color of that block. Blocks at the right and bottom edges are
//! clamped to the remaining pixels, and their mean is taken over exactly
//! the pixels they contain.

use crate::buffer::{Pixel, PixelBuffer};
use crate::cancel::CancelToken;
use crate::error::ProcessResult;

/// Pixelate `image` with blocks of `block_width x block_height`.
///
/// Block sizes below 1 are treated as 1 and sizes larger than the image as
/// the image size. Alpha is taken from each source pixel. The cancel token is
/// polled once per block row.
pub fn pixelate(
    image: &PixelBuffer,
    block_width: u32,
    block_height: u32,
    cancel: &CancelToken,
) -> ProcessResult<PixelBuffer> {
    let (width, height) = image.dimensions();
    let bw = block_width.clamp(1, width);
    let bh = block_height.clamp(1, height);

    let mut output = image.clone();

    for y in (0..height).step_by(bh as usize) {
        cancel.check()?;
        let h = bh.min(height - y);
        for x in (0..width).step_by(bw as usize) {
            let w = bw.min(width - x);
            let block = image.region(x, y, w, h)?;

            let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
            for p in &block {
                r += p.r as u64;
                g += p.g as u64;
                b += p.b as u64;
            }
            let n = block.len() as u64;
            let (r, g, b) = ((r / n) as u8, (g / n) as u8, (b / n) as u8);

            let filled: Vec<Pixel> = block.iter().map(|p| Pixel::rgba(r, g, b, p.a)).collect();
            output.set_region(&filled, x, y, w, h)?;
        }
    }

    Ok(output)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: pixelation with 1x1 blocks is the identity.
        #[test]
        fn prop_unit_block_identity(
            (width, height) in (1u32..=24, 1u32..=24),
            seed in any::<u8>(),
        ) {
            let mut pixels = Vec::new();
            for i in 0..(width * height) {
                let v = (i as u8).wrapping_mul(31).wrapping_add(seed);
                pixels.extend_from_slice(&[v, v.wrapping_add(1), v.wrapping_add(2), 255]);
            }
            let img = PixelBuffer::new(width, height, pixels).unwrap();
            let out = pixelate(&img, 1, 1, &CancelToken::new()).unwrap();
            prop_assert_eq!(out, img);
        }

        /// Property: every pixel in a full block has the same color.
        #[test]
        fn prop_blocks_are_flat(
            (width, height) in (2u32..=20, 2u32..=20),
            (bw, bh) in (1u32..=5, 1u32..=5),
        ) {
            let mut pixels = Vec::new();
            for i in 0..(width * height) {
                let v = (i * 13 % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
            let img = PixelBuffer::new(width, height, pixels).unwrap();
            let out = pixelate(&img, bw, bh, &CancelToken::new()).unwrap();
            let bw = bw.min(width);
            let bh = bh.min(height);
            for y in 0..height {
                for x in 0..width {
                    let anchor = out.get(x - x % bw, y - y % bh).unwrap();
                    prop_assert_eq!(out.get(x, y).unwrap(), anchor);
                }
            }
        }
    }
}
