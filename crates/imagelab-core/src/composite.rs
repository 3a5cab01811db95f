//! Multi-step operations that keep every intermediate image.

use crate::buffer::{PixelBuffer, Staged};
use crate::cancel::CancelToken;
use crate::error::{ProcessError, ProcessResult};
use crate::filters::{
    add_images, gamma_transform, highlight_edges, laplacian_filter, median_filter,
    multiply_images, sobel_filter, EdgeBounds, KernelSize,
};
use crate::transform::crop;

/// Edge-weighted sharpening.
///
/// With `a` the input:
///
/// ```text
/// b = laplacian(a)      c = a + b
/// d = sobel(a)          e = median3x3(d)
/// f = c * e             g = a + f
/// h = gamma(g)
/// ```
///
/// Stages are `[b, c, d, e, f, g, h]` and the result is `h`. The cancel
/// token is checked between steps and inside every filter.
pub fn special_chain(image: &PixelBuffer, gamma: f64, cancel: &CancelToken) -> ProcessResult<Staged> {
    let b = laplacian_filter(image, cancel)?;
    let c = add_images(&b, image)?;
    cancel.check()?;
    let d = sobel_filter(image, cancel)?;
    let e = median_filter(&d, KernelSize::Three, cancel)?;
    let f = multiply_images(&c, &e)?;
    cancel.check()?;
    let g = add_images(image, &f)?;
    let h = gamma_transform(&g, gamma, cancel)?;

    Ok(Staged {
        result: h.clone(),
        stages: vec![b, c, d, e, f, g, h],
    })
}

/// Locate the high-contrast region of an image and crop down to it.
///
/// 1. `b`: edge highlighting, recording the bounding box of edge pixels
/// 2. `c`: `b` cropped to that box
/// 3. `d`: the input cropped to that box
/// 4. `e`: the inner part of `d` from `(w / 7.5, h / 10)` to
///    `(w / 1.15, h / 1.4)`, where `w x h` are the dimensions of `d`
///
/// Stages are `[b, c, d, e]` and the result is `e`.
///
/// # Errors
/// `InvalidRegion` if no edge pixel is found or the inner box is empty.
pub fn edge_region_segmentation(image: &PixelBuffer, cancel: &CancelToken) -> ProcessResult<Staged> {
    let mut bounds = EdgeBounds::new();
    let b = highlight_edges(image, &mut bounds, cancel)?;

    let (from_x, from_y, to_x, to_y) = bounds
        .as_crop()
        .ok_or_else(|| ProcessError::InvalidRegion("no edge pixels found".into()))?;
    let c = crop(&b, from_x, from_y, to_x, to_y)?;
    let d = crop(image, from_x, from_y, to_x, to_y)?;

    cancel.check()?;
    let (w, h) = (d.width() as f64, d.height() as f64);
    let e = crop(
        &d,
        (w / 7.5) as u32,
        (h / 10.0) as u32,
        (w / 1.15) as u32,
        (h / 1.4) as u32,
    )?;

    tracing::debug!(from_x, from_y, to_x, to_y, "edge region located");
    Ok(Staged {
        result: e.clone(),
        stages: vec![b, c, d, e],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Pixel;
    use crate::filters::DEFAULT_GAMMA;

    fn noisy(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 37 + y * 11) % 97) as u8;
                pixels.extend_from_slice(&[v, v / 2, 255 - v, 255]);
            }
        }
        PixelBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_special_chain_stages() {
        let img = noisy(9, 7);
        let out = special_chain(&img, DEFAULT_GAMMA, &CancelToken::new()).unwrap();
        assert_eq!(out.stages.len(), 7);
        assert!(out.stages.iter().all(|s| s.dimensions() == (9, 7)));
        assert_eq!(out.stages[6], out.result);
    }

    #[test]
    fn test_special_chain_matches_manual_composition() {
        let img = noisy(6, 6);
        let token = CancelToken::new();
        let out = special_chain(&img, DEFAULT_GAMMA, &token).unwrap();

        let lap = laplacian_filter(&img, &token).unwrap();
        let sharpened = add_images(&lap, &img).unwrap();
        assert_eq!(out.stages[1], sharpened);

        let sobel = sobel_filter(&img, &token).unwrap();
        let smooth = median_filter(&sobel, KernelSize::Three, &token).unwrap();
        let mask = multiply_images(&sharpened, &smooth).unwrap();
        let boosted = add_images(&img, &mask).unwrap();
        let expected = gamma_transform(&boosted, DEFAULT_GAMMA, &token).unwrap();
        assert_eq!(out.result, expected);
    }

    #[test]
    fn test_special_chain_black_stays_black() {
        let img = PixelBuffer::filled(5, 5, Pixel::rgb(0, 0, 0)).unwrap();
        let out = special_chain(&img, DEFAULT_GAMMA, &CancelToken::new()).unwrap();
        assert_eq!(out.result, img);
    }

    #[test]
    fn test_special_chain_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(
            special_chain(&noisy(4, 4), DEFAULT_GAMMA, &token),
            Err(ProcessError::Cancelled)
        );
    }

    #[test]
    fn test_segmentation_finds_bright_block() {
        // 40x40 black image with a bright 20x20 square at (10, 10).
        let mut img = PixelBuffer::filled(40, 40, Pixel::rgb(0, 0, 0)).unwrap();
        for y in 10..30 {
            for x in 10..30 {
                img.set(x, y, Pixel::rgb(255, 255, 255)).unwrap();
            }
        }
        let out = edge_region_segmentation(&img, &CancelToken::new()).unwrap();
        assert_eq!(out.stages.len(), 4);

        // Edges lie one pixel around the square border: box (9, 9)..=(30, 30)
        assert_eq!(out.stages[1].dimensions(), (22, 22));
        assert_eq!(out.stages[2].dimensions(), (22, 22));
        // Inner crop of 22x22: (2, 2) -> (19, 15)
        assert_eq!(out.result.dimensions(), (17, 13));
        assert_eq!(out.stages[3], out.result);
    }

    #[test]
    fn test_segmentation_without_edges() {
        let img = PixelBuffer::filled(10, 10, Pixel::rgb(30, 30, 30)).unwrap();
        assert!(matches!(
            edge_region_segmentation(&img, &CancelToken::new()),
            Err(ProcessError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_segmentation_degenerate_inner_box() {
        // One column wide: the box is 1 pixel wide and 1 / 1.15 truncates to 0.
        let mut img = PixelBuffer::filled(1, 9, Pixel::rgb(0, 0, 0)).unwrap();
        img.set(0, 4, Pixel::rgb(255, 255, 255)).unwrap();
        assert!(matches!(
            edge_region_segmentation(&img, &CancelToken::new()),
            Err(ProcessError::InvalidRegion(_))
        ));
    }
}
