//! Owned RGBA pixel storage.
//!
//! [`PixelBuffer`] is the single mutable primitive of the crate. Every
//! operation reads one buffer and produces a new one; once a buffer has been
//! pushed onto the history stack it is shared behind an `Arc` and never
//! mutated again.
//!
//! # Packed Pixels
//!
//! Neighborhood kernels work on a flat array of packed `u32` values laid out
//! as `0xAARRGGBB`, which is what [`PixelBuffer::to_packed`] and
//! [`PixelBuffer::from_packed`] convert to and from.

use thiserror::Error;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Errors raised by pixel access on a [`PixelBuffer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// A coordinate or region lies outside the buffer.
    #[error("({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Width or height is zero.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length does not match the dimensions.
    #[error("expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// A single RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Opaque pixel from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as `0xAARRGGBB`.
    #[inline]
    pub fn pack(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Unpack a `0xAARRGGBB` value.
    #[inline]
    pub fn unpack(packed: u32) -> Self {
        Self {
            a: (packed >> 24) as u8,
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// True when all three color channels are equal.
    #[inline]
    pub fn is_gray(self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

/// Pack opaque RGB into `0xFF000000 | r<<16 | g<<8 | b`.
///
/// Components are masked to 8 bits, so out-of-range values wrap instead of
/// bleeding into the neighboring channel.
#[inline]
pub fn pack_rgb(r: u32, g: u32, b: u32) -> u32 {
    0xFF00_0000 | ((r & 0xFF) << 16) | ((g & 0xFF) << 8) | (b & 0xFF)
}

/// Red channel of a packed pixel.
#[inline]
pub fn red(packed: u32) -> u32 {
    (packed >> 16) & 0xFF
}

/// Green channel of a packed pixel.
#[inline]
pub fn green(packed: u32) -> u32 {
    (packed >> 8) & 0xFF
}

/// Blue channel of a packed pixel.
#[inline]
pub fn blue(packed: u32) -> u32 {
    packed & 0xFF
}

/// Replace the alpha byte of `rgb` with the alpha byte of `source`.
#[inline]
pub fn with_alpha_of(rgb: u32, source: u32) -> u32 {
    (rgb & 0x00FF_FFFF) | (source & 0xFF00_0000)
}

/// A decoded image with RGBA pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    /// RGBA data in row-major order, `width * height * 4` bytes.
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer from raw RGBA bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer where every pixel has the same value.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Result<Self, BufferError> {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a]);
        }
        Self::new(width, height, pixels)
    }

    /// Create a buffer from packed `0xAARRGGBB` values.
    pub fn from_packed(width: u32, height: u32, packed: &[u32]) -> Result<Self, BufferError> {
        let mut pixels = Vec::with_capacity(packed.len() * CHANNELS);
        for &value in packed {
            let p = Pixel::unpack(value);
            pixels.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        Self::new(width, height, pixels)
    }

    /// Flat row-major array of packed `0xAARRGGBB` values.
    pub fn to_packed(&self) -> Vec<u32> {
        self.pixels
            .chunks_exact(CHANNELS)
            .map(|c| Pixel::rgba(c[0], c[1], c[2], c[3]).pack())
            .collect()
    }

    /// Create a buffer from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Create a buffer from any decoded `image` crate image.
    pub fn from_dynamic(img: image::DynamicImage) -> Self {
        Self::from_rgba_image(img.into_rgba8())
    }

    /// Convert to an `image::RgbaImage` for use with `image::imageops`.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.pixels
            .chunks_exact(CHANNELS)
            .map(|c| Pixel::rgba(c[0], c[1], c[2], c[3]))
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    fn check(&self, x: u32, y: u32) -> Result<(), BufferError> {
        if x >= self.width || y >= self.height {
            return Err(BufferError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Read one pixel.
    pub fn get(&self, x: u32, y: u32) -> Result<Pixel, BufferError> {
        self.check(x, y)?;
        let i = self.offset(x, y);
        let c = &self.pixels[i..i + CHANNELS];
        Ok(Pixel::rgba(c[0], c[1], c[2], c[3]))
    }

    /// Write one pixel.
    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) -> Result<(), BufferError> {
        self.check(x, y)?;
        let i = self.offset(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a]);
        Ok(())
    }

    fn check_region(&self, x: u32, y: u32, w: u32, h: u32) -> Result<(), BufferError> {
        let right = x as u64 + w as u64;
        let bottom = y as u64 + h as u64;
        if right > self.width as u64 || bottom > self.height as u64 {
            return Err(BufferError::OutOfBounds {
                x: right.saturating_sub(1).min(u32::MAX as u64) as u32,
                y: bottom.saturating_sub(1).min(u32::MAX as u64) as u32,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Read a `w x h` rectangle starting at `(x, y)` in row-major order.
    pub fn region(&self, x: u32, y: u32, w: u32, h: u32) -> Result<Vec<Pixel>, BufferError> {
        self.check_region(x, y, w, h)?;
        let mut out = Vec::with_capacity(w as usize * h as usize);
        for row in y..y + h {
            let start = self.offset(x, row);
            let end = start + w as usize * CHANNELS;
            out.extend(
                self.pixels[start..end]
                    .chunks_exact(CHANNELS)
                    .map(|c| Pixel::rgba(c[0], c[1], c[2], c[3])),
            );
        }
        Ok(out)
    }

    /// Overwrite a `w x h` rectangle starting at `(x, y)`.
    pub fn set_region(
        &mut self,
        pixels: &[Pixel],
        x: u32,
        y: u32,
        w: u32,
        h: u32,
    ) -> Result<(), BufferError> {
        self.check_region(x, y, w, h)?;
        let expected = w as usize * h as usize;
        if pixels.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        if w == 0 {
            return Ok(());
        }
        for (row, src) in pixels.chunks_exact(w as usize).enumerate() {
            let start = self.offset(x, y + row as u32);
            for (i, p) in src.iter().enumerate() {
                let at = start + i * CHANNELS;
                self.pixels[at..at + CHANNELS].copy_from_slice(&[p.r, p.g, p.b, p.a]);
            }
        }
        Ok(())
    }
}

/// Result of an operation plus its intermediate images, in the order they
/// were produced. Multi-step operations end their stages with `result`;
/// single-step operations leave `stages` empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staged {
    pub result: PixelBuffer,
    pub stages: Vec<PixelBuffer>,
}
