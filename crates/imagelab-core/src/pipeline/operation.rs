//! The closed set of operations a session can apply.

use serde::{Deserialize, Serialize};

use super::PipelineConfig;
use crate::buffer::{PixelBuffer, Staged};
use crate::cancel::CancelToken;
use crate::color::{rgb_to_gray, rgb_to_hsi, rgb_to_hsv};
use crate::composite::{edge_region_segmentation, special_chain};
use crate::error::{ProcessError, ProcessResult};
use crate::filters::{
    average_filter, gamma_transform, laplacian_filter, max_filter, median_filter, min_filter,
    pixelate, sobel_filter, KernelSize,
};
use crate::frequency::{filter_spectrum, wiener_filter, FrequencyMask};
use crate::threshold::{average_threshold, block_threshold, otsu_threshold, BLOCK_GRID};
use crate::transform::{crop, reflect, resize, Axis, FilterType};

/// An image operation with its parameters.
///
/// Serialized with an internal `type` tag, e.g.
/// `{"type": "median_filter", "size": "five"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationKind {
    Pixelate { block_width: u32, block_height: u32 },
    MinFilter {
        #[serde(default)]
        size: KernelSize,
    },
    MaxFilter {
        #[serde(default)]
        size: KernelSize,
    },
    MedianFilter {
        #[serde(default)]
        size: KernelSize,
    },
    AverageFilter {
        #[serde(default)]
        size: KernelSize,
    },
    Laplacian,
    Sobel,
    Gamma,
    RgbToGray,
    RgbToHsi,
    RgbToHsv,
    Resize { width: u32, height: u32 },
    Crop { from_x: u32, from_y: u32, to_x: u32, to_y: u32 },
    ReflectX,
    ReflectY,
    OtsuThreshold,
    AverageThreshold,
    BlockThreshold,
    HighPassFilter,
    LowPassFilter,
    WienerFilter { k: f64 },
    SpecialChain,
    EdgeRegionSegmentation,
}

impl OperationKind {
    /// Short stable name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Pixelate { .. } => "pixelate",
            OperationKind::MinFilter { .. } => "min_filter",
            OperationKind::MaxFilter { .. } => "max_filter",
            OperationKind::MedianFilter { .. } => "median_filter",
            OperationKind::AverageFilter { .. } => "average_filter",
            OperationKind::Laplacian => "laplacian",
            OperationKind::Sobel => "sobel",
            OperationKind::Gamma => "gamma",
            OperationKind::RgbToGray => "rgb_to_gray",
            OperationKind::RgbToHsi => "rgb_to_hsi",
            OperationKind::RgbToHsv => "rgb_to_hsv",
            OperationKind::Resize { .. } => "resize",
            OperationKind::Crop { .. } => "crop",
            OperationKind::ReflectX => "reflect_x",
            OperationKind::ReflectY => "reflect_y",
            OperationKind::OtsuThreshold => "otsu_threshold",
            OperationKind::AverageThreshold => "average_threshold",
            OperationKind::BlockThreshold => "block_threshold",
            OperationKind::HighPassFilter => "high_pass_filter",
            OperationKind::LowPassFilter => "low_pass_filter",
            OperationKind::WienerFilter { .. } => "wiener_filter",
            OperationKind::SpecialChain => "special_chain",
            OperationKind::EdgeRegionSegmentation => "edge_region_segmentation",
        }
    }

    /// Check parameters against the image before any work is scheduled.
    ///
    /// Anything that depends only on geometry or parameters is caught here,
    /// so a rejected request never occupies the pipeline. Content-dependent
    /// failures (no edges found) still surface from [`execute`](Self::execute).
    pub fn validate(&self, image: &PixelBuffer, config: &PipelineConfig) -> ProcessResult<()> {
        let (width, height) = image.dimensions();
        match *self {
            OperationKind::Pixelate {
                block_width,
                block_height,
            } => {
                if block_width >= width || block_height >= height {
                    return Err(ProcessError::DimensionMismatch(format!(
                        "block {block_width}x{block_height} must be smaller than the {width}x{height} image"
                    )));
                }
            }
            OperationKind::Resize {
                width: w,
                height: h,
            } => {
                if w == 0 || h == 0 || w > config.max_width || h > config.max_height {
                    return Err(ProcessError::DimensionMismatch(format!(
                        "cannot resize to {w}x{h}, limit is {}x{}",
                        config.max_width, config.max_height
                    )));
                }
            }
            OperationKind::Crop {
                from_x,
                from_y,
                to_x,
                to_y,
            } => {
                if to_x <= from_x || to_y <= from_y || to_x > width || to_y > height {
                    return Err(ProcessError::InvalidRegion(format!(
                        "({from_x}, {from_y}) -> ({to_x}, {to_y}) does not fit a {width}x{height} image"
                    )));
                }
            }
            OperationKind::BlockThreshold => {
                if width < BLOCK_GRID || height < BLOCK_GRID {
                    return Err(ProcessError::DimensionMismatch(format!(
                        "block threshold needs at least {BLOCK_GRID}x{BLOCK_GRID} pixels"
                    )));
                }
            }
            OperationKind::WienerFilter { k } => {
                if !k.is_finite() || k < 0.0 {
                    return Err(ProcessError::InvalidParameter(format!(
                        "noise ratio must be a finite non-negative number, got {k}"
                    )));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Run the operation on `image`.
    ///
    /// Single-step operations return no stages.
    pub fn execute(
        &self,
        image: &PixelBuffer,
        config: &PipelineConfig,
        cancel: &CancelToken,
    ) -> ProcessResult<Staged> {
        let single = |result: PixelBuffer| Staged {
            result,
            stages: Vec::new(),
        };

        match *self {
            OperationKind::Pixelate {
                block_width,
                block_height,
            } => pixelate(image, block_width, block_height, cancel).map(single),
            OperationKind::MinFilter { size } => min_filter(image, size, cancel).map(single),
            OperationKind::MaxFilter { size } => max_filter(image, size, cancel).map(single),
            OperationKind::MedianFilter { size } => median_filter(image, size, cancel).map(single),
            OperationKind::AverageFilter { size } => average_filter(image, size, cancel).map(single),
            OperationKind::Laplacian => laplacian_filter(image, cancel).map(single),
            OperationKind::Sobel => sobel_filter(image, cancel).map(single),
            OperationKind::Gamma => gamma_transform(image, config.gamma, cancel).map(single),
            OperationKind::RgbToGray => rgb_to_gray(image, cancel).map(single),
            OperationKind::RgbToHsi => rgb_to_hsi(image, cancel).map(single),
            OperationKind::RgbToHsv => rgb_to_hsv(image, cancel).map(single),
            OperationKind::Resize { width, height } => {
                resize(image, width, height, FilterType::Bilinear).map(single)
            }
            OperationKind::Crop {
                from_x,
                from_y,
                to_x,
                to_y,
            } => crop(image, from_x, from_y, to_x, to_y).map(single),
            OperationKind::ReflectX => reflect(image, Axis::X).map(single),
            OperationKind::ReflectY => reflect(image, Axis::Y).map(single),
            OperationKind::OtsuThreshold => otsu_threshold(image, cancel).map(single),
            OperationKind::AverageThreshold => average_threshold(image, cancel).map(single),
            OperationKind::BlockThreshold => block_threshold(image, cancel).map(single),
            OperationKind::HighPassFilter => {
                filter_spectrum(image, FrequencyMask::HighPass, config.frequency_radius, cancel)
            }
            OperationKind::LowPassFilter => {
                filter_spectrum(image, FrequencyMask::LowPass, config.frequency_radius, cancel)
            }
            OperationKind::WienerFilter { k } => wiener_filter(image, k, cancel).map(single),
            OperationKind::SpecialChain => special_chain(image, config.gamma, cancel),
            OperationKind::EdgeRegionSegmentation => edge_region_segmentation(image, cancel),
        }
    }
}
