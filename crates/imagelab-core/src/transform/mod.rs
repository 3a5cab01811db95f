//! Geometric transforms: cropping, mirroring and resizing.
//!
//! # Coordinate System
//!
//! - Crop coordinates are absolute pixels, end corner exclusive
//! - Origin is top-left corner
//! - `Axis::X` is the horizontal axis, `Axis::Y` the vertical one

mod crop;
mod reflect;
mod resize;

pub use crop::crop;
pub use reflect::{reflect, Axis};
pub use resize::{resize, FilterType};
