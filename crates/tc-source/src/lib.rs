/// Frame sources for termcam (camera and video via ffmpeg, still image, procedural).
///
/// Every source hands out grayscale grids already resized to the
/// configured dimensions.

pub mod ffmpeg;
pub mod procedural;
pub mod raw;

#[cfg(feature = "image-source")]
pub mod image;
#[cfg(feature = "image-source")]
pub mod resize;
