/// Text conversion engine for termcam.
///
/// Quantizes grayscale samples onto the fixed glyph ramp and assembles
/// grayscale grids into text frames.
pub mod quantize;
pub mod render;

pub use quantize::{GlyphRun, quantize, quantize_sample};
pub use render::{render, render_into};
