/// Configuration, types, and shared structures for termcam.
///
/// This crate contains the data model (grayscale grids, text frames),
/// the fixed glyph ramp, error types, configuration loading, and the
/// collaborator traits used across the termcam workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use charset::{GLYPH_RAMP, WidenFactor};
pub use config::{CaptureConfig, FrameRate};
pub use error::{CoreError, SourceError};
pub use frame::{GrayscaleGrid, TextFrame};
pub use traits::{DisplaySink, FrameSource, ScriptedSource, TakeFrames};
