/// Display sinks for termcam.
///
/// Terminal clear-and-print output, plain streaming output, and FPS tracking.
pub mod fps;
pub mod terminal;

pub use terminal::{PlainSink, TerminalSink};
