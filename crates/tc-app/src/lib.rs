/// termcam application layer: command line, source/sink wiring, Ctrl-C
/// handling, and the real-time pacing loop.
pub mod cli;
pub mod interrupt;
pub mod pacer;
pub mod pipeline;
