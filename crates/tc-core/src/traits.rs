use std::collections::VecDeque;
use std::io;

use crate::error::SourceError;
use crate::frame::{GrayscaleGrid, TextFrame};

/// Fournit des grilles de gris au renderer, une par cycle.
///
/// Implémenté par : `FfmpegSource`, `ImageSource`, `ProceduralSource`, [`ScriptedSource`].
///
/// Opening is the implementor's constructor. Conversion to grayscale and
/// resizing to `grid_size()` happen inside the source.
///
/// # Example
/// ```
/// use tc_core::traits::FrameSource;
/// use tc_core::frame::GrayscaleGrid;
/// use tc_core::error::SourceError;
///
/// struct DummySource;
/// impl FrameSource for DummySource {
///     fn next_grid(&mut self) -> Result<Option<GrayscaleGrid>, SourceError> { Ok(None) }
///     fn grid_size(&self) -> (usize, usize) { (0, 0) }
///     fn is_live(&self) -> bool { false }
/// }
/// ```
pub trait FrameSource {
    /// Retourne la prochaine grille.
    ///
    /// `Ok(None)` signale la fin du flux. Peut bloquer indéfiniment
    /// sur un périphérique lent : aucun timeout.
    ///
    /// # Errors
    /// Returns [`SourceError`] when the source fails, as opposed to ending.
    fn next_grid(&mut self) -> Result<Option<GrayscaleGrid>, SourceError>;

    /// Dimensions `(rows, cols)` des grilles produites.
    fn grid_size(&self) -> (usize, usize);

    /// Indique si la source est infinie (caméra, procédural) ou finie.
    fn is_live(&self) -> bool;

    /// Libère le handle sous-jacent. Idempotent; `Drop` l'appelle aussi
    /// pour les sources qui tiennent une ressource.
    fn close(&mut self) {}
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_grid(&mut self) -> Result<Option<GrayscaleGrid>, SourceError> {
        (**self).next_grid()
    }

    fn grid_size(&self) -> (usize, usize) {
        (**self).grid_size()
    }

    fn is_live(&self) -> bool {
        (**self).is_live()
    }

    fn close(&mut self) {
        (**self).close();
    }
}

/// Affiche une frame texte : efface puis imprime.
///
/// # Example
/// ```
/// use std::io;
/// use tc_core::traits::DisplaySink;
/// use tc_core::frame::TextFrame;
///
/// struct NullSink;
/// impl DisplaySink for NullSink {
///     fn clear_and_print(&mut self, _frame: &TextFrame) -> io::Result<()> { Ok(()) }
/// }
/// ```
pub trait DisplaySink {
    /// Replace whatever is on screen with `frame`.
    ///
    /// # Errors
    /// Propagates I/O errors from the underlying output.
    fn clear_and_print(&mut self, frame: &TextFrame) -> io::Result<()>;
}

impl<D: DisplaySink + ?Sized> DisplaySink for Box<D> {
    fn clear_and_print(&mut self, frame: &TextFrame) -> io::Result<()> {
        (**self).clear_and_print(frame)
    }
}

/// Adaptateur : arrête une source après `limit` grilles.
///
/// # Example
/// ```
/// use tc_core::traits::{FrameSource, ScriptedSource, TakeFrames};
/// use tc_core::frame::GrayscaleGrid;
///
/// let inner = ScriptedSource::new(vec![GrayscaleGrid::new(1, 1); 5]);
/// let mut source = TakeFrames::new(inner, 2);
/// assert!(source.next_grid().unwrap().is_some());
/// assert!(source.next_grid().unwrap().is_some());
/// assert!(source.next_grid().unwrap().is_none());
/// ```
pub struct TakeFrames<S> {
    inner: S,
    remaining: u64,
}

impl<S: FrameSource> TakeFrames<S> {
    /// Wrap `inner`, yielding at most `limit` grids.
    pub fn new(inner: S, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }
}

impl<S: FrameSource> FrameSource for TakeFrames<S> {
    fn next_grid(&mut self) -> Result<Option<GrayscaleGrid>, SourceError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let grid = self.inner.next_grid()?;
        if grid.is_some() {
            self.remaining -= 1;
        }
        Ok(grid)
    }

    fn grid_size(&self) -> (usize, usize) {
        self.inner.grid_size()
    }

    fn is_live(&self) -> bool {
        false
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

/// How a [`ScriptedSource`] behaves once its grids run out.
#[derive(Debug, Default)]
pub enum ScriptEnd {
    /// Signal end of stream.
    #[default]
    Exhausted,
    /// Fail with an I/O error carrying this message.
    Fail(String),
}

/// Source en mémoire : rejoue une liste de grilles puis s'arrête.
///
/// # Example
/// ```
/// use tc_core::traits::{FrameSource, ScriptedSource};
/// use tc_core::frame::GrayscaleGrid;
///
/// let mut source = ScriptedSource::new(vec![GrayscaleGrid::new(2, 2)]);
/// assert!(source.next_grid().unwrap().is_some());
/// assert!(source.next_grid().unwrap().is_none());
/// assert_eq!(source.pulled(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedSource {
    grids: VecDeque<GrayscaleGrid>,
    end: ScriptEnd,
    size: (usize, usize),
    pulled: usize,
    closed: bool,
}

impl ScriptedSource {
    /// Replay `grids`, then signal exhaustion.
    #[must_use]
    pub fn new(grids: Vec<GrayscaleGrid>) -> Self {
        let size = grids.first().map_or((0, 0), |g| (g.rows(), g.cols()));
        Self {
            grids: grids.into(),
            end: ScriptEnd::Exhausted,
            size,
            pulled: 0,
            closed: false,
        }
    }

    /// Replace the end-of-script behaviour.
    #[must_use]
    pub fn ending_with(mut self, end: ScriptEnd) -> Self {
        self.end = end;
        self
    }

    /// Number of `next_grid` calls so far, including the final one.
    #[must_use]
    pub fn pulled(&self) -> usize {
        self.pulled
    }

    /// `true` once [`FrameSource::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl FrameSource for ScriptedSource {
    fn next_grid(&mut self) -> Result<Option<GrayscaleGrid>, SourceError> {
        self.pulled += 1;
        if let Some(grid) = self.grids.pop_front() {
            return Ok(Some(grid));
        }
        match &self.end {
            ScriptEnd::Exhausted => Ok(None),
            ScriptEnd::Fail(msg) => Err(SourceError::Io(io::Error::other(msg.clone()))),
        }
    }

    fn grid_size(&self) -> (usize, usize) {
        self.size
    }

    fn is_live(&self) -> bool {
        false
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_source_fails_after_grids() {
        let mut source = ScriptedSource::new(vec![GrayscaleGrid::new(1, 1)])
            .ending_with(ScriptEnd::Fail("caméra débranchée".into()));
        assert!(source.next_grid().unwrap().is_some());
        let err = source.next_grid().unwrap_err();
        assert!(err.to_string().contains("caméra débranchée"));
    }

    #[test]
    fn take_frames_forwards_close_and_errors() {
        let inner = ScriptedSource::new(Vec::new()).ending_with(ScriptEnd::Fail("boom".into()));
        let mut source = TakeFrames::new(inner, 3);
        assert!(source.next_grid().is_err());
        source.close();
        assert!(source.inner.is_closed());

        let mut none = TakeFrames::new(ScriptedSource::new(vec![GrayscaleGrid::new(1, 1)]), 0);
        assert!(none.next_grid().unwrap().is_none());
        assert_eq!(none.inner.pulled(), 0);
    }

    #[test]
    fn boxed_source_forwards_calls() {
        let mut source: Box<dyn FrameSource> =
            Box::new(ScriptedSource::new(vec![GrayscaleGrid::new(3, 4)]));
        assert_eq!(source.grid_size(), (3, 4));
        assert!(!source.is_live());
        assert!(source.next_grid().unwrap().is_some());
        assert!(source.next_grid().unwrap().is_none());
    }
}
