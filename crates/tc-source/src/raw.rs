use std::io::{ErrorKind, Read};

use tc_core::error::SourceError;
use tc_core::frame::GrayscaleGrid;
use tc_core::traits::FrameSource;

/// Lit jusqu'à `buf.len()` bytes depuis `reader`, en s'arrêtant sur EOF.
///
/// Returns the number of bytes read: `buf.len()` for a full frame,
/// `0` for a clean EOF, anything in between for a truncated frame.
///
/// # Errors
/// Propagates I/O errors other than `Interrupted`.
///
/// # Example
/// ```
/// use tc_source::raw::read_up_to;
/// let mut buf = [0u8; 4];
/// let mut input: &[u8] = &[1, 2, 3];
/// assert_eq!(read_up_to(&mut input, &mut buf).unwrap(), 3);
/// ```
pub fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0usize;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Source de frames brutes 8 bits : `rows × cols` octets par frame, sans en-tête.
///
/// C'est le format que produit `ffmpeg -pix_fmt gray -f rawvideo`.
///
/// # Example
/// ```
/// use tc_core::traits::FrameSource;
/// use tc_source::raw::RawGraySource;
///
/// let bytes: &[u8] = &[0, 255, 128, 64];
/// let mut source = RawGraySource::new(bytes, 1, 2);
/// assert_eq!(source.next_grid().unwrap().unwrap().as_slice(), &[0, 255]);
/// assert_eq!(source.next_grid().unwrap().unwrap().as_slice(), &[128, 64]);
/// assert!(source.next_grid().unwrap().is_none());
/// ```
pub struct RawGraySource<R> {
    reader: R,
    rows: usize,
    cols: usize,
    live: bool,
}

impl<R: Read> RawGraySource<R> {
    /// Wrap `reader` delivering `rows × cols` frames.
    pub fn new(reader: R, rows: usize, cols: usize) -> Self {
        Self {
            reader,
            rows,
            cols,
            live: false,
        }
    }

    /// Mark the stream as endless (camera) rather than finite (file).
    #[must_use]
    pub fn live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    /// Bytes in one frame.
    #[must_use]
    pub fn frame_bytes(&self) -> usize {
        self.rows * self.cols
    }
}

impl<R: Read> FrameSource for RawGraySource<R> {
    fn next_grid(&mut self) -> Result<Option<GrayscaleGrid>, SourceError> {
        let expected = self.frame_bytes();
        if expected == 0 {
            return Ok(Some(GrayscaleGrid::new(self.rows, self.cols)));
        }
        let mut grid = GrayscaleGrid::new(self.rows, self.cols);
        let got = read_up_to(&mut self.reader, grid.as_mut_slice())?;
        match got {
            0 => Ok(None),
            n if n == expected => Ok(Some(grid)),
            n => Err(SourceError::ShortFrame { expected, got: n }),
        }
    }

    fn grid_size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn is_live(&self) -> bool {
        self.live
    }
}
