use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer as FirResizer};
use tc_core::error::SourceError;
use tc_core::frame::GrayscaleGrid;

/// Resizer réutilisable wrappant fast_image_resize, en gris 8 bits.
///
/// # Example
/// ```
/// use tc_source::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch buffer for the source (fast_image_resize wants `&mut`).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new(),
            src_buf: Vec::new(),
        }
    }

    /// Resize a `src_w × src_h` luma buffer into a `rows × cols` grid.
    ///
    /// # Errors
    /// Returns [`SourceError::Resize`] if the dimensions are invalid or
    /// the resize fails.
    ///
    /// # Example
    /// ```
    /// use tc_source::resize::Resizer;
    /// let mut r = Resizer::new();
    /// let src = vec![200u8; 100 * 100];
    /// let grid = r.resize_luma(&src, 100, 100, 30, 40).unwrap();
    /// assert_eq!((grid.rows(), grid.cols()), (30, 40));
    /// ```
    pub fn resize_luma(
        &mut self,
        src: &[u8],
        src_w: u32,
        src_h: u32,
        rows: usize,
        cols: usize,
    ) -> Result<GrayscaleGrid, SourceError> {
        if rows == 0 || cols == 0 {
            return Ok(GrayscaleGrid::new(rows, cols));
        }
        if src_w as usize == cols && src_h as usize == rows {
            return Ok(GrayscaleGrid::from_raw(rows, cols, src.to_vec())?);
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(src);

        let src_image = Image::from_slice_u8(src_w, src_h, &mut self.src_buf, PixelType::U8)
            .map_err(|e| SourceError::Resize(format!("source {src_w}x{src_h} : {e}")))?;

        let mut dst_buf = vec![0u8; rows * cols];
        {
            let mut dst_image =
                Image::from_slice_u8(cols as u32, rows as u32, &mut dst_buf, PixelType::U8)
                    .map_err(|e| SourceError::Resize(format!("destination {cols}x{rows} : {e}")))?;

            self.inner
                .resize(&src_image, &mut dst_image, Some(&self.options))
                .map_err(|e| SourceError::Resize(e.to_string()))?;
        }

        Ok(GrayscaleGrid::from_raw(rows, cols, dst_buf)?)
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_image_stays_uniform() {
        let mut r = Resizer::new();
        let src = vec![77u8; 64 * 48];
        let grid = r.resize_luma(&src, 64, 48, 6, 8).unwrap();
        // fixed-point convolution may be off by one
        assert!(grid.as_slice().iter().all(|&v| v.abs_diff(77) <= 1));
    }

    #[test]
    fn same_size_is_a_copy() {
        let mut r = Resizer::new();
        let src: Vec<u8> = (0..12).collect();
        let grid = r.resize_luma(&src, 4, 3, 3, 4).unwrap();
        assert_eq!(grid.as_slice(), src.as_slice());
    }

    #[test]
    fn zero_target_gives_empty_grid() {
        let mut r = Resizer::new();
        let grid = r.resize_luma(&[1, 2, 3, 4], 2, 2, 0, 5).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn mismatched_source_length_fails() {
        let mut r = Resizer::new();
        assert!(matches!(
            r.resize_luma(&[1, 2, 3], 4, 4, 2, 2),
            Err(SourceError::Resize(_))
        ));
    }
}
