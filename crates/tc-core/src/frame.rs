use std::fmt;
use std::io::{self, Write};

use crate::charset::check_sample;
use crate::error::CoreError;

/// Grille de gris produite par une source, une fois par frame.
///
/// Stocke les échantillons en row-major, 1 byte par échantillon.
/// Rectangular by construction: every constructor checks `rows × cols`.
///
/// # Example
/// ```
/// use tc_core::frame::GrayscaleGrid;
/// let grid = GrayscaleGrid::new(2, 3);
/// assert_eq!(grid.as_slice().len(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayscaleGrid {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl GrayscaleGrid {
    /// Crée une grille noire aux dimensions données.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0u8; rows * cols],
            rows,
            cols,
        }
    }

    /// Wrap a flat row-major buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::GridLength`] if `data.len() != rows * cols`,
    /// including when `rows * cols` overflows.
    ///
    /// # Example
    /// ```
    /// use tc_core::frame::GrayscaleGrid;
    /// let grid = GrayscaleGrid::from_raw(1, 2, vec![0, 255]).unwrap();
    /// assert_eq!(grid.get(0, 1), 255);
    /// assert!(GrayscaleGrid::from_raw(2, 2, vec![0; 3]).is_err());
    /// ```
    pub fn from_raw(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self, CoreError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(CoreError::GridLength {
                rows,
                cols,
                found: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a grid from nested rows of raw integers.
    ///
    /// Every value is checked against the grayscale range and every row
    /// must have the width of the first one.
    ///
    /// # Errors
    /// [`CoreError::OutOfRangeSample`] for a value outside 0–255,
    /// [`CoreError::InvalidDimensions`] for a ragged row.
    ///
    /// # Example
    /// ```
    /// use tc_core::frame::GrayscaleGrid;
    /// let grid = GrayscaleGrid::try_from_rows(&[[0, 128, 255], [64, 192, 255]]).unwrap();
    /// assert_eq!((grid.rows(), grid.cols()), (2, 3));
    /// assert!(GrayscaleGrid::try_from_rows(&[[0, 300]]).is_err());
    /// ```
    pub fn try_from_rows<T, R>(rows: &[R]) -> Result<Self, CoreError>
    where
        T: Copy + Into<i64>,
        R: AsRef<[T]>,
    {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != cols {
                return Err(CoreError::InvalidDimensions {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            for &v in values {
                data.push(check_sample(v.into())?);
            }
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `true` if the grid has no row or no column.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Échantillon en (row, col).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        debug_assert!(row < self.rows && col < self.cols, "sample out of bounds");
        self.data[row * self.cols + col]
    }

    /// Iterate rows in order, each as a slice of `cols` samples.
    pub fn row_slices(&self) -> std::slice::ChunksExact<'_, u8> {
        // data is empty when cols == 0, so the chunk size only avoids a panic
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Flat row-major samples.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Flat row-major samples, mutable. Used by sources that fill in place.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

}

/// Bloc de texte rendu pour une frame.
///
/// Toutes les lignes ont la même largeur (`cols × widen`). Construit à
/// chaque cycle, jeté après affichage.
///
/// # Example
/// ```
/// use tc_core::frame::TextFrame;
/// let mut frame = TextFrame::with_capacity(1, 2);
/// frame.push_line("@@".to_string());
/// assert_eq!(frame.to_text(), "@@\n");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextFrame {
    lines: Vec<String>,
    width: usize,
}

impl TextFrame {
    /// Empty frame with room for `rows` lines of `width` glyphs each.
    #[must_use]
    pub fn with_capacity(rows: usize, width: usize) -> Self {
        Self {
            lines: Vec::with_capacity(rows),
            width,
        }
    }

    /// Append a line. Its glyph count must equal [`TextFrame::width`].
    pub fn push_line(&mut self, line: String) {
        debug_assert_eq!(line.chars().count(), self.width, "ragged text frame");
        self.lines.push(line);
    }

    /// Lines in display order, without terminators.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Glyphs per line.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// `true` when the frame has no line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Newline-delimited text block, every line terminated by `\n`.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.lines.len() * (self.width + 1));
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Write the text block to `out`.
    ///
    /// # Errors
    /// Propagates write errors from `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in &self.lines {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl fmt::Display for TextFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
