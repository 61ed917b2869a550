use rayon::prelude::*;
use tc_core::charset::WidenFactor;
use tc_core::frame::{GrayscaleGrid, TextFrame};

use crate::quantize::quantize_sample;

/// Convertit une grille de gris en frame texte.
///
/// Chaque ligne de la grille devient une ligne de `cols × widen` glyphes.
/// Les lignes sont indépendantes et traitées en parallèle; l'ordre est
/// conservé. Une grille sans ligne ou sans colonne donne une frame vide.
///
/// # Example
/// ```
/// use tc_ascii::render::render;
/// use tc_core::charset::WidenFactor;
/// use tc_core::frame::GrayscaleGrid;
///
/// let grid = GrayscaleGrid::try_from_rows(&[[0, 128, 255], [64, 192, 255]]).unwrap();
/// let frame = render(&grid, WidenFactor::ONE);
/// assert_eq!(frame.lines(), [" =@", ":*@"]);
/// ```
#[must_use]
pub fn render(grid: &GrayscaleGrid, widen: WidenFactor) -> TextFrame {
    let width = grid.cols() * widen.get();
    if grid.is_empty() {
        return TextFrame::with_capacity(0, width);
    }

    let lines: Vec<String> = grid
        .as_slice()
        .par_chunks_exact(grid.cols())
        .map(|row| render_row(row, widen))
        .collect();

    let mut frame = TextFrame::with_capacity(lines.len(), width);
    for line in lines {
        frame.push_line(line);
    }
    frame
}

/// Sequential variant writing the newline-terminated text block into `out`.
///
/// `out` is cleared first; its capacity is reused across frames.
///
/// # Example
/// ```
/// use tc_ascii::render::render_into;
/// use tc_core::charset::WidenFactor;
/// use tc_core::frame::GrayscaleGrid;
///
/// let grid = GrayscaleGrid::from_raw(1, 2, vec![0, 255]).unwrap();
/// let mut out = String::new();
/// render_into(&grid, WidenFactor::new(2).unwrap(), &mut out);
/// assert_eq!(out, "  @@\n");
/// ```
pub fn render_into(grid: &GrayscaleGrid, widen: WidenFactor, out: &mut String) {
    out.clear();
    if grid.is_empty() {
        return;
    }
    out.reserve(grid.rows() * (grid.cols() * widen.get() + 1));
    for row in grid.row_slices() {
        for &sample in row {
            quantize_sample(sample, widen).push_to(out);
        }
        out.push('\n');
    }
}

#[inline]
fn render_row(row: &[u8], widen: WidenFactor) -> String {
    let mut line = String::with_capacity(row.len() * widen.get());
    for &sample in row {
        quantize_sample(sample, widen).push_to(&mut line);
    }
    line
}
