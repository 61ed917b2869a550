use tc_core::error::{CoreError, SourceError};
use tc_core::frame::GrayscaleGrid;
use tc_core::traits::FrameSource;

/// Motif généré.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Dégradé diagonal qui défile.
    Sweep,
    /// Luminosité uniforme qui monte de 0 à 255 puis redescend.
    Pulse,
}

/// Source procédurale infinie : aucune caméra requise.
///
/// Se borne avec `TakeFrames` (`--frames`).
///
/// # Example
/// ```
/// use tc_core::traits::{FrameSource, TakeFrames};
/// use tc_source::procedural::{Pattern, ProceduralSource};
///
/// let mut source = TakeFrames::new(ProceduralSource::new(Pattern::Sweep, 4, 6), 1);
/// assert!(source.next_grid().unwrap().is_some());
/// assert!(source.next_grid().unwrap().is_none());
/// ```
pub struct ProceduralSource {
    pattern: Pattern,
    rows: usize,
    cols: usize,
    tick: u64,
}

impl ProceduralSource {
    #[must_use]
    pub fn new(pattern: Pattern, rows: usize, cols: usize) -> Self {
        Self {
            pattern,
            rows,
            cols,
            tick: 0,
        }
    }

    fn sample(&self, row: usize, col: usize) -> u8 {
        match self.pattern {
            Pattern::Sweep => {
                let span = (self.rows + self.cols).saturating_sub(2).max(1) as u64;
                let base = (row + col) as u64 * 255 / span;
                ((base + self.tick * 8) % 256) as u8
            }
            Pattern::Pulse => {
                // triangle wave over 2 × 255 ticks
                let phase = (self.tick * 5) % 510;
                if phase <= 255 { phase as u8 } else { (510 - phase) as u8 }
            }
        }
    }
}

impl FrameSource for ProceduralSource {
    fn next_grid(&mut self) -> Result<Option<GrayscaleGrid>, SourceError> {
        let mut grid = GrayscaleGrid::new(self.rows, self.cols);
        let cols = self.cols;
        for (i, px) in grid.as_mut_slice().iter_mut().enumerate() {
            *px = self.sample(i / cols, i % cols);
        }
        self.tick += 1;
        Ok(Some(grid))
    }

    fn grid_size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn is_live(&self) -> bool {
        true
    }
}

/// Fabrique la source procédurale choisie par l'utilisateur.
///
/// # Errors
/// Retourne une erreur si le nom n'est pas reconnu.
///
/// # Example
/// ```
/// use tc_source::procedural::create_procedural_source;
/// assert!(create_procedural_source("sweep", 2, 2).is_ok());
/// assert!(create_procedural_source("plasma", 2, 2).is_err());
/// ```
pub fn create_procedural_source(
    name: &str,
    rows: usize,
    cols: usize,
) -> Result<ProceduralSource, CoreError> {
    let pattern = match name.to_lowercase().as_str() {
        "sweep" => Pattern::Sweep,
        "pulse" => Pattern::Pulse,
        _ => {
            return Err(CoreError::Config(format!(
                "Générateur procédural inconnu : {name}. Supportés : sweep, pulse"
            )));
        }
    };
    Ok(ProceduralSource::new(pattern, rows, cols))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_spans_full_range_on_first_frame() {
        let mut source = ProceduralSource::new(Pattern::Sweep, 3, 4);
        let grid = source.next_grid().unwrap().unwrap();
        assert_eq!(grid.get(0, 0), 0);
        assert_eq!(grid.get(2, 3), 255);
    }

    #[test]
    fn sweep_moves_between_frames() {
        let mut source = ProceduralSource::new(Pattern::Sweep, 3, 4);
        let a = source.next_grid().unwrap().unwrap();
        let b = source.next_grid().unwrap().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn pulse_is_uniform_and_bounded() {
        let mut source = ProceduralSource::new(Pattern::Pulse, 2, 2);
        let mut seen_top = false;
        for _ in 0..200 {
            let grid = source.next_grid().unwrap().unwrap();
            let first = grid.get(0, 0);
            assert!(grid.as_slice().iter().all(|&v| v == first));
            seen_top |= first == 255;
        }
        assert!(seen_top);
    }

    #[test]
    fn never_runs_out() {
        let mut source = ProceduralSource::new(Pattern::Pulse, 1, 1);
        assert!(source.is_live());
        for _ in 0..1000 {
            assert!(source.next_grid().unwrap().is_some());
        }
    }

    #[test]
    fn single_cell_sweep_does_not_divide_by_zero() {
        let mut source = ProceduralSource::new(Pattern::Sweep, 1, 1);
        assert!(source.next_grid().unwrap().is_some());
    }

    #[test]
    fn zero_column_grid_is_empty() {
        let mut source = ProceduralSource::new(Pattern::Sweep, 3, 0);
        assert!(source.next_grid().unwrap().unwrap().is_empty());
    }
}
