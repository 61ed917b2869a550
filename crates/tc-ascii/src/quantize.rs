use std::fmt;

use tc_core::charset::{WidenFactor, check_sample, glyph_for};
use tc_core::error::CoreError;

/// Un glyphe répété `widen` fois. Largeur fixe, indépendante du contenu.
///
/// # Example
/// ```
/// use tc_ascii::quantize::quantize_sample;
/// use tc_core::charset::WidenFactor;
/// let run = quantize_sample(255, WidenFactor::new(3).unwrap());
/// assert_eq!(run.to_string(), "@@@");
/// assert_eq!(run.len(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphRun {
    glyph: char,
    widen: WidenFactor,
}

impl GlyphRun {
    /// Glyph being repeated.
    #[inline]
    #[must_use]
    pub fn glyph(self) -> char {
        self.glyph
    }

    /// Run length in glyphs. Always equal to the widen factor.
    #[inline]
    #[must_use]
    pub fn len(self) -> usize {
        self.widen.get()
    }

    /// Always `false`: a widen factor is at least 1.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        false
    }

    /// Append the run to `out`.
    #[inline(always)]
    pub fn push_to(self, out: &mut String) {
        for _ in 0..self.widen.get() {
            out.push(self.glyph);
        }
    }
}

impl fmt::Display for GlyphRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.widen.get() {
            fmt::Write::write_char(f, self.glyph)?;
        }
        Ok(())
    }
}

/// Quantifie un échantillon brut sur la rampe de glyphes.
///
/// `index = floor(sample * 9 / 255)`, puis le glyphe est répété `widen` fois.
///
/// # Errors
/// Returns [`CoreError::OutOfRangeSample`] when `sample` is outside 0–255.
/// Out-of-range input is never clamped.
///
/// # Example
/// ```
/// use tc_ascii::quantize::quantize;
/// use tc_core::charset::WidenFactor;
/// let w = WidenFactor::ONE;
/// assert_eq!(quantize(0, w).unwrap().glyph(), ' ');
/// assert_eq!(quantize(128, w).unwrap().glyph(), '=');
/// assert!(quantize(256, w).is_err());
/// ```
pub fn quantize(sample: i64, widen: WidenFactor) -> Result<GlyphRun, CoreError> {
    let sample = check_sample(sample)?;
    Ok(quantize_sample(sample, widen))
}

/// Quantize a sample already known to be in range.
#[inline(always)]
#[must_use]
pub fn quantize_sample(sample: u8, widen: WidenFactor) -> GlyphRun {
    GlyphRun {
        glyph: glyph_for(sample),
        widen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::charset::GLYPH_RAMP;

    fn ramp_position(ch: char) -> usize {
        GLYPH_RAMP
            .iter()
            .position(|&c| c == ch)
            .unwrap_or_else(|| panic!("{ch:?} n'est pas dans la rampe"))
    }

    #[test]
    fn every_sample_maps_to_one_ramp_glyph_monotonically() {
        let mut prev = 0usize;
        for s in 0..=255i64 {
            let run = quantize(s, WidenFactor::ONE).unwrap();
            let text = run.to_string();
            assert_eq!(text.chars().count(), 1);
            let idx = ramp_position(run.glyph());
            assert!(idx >= prev, "quantize non monotone à {s}");
            prev = idx;
        }
        assert_eq!(prev, GLYPH_RAMP.len() - 1);
    }

    #[test]
    fn extremes_for_any_widen() {
        for w in 1..=8 {
            let widen = WidenFactor::new(w).unwrap();
            assert_eq!(quantize(0, widen).unwrap().to_string(), " ".repeat(w));
            assert_eq!(quantize(255, widen).unwrap().to_string(), "@".repeat(w));
        }
    }

    #[test]
    fn run_length_equals_widen() {
        for w in [1usize, 2, 3, 7] {
            let widen = WidenFactor::new(w).unwrap();
            for s in [0i64, 1, 28, 29, 127, 128, 254, 255] {
                let run = quantize(s, widen).unwrap();
                assert_eq!(run.len(), w);
                assert_eq!(run.to_string().len(), w);
                let mut buf = String::new();
                run.push_to(&mut buf);
                assert_eq!(buf, run.to_string());
            }
        }
    }

    #[test]
    fn out_of_range_samples_fail() {
        for bad in [256i64, -1, 1000, i64::MIN] {
            match quantize(bad, WidenFactor::ONE) {
                Err(CoreError::OutOfRangeSample { value, min, max }) => {
                    assert_eq!(value, bad);
                    assert_eq!((min, max), (0, 255));
                }
                other => panic!("attendu OutOfRangeSample pour {bad}, obtenu {other:?}"),
            }
        }
    }

    #[test]
    fn error_message_names_value_and_bounds() {
        let err = quantize(256, WidenFactor::ONE).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("256"));
        assert!(msg.contains('0') && msg.contains("255"));
    }

    #[test]
    fn scenario_samples() {
        let glyphs: String = [0i64, 128, 255, 64, 192]
            .iter()
            .map(|&s| quantize(s, WidenFactor::ONE).unwrap().glyph())
            .collect();
        assert_eq!(glyphs, " =@:*");
    }
}
