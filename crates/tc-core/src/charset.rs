use crate::error::CoreError;

/// Plus petite valeur de gris acceptée.
pub const MIN_GRAYSCALE: i64 = 0;

/// Plus grande valeur de gris acceptée.
pub const MAX_GRAYSCALE: i64 = 255;

/// 10 caractères, du plus sombre au plus clair.
pub const GLYPH_RAMP: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Number of luminance levels in [`GLYPH_RAMP`].
pub const GLYPH_LEVELS: usize = GLYPH_RAMP.len();

/// Lookup table mapping a sample [0..255] → ramp index.
///
/// Built at compile time with `floor(sample * 9 / 255)` in integer
/// arithmetic, so 255 lands exactly on the last ramp entry.
pub const RAMP_INDEX: [u8; 256] = build_ramp_index();

/// Lookup table mapping a sample [0..255] → glyph.
pub const GLYPH_LUT: [char; 256] = build_glyph_lut();

const fn build_ramp_index() -> [u8; 256] {
    let mut lut = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        lut[i] = (i * (GLYPH_LEVELS - 1) / MAX_GRAYSCALE as usize) as u8;
        i += 1;
    }
    lut
}

const fn build_glyph_lut() -> [char; 256] {
    let mut lut = [' '; 256];
    let mut i = 0;
    while i < 256 {
        lut[i] = GLYPH_RAMP[RAMP_INDEX[i] as usize];
        i += 1;
    }
    lut
}

/// Ramp index of a validated sample.
///
/// # Example
/// ```
/// use tc_core::charset::ramp_index;
/// assert_eq!(ramp_index(0), 0);
/// assert_eq!(ramp_index(128), 4);
/// assert_eq!(ramp_index(255), 9);
/// ```
#[inline(always)]
#[must_use]
pub fn ramp_index(sample: u8) -> usize {
    RAMP_INDEX[sample as usize] as usize
}

/// Glyph of a validated sample.
///
/// # Example
/// ```
/// use tc_core::charset::glyph_for;
/// assert_eq!(glyph_for(0), ' ');
/// assert_eq!(glyph_for(255), '@');
/// ```
#[inline(always)]
#[must_use]
pub fn glyph_for(sample: u8) -> char {
    GLYPH_LUT[sample as usize]
}

/// Validate a raw integer as a grayscale sample.
///
/// # Errors
/// Returns [`CoreError::OutOfRangeSample`] when `value` is outside 0–255.
/// The value is never clamped.
///
/// # Example
/// ```
/// use tc_core::charset::check_sample;
/// assert_eq!(check_sample(42).unwrap(), 42);
/// assert!(check_sample(256).is_err());
/// assert!(check_sample(-1).is_err());
/// ```
pub fn check_sample(value: i64) -> Result<u8, CoreError> {
    u8::try_from(value).map_err(|_| CoreError::OutOfRangeSample {
        value,
        min: MIN_GRAYSCALE,
        max: MAX_GRAYSCALE,
    })
}

/// Nombre de répétitions horizontales de chaque glyphe.
///
/// Compense les cellules de terminal plus hautes que larges.
/// Toujours ≥ 1.
///
/// # Example
/// ```
/// use tc_core::charset::WidenFactor;
/// let w = WidenFactor::new(3).unwrap();
/// assert_eq!(w.get(), 3);
/// assert!(WidenFactor::new(0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WidenFactor(usize);

impl WidenFactor {
    /// No widening: one glyph per sample.
    pub const ONE: Self = Self(1);

    /// Facteur par défaut.
    pub const DEFAULT: Self = Self(3);

    /// Create a widen factor.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidWiden`] if `factor` is zero.
    pub fn new(factor: usize) -> Result<Self, CoreError> {
        if factor == 0 {
            return Err(CoreError::InvalidWiden(factor));
        }
        Ok(Self(factor))
    }

    /// Repetition count.
    #[inline(always)]
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for WidenFactor {
    fn default() -> Self {
        Self::DEFAULT
    }
}
