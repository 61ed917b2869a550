use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A grayscale value outside the closed range reached the quantizer.
    #[error("Échantillon de gris invalide : {value}. Valeur attendue entre {min} et {max}.")]
    OutOfRangeSample {
        /// Offending value.
        value: i64,
        /// Lower bound (inclusive).
        min: i64,
        /// Upper bound (inclusive).
        max: i64,
    },

    /// Widen factor must be at least 1.
    #[error("Facteur d'élargissement invalide : {0} (minimum 1)")]
    InvalidWiden(usize),

    /// Grid data does not describe a rectangle of the announced size.
    #[error("Dimensions invalides : ligne {row} a {found} colonnes, {expected} attendues")]
    InvalidDimensions {
        /// Row index where the mismatch was found.
        row: usize,
        /// Expected column count.
        expected: usize,
        /// Actual column count.
        found: usize,
    },

    /// Flat sample buffer length does not match `rows × cols`.
    #[error("Dimensions invalides : {rows}×{cols} attendu, {found} échantillons reçus")]
    GridLength {
        /// Announced row count.
        rows: usize,
        /// Announced column count.
        cols: usize,
        /// Number of samples supplied.
        found: usize,
    },

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}

/// Failure of a frame source to deliver a frame.
///
/// End of stream is not an error: sources return `Ok(None)` instead.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Reading from the underlying device or pipe failed.
    #[error("Erreur d'acquisition : {0}")]
    Io(#[from] std::io::Error),

    /// The capture process could not be started.
    #[error("Impossible de lancer {program} : {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The stream ended in the middle of a frame.
    #[error("Frame tronquée : {got} octets reçus sur {expected}")]
    ShortFrame {
        /// Bytes per full frame.
        expected: usize,
        /// Bytes actually read before EOF.
        got: usize,
    },

    /// Still image could not be decoded.
    #[error("Image illisible : {0}")]
    Image(String),

    /// Resizing the source picture failed.
    #[error("Redimensionnement impossible : {0}")]
    Resize(String),

    /// The source produced data that is not a valid grayscale grid.
    #[error(transparent)]
    Grid(#[from] CoreError),
}
