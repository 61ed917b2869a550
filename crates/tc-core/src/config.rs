use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::WidenFactor;
use crate::error::CoreError;

/// Hauteur maximale de la grille, en lignes.
pub const MAX_HEIGHT: u32 = 1000;

/// Facteur d'élargissement maximal.
pub const MAX_WIDEN: u32 = 16;

/// Configuration de capture et de rendu.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use tc_core::config::CaptureConfig;
/// let config = CaptureConfig::default();
/// assert_eq!(config.fps, 30.0);
/// assert_eq!(config.width(), 40);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CaptureConfig {
    // === Rythme ===
    /// Frames par seconde visées.
    pub fps: f64,

    // === Géométrie ===
    /// Hauteur de la grille en lignes. La largeur en est dérivée (4:3).
    pub height: u32,
    /// Répétition horizontale de chaque glyphe.
    pub widen: u32,

    // === Source ===
    /// Miroir horizontal (vue selfie) pour les sources ffmpeg.
    pub mirror: bool,
    /// Périphérique caméra. `None` = périphérique par défaut de la plateforme.
    pub device: Option<String>,
    /// Format d'entrée ffmpeg (`v4l2`, `avfoundation`, `dshow`).
    /// `None` = choisi selon l'OS.
    pub input_format: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            height: 30,
            widen: 3,
            mirror: false,
            device: None,
            input_format: None,
        }
    }
}

impl CaptureConfig {
    /// Largeur dérivée : `round(height × 4/3)`.
    ///
    /// # Example
    /// ```
    /// use tc_core::config::CaptureConfig;
    /// let config = CaptureConfig { height: 120, ..CaptureConfig::default() };
    /// assert_eq!(config.width(), 160);
    /// ```
    #[must_use]
    pub fn width(&self) -> u32 {
        (f64::from(self.height) * 4.0 / 3.0).round() as u32
    }

    /// Check every field. Logs a warning when `height` is not a multiple
    /// of `widen`, which is allowed but wraps less cleanly.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] for a non-positive `fps`, a `height`
    /// outside `1..=MAX_HEIGHT` or a `widen` above `MAX_WIDEN`, and
    /// [`CoreError::InvalidWiden`] for a zero `widen`.
    pub fn validate(&self) -> Result<(), CoreError> {
        FrameRate::new(self.fps)?;
        if self.height == 0 || self.height > MAX_HEIGHT {
            return Err(CoreError::Config(format!(
                "height doit être entre 1 et {MAX_HEIGHT} (reçu {})",
                self.height
            )));
        }
        let widen = self.widen_factor()?;
        if self.widen > MAX_WIDEN {
            return Err(CoreError::Config(format!(
                "widen doit être au plus {MAX_WIDEN} (reçu {})",
                self.widen
            )));
        }
        if self.height as usize % widen.get() != 0 {
            log::warn!(
                "height {} n'est pas divisible par widen {}",
                self.height,
                widen.get()
            );
        }
        Ok(())
    }

    /// Target frame rate.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if `fps` is not positive and finite.
    pub fn frame_rate(&self) -> Result<FrameRate, CoreError> {
        FrameRate::new(self.fps)
    }

    /// Widen factor.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidWiden`] if `widen` is zero.
    pub fn widen_factor(&self) -> Result<WidenFactor, CoreError> {
        WidenFactor::new(self.widen as usize)
    }
}

/// Cadence cible en cycles par seconde.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use tc_core::config::FrameRate;
/// let rate = FrameRate::new(4.0).unwrap();
/// assert_eq!(rate.interval(), Duration::from_millis(250));
/// assert!(FrameRate::new(0.0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRate(f64);

impl FrameRate {
    /// Create a frame rate.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if `fps` is not positive and finite.
    pub fn new(fps: f64) -> Result<Self, CoreError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(CoreError::Config(format!(
                "fps doit être un nombre positif (reçu {fps})"
            )));
        }
        Ok(Self(fps))
    }

    /// Cycles per second.
    #[must_use]
    pub fn fps(self) -> f64 {
        self.0
    }

    /// Budget d'un cycle : `1 / fps`.
    #[must_use]
    pub fn interval(self) -> Duration {
        Duration::from_secs_f64(1.0 / self.0)
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    capture: Option<CaptureSection>,
    source: Option<SourceSection>,
}

/// Capture section, all fields optional for partial override.
#[derive(Deserialize)]
struct CaptureSection {
    fps: Option<f64>,
    height: Option<u32>,
    widen: Option<u32>,
}

/// Source section, all fields optional.
#[derive(Deserialize)]
struct SourceSection {
    device: Option<String>,
    input_format: Option<String>,
    mirror: Option<bool>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or holds
/// invalid values.
///
/// # Example
/// ```no_run
/// use tc_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("termcam.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<CaptureConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Configuration invalide dans {}", path.display()))
}

/// Parse a TOML document and merge it over the defaults.
///
/// # Errors
/// Returns an error on TOML syntax errors or invalid values.
///
/// # Example
/// ```
/// use tc_core::config::parse_config;
/// let config = parse_config("[capture]\nfps = 15.0\n").unwrap();
/// assert_eq!(config.fps, 15.0);
/// assert_eq!(config.height, 30);
/// ```
pub fn parse_config(content: &str) -> Result<CaptureConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = CaptureConfig::default();

    if let Some(c) = file.capture {
        if let Some(v) = c.fps {
            config.fps = v;
        }
        if let Some(v) = c.height {
            config.height = v;
        }
        if let Some(v) = c.widen {
            config.widen = v;
        }
    }

    if let Some(s) = file.source {
        if s.device.is_some() {
            config.device = s.device;
        }
        if s.input_format.is_some() {
            config.input_format = s.input_format;
        }
        if let Some(v) = s.mirror {
            config.mirror = v;
        }
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = CaptureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.widen_factor().unwrap().get(), 3);
        assert_eq!(config.frame_rate().unwrap().fps(), 30.0);
    }

    #[test]
    fn width_is_rounded_four_thirds() {
        let mut config = CaptureConfig::default();
        for (height, width) in [(1, 1), (2, 3), (30, 40), (31, 41), (32, 43), (120, 160)] {
            config.height = height;
            assert_eq!(config.width(), width, "height {height}");
        }
    }

    #[test]
    fn validate_rejects_non_positive_values() {
        let bad_fps = CaptureConfig {
            fps: 0.0,
            ..CaptureConfig::default()
        };
        assert!(matches!(bad_fps.validate(), Err(CoreError::Config(_))));

        let nan_fps = CaptureConfig {
            fps: f64::NAN,
            ..CaptureConfig::default()
        };
        assert!(nan_fps.validate().is_err());

        let bad_height = CaptureConfig {
            height: 0,
            ..CaptureConfig::default()
        };
        assert!(matches!(bad_height.validate(), Err(CoreError::Config(_))));

        let bad_widen = CaptureConfig {
            widen: 0,
            ..CaptureConfig::default()
        };
        assert!(matches!(bad_widen.validate(), Err(CoreError::InvalidWiden(0))));
    }

    #[test]
    fn validate_bounds_grid_size() {
        for height in [MAX_HEIGHT + 1, u32::MAX] {
            let config = CaptureConfig {
                height,
                ..CaptureConfig::default()
            };
            assert!(matches!(config.validate(), Err(CoreError::Config(_))), "height {height}");
        }
        let tallest = CaptureConfig {
            height: MAX_HEIGHT,
            widen: MAX_WIDEN,
            ..CaptureConfig::default()
        };
        assert!(tallest.validate().is_ok());

        let too_wide = CaptureConfig {
            widen: MAX_WIDEN + 1,
            ..CaptureConfig::default()
        };
        assert!(matches!(too_wide.validate(), Err(CoreError::Config(_))));
        assert!(parse_config("[capture]\nheight = 4294967295\n").is_err());
    }

    #[test]
    fn indivisible_height_is_only_a_warning() {
        let config = CaptureConfig {
            height: 31,
            widen: 3,
            ..CaptureConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let config = parse_config(
            r#"
            [capture]
            height = 60

            [source]
            device = "/dev/video2"
            mirror = true
            "#,
        )
        .unwrap();
        assert_eq!(config.height, 60);
        assert_eq!(config.widen, 3);
        assert_eq!(config.fps, 30.0);
        assert_eq!(config.device.as_deref(), Some("/dev/video2"));
        assert!(config.input_format.is_none());
        assert!(config.mirror);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), CaptureConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(parse_config("[capture]\nfps = -5.0\n").is_err());
        assert!(parse_config("[capture]\nwiden = 0\n").is_err());
        assert!(parse_config("[capture\n").is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[capture]\nfps = 12.5\nwiden = 2").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.fps, 12.5);
        assert_eq!(config.widen, 2);
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/termcam.toml")).unwrap_err();
        assert!(err.to_string().contains("Impossible de lire"));
    }
}
