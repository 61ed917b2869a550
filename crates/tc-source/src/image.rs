use std::path::Path;

use image::GrayImage;
use tc_core::error::SourceError;
use tc_core::frame::GrayscaleGrid;
use tc_core::traits::FrameSource;

use crate::resize::Resizer;

/// Source d'image statique. Retourne la même grille `repeat` fois.
///
/// `repeat = None` : indéfiniment.
///
/// # Example
/// ```no_run
/// use tc_source::image::ImageSource;
/// use std::path::Path;
/// let source = ImageSource::new(Path::new("test.png"), 30, 40, Some(1)).unwrap();
/// ```
pub struct ImageSource {
    grid: GrayscaleGrid,
    remaining: Option<usize>,
}

impl ImageSource {
    /// Charge une image, la convertit en gris et la redimensionne.
    ///
    /// # Errors
    /// Returns an error if the image cannot be loaded or resized.
    pub fn new(
        path: &Path,
        rows: usize,
        cols: usize,
        repeat: Option<usize>,
    ) -> Result<Self, SourceError> {
        let img = image::open(path)
            .map_err(|e| SourceError::Image(format!("{} : {e}", path.display())))?;
        log::info!(
            "Image chargée : {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        Self::from_luma(&img.to_luma8(), rows, cols, repeat)
    }

    /// Build from an in-memory luma image.
    ///
    /// # Errors
    /// Returns an error if resizing fails.
    ///
    /// # Example
    /// ```
    /// use image::GrayImage;
    /// use tc_core::traits::FrameSource;
    /// use tc_source::image::ImageSource;
    ///
    /// let img = GrayImage::from_pixel(8, 6, image::Luma([255]));
    /// let mut source = ImageSource::from_luma(&img, 3, 4, Some(2)).unwrap();
    /// assert!(source.next_grid().unwrap().is_some());
    /// assert!(source.next_grid().unwrap().is_some());
    /// assert!(source.next_grid().unwrap().is_none());
    /// ```
    pub fn from_luma(
        img: &GrayImage,
        rows: usize,
        cols: usize,
        repeat: Option<usize>,
    ) -> Result<Self, SourceError> {
        let (w, h) = img.dimensions();
        let grid = Resizer::new().resize_luma(img.as_raw(), w, h, rows, cols)?;
        Ok(Self {
            grid,
            remaining: repeat,
        })
    }
}

impl FrameSource for ImageSource {
    fn next_grid(&mut self) -> Result<Option<GrayscaleGrid>, SourceError> {
        match &mut self.remaining {
            None => Ok(Some(self.grid.clone())),
            Some(0) => Ok(None),
            Some(n) => {
                *n -= 1;
                Ok(Some(self.grid.clone()))
            }
        }
    }

    fn grid_size(&self) -> (usize, usize) {
        (self.grid.rows(), self.grid.cols())
    }

    fn is_live(&self) -> bool {
        self.remaining.is_none()
    }
}
