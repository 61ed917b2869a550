use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tc_core::error::SourceError;
use tc_core::frame::GrayscaleGrid;
use tc_core::traits::FrameSource;

/// Drapeau Ctrl-C partagé entre le handler de signal et la boucle.
#[derive(Clone, Debug, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lève le drapeau. Retourne `true` s'il était déjà levé.
    pub fn trigger(&self) -> bool {
        self.0.swap(true, Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Source qui s'épuise dès qu'une interruption est demandée.
///
/// La boucle s'arrête alors par le chemin normal : la source est fermée
/// (processus ffmpeg tué et attendu) et le terminal restauré au `Drop` du sink.
/// Une erreur d'acquisition survenue après l'interruption (ffmpeg reçoit aussi
/// SIGINT) compte comme une fin de flux.
///
/// # Example
/// ```
/// use tc_app::interrupt::{Interrupt, Interruptible};
/// use tc_core::frame::GrayscaleGrid;
/// use tc_core::traits::{FrameSource, ScriptedSource};
///
/// let interrupt = Interrupt::new();
/// let inner = ScriptedSource::new(vec![GrayscaleGrid::new(1, 1); 3]);
/// let mut source = Interruptible::new(inner, interrupt.clone());
/// assert!(source.next_grid().unwrap().is_some());
/// interrupt.trigger();
/// assert!(source.next_grid().unwrap().is_none());
/// ```
pub struct Interruptible<S> {
    inner: S,
    interrupt: Interrupt,
}

impl<S: FrameSource> Interruptible<S> {
    pub fn new(inner: S, interrupt: Interrupt) -> Self {
        Self { inner, interrupt }
    }
}

impl<S: FrameSource> FrameSource for Interruptible<S> {
    fn next_grid(&mut self) -> Result<Option<GrayscaleGrid>, SourceError> {
        if self.interrupt.is_set() {
            log::info!("Interruption : arrêt de la source");
            return Ok(None);
        }
        match self.inner.next_grid() {
            Err(e) if self.interrupt.is_set() => {
                log::debug!("Erreur ignorée après interruption : {e}");
                Ok(None)
            }
            other => other,
        }
    }

    fn grid_size(&self) -> (usize, usize) {
        self.inner.grid_size()
    }

    fn is_live(&self) -> bool {
        self.inner.is_live()
    }

    fn close(&mut self) {
        self.inner.close();
    }
}
