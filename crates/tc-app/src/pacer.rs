use std::io;
use std::time::{Duration, Instant};

use tc_ascii::render::render;
use tc_core::charset::WidenFactor;
use tc_core::config::FrameRate;
use tc_core::error::SourceError;
use tc_core::traits::{DisplaySink, FrameSource};
use tc_render::fps::FpsCounter;

/// Horloge de la boucle : lecture du temps et pause.
pub trait Clock {
    /// Instant courant.
    fn now(&self) -> Instant;
    /// Suspend la boucle pendant `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Horloge réelle (`Instant::now` + `thread::sleep`).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// État de la boucle. Passe à `Stopped` uniquement via la source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacerState {
    Running,
    Stopped,
}

/// Bilan d'une exécution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames affichées.
    pub frames: u64,
    /// Cycles dont le travail a dépassé l'intervalle cible (pause nulle).
    pub overruns: u64,
}

/// Échec d'une exécution : acquisition ou affichage.
#[derive(thiserror::Error, Debug)]
pub enum PacerError {
    #[error("acquisition impossible : {0}")]
    Source(#[from] SourceError),

    #[error("affichage impossible : {0}")]
    Sink(#[source] io::Error),
}

/// Pause restante dans l'intervalle, jamais négative.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use tc_app::pacer::sleep_budget;
///
/// let interval = Duration::from_millis(100);
/// assert_eq!(sleep_budget(interval, Duration::from_millis(30)), Duration::from_millis(70));
/// assert_eq!(sleep_budget(interval, Duration::from_millis(150)), Duration::ZERO);
/// ```
#[must_use]
pub fn sleep_budget(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// Boucle acquisition → rendu → affichage → pause, à cadence cible.
///
/// L'affichage de la frame N précède toujours l'acquisition de la frame N+1.
/// Aucune frame n'est sautée en cas de dépassement : la pause tombe à zéro.
pub struct Pacer<C: Clock = SystemClock> {
    interval: Duration,
    widen: WidenFactor,
    clock: C,
    state: PacerState,
    summary: RunSummary,
    fps: FpsCounter,
}

impl Pacer<SystemClock> {
    /// Pacer sur l'horloge système.
    #[must_use]
    pub fn new(rate: FrameRate, widen: WidenFactor) -> Self {
        Self::with_clock(rate, widen, SystemClock)
    }
}

impl<C: Clock> Pacer<C> {
    /// Pacer sur une horloge donnée.
    #[must_use]
    pub fn with_clock(rate: FrameRate, widen: WidenFactor, clock: C) -> Self {
        Self {
            interval: rate.interval(),
            widen,
            clock,
            state: PacerState::Running,
            summary: RunSummary::default(),
            fps: FpsCounter::new(30),
        }
    }

    #[must_use]
    pub fn state(&self) -> PacerState {
        self.state
    }

    /// Intervalle cible entre deux débuts de cycle.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Exécute la boucle jusqu'à épuisement ou échec de la source.
    ///
    /// La source est fermée dans les deux cas.
    ///
    /// # Errors
    /// [`PacerError::Source`] si l'acquisition échoue,
    /// [`PacerError::Sink`] si l'affichage échoue.
    pub fn run<S, D>(&mut self, source: &mut S, sink: &mut D) -> Result<RunSummary, PacerError>
    where
        S: FrameSource + ?Sized,
        D: DisplaySink + ?Sized,
    {
        let (rows, cols) = source.grid_size();
        log::info!(
            "Boucle démarrée : {cols}x{rows}, intervalle {:?}, source {}",
            self.interval,
            if source.is_live() { "live" } else { "finie" }
        );

        while self.state == PacerState::Running {
            let start = self.clock.now();

            let grid = match source.next_grid() {
                Ok(Some(grid)) => grid,
                Ok(None) => {
                    log::info!("Source épuisée après {} frames", self.summary.frames);
                    self.stop(source);
                    break;
                }
                Err(e) => {
                    log::error!("Acquisition échouée : {e}");
                    self.stop(source);
                    return Err(PacerError::Source(e));
                }
            };

            let frame = render(&grid, self.widen);
            if let Err(e) = sink.clear_and_print(&frame) {
                self.stop(source);
                return Err(PacerError::Sink(e));
            }
            self.summary.frames += 1;

            let now = self.clock.now();
            self.fps.tick_at(now);
            let elapsed = now.saturating_duration_since(start);
            let pause = sleep_budget(self.interval, elapsed);
            if elapsed > self.interval {
                self.summary.overruns += 1;
                log::debug!(
                    "Dépassement frame {} : {:.1} ms > {:.1} ms",
                    self.summary.frames,
                    elapsed.as_secs_f64() * 1000.0,
                    self.interval.as_secs_f64() * 1000.0
                );
            }
            if self.summary.frames % 120 == 0 {
                log::debug!("FPS : {:.1}", self.fps.fps());
            }
            self.clock.sleep(pause);
        }

        log::info!(
            "Boucle terminée : {} frames, {} dépassements",
            self.summary.frames,
            self.summary.overruns
        );
        Ok(self.summary)
    }

    fn stop<S: FrameSource + ?Sized>(&mut self, source: &mut S) {
        self.state = PacerState::Stopped;
        source.close();
    }
}
