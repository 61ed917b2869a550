use std::collections::VecDeque;
use std::time::Instant;

/// Compteur FPS par fenêtre glissante. Zéro allocation après init.
///
/// # Example
/// ```
/// use tc_render::fps::FpsCounter;
/// let mut counter = FpsCounter::new(30);
/// counter.tick();
/// assert!(counter.fps() >= 0.0);
/// ```
pub struct FpsCounter {
    /// Instants des dernières frames, au plus `window`.
    stamps: VecDeque<Instant>,
    window: usize,
    fps: f64,
    /// Durée de la dernière frame en ms.
    pub frame_time_ms: f64,
}

impl FpsCounter {
    /// Create a counter averaging over `window` frames (at least 2).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            stamps: VecDeque::with_capacity(window + 1),
            window,
            fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// Appeler une fois par frame, après l'affichage.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Record a frame displayed at `now`.
    pub fn tick_at(&mut self, now: Instant) {
        if let Some(&last) = self.stamps.back() {
            self.frame_time_ms = now.saturating_duration_since(last).as_secs_f64() * 1000.0;
        }
        self.stamps.push_back(now);
        if self.stamps.len() > self.window {
            self.stamps.pop_front();
        }
        if let Some(&first) = self.stamps.front() {
            let secs = now.saturating_duration_since(first).as_secs_f64();
            if self.stamps.len() >= 2 && secs > 0.0 {
                self.fps = (self.stamps.len() - 1) as f64 / secs;
            }
        }
    }

    /// FPS moyen sur la fenêtre.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn steady_ticks_give_exact_rate() {
        let mut counter = FpsCounter::new(10);
        let start = Instant::now();
        for i in 0..20u32 {
            counter.tick_at(start + Duration::from_millis(50) * i);
        }
        assert!((counter.fps() - 20.0).abs() < 1e-6);
        assert!((counter.frame_time_ms - 50.0).abs() < 1e-6);
    }

    #[test]
    fn window_forgets_old_frames() {
        let mut counter = FpsCounter::new(3);
        let start = Instant::now();
        // slow start, then fast frames
        counter.tick_at(start);
        counter.tick_at(start + Duration::from_secs(1));
        for i in 1..=3u32 {
            counter.tick_at(start + Duration::from_secs(1) + Duration::from_millis(100) * i);
        }
        assert!((counter.fps() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn single_tick_reports_zero() {
        let mut counter = FpsCounter::new(5);
        counter.tick();
        assert!(counter.fps().abs() < f64::EPSILON);
    }
}
