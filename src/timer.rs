use std::time::Instant;

/// Anchored position estimator for primitives without a hardware clock.
///
/// Position is `anchor_position + elapsed since anchor_instant` while running
/// and just `anchor_position` while stopped.
#[derive(Debug, PartialEq, Default)]
pub struct PlaybackTimer {
    /// Anchor position in seconds (finite, >= 0).
    anchor_position: f64,
    /// Monotonic instant corresponding to `anchor_position`. `None` while stopped.
    anchor_instant: Option<Instant>,
}

impl PlaybackTimer {
    /// Stop and move to `position`.
    pub fn reset(&mut self, position: f64) {
        self.anchor_position = sanitize_position(position);
        self.anchor_instant = None;
    }

    /// Move to `position` without changing whether the timer runs.
    pub fn set_position(&mut self, position: f64) {
        self.anchor_position = sanitize_position(position);
        if self.anchor_instant.is_some() {
            self.anchor_instant = Some(Instant::now());
        }
    }

    pub fn resume(&mut self) {
        if self.anchor_instant.is_none() {
            self.anchor_instant = Some(Instant::now());
        }
    }

    /// Stop, folding elapsed running time into the anchor so it is not lost.
    pub fn pause(&mut self) {
        self.anchor_position = self.estimate();
        self.anchor_instant = None;
    }

    pub fn is_running(&self) -> bool {
        self.anchor_instant.is_some()
    }

    pub fn estimate(&self) -> f64 {
        let base = self.anchor_position;
        match self.anchor_instant {
            Some(inst) => {
                let val = base + inst.elapsed().as_secs_f64();
                if val.is_finite() { val } else { base }
            }
            None => base,
        }
    }
}

/// Coerce a reported position into a finite, non-negative value.
pub fn sanitize_position(p: f64) -> f64 {
    if p.is_nan() || !p.is_finite() || p < 0.0 {
        0.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_rejects_garbage() {
        assert_eq!(sanitize_position(f64::NAN), 0.0);
        assert_eq!(sanitize_position(f64::INFINITY), 0.0);
        assert_eq!(sanitize_position(-4.0), 0.0);
        assert_eq!(sanitize_position(3.5), 3.5);
    }

    #[test]
    fn stopped_timer_holds_position() {
        let mut t = PlaybackTimer::default();
        t.reset(12.0);
        assert!(!t.is_running());
        assert_eq!(t.estimate(), 12.0);
        t.set_position(20.0);
        assert!(!t.is_running());
        assert_eq!(t.estimate(), 20.0);
    }

    #[test]
    fn running_timer_advances_and_pause_keeps_progress() {
        let mut t = PlaybackTimer::default();
        t.reset(1.0);
        t.resume();
        std::thread::sleep(std::time::Duration::from_millis(20));
        t.pause();
        let paused_at = t.estimate();
        assert!(paused_at >= 1.02);
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert_eq!(t.estimate(), paused_at);
    }
}
