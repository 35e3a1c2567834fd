/// Frame-rate summary produced every `interval` frames.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FpsReport {
    /// Average frames per second over the interval.
    pub fps: f32,
    /// Average frame time over the interval, in milliseconds.
    pub frame_ms: f32,
}

/// Accumulates frame times and emits an [`FpsReport`] every `interval` frames.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    interval: u32,
    frames: u32,
    elapsed: f64,
}

impl FpsCounter {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            frames: 0,
            elapsed: 0.0,
        }
    }

    /// Records one frame of `dt` seconds. Returns a report when the interval
    /// completes, then starts a new interval.
    pub fn record(&mut self, dt: f32) -> Option<FpsReport> {
        self.frames += 1;
        self.elapsed += f64::from(dt.max(0.0));

        if self.frames < self.interval {
            return None;
        }

        let avg = self.elapsed / f64::from(self.frames);
        self.frames = 0;
        self.elapsed = 0.0;

        if avg <= 0.0 {
            return None;
        }

        Some(FpsReport {
            fps: (1.0 / avg) as f32,
            frame_ms: (avg * 1e3) as f32,
        })
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_interval() {
        let mut c = FpsCounter::new(4);
        assert!(c.record(0.01).is_none());
        assert!(c.record(0.01).is_none());
        assert!(c.record(0.01).is_none());
        let r = c.record(0.01).unwrap();
        assert!((r.fps - 100.0).abs() < 1e-3);
        assert!((r.frame_ms - 10.0).abs() < 1e-3);
        assert!(c.record(0.01).is_none());
    }

    #[test]
    fn zero_interval_reports_every_frame() {
        let mut c = FpsCounter::new(0);
        assert!(c.record(0.5).is_some());
        assert!(c.record(0.5).is_some());
    }

    #[test]
    fn zero_time_yields_no_report() {
        let mut c = FpsCounter::new(2);
        assert!(c.record(0.0).is_none());
        assert!(c.record(0.0).is_none());
    }
}
