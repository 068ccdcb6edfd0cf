//! Frame-rate monitor

/// Frames kept for the rolling average
pub const SAMPLE_COUNT: usize = 60;

/// Rolling FPS and frame-time jitter over the last [`SAMPLE_COUNT`] frames
#[derive(Debug, Clone)]
pub struct FrameMonitor {
    frame_times: [f64; SAMPLE_COUNT],
    frame_index: usize,
    filled: usize,
    last_time: Option<f64>,
}

impl Default for FrameMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameMonitor {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; SAMPLE_COUNT],
            frame_index: 0,
            filled: 0,
            last_time: None,
        }
    }

    /// Record a frame timestamp (ms)
    pub fn record(&mut self, time_ms: f64) {
        if let Some(last) = self.last_time {
            self.frame_times[self.frame_index] = time_ms - last;
            self.frame_index = (self.frame_index + 1) % SAMPLE_COUNT;
            self.filled = (self.filled + 1).min(SAMPLE_COUNT);
        }
        self.last_time = Some(time_ms);
    }

    fn samples(&self) -> &[f64] {
        &self.frame_times[..self.filled]
    }

    /// Mean frame time (ms), 0 before two frames were seen
    pub fn mean_frame_ms(&self) -> f64 {
        let samples = self.samples();
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    pub fn fps(&self) -> u32 {
        let mean = self.mean_frame_ms();
        if mean <= 0.0 {
            return 0;
        }
        (1000.0 / mean).round() as u32
    }

    /// Standard deviation of frame time (ms)
    pub fn jitter_ms(&self) -> f64 {
        let samples = self.samples();
        if samples.len() < 2 {
            return 0.0;
        }
        let mean = self.mean_frame_ms();
        let variance =
            samples.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        variance.sqrt()
    }

    /// Overlay lines: FPS, mean frame time, jitter
    pub fn debug_lines(&self) -> [String; 3] {
        [
            format!("FPS: {}", self.fps()),
            format!("Frame: {:.1}ms", self.mean_frame_ms()),
            format!("Jitter: {:.1}ms", self.jitter_ms()),
        ]
    }
}

/// Jitter above this is drawn as a warning (ms)
pub const JITTER_WARN_MS: f64 = 2.0;
/// Jitter above this is drawn as an alert (ms)
pub const JITTER_ALERT_MS: f64 = 5.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_monitor() {
        let mut m = FrameMonitor::new();
        assert_eq!(m.fps(), 0);
        m.record(0.0);
        assert_eq!(m.fps(), 0);
        assert_eq!(m.jitter_ms(), 0.0);
    }

    #[test]
    fn test_steady_sixty() {
        let mut m = FrameMonitor::new();
        for i in 0..=120 {
            m.record(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(m.fps(), 60);
        assert!(m.jitter_ms() < 1e-6);
    }

    #[test]
    fn test_ring_forgets_old_frames() {
        let mut m = FrameMonitor::new();
        let mut t = 0.0;
        // Slow frames first
        for _ in 0..SAMPLE_COUNT {
            t += 50.0;
            m.record(t);
        }
        assert_eq!(m.fps(), 20);
        for _ in 0..=SAMPLE_COUNT {
            t += 10.0;
            m.record(t);
        }
        assert_eq!(m.fps(), 100);
    }

    #[test]
    fn test_debug_lines() {
        let mut m = FrameMonitor::new();
        let mut t = 0.0;
        m.record(t);
        for i in 0..SAMPLE_COUNT {
            t += if i % 2 == 0 { 10.0 } else { 20.0 };
            m.record(t);
        }
        let [fps, frame, jitter] = m.debug_lines();
        assert_eq!(fps, "FPS: 67");
        assert_eq!(frame, "Frame: 15.0ms");
        assert_eq!(jitter, "Jitter: 5.0ms");
    }

    #[test]
    fn test_jitter_alternating() {
        let mut m = FrameMonitor::new();
        let mut t = 0.0;
        m.record(t);
        for i in 0..SAMPLE_COUNT {
            t += if i % 2 == 0 { 10.0 } else { 20.0 };
            m.record(t);
        }
        assert!((m.mean_frame_ms() - 15.0).abs() < 1e-9);
        assert!((m.jitter_ms() - 5.0).abs() < 1e-9);
    }
}
