use std::collections::VecDeque;
use std::time::Duration;

/// Per-frame counters. Diagnostics only; nothing reads them for correctness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub sprite_instances: u32,
    pub primitive_instances: u32,
    pub text_vertices: u32,
    pub batches: u32,
    /// Characters dropped because the font has no glyph for them
    pub missing_glyphs: u32,
}

/// Rolling frames-per-second over the last `window` frame durations.
#[derive(Debug)]
pub struct FrameTimer {
    samples: VecDeque<Duration>,
    total: Duration,
    window: usize,
}

impl FrameTimer {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            total: Duration::ZERO,
            window,
        }
    }

    pub fn record(&mut self, frame_time: Duration) {
        if self.samples.len() == self.window {
            if let Some(oldest) = self.samples.pop_front() {
                self.total -= oldest;
            }
        }
        self.samples.push_back(frame_time);
        self.total += frame_time;
    }

    pub fn average_frame_time(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.total / self.samples.len() as u32)
    }

    pub fn fps(&self) -> f32 {
        match self.average_frame_time() {
            Some(average) if !average.is_zero() => 1.0 / average.as_secs_f32(),
            _ => 0.0,
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_averages_window() {
        let mut timer = FrameTimer::new(4);
        assert_eq!(timer.fps(), 0.0);

        for _ in 0..4 {
            timer.record(Duration::from_millis(10));
        }
        assert!((timer.fps() - 100.0).abs() < 1e-3);

        // Old samples fall out of the window.
        for _ in 0..4 {
            timer.record(Duration::from_millis(20));
        }
        assert!((timer.fps() - 50.0).abs() < 1e-3);
        assert_eq!(timer.average_frame_time(), Some(Duration::from_millis(20)));
    }
}
