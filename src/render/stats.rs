use std::time::{Duration, Instant};

/// Frame counter for the viewport's render trigger.
#[derive(Debug, Clone)]
pub struct RenderStats {
    frames: u64,
    failed_frames: u64,
    first_frame_time: Option<Instant>,
    last_frame_time: Option<Instant>,
    pub frame_dt: f32,
}

impl Default for RenderStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStats {
    pub fn new() -> Self {
        Self {
            frames: 0,
            failed_frames: 0,
            first_frame_time: None,
            last_frame_time: None,
            frame_dt: 0.0,
        }
    }

    pub fn record(&mut self, now: Instant) {
        let dt_duration = match self.last_frame_time {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.first_frame_time.get_or_insert(now);
        self.last_frame_time = Some(now);
        self.frame_dt = dt_duration.as_secs_f32().max(0.0);
        self.frames = self.frames.saturating_add(1);
    }

    pub fn record_failure(&mut self) {
        self.failed_frames = self.failed_frames.saturating_add(1);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }

    pub fn summary(&self) -> String {
        let span = match (self.first_frame_time, self.last_frame_time) {
            (Some(first), Some(last)) => last.saturating_duration_since(first),
            _ => Duration::ZERO,
        };
        format!(
            "{} frames ({} failed) over {:.2} ms, last interval {:.3} ms",
            self.frames,
            self.failed_frames,
            span.as_secs_f64() * 1000.0,
            self.frame_dt * 1000.0
        )
    }
}
