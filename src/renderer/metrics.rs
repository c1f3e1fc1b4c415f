//! Draw-loop metrics for the renderer.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const HISTORY: usize = 120;

/// Tracks draw pass timing and frame scheduling over time.
pub struct RenderMetrics {
    pass_times: VecDeque<Duration>,
    pass_start: Instant,
    /// Items painted in the last pass.
    pub items_painted: usize,
    /// Draw passes since construction.
    pub passes: u64,
    pub frames_scheduled: u64,
    pub frames_cancelled: u64,
}

impl Default for RenderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self {
            pass_times: VecDeque::with_capacity(HISTORY),
            pass_start: Instant::now(),
            items_painted: 0,
            passes: 0,
            frames_scheduled: 0,
            frames_cancelled: 0,
        }
    }

    /// Call at the start of each draw pass.
    pub fn begin_pass(&mut self) {
        self.pass_start = Instant::now();
        self.items_painted = 0;
    }

    /// Call at the end of each draw pass.
    pub fn end_pass(&mut self) {
        self.passes += 1;
        self.pass_times.push_back(self.pass_start.elapsed());
        if self.pass_times.len() > HISTORY {
            self.pass_times.pop_front();
        }
    }

    pub fn record_item(&mut self) {
        self.items_painted += 1;
    }

    pub fn record_scheduled(&mut self) {
        self.frames_scheduled += 1;
    }

    pub fn record_cancelled(&mut self) {
        self.frames_cancelled += 1;
    }

    /// Average pass time in milliseconds over the recent history.
    pub fn avg_pass_time_ms(&self) -> f32 {
        if self.pass_times.is_empty() {
            return 0.0;
        }
        let sum: Duration = self.pass_times.iter().sum();
        sum.as_secs_f32() * 1000.0 / self.pass_times.len() as f32
    }

    pub fn last_pass_time_ms(&self) -> f32 {
        self.pass_times
            .back()
            .map(|d| d.as_secs_f32() * 1000.0)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_recording() {
        let mut metrics = RenderMetrics::new();

        metrics.begin_pass();
        metrics.record_item();
        metrics.record_item();
        metrics.record_scheduled();
        thread::sleep(Duration::from_millis(1));
        metrics.end_pass();

        assert_eq!(metrics.items_painted, 2);
        assert_eq!(metrics.passes, 1);
        assert_eq!(metrics.frames_scheduled, 1);
        assert!(metrics.last_pass_time_ms() >= 1.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut metrics = RenderMetrics::new();
        for _ in 0..(HISTORY + 10) {
            metrics.begin_pass();
            metrics.end_pass();
        }
        assert_eq!(metrics.pass_times.len(), HISTORY);
        assert_eq!(metrics.passes, (HISTORY + 10) as u64);
    }
}
