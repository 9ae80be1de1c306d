//! Performance metrics and instrumentation for the frame driver.

use std::time::{Duration, Instant};

/// Counters and timings collected while running one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameMetrics {
    /// Time spent walking the tree and sorting records
    pub traversal_time: Duration,

    /// Time spent hit-testing the cursor
    pub depth_test_time: Duration,

    /// Time spent dispatching input
    pub input_time: Duration,

    /// Time spent in measure, layout and position resolution
    pub layout_time: Duration,

    /// Time spent filling the draw list
    pub draw_time: Duration,

    /// Total frame time
    pub total_time: Duration,

    /// Number of update records collected
    pub records: usize,

    /// Number of nodes that ran their depth test
    pub depth_tested: usize,

    /// Number of nodes that received input
    pub input_handled: usize,

    /// Number of nodes measured and laid out
    pub laid_out: usize,

    /// Number of draw commands emitted
    pub draw_commands: usize,

    /// Number of nodes under the cursor
    pub hovered: usize,
}

impl FrameMetrics {
    /// Create new empty metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of records that were laid out.
    pub fn layout_percentage(&self) -> f32 {
        if self.records == 0 {
            0.0
        } else {
            (self.laid_out as f32 / self.records as f32) * 100.0
        }
    }

    /// Format metrics as a human-readable string.
    pub fn format_summary(&self) -> String {
        format!(
            "HUD Frame: {:.2}ms | Walk: {:.2}ms ({} records) | Input: {:.2}ms ({} hovered) | Layout: {:.2}ms ({} nodes) | Draw: {:.2}ms ({} commands)",
            self.total_time.as_secs_f64() * 1000.0,
            self.traversal_time.as_secs_f64() * 1000.0,
            self.records,
            (self.depth_test_time + self.input_time).as_secs_f64() * 1000.0,
            self.hovered,
            self.layout_time.as_secs_f64() * 1000.0,
            self.laid_out,
            self.draw_time.as_secs_f64() * 1000.0,
            self.draw_commands,
        )
    }

    /// Format detailed metrics for debugging.
    pub fn format_detailed(&self) -> String {
        format!(
            r#"HUD Frame Metrics:
  Total Time: {:.3}ms
  Traversal: {:.3}ms ({}% of total)
  Depth Test: {:.3}ms ({}% of total)
  Input: {:.3}ms ({}% of total)
  Layout: {:.3}ms ({}% of total)
  Draw: {:.3}ms ({}% of total)

  Records: {}
    Depth Tested: {}
    Input Handled: {}
    Laid Out: {} ({:.1}%)
    Draw Commands: {}
    Hovered: {}
"#,
            self.total_time.as_secs_f64() * 1000.0,
            self.traversal_time.as_secs_f64() * 1000.0,
            self.percentage_of_total(self.traversal_time),
            self.depth_test_time.as_secs_f64() * 1000.0,
            self.percentage_of_total(self.depth_test_time),
            self.input_time.as_secs_f64() * 1000.0,
            self.percentage_of_total(self.input_time),
            self.layout_time.as_secs_f64() * 1000.0,
            self.percentage_of_total(self.layout_time),
            self.draw_time.as_secs_f64() * 1000.0,
            self.percentage_of_total(self.draw_time),
            self.records,
            self.depth_tested,
            self.input_handled,
            self.laid_out,
            self.layout_percentage(),
            self.draw_commands,
            self.hovered,
        )
    }

    fn percentage_of_total(&self, duration: Duration) -> u32 {
        if self.total_time.as_nanos() == 0 {
            0
        } else {
            ((duration.as_nanos() as f64 / self.total_time.as_nanos() as f64) * 100.0) as u32
        }
    }
}

/// Helper for timing sections of a frame.
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed duration.
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}
