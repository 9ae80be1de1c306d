//! Configuration for a hudkit instance.

use crate::logging::DEFAULT_FILTER;

/// Top-level HUD configuration.
#[derive(Debug, Clone)]
pub struct HudConfig {
    /// Number of update records reserved up front for the frame buffer.
    pub frame_capacity: usize,
    /// Filter directives handed to the log subscriber.
    pub log_filter: String,
    pub profiling: ProfilingMode,
}

impl Default for HudConfig {
    fn default() -> Self {
        HudConfig {
            frame_capacity: 256,
            log_filter: DEFAULT_FILTER.to_string(),
            profiling: ProfilingMode::Off,
        }
    }
}

impl HudConfig {
    pub fn with_frame_capacity(mut self, capacity: usize) -> Self {
        self.frame_capacity = capacity;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_profiling(mut self, profiling: ProfilingMode) -> Self {
        self.profiling = profiling;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfilingMode {
    /// Profiling scopes are not recorded
    #[default]
    Off,
    /// Scopes are recorded and can be read from the in-process profiler
    On,
    /// Scopes are recorded and served to external tools such as 'puffin_viewer'
    WithServer,
}
