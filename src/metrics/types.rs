//! Metric types

/// Counters for the authenticated GET requests issued by virtual users.
#[derive(Debug, Clone, Default)]
pub struct RequestMetrics {
    pub started: usize,
    pub completed: usize,
    pub failed: usize,
    pub in_flight: usize,
}

/// Counters for reactive token refresh attempts.
#[derive(Debug, Clone, Default)]
pub struct RefreshMetrics {
    pub started: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Pass/fail totals for the per-iteration status assertion.
#[derive(Debug, Clone, Default)]
pub struct CheckMetrics {
    pub passed: usize,
    pub failed: usize,
}

impl CheckMetrics {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Success rate in percent. A run with no checks counts as fully
    /// successful so it never trips the exit-status gate on its own.
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 100.0;
        }
        (self.passed as f64 / self.total() as f64) * 100.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct SystemMetrics {
    pub cpu_usage: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TestMetrics {
    pub request: RequestMetrics,
    pub refresh: RefreshMetrics,
    pub check: CheckMetrics,
    pub system: SystemMetrics,
}
