// Scenarios module
// Contains load test scenario implementations

pub mod constant_vus;
pub mod ramping_vus;
pub mod smoke;

use crate::metrics::collector::MetricsCollector;

/// Outcome of a scenario run, used by main for the exit-status gate.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub checks_passed: usize,
    pub checks_failed: usize,
    pub success_rate: f64,
}

impl RunSummary {
    pub fn from_collector(collector: &MetricsCollector) -> Self {
        let snapshot = collector.get_snapshot();
        Self {
            checks_passed: snapshot.check.passed,
            checks_failed: snapshot.check.failed,
            success_rate: snapshot.check.success_rate(),
        }
    }
}
