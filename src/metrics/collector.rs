//! Metrics collector - thread-safe collection with latency tracking

use super::types::TestMetrics;
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

#[derive(Clone)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<TestMetrics>>,
    request_latencies: Arc<RwLock<Histogram<u64>>>,
    refresh_latencies: Arc<RwLock<Histogram<u64>>>,
    system: Arc<RwLock<System>>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        // Create histograms with 3 significant digits of precision
        let request_hist = Histogram::new(3).expect("Failed to create request histogram");
        let refresh_hist = Histogram::new(3).expect("Failed to create refresh histogram");

        // Initialize system monitor
        let system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        Self {
            metrics: Arc::new(RwLock::new(TestMetrics::default())),
            request_latencies: Arc::new(RwLock::new(request_hist)),
            refresh_latencies: Arc::new(RwLock::new(refresh_hist)),
            system: Arc::new(RwLock::new(system)),
            start_time: Instant::now(),
        }
    }

    pub fn request_started(&self) {
        let mut metrics = self.metrics.write();
        metrics.request.started += 1;
        metrics.request.in_flight += 1;
    }

    pub fn request_completed(&self, duration_ms: u64) {
        let mut metrics = self.metrics.write();
        metrics.request.completed += 1;
        metrics.request.in_flight = metrics.request.in_flight.saturating_sub(1);
        drop(metrics);

        // Record latency
        if let Some(mut hist) = self.request_latencies.try_write() {
            let _ = hist.record(duration_ms);
        }
    }

    pub fn request_failed(&self, duration_ms: u64) {
        let mut metrics = self.metrics.write();
        metrics.request.failed += 1;
        metrics.request.in_flight = metrics.request.in_flight.saturating_sub(1);
        drop(metrics);

        // Still record latency for failed requests
        if let Some(mut hist) = self.request_latencies.try_write() {
            let _ = hist.record(duration_ms);
        }
    }

    pub fn refresh_started(&self) {
        let mut metrics = self.metrics.write();
        metrics.refresh.started += 1;
    }

    pub fn refresh_completed(&self, duration_ms: u64) {
        let mut metrics = self.metrics.write();
        metrics.refresh.completed += 1;
        drop(metrics);

        // Record latency
        if let Some(mut hist) = self.refresh_latencies.try_write() {
            let _ = hist.record(duration_ms);
        }
    }

    pub fn refresh_failed(&self, duration_ms: u64) {
        let mut metrics = self.metrics.write();
        metrics.refresh.failed += 1;
        drop(metrics);

        // Still record latency for failed refreshes
        if let Some(mut hist) = self.refresh_latencies.try_write() {
            let _ = hist.record(duration_ms);
        }
    }

    pub fn check_passed(&self) {
        self.metrics.write().check.passed += 1;
    }

    pub fn check_failed(&self) {
        self.metrics.write().check.failed += 1;
    }

    /// Update system metrics (CPU, memory)
    pub fn update_system_metrics(&self) {
        let mut system = self.system.write();
        system.refresh_cpu_all();
        system.refresh_memory();

        let mut metrics = self.metrics.write();

        // Get global CPU usage
        metrics.system.cpu_usage = system.global_cpu_usage();

        // Get memory usage
        metrics.system.memory_used_mb = system.used_memory() / 1024 / 1024;
        metrics.system.memory_total_mb = system.total_memory() / 1024 / 1024;
    }

    pub fn get_snapshot(&self) -> TestMetrics {
        self.metrics.read().clone()
    }

    pub fn get_request_latency_percentiles(&self) -> LatencyStats {
        let hist = self.request_latencies.read();
        LatencyStats {
            min: hist.min(),
            p50: hist.value_at_quantile(0.50),
            p95: hist.value_at_quantile(0.95),
            p99: hist.value_at_quantile(0.99),
            max: hist.max(),
            mean: hist.mean(),
            count: hist.len(),
        }
    }

    pub fn get_refresh_latency_percentiles(&self) -> LatencyStats {
        let hist = self.refresh_latencies.read();
        LatencyStats {
            min: hist.min(),
            p50: hist.value_at_quantile(0.50),
            p95: hist.value_at_quantile(0.95),
            p99: hist.value_at_quantile(0.99),
            max: hist.max(),
            mean: hist.mean(),
            count: hist.len(),
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct LatencyStats {
    pub min: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
    pub mean: f64,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_request_outcomes_and_latencies() {
        let collector = MetricsCollector::new();

        collector.request_started();
        collector.request_started();
        collector.request_completed(12);
        collector.request_failed(40);

        let snapshot = collector.get_snapshot();
        assert_eq!(snapshot.request.started, 2);
        assert_eq!(snapshot.request.completed, 1);
        assert_eq!(snapshot.request.failed, 1);
        assert_eq!(snapshot.request.in_flight, 0);

        let stats = collector.get_request_latency_percentiles();
        assert_eq!(stats.count, 2);
        assert!(stats.min <= 12);
        assert!(stats.max >= 40);
    }

    #[test]
    fn records_refresh_and_check_outcomes() {
        let collector = MetricsCollector::new();

        collector.refresh_started();
        collector.refresh_completed(8);
        collector.check_passed();
        collector.check_passed();
        collector.check_failed();

        let snapshot = collector.get_snapshot();
        assert_eq!(snapshot.refresh.started, 1);
        assert_eq!(snapshot.refresh.completed, 1);
        assert_eq!(snapshot.refresh.failed, 0);
        assert_eq!(snapshot.check.passed, 2);
        assert_eq!(snapshot.check.failed, 1);
    }

    #[test]
    fn in_flight_never_underflows() {
        let collector = MetricsCollector::new();
        collector.request_completed(5);

        let snapshot = collector.get_snapshot();
        assert_eq!(snapshot.request.in_flight, 0);
    }
}
