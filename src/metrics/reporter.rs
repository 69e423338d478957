//! Console reporter for metrics with real-time updates

use super::collector::MetricsCollector;
use std::io::{self, Write};
use tokio::time::{interval, Duration};

/// Start periodic metrics reporting (every N seconds)
pub async fn start_periodic_reporter(collector: MetricsCollector, interval_secs: u64) {
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        // Update system metrics before printing
        collector.update_system_metrics();

        print_live_metrics(&collector);
    }
}

/// Print live metrics (clears screen and updates in place)
pub fn print_live_metrics(collector: &MetricsCollector) {
    // Clear screen and move cursor to top
    print!("\x1B[2J\x1B[1;1H");

    let metrics = collector.get_snapshot();
    let elapsed = collector.elapsed_seconds();
    let req_latency = collector.get_request_latency_percentiles();
    let refresh_latency = collector.get_refresh_latency_percentiles();

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║            GlucoCare Load Test - Live Metrics                 ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    // Time elapsed
    println!(
        "\n⏱️  Elapsed Time: {:02}:{:02}:{:02}",
        elapsed / 3600,
        (elapsed % 3600) / 60,
        elapsed % 60
    );

    // Requests
    println!("\n┌─ REQUESTS ──────────────────────────────────────────────────┐");
    println!(
        "│  Started:      {:>8}    In-Flight:  {:>8}              │",
        metrics.request.started, metrics.request.in_flight
    );
    println!(
        "│  Completed:    {:>8}    Failed:     {:>8}              │",
        metrics.request.completed, metrics.request.failed
    );

    if elapsed > 0 {
        let throughput = metrics.request.completed as f64 / elapsed as f64;
        println!(
            "│  Throughput:   {:>7.2}/sec                                  │",
            throughput
        );
    }
    println!("└─────────────────────────────────────────────────────────────┘");

    // Request latencies
    if req_latency.count > 0 {
        println!("\n┌─ REQUEST LATENCY (ms) ──────────────────────────────────────┐");
        println!(
            "│  Min: {:>6}  P50: {:>6}  P95: {:>6}  P99: {:>6}  Max: {:>6}│",
            req_latency.min, req_latency.p50, req_latency.p95, req_latency.p99, req_latency.max
        );
        println!(
            "│  Mean: {:>8.2} ms    Count: {:>10}                    │",
            req_latency.mean, req_latency.count
        );
        println!("└─────────────────────────────────────────────────────────────┘");
    }

    // Checks
    if metrics.check.total() > 0 {
        println!("\n┌─ CHECKS (status is 200) ────────────────────────────────────┐");
        println!(
            "│  Passed:       {:>8}    Failed:     {:>8}              │",
            metrics.check.passed, metrics.check.failed
        );
        println!(
            "│  Success Rate: {:>7.2}%                                     │",
            metrics.check.success_rate()
        );
        println!("└─────────────────────────────────────────────────────────────┘");
    }

    // Token refreshes
    if metrics.refresh.started > 0 {
        println!("\n┌─ TOKEN REFRESH ─────────────────────────────────────────────┐");
        println!(
            "│  Attempted:    {:>8}                                      │",
            metrics.refresh.started
        );
        println!(
            "│  Succeeded:    {:>8}    Failed:     {:>8}              │",
            metrics.refresh.completed, metrics.refresh.failed
        );
        println!("└─────────────────────────────────────────────────────────────┘");

        // Refresh latencies
        if refresh_latency.count > 0 {
            println!("\n┌─ REFRESH LATENCY (ms) ──────────────────────────────────────┐");
            println!(
                "│  Min: {:>6}  P50: {:>6}  P95: {:>6}  P99: {:>6}  Max: {:>6}│",
                refresh_latency.min,
                refresh_latency.p50,
                refresh_latency.p95,
                refresh_latency.p99,
                refresh_latency.max
            );
            println!(
                "│  Mean: {:>8.2} ms    Count: {:>10}                    │",
                refresh_latency.mean, refresh_latency.count
            );
            println!("└─────────────────────────────────────────────────────────────┘");
        }
    }

    // System metrics
    println!("\n┌─ SYSTEM ────────────────────────────────────────────────────┐");
    println!(
        "│  CPU Usage:    {:>6.1}%    Memory: {:>6} / {:>6} MB       │",
        metrics.system.cpu_usage, metrics.system.memory_used_mb, metrics.system.memory_total_mb
    );
    println!("└─────────────────────────────────────────────────────────────┘");

    println!("\n  [Press Ctrl+C to abort the run]");

    // Flush stdout to ensure immediate display
    let _ = io::stdout().flush();
}

/// Print final summary report
pub fn print_final_report(collector: &MetricsCollector) {
    let metrics = collector.get_snapshot();
    let elapsed = collector.elapsed_seconds();
    let req_latency = collector.get_request_latency_percentiles();
    let refresh_latency = collector.get_refresh_latency_percentiles();

    println!("\n╔════════════════════════════════════════════════════════════════╗");
    println!("║                    FINAL TEST REPORT                           ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!("\n📊 REQUESTS");
    println!("   Total Started:        {:>10}", metrics.request.started);
    println!("   Total Completed:      {:>10}", metrics.request.completed);
    println!("   Total Failed:         {:>10}", metrics.request.failed);

    if elapsed > 0 {
        let throughput = metrics.request.completed as f64 / elapsed as f64;
        println!("   Throughput:           {:>10.2} requests/sec", throughput);
    }

    if req_latency.count > 0 {
        println!("\n📈 REQUEST LATENCY");
        println!("   Min:                  {:>10} ms", req_latency.min);
        println!("   P50 (Median):         {:>10} ms", req_latency.p50);
        println!("   P95:                  {:>10} ms", req_latency.p95);
        println!("   P99:                  {:>10} ms", req_latency.p99);
        println!("   Max:                  {:>10} ms", req_latency.max);
        println!("   Mean:                 {:>10.2} ms", req_latency.mean);
    }

    if metrics.check.total() > 0 {
        println!("\n✅ CHECKS (status is 200)");
        println!("   Passed:               {:>10}", metrics.check.passed);
        println!("   Failed:               {:>10}", metrics.check.failed);
        println!(
            "   Success Rate:         {:>10.2}%",
            metrics.check.success_rate()
        );
    }

    if metrics.refresh.started > 0 {
        println!("\n🔄 TOKEN REFRESH");
        println!("   Attempted:            {:>10}", metrics.refresh.started);
        println!("   Succeeded:            {:>10}", metrics.refresh.completed);
        println!("   Failed:               {:>10}", metrics.refresh.failed);

        if refresh_latency.count > 0 {
            println!("\n📈 REFRESH LATENCY");
            println!("   Min:                  {:>10} ms", refresh_latency.min);
            println!("   P50 (Median):         {:>10} ms", refresh_latency.p50);
            println!("   P95:                  {:>10} ms", refresh_latency.p95);
            println!("   P99:                  {:>10} ms", refresh_latency.p99);
            println!("   Max:                  {:>10} ms", refresh_latency.max);
            println!("   Mean:                 {:>10.2} ms", refresh_latency.mean);
        }
    }

    println!("\n⏱️  Test Duration: {:.2} seconds", elapsed);
    println!("════════════════════════════════════════════════════════════════\n");
}
