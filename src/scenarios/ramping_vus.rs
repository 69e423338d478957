//! Ramping-VUs scenario - start VUs on a linear schedule, then hold

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::Instant;

use crate::api::client::ApiClient;
use crate::cli::{Cli, RampingVusArgs};
use crate::metrics::collector::MetricsCollector;
use crate::metrics::reporter;
use crate::scenarios::RunSummary;
use crate::vu::VirtualUser;

pub async fn run(cli: Cli, args: RampingVusArgs) -> Result<RunSummary> {
    tracing::info!("Starting ramping-vus scenario");

    let client = ApiClient::new(&cli.base_url, Duration::from_secs(cli.http_timeout))?;

    // Login once; every VU starts from the same token pair.
    let tokens = client
        .login(&cli.email, &cli.password)
        .await
        .context("setup login failed")?;
    tracing::info!("Setup login succeeded");

    // Setup metrics collector
    let collector = MetricsCollector::new();
    let collector_clone = collector.clone();
    let report_interval = cli.report_interval;

    // Start periodic metrics reporter
    let reporter_handle = tokio::spawn(async move {
        reporter::start_periodic_reporter(collector_clone, report_interval).await;
    });

    let ramp_up = args.ramp_up.min(cli.duration);
    tracing::info!(
        "Ramping to {} VUs over {}s, holding until {}s total",
        args.target_vus,
        ramp_up,
        cli.duration
    );

    let start_time = Instant::now();
    let deadline = start_time + Duration::from_secs(cli.duration);

    // Space VU starts evenly across the ramp-up window.
    let spacing = if args.target_vus > 0 && ramp_up > 0 {
        Duration::from_secs(ramp_up).div_f64(args.target_vus as f64)
    } else {
        Duration::ZERO
    };

    let mut vu_handles = Vec::new();

    for vu_id in 0..args.target_vus {
        let mut vu = VirtualUser::new(
            vu_id,
            client.clone(),
            tokens.clone(),
            cli.patient_id,
            Duration::from_millis(cli.think_time_ms),
            Duration::from_millis(cli.think_jitter_ms),
            collector.clone(),
        );

        let delay = spacing.mul_f64(vu_id as f64);

        vu_handles.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            vu.run_until(deadline).await;
        }));
    }

    // Wait for every VU to reach the deadline
    for (idx, handle) in vu_handles.into_iter().enumerate() {
        if let Err(e) = handle.await {
            tracing::error!("VU task {} panicked: {}", idx, e);
        }
    }

    tracing::info!("All VUs finished");

    reporter_handle.abort();

    // Print final report
    reporter::print_final_report(&collector);

    Ok(RunSummary::from_collector(&collector))
}
