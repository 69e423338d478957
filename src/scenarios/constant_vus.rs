//! Constant-VUs scenario - hold a fixed number of virtual users for the duration

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::Instant;

use crate::api::client::ApiClient;
use crate::cli::{Cli, ConstantVusArgs};
use crate::config::profiles::get_load_profile;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::reporter;
use crate::scenarios::RunSummary;
use crate::vu::VirtualUser;

/// A named profile overrides the individual shape flags; without one the
/// `--vus`, `--duration` and `--think-time-ms` values apply as given.
fn resolve_shape(cli: &Cli, args: &ConstantVusArgs) -> (usize, u64, u64) {
    match &args.profile {
        Some(name) => {
            let profile = get_load_profile(name);
            (profile.vus, profile.duration_secs, profile.think_time_ms)
        }
        None => (args.vus, cli.duration, cli.think_time_ms),
    }
}

pub async fn run(cli: Cli, args: ConstantVusArgs) -> Result<RunSummary> {
    tracing::info!("Starting constant-vus scenario");

    let (vus, duration_secs, think_time_ms) = resolve_shape(&cli, &args);
    if let Some(name) = &args.profile {
        tracing::info!("Using '{}' profile", name);
    }

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

    tracing::info!(
        "Holding {} VUs for {}s ({} ms think time)",
        vus,
        duration_secs,
        think_time_ms
    );

    let deadline = Instant::now() + Duration::from_secs(duration_secs);
    let mut vu_handles = Vec::new();

    for vu_id in 0..vus {
        let mut vu = VirtualUser::new(
            vu_id,
            client.clone(),
            tokens.clone(),
            cli.patient_id,
            Duration::from_millis(think_time_ms),
            Duration::from_millis(cli.think_jitter_ms),
            collector.clone(),
        );

        vu_handles.push(tokio::spawn(async move {
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
