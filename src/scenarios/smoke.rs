//! Smoke scenario - one VU, a handful of iterations, validates the auth flow

use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::client::ApiClient;
use crate::cli::{Cli, SmokeArgs};
use crate::metrics::collector::MetricsCollector;
use crate::metrics::reporter;
use crate::scenarios::RunSummary;
use crate::vu::VirtualUser;

pub async fn run(cli: Cli, args: SmokeArgs) -> Result<RunSummary> {
    tracing::info!("Starting smoke scenario");

    let client = ApiClient::new(&cli.base_url, Duration::from_secs(cli.http_timeout))?;

    let tokens = client
        .login(&cli.email, &cli.password)
        .await
        .context("setup login failed")?;
    tracing::info!("Setup login succeeded");

    let collector = MetricsCollector::new();
    let think_time = Duration::from_millis(cli.think_time_ms);

    let mut vu = VirtualUser::new(
        0,
        client,
        tokens,
        cli.patient_id,
        think_time,
        Duration::from_millis(cli.think_jitter_ms),
        collector.clone(),
    );

    for i in 0..args.iterations {
        vu.run_iteration().await;

        if i + 1 < args.iterations {
            tokio::time::sleep(think_time).await;
        }
    }

    reporter::print_final_report(&collector);

    Ok(RunSummary::from_collector(&collector))
}
