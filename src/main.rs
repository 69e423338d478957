use anyhow::Result;
use clap::Parser;

use glucocare_load_test::cli::{Cli, Scenario};
use glucocare_load_test::scenarios;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // The effective test shape (VUs, duration, think time) is logged by the
    // scenario after profile resolution.
    tracing::info!("GlucoCare Load Test Client Starting...");
    tracing::info!("Base URL: {}", cli.base_url);
    tracing::info!("Patient: {}", cli.patient_id);

    let min_success_rate = cli.min_success_rate;

    // Run the selected scenario
    let summary = match cli.scenario.clone() {
        Scenario::Smoke(args) => {
            tracing::info!("Running Smoke scenario");
            tracing::info!("  Iterations: {}", args.iterations);
            scenarios::smoke::run(cli, args).await?
        }
        Scenario::ConstantVus(args) => {
            tracing::info!("Running Constant VUs scenario");
            match &args.profile {
                Some(profile) => tracing::info!("  Profile: {}", profile),
                None => tracing::info!("  VUs: {}", args.vus),
            }
            scenarios::constant_vus::run(cli, args).await?
        }
        Scenario::RampingVus(args) => {
            tracing::info!("Running Ramping VUs scenario");
            tracing::info!("  Target VUs: {}", args.target_vus);
            tracing::info!("  Ramp-Up: {}s", args.ramp_up);
            scenarios::ramping_vus::run(cli, args).await?
        }
    };

    tracing::info!("Load test complete");

    if summary.success_rate < min_success_rate {
        anyhow::bail!(
            "check success rate {:.2}% is below the required {:.2}% ({} passed / {} failed)",
            summary.success_rate,
            min_success_rate,
            summary.checks_passed,
            summary.checks_failed
        );
    }

    Ok(())
}
