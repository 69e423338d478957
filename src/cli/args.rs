use clap::{Args, Parser, Subcommand};

/// GlucoCare API Load Testing Tool
#[derive(Parser, Debug)]
#[command(name = "load-test")]
#[command(about = "Load testing client for the GlucoCare HTTP API")]
#[command(version)]
pub struct Cli {
    /// Base URL of the target API
    #[arg(
        long,
        default_value = "http://localhost:8080",
        env = "GLUCOCARE_BASE_URL"
    )]
    pub base_url: String,

    /// Email used for the setup login
    #[arg(
        long,
        default_value = "loadtest@glucocare.dev",
        env = "GLUCOCARE_EMAIL"
    )]
    pub email: String,

    /// Password used for the setup login
    #[arg(long, default_value = "loadtest-password", env = "GLUCOCARE_PASSWORD")]
    pub password: String,

    /// Patient whose glucose histories are fetched
    #[arg(long, default_value = "1", env = "GLUCOCARE_PATIENT_ID")]
    pub patient_id: u64,

    /// Test duration in seconds
    #[arg(long, default_value = "60")]
    pub duration: u64,

    /// Metrics reporting interval in seconds
    #[arg(long, default_value = "5")]
    pub report_interval: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    pub http_timeout: u64,

    /// Pause between iterations in milliseconds
    #[arg(long, default_value = "1000")]
    pub think_time_ms: u64,

    /// Random extra pause added to each think time, in milliseconds
    #[arg(long, default_value = "0")]
    pub think_jitter_ms: u64,

    /// Minimum check success rate (percent) required for a zero exit status
    #[arg(long, default_value = "0.0")]
    pub min_success_rate: f64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub scenario: Scenario,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Scenario {
    /// Run one VU for a fixed number of iterations to validate the auth flow
    Smoke(SmokeArgs),

    /// Hold a fixed number of virtual users for the whole duration
    ConstantVus(ConstantVusArgs),

    /// Ramp virtual users up linearly, then hold until the duration elapses
    RampingVus(RampingVusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SmokeArgs {
    /// Iterations to run
    #[arg(long, default_value = "1")]
    pub iterations: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ConstantVusArgs {
    /// Number of concurrent virtual users
    #[arg(long, default_value = "50")]
    pub vus: usize,

    /// Load profile preset: smoke, baseline, stress
    /// (overrides --vus, --duration and --think-time-ms)
    #[arg(long)]
    pub profile: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RampingVusArgs {
    /// Virtual user count to reach after ramp-up
    #[arg(long)]
    pub target_vus: usize,

    /// Ramp-up window in seconds
    #[arg(long, default_value = "10")]
    pub ramp_up: u64,
}
