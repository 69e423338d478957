//! Named load profiles for the constant-vus scenario

/// Test shape applied when a profile is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProfile {
    pub vus: usize,
    pub duration_secs: u64,
    pub think_time_ms: u64,
}

/// Get a load profile by name
pub fn get_load_profile(profile: &str) -> LoadProfile {
    match profile {
        "smoke" => smoke_profile(),
        "baseline" => baseline_profile(),
        "stress" => stress_profile(),
        _ => {
            eprintln!("Unknown profile '{}', using 'baseline' profile", profile);
            baseline_profile()
        }
    }
}

/// Baseline profile for routine soak runs
///
/// Matches the standing test shape for the glucose-histories endpoint:
/// - 50 concurrent virtual users
/// - 60 second duration
/// - 1 second think time between iterations
pub fn baseline_profile() -> LoadProfile {
    LoadProfile {
        vus: 50,
        duration_secs: 60,
        think_time_ms: 1000,
    }
}

/// Smoke profile for pre-run validation
///
/// A single VU for a few seconds, enough to confirm the login, fetch and
/// refresh paths work before committing to a longer run.
pub fn smoke_profile() -> LoadProfile {
    LoadProfile {
        vus: 1,
        duration_secs: 10,
        think_time_ms: 1000,
    }
}

/// Stress profile for capacity probing
///
/// Pushes well past the baseline:
/// - 200 concurrent virtual users
/// - 5 minute duration
/// - 200 ms think time
pub fn stress_profile() -> LoadProfile {
    LoadProfile {
        vus: 200,
        duration_secs: 300,
        think_time_ms: 200,
    }
}
