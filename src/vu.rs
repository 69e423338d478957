//! Per-virtual-user iteration loop

use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;
use tokio::time::Instant;

use crate::api::client::ApiClient;
use crate::api::types::TokenPair;
use crate::metrics::collector::MetricsCollector;

/// One simulated client. Holds its own copy of the token pair, seeded from
/// the shared setup login; tokens are never shared across VUs.
pub struct VirtualUser {
    id: usize,
    client: ApiClient,
    tokens: TokenPair,
    patient_id: u64,
    think_time: Duration,
    think_jitter: Duration,
    collector: MetricsCollector,
}

impl VirtualUser {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        client: ApiClient,
        tokens: TokenPair,
        patient_id: u64,
        think_time: Duration,
        think_jitter: Duration,
        collector: MetricsCollector,
    ) -> Self {
        Self {
            id,
            client,
            tokens,
            patient_id,
            think_time,
            think_jitter,
            collector,
        }
    }

    /// One fetch/check cycle: GET the resource, refresh-and-retry exactly
    /// once on 401/403, then record the status assertion.
    pub async fn run_iteration(&mut self) {
        let mut status = match self.timed_fetch().await {
            Some(status) => status,
            None => {
                self.collector.check_failed();
                return;
            }
        };

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::debug!("VU {}: got {}, attempting token refresh", self.id, status);

            if self.refresh_tokens().await {
                status = match self.timed_fetch().await {
                    Some(status) => status,
                    None => {
                        self.collector.check_failed();
                        return;
                    }
                };
            }
            // A failed refresh falls through; the check below records the
            // original 401/403 as a failure.
        }

        if status == StatusCode::OK {
            self.collector.check_passed();
        } else {
            tracing::warn!(
                "VU {}: glucose-histories returned {} after retry handling",
                self.id,
                status
            );
            self.collector.check_failed();
        }
    }

    /// Loop iterations until `deadline`, pausing between them.
    pub async fn run_until(&mut self, deadline: Instant) {
        while Instant::now() < deadline {
            self.run_iteration().await;

            let pause = self.think_pause();
            if Instant::now() + pause >= deadline {
                break;
            }
            tokio::time::sleep(pause).await;
        }
    }

    /// Issue one authenticated GET, recording request counters and latency.
    /// Returns None on transport failure.
    async fn timed_fetch(&self) -> Option<StatusCode> {
        self.collector.request_started();
        let start = Instant::now();

        match self
            .client
            .fetch_glucose_histories(self.patient_id, &self.tokens.access_token)
            .await
        {
            Ok(status) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                self.collector.request_completed(duration_ms);
                Some(status)
            }
            Err(e) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                tracing::error!("VU {}: glucose-histories request failed: {}", self.id, e);
                self.collector.request_failed(duration_ms);
                None
            }
        }
    }

    /// Exchange the held refresh token for a new pair. Returns whether the
    /// VU's tokens were replaced.
    async fn refresh_tokens(&mut self) -> bool {
        self.collector.refresh_started();
        let start = Instant::now();

        match self.client.refresh(&self.tokens).await {
            Ok(pair) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                self.collector.refresh_completed(duration_ms);
                self.tokens = pair;
                true
            }
            Err(e) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                tracing::error!("VU {}: token refresh failed: {}", self.id, e);
                self.collector.refresh_failed(duration_ms);
                false
            }
        }
    }

    fn think_pause(&self) -> Duration {
        if self.think_jitter.is_zero() {
            return self.think_time;
        }

        let jitter_ms = rand::thread_rng().gen_range(0..=self.think_jitter.as_millis() as u64);
        self.think_time + Duration::from_millis(jitter_ms)
    }
}
