//! Retrying invoker: bounded retry with linear backoff and passthrough.
//!
//! One logical call becomes up to `retries + 1` attempts. After failed
//! attempt `i` (0-based) the invoker sleeps `backoff_base * (i + 1)`, except
//! after the last attempt. If every attempt fails, the caller gets its own
//! input back: a stalled collaborator leaves the pipeline's text untouched
//! instead of breaking the run.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use swarmwright_config::OrchestratorConfig;
use swarmwright_core::{Collaborator, EventBus, SwarmEvent};
use tracing::{info, warn};

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first.
    pub retries: u32,
    /// Unit of the linear backoff.
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff_base: Duration) -> Self {
        Self {
            retries,
            backoff_base,
        }
    }

    /// Total attempts allowed for one call.
    pub fn max_attempts(&self) -> usize {
        self.retries as usize + 1
    }

    /// Delay after failed attempt `attempt_index` (0-based).
    pub fn backoff(&self, attempt_index: usize) -> Duration {
        self.backoff_base * (attempt_index as u32 + 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(1500))
    }
}

impl From<&OrchestratorConfig> for RetryPolicy {
    fn from(config: &OrchestratorConfig) -> Self {
        Self::new(config.call_retries, config.backoff_base())
    }
}

/// Wraps collaborator calls in a [`RetryPolicy`].
#[derive(Clone, Default)]
pub struct RetryingInvoker {
    policy: RetryPolicy,
    events: Option<Arc<EventBus>>,
}

impl RetryingInvoker {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            events: None,
        }
    }

    /// Publish failed attempts on `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Invoke `collaborator` on `input`, returning its content on success or
    /// `input` unchanged once every attempt has failed. Never fails.
    pub async fn invoke_with_retry(&self, collaborator: &dyn Collaborator, input: &str, name: &str) -> String {
        let max_attempts = self.policy.max_attempts();

        for attempt_index in 0..max_attempts {
            let attempt = attempt_index + 1;
            info!(collaborator = %name, attempt, max_attempts, "Invoking collaborator");

            match collaborator.invoke(input).await {
                Ok(response) => return response.content,
                Err(e) => {
                    warn!(collaborator = %name, attempt, error = %e, "Collaborator call failed");
                    self.publish(SwarmEvent::CallFailed {
                        collaborator: name.to_string(),
                        attempt,
                        error: e.to_string(),
                        timestamp: Utc::now(),
                    });

                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.backoff(attempt_index)).await;
                    }
                }
            }
        }

        warn!(
            collaborator = %name,
            attempts = max_attempts,
            "Collaborator permanently failed, passing input through"
        );
        self.publish(SwarmEvent::CallExhausted {
            collaborator: name.to_string(),
            attempts: max_attempts,
            timestamp: Utc::now(),
        });
        input.to_string()
    }

    fn publish(&self, event: SwarmEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use swarmwright_core::CollaboratorError;

    fn network_error() -> CollaboratorError {
        CollaboratorError::Network("connection reset".into())
    }

    #[test]
    fn backoff_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.backoff(0), Duration::from_millis(1500));
        assert_eq!(policy.backoff(1), Duration::from_millis(3000));
        assert_eq!(policy.backoff(2), Duration::from_millis(4500));
    }

    #[test]
    fn policy_from_config() {
        let config = OrchestratorConfig {
            call_retries: 4,
            backoff_base_ms: 10,
            ..OrchestratorConfig::default()
        };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.backoff(1), Duration::from_millis(20));
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_first_attempt() {
        let collaborator = ScriptedCollaborator::new("researcher", vec![Ok("facts".into())]);
        let invoker = RetryingInvoker::default();

        let out = invoker.invoke_with_retry(&collaborator, "task", "researcher").await;
        assert_eq!(out, "facts");
        assert_eq!(collaborator.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn k_failures_then_success_makes_k_plus_one_attempts() {
        for k in 0..=2usize {
            let mut script: Vec<Outcome> = (0..k).map(|_| Err(network_error())).collect();
            script.push(Ok("recovered".into()));
            let collaborator = ScriptedCollaborator::new("critic", script);

            let out = RetryingInvoker::default()
                .invoke_with_retry(&collaborator, "draft", "critic")
                .await;

            assert_eq!(out, "recovered");
            assert_eq!(collaborator.calls(), k + 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_returns_input_unchanged() {
        let collaborator = ScriptedCollaborator::always_failing("summarizer", network_error());
        let invoker = RetryingInvoker::default();

        let out = invoker.invoke_with_retry(&collaborator, "original draft", "summarizer").await;
        assert_eq!(out, "original draft");
        assert_eq!(collaborator.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_single_attempt() {
        let collaborator = ScriptedCollaborator::always_failing("planner", network_error());
        let invoker = RetryingInvoker::new(RetryPolicy::new(0, Duration::from_secs(1)));

        let out = invoker.invoke_with_retry(&collaborator, "query", "planner").await;
        assert_eq!(out, "query");
        assert_eq!(collaborator.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_between_attempts_but_not_after_last() {
        let collaborator = ScriptedCollaborator::always_failing("researcher", network_error());
        let invoker = RetryingInvoker::default();

        let started = tokio::time::Instant::now();
        invoker.invoke_with_retry(&collaborator, "task", "researcher").await;

        // 1.5s after the first failure, 3s after the second, none after the third.
        assert_eq!(started.elapsed(), Duration::from_millis(4500));
    }

    #[tokio::test(start_paused = true)]
    async fn every_error_kind_is_retried() {
        let collaborator = ScriptedCollaborator::new(
            "planner",
            vec![
                Err(CollaboratorError::AuthenticationFailed("bad key".into())),
                Err(CollaboratorError::InvalidResponse("garbage".into())),
                Ok("plan".into()),
            ],
        );

        let out = RetryingInvoker::default()
            .invoke_with_retry(&collaborator, "query", "planner")
            .await;
        assert_eq!(out, "plan");
        assert_eq!(collaborator.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_published() {
        let bus = Arc::new(EventBus::new(16));
        let mut rx = bus.subscribe();
        let collaborator = ScriptedCollaborator::always_failing("critic", network_error());
        let invoker = RetryingInvoker::new(RetryPolicy::new(1, Duration::from_millis(10))).with_event_bus(bus);

        invoker.invoke_with_retry(&collaborator, "draft", "critic").await;

        let mut failed = 0;
        let mut exhausted = 0;
        while let Ok(event) = rx.try_recv() {
            match event.as_ref() {
                SwarmEvent::CallFailed { collaborator, .. } => {
                    assert_eq!(collaborator, "critic");
                    failed += 1;
                }
                SwarmEvent::CallExhausted { attempts, .. } => {
                    assert_eq!(*attempts, 2);
                    exhausted += 1;
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert_eq!(failed, 2);
        assert_eq!(exhausted, 1);
    }
}
