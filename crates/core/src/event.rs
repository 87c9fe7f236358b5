//! Swarm event system: an injected observability sink.
//!
//! The orchestration loop publishes an event at every state transition and
//! the retrying invoker publishes one per failed call. Consumers subscribe
//! without the orchestrator knowing who is listening.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::role::StepRole;

/// How an orchestration run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The reflector reported `good` quality.
    Validated,
    /// The revision budget ran out; the last context is returned unvalidated.
    BestEffort,
    /// The planner produced no steps.
    Aborted,
}

/// All events emitted while a swarm runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwarmEvent {
    /// A plan → execute → reflect cycle began.
    AttemptStarted {
        run_id: String,
        attempt: usize,
        timestamp: DateTime<Utc>,
    },

    /// The planner output was parsed.
    PlanReady {
        run_id: String,
        attempt: usize,
        steps: usize,
        timestamp: DateTime<Utc>,
    },

    /// A step replaced the context.
    StepCompleted {
        run_id: String,
        index: usize,
        role: StepRole,
        timestamp: DateTime<Utc>,
    },

    /// A step was skipped because its role is missing or unknown.
    StepSkipped {
        run_id: String,
        index: usize,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// One collaborator attempt failed.
    CallFailed {
        collaborator: String,
        attempt: usize,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// Every attempt failed; the input was passed through.
    CallExhausted {
        collaborator: String,
        attempts: usize,
        timestamp: DateTime<Utc>,
    },

    /// The reflector judged the context.
    ReflectionVerdict {
        run_id: String,
        attempt: usize,
        quality: String,
        fix_strategy: String,
        timestamp: DateTime<Utc>,
    },

    /// The run reached a terminal state.
    RunFinished {
        run_id: String,
        status: RunStatus,
        attempts: usize,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for swarm events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<SwarmEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: SwarmEvent) {
        // No subscribers is fine.
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<SwarmEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(SwarmEvent::StepCompleted {
            run_id: "run-1".into(),
            index: 1,
            role: StepRole::Researcher,
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            SwarmEvent::StepCompleted { index, role, .. } => {
                assert_eq!(*index, 1);
                assert_eq!(*role, StepRole::Researcher);
            }
            _ => panic!("Expected StepCompleted event"),
        }
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(SwarmEvent::CallExhausted {
            collaborator: "critic".into(),
            attempts: 3,
            timestamp: Utc::now(),
        });
    }

    #[test]
    fn run_finished_serializes_tagged() {
        let event = SwarmEvent::RunFinished {
            run_id: "r".into(),
            status: RunStatus::BestEffort,
            attempts: 3,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"run_finished""#));
        assert!(json.contains(r#""status":"best_effort""#));
    }
}
