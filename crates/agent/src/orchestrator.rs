//! The orchestration loop.
//!
//! One run cycles PLANNING → EXECUTING_STEPS → REFLECTING, revising the query
//! and starting over while the reflector is unhappy and the revision budget
//! lasts. An empty plan aborts the whole run on whichever attempt it shows up.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use swarmwright_config::OrchestratorConfig;
use swarmwright_core::{EventBus, Role, Roster, RunStatus, SwarmEvent};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::dispatch::{StepOutcome, dispatch_step};
use crate::extract::extract;
use crate::invoker::{RetryPolicy, RetryingInvoker};
use crate::plan::{Plan, ReflectionFeedback};

/// Returned when the planner yields no steps.
pub const ABORT_MESSAGE: &str = "Unable to generate execution plan.";

/// Default number of revision cycles after the first attempt.
pub const DEFAULT_MAX_SWARM_RETRIES: u32 = 2;

/// Fold a reflector's fix strategy and the rejected answer into the query
/// for the next attempt.
pub fn revision_query(fix_strategy: &str, context: &str) -> String {
    format!("\nImprove the following answer using this strategy:\n\n{fix_strategy}\n\nAnswer:\n{context}\n")
}

/// The result of one run, with how it ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwarmOutcome {
    pub run_id: String,
    pub answer: String,
    pub status: RunStatus,
    /// Outer attempts started, including the one that ended the run.
    pub attempts: usize,
}

/// Drives a [`Roster`] through plan → execute → reflect cycles.
pub struct Orchestrator {
    roster: Roster,
    invoker: RetryingInvoker,
    max_swarm_retries: u32,
    events: Option<Arc<EventBus>>,
}

impl Orchestrator {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            invoker: RetryingInvoker::default(),
            max_swarm_retries: DEFAULT_MAX_SWARM_RETRIES,
            events: None,
        }
    }

    /// Take retry counts and backoff from the `[orchestrator]` config section.
    pub fn from_config(roster: Roster, config: &OrchestratorConfig) -> Self {
        Self::new(roster)
            .with_retry_policy(RetryPolicy::from(config))
            .with_max_swarm_retries(config.max_swarm_retries)
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        let invoker = RetryingInvoker::new(policy);
        self.invoker = match &self.events {
            Some(bus) => invoker.with_event_bus(bus.clone()),
            None => invoker,
        };
        self
    }

    pub fn with_max_swarm_retries(mut self, retries: u32) -> Self {
        self.max_swarm_retries = retries;
        self
    }

    /// Publish run progress and failed calls on `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.invoker = self.invoker.with_event_bus(bus.clone());
        self.events = Some(bus);
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Total outer attempts allowed.
    pub fn max_attempts(&self) -> usize {
        self.max_swarm_retries as usize + 1
    }

    /// Run `query` to completion and return the answer text.
    ///
    /// Never fails: an empty plan yields [`ABORT_MESSAGE`] and an exhausted
    /// revision budget yields the last unvalidated context.
    pub async fn run(&self, query: &str) -> String {
        self.run_detailed(query).await.answer
    }

    /// Like [`run`](Self::run) but also reports the terminal status.
    pub async fn run_detailed(&self, query: &str) -> SwarmOutcome {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("swarm_run", run_id = %run_id);
        self.drive(run_id, query).instrument(span).await
    }

    async fn drive(&self, run_id: String, query: &str) -> SwarmOutcome {
        let max_attempts = self.max_attempts();
        let mut query = query.to_string();
        let mut context = String::new();

        for attempt in 1..=max_attempts {
            info!(attempt, max_attempts, "Swarm attempt starting");
            self.publish(SwarmEvent::AttemptStarted {
                run_id: run_id.clone(),
                attempt,
                timestamp: Utc::now(),
            });

            // PLANNING
            let raw_plan = self
                .invoker
                .invoke_with_retry(self.roster.planner.as_ref(), &query, Role::Planner.as_str())
                .await;
            let plan = Plan::from_mapping(&extract(&raw_plan, Plan::fallback_mapping()));
            self.publish(SwarmEvent::PlanReady {
                run_id: run_id.clone(),
                attempt,
                steps: plan.len(),
                timestamp: Utc::now(),
            });

            if plan.is_empty() {
                warn!(attempt, "Planner produced no steps, aborting run");
                return self.finish(run_id, ABORT_MESSAGE.to_string(), RunStatus::Aborted, attempt);
            }
            info!(attempt, steps = plan.len(), "Plan ready");

            // EXECUTING_STEPS
            context.clone_from(&query);
            for (i, step) in plan.steps.iter().enumerate() {
                let index = i + 1;
                let event = match dispatch_step(&self.roster, &self.invoker, step, index, &mut context).await {
                    StepOutcome::Completed(role) => SwarmEvent::StepCompleted {
                        run_id: run_id.clone(),
                        index,
                        role,
                        timestamp: Utc::now(),
                    },
                    StepOutcome::Skipped(reason) => SwarmEvent::StepSkipped {
                        run_id: run_id.clone(),
                        index,
                        reason: reason.to_string(),
                        timestamp: Utc::now(),
                    },
                };
                self.publish(event);
            }

            // REFLECTING
            let raw_feedback = self
                .invoker
                .invoke_with_retry(self.roster.reflector.as_ref(), &context, Role::Reflector.as_str())
                .await;
            let feedback =
                ReflectionFeedback::from_mapping(&extract(&raw_feedback, ReflectionFeedback::fallback_mapping()));
            self.publish(SwarmEvent::ReflectionVerdict {
                run_id: run_id.clone(),
                attempt,
                quality: feedback.quality.as_str().to_string(),
                fix_strategy: feedback.fix_strategy.clone(),
                timestamp: Utc::now(),
            });

            if feedback.is_good() {
                info!(attempt, "Reflection passed");
                return self.finish(run_id, context, RunStatus::Validated, attempt);
            }

            // REVISING
            warn!(
                attempt,
                quality = feedback.quality.as_str(),
                output = %context,
                fix_strategy = %feedback.fix_strategy,
                "Reflection rejected output, revising"
            );
            query = revision_query(&feedback.fix_strategy, &context);
        }

        warn!(attempts = max_attempts, "Revision budget exhausted, returning best-effort answer");
        self.finish(run_id, context, RunStatus::BestEffort, max_attempts)
    }

    fn finish(&self, run_id: String, answer: String, status: RunStatus, attempts: usize) -> SwarmOutcome {
        info!(?status, attempts, "Swarm run finished");
        self.publish(SwarmEvent::RunFinished {
            run_id: run_id.clone(),
            status,
            attempts,
            timestamp: Utc::now(),
        });
        SwarmOutcome {
            run_id,
            answer,
            status,
            attempts,
        }
    }

    fn publish(&self, event: SwarmEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}
