//! Step dispatch: routes one plan step to its collaborator.

use swarmwright_core::{Roster, StepRole};
use tracing::{info, warn};

use crate::invoker::RetryingInvoker;
use crate::plan::{SkipReason, Step};

/// What happened to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The collaborator ran and its output replaced the context.
    Completed(StepRole),
    /// No collaborator was called and the context is unchanged.
    Skipped(SkipReason),
}

/// Run `step` against `context`. `index` is 1-based and only used in logs.
///
/// On dispatch the step's task (or the context itself when the task is
/// absent) goes through the retrying invoker and the result replaces
/// `context`.
pub async fn dispatch_step(
    roster: &Roster,
    invoker: &RetryingInvoker,
    step: &Step,
    index: usize,
    context: &mut String,
) -> StepOutcome {
    let role = match step.dispatch_role() {
        Ok(role) => role,
        Err(reason) => {
            warn!(step = index, %reason, "Skipping step");
            return StepOutcome::Skipped(reason);
        }
    };

    info!(step = index, role = %role, "Step executing");

    let collaborator = roster.for_step(role);
    let output = invoker
        .invoke_with_retry(collaborator.as_ref(), step.input(context.as_str()), role.as_str())
        .await;
    *context = output;

    StepOutcome::Completed(role)
}
