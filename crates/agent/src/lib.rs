//! The swarm orchestration loop at the heart of Swarmwright.
//!
//! A run follows a **Plan → Execute → Reflect** cycle:
//!
//! 1. **Plan**: the planner turns the query into ordered steps
//! 2. **Execute**: each step is dispatched to the researcher, summarizer or
//!    critic, threading one context string through the pipeline
//! 3. **Reflect**: the reflector grades the context
//! 4. **Revise**: a weak grade folds the fix strategy into a new query and
//!    the cycle restarts, until the revision budget runs out
//!
//! Every collaborator call goes through a bounded retry with linear backoff
//! and degrades to passing its input through. Planner and reflector output
//! is parsed best-effort. The public entry point never fails.

pub mod dispatch;
pub mod extract;
pub mod invoker;
pub mod orchestrator;
pub mod plan;

pub use dispatch::{StepOutcome, dispatch_step};
pub use extract::{Mapping, extract};
pub use invoker::{RetryPolicy, RetryingInvoker};
pub use orchestrator::{ABORT_MESSAGE, Orchestrator, SwarmOutcome, revision_query};
pub use plan::{Plan, Quality, ReflectionFeedback, SkipReason, Step};

#[cfg(test)]
pub(crate) mod test_helpers;
