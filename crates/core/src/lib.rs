//! # Swarmwright Core
//!
//! Domain types, traits, and error definitions shared by every Swarmwright crate.
//!
//! The orchestrator only ever sees a collaborator as `invoke(text) -> text`.
//! Everything that produces text (an LLM endpoint, a fallback chain, a test
//! double) implements [`Collaborator`] and is addressed through a closed
//! [`Role`] set.

pub mod collaborator;
pub mod error;
pub mod event;
pub mod role;
pub mod roster;

pub use collaborator::{Collaborator, CollaboratorResponse};
pub use error::{CollaboratorError, Error, Result};
pub use event::{EventBus, RunStatus, SwarmEvent};
pub use role::{Role, StepRole, UnknownRole};
pub use roster::Roster;
