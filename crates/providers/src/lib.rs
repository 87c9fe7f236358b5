//! LLM-backed collaborators for Swarmwright.
//!
//! All collaborators implement the `swarmwright_core::Collaborator` trait.
//! The router turns configuration into a complete [`Roster`](swarmwright_core::Roster).

pub mod fallback;
pub mod openai_compat;
pub mod prompts;
pub mod router;

pub use fallback::FallbackCollaborator;
pub use openai_compat::ChatCollaborator;
pub use router::build_roster;
