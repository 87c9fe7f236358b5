//! Collaborator fallback: ordered chain with per-entry timeouts.
//!
//! The orchestration loop has no timeout of its own. A role that needs one
//! wraps its collaborator in a chain here: each entry gets its own deadline,
//! and when an entry fails or times out the next one is tried.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use swarmwright_core::error::CollaboratorError;
use swarmwright_core::{Collaborator, CollaboratorResponse};
use tracing::{info, warn};

/// A collaborator that wraps an ordered list of collaborators and falls back on failure.
pub struct FallbackCollaborator {
    name: String,
    chain: Vec<FallbackEntry>,
}

/// A single entry in the fallback chain.
struct FallbackEntry {
    collaborator: Arc<dyn Collaborator>,
    timeout: Duration,
}

impl FallbackCollaborator {
    /// Create a new fallback chain with no entries.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain: Vec::new(),
        }
    }

    /// Add a collaborator to the chain with a custom timeout.
    pub fn add(mut self, collaborator: Arc<dyn Collaborator>, timeout: Duration) -> Self {
        self.chain.push(FallbackEntry {
            collaborator,
            timeout,
        });
        self
    }

    /// Add a collaborator with the default timeout (120s).
    pub fn add_default(self, collaborator: Arc<dyn Collaborator>) -> Self {
        self.add(collaborator, Duration::from_secs(120))
    }

    /// Number of collaborators in the chain.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

#[async_trait]
impl Collaborator for FallbackCollaborator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, input: &str) -> Result<CollaboratorResponse, CollaboratorError> {
        let mut last_error =
            CollaboratorError::NotConfigured(format!("No collaborators in fallback chain '{}'", self.name));

        for (i, entry) in self.chain.iter().enumerate() {
            let entry_name = entry.collaborator.name();

            info!(
                collaborator = %entry_name,
                position = i + 1,
                total = self.chain.len(),
                "Fallback: trying collaborator"
            );

            match tokio::time::timeout(entry.timeout, entry.collaborator.invoke(input)).await {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(e)) => {
                    warn!(
                        collaborator = %entry_name,
                        error = %e,
                        "Fallback: collaborator failed, trying next"
                    );
                    last_error = e;
                }
                Err(_) => {
                    warn!(
                        collaborator = %entry_name,
                        timeout_secs = entry.timeout.as_secs(),
                        "Fallback: collaborator timed out, trying next"
                    );
                    last_error = CollaboratorError::Timeout(format!(
                        "Collaborator '{}' timed out after {}s",
                        entry_name,
                        entry.timeout.as_secs()
                    ));
                }
            }
        }

        Err(last_error)
    }
}
