//! Collaborator trait: the single capability the orchestrator depends on.
//!
//! A collaborator accepts text and returns text. It may be an LLM endpoint
//! with a role-specific system prompt, a fallback chain of such endpoints,
//! or a scripted double in tests. The orchestrator never knows which.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// The successful result of one collaborator invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorResponse {
    /// The generated text.
    pub content: String,

    /// Which model actually answered, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl CollaboratorResponse {
    /// A response carrying only text content.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: None,
        }
    }
}

/// The core Collaborator trait.
///
/// Implementations must be shareable across runs: the orchestrator holds
/// them behind `Arc` and calls them strictly one at a time within a run,
/// but independent runs may use the same collaborator concurrently.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// A human-readable name used in logs (e.g. "openrouter/planner").
    fn name(&self) -> &str;

    /// Run the collaborator on `input`.
    async fn invoke(&self, input: &str) -> std::result::Result<CollaboratorResponse, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Collaborator for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke(&self, input: &str) -> std::result::Result<CollaboratorResponse, CollaboratorError> {
            Ok(CollaboratorResponse::text(input))
        }
    }

    #[tokio::test]
    async fn trait_object_invocation() {
        let collaborator: std::sync::Arc<dyn Collaborator> = std::sync::Arc::new(Echo);
        let response = collaborator.invoke("ping").await.unwrap();
        assert_eq!(response.content, "ping");
        assert!(response.model.is_none());
    }

    #[test]
    fn response_serialization_skips_missing_model() {
        let json = serde_json::to_string(&CollaboratorResponse::text("hi")).unwrap();
        assert_eq!(json, r#"{"content":"hi"}"#);
    }
}
