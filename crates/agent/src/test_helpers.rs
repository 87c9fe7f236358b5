//! Shared test helpers for orchestration tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use swarmwright_core::{Collaborator, CollaboratorError, CollaboratorResponse, Roster};

/// One scripted reply.
pub type Outcome = Result<String, CollaboratorError>;

/// A collaborator that replays a script of outcomes and records its inputs.
///
/// Once the script runs out the last outcome repeats. Panics if the script
/// is empty.
pub struct ScriptedCollaborator {
    name: String,
    script: Vec<Outcome>,
    inputs: Mutex<Vec<String>>,
}

impl ScriptedCollaborator {
    pub fn new(name: &str, script: Vec<Outcome>) -> Self {
        assert!(!script.is_empty(), "ScriptedCollaborator '{name}' needs at least one outcome");
        Self {
            name: name.to_string(),
            script,
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `text` on every call.
    pub fn always(name: &str, text: &str) -> Self {
        Self::new(name, vec![Ok(text.to_string())])
    }

    /// Fail with `error` on every call.
    pub fn always_failing(name: &str, error: CollaboratorError) -> Self {
        Self::new(name, vec![Err(error)])
    }

    pub fn calls(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Collaborator for ScriptedCollaborator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, input: &str) -> Result<CollaboratorResponse, CollaboratorError> {
        let mut inputs = self.inputs.lock().unwrap();
        let index = inputs.len().min(self.script.len() - 1);
        inputs.push(input.to_string());
        self.script[index].clone().map(CollaboratorResponse::text)
    }
}

/// Handles to every scripted collaborator of a roster.
pub struct ScriptedSwarm {
    pub planner: Arc<ScriptedCollaborator>,
    pub researcher: Arc<ScriptedCollaborator>,
    pub summarizer: Arc<ScriptedCollaborator>,
    pub critic: Arc<ScriptedCollaborator>,
    pub reflector: Arc<ScriptedCollaborator>,
}

impl ScriptedSwarm {
    /// Planner and reflector scripted; mid-pipeline roles answer with a tag
    /// naming themselves.
    pub fn new(planner: Vec<Outcome>, reflector: Vec<Outcome>) -> Self {
        Self {
            planner: Arc::new(ScriptedCollaborator::new("planner", planner)),
            researcher: Arc::new(ScriptedCollaborator::always("researcher", "researched")),
            summarizer: Arc::new(ScriptedCollaborator::always("summarizer", "summarized")),
            critic: Arc::new(ScriptedCollaborator::always("critic", "critiqued")),
            reflector: Arc::new(ScriptedCollaborator::new("reflector", reflector)),
        }
    }

    pub fn roster(&self) -> Roster {
        Roster {
            planner: self.planner.clone(),
            researcher: self.researcher.clone(),
            summarizer: self.summarizer.clone(),
            critic: self.critic.clone(),
            reflector: self.reflector.clone(),
        }
    }

    /// Calls made to researcher, summarizer and critic combined.
    pub fn step_calls(&self) -> usize {
        self.researcher.calls() + self.summarizer.calls() + self.critic.calls()
    }
}

/// Planner reply containing `steps`.
pub fn plan_json(steps: &str) -> Outcome {
    Ok(format!(r#"{{"steps": {steps}}}"#))
}

pub fn good() -> Outcome {
    Ok(r#"{"quality": "good", "fix_strategy": ""}"#.to_string())
}

pub fn weak(fix: &str) -> Outcome {
    Ok(format!(r#"{{"quality": "weak", "fix_strategy": "{fix}"}}"#))
}
