//! Roster: the exhaustive role → collaborator table of one swarm.

use std::sync::Arc;

use crate::collaborator::Collaborator;
use crate::role::{Role, StepRole};

/// One collaborator per role. There is no way to build a roster with a
/// missing role, and no way to look up a role that does not exist.
#[derive(Clone)]
pub struct Roster {
    pub planner: Arc<dyn Collaborator>,
    pub researcher: Arc<dyn Collaborator>,
    pub summarizer: Arc<dyn Collaborator>,
    pub critic: Arc<dyn Collaborator>,
    pub reflector: Arc<dyn Collaborator>,
}

impl Roster {
    /// Build a roster by resolving every role in turn.
    pub fn try_from_fn<E>(
        mut resolve: impl FnMut(Role) -> Result<Arc<dyn Collaborator>, E>,
    ) -> Result<Self, E> {
        Ok(Self {
            planner: resolve(Role::Planner)?,
            researcher: resolve(Role::Researcher)?,
            summarizer: resolve(Role::Summarizer)?,
            critic: resolve(Role::Critic)?,
            reflector: resolve(Role::Reflector)?,
        })
    }

    pub fn get(&self, role: Role) -> &Arc<dyn Collaborator> {
        match role {
            Role::Planner => &self.planner,
            Role::Researcher => &self.researcher,
            Role::Summarizer => &self.summarizer,
            Role::Critic => &self.critic,
            Role::Reflector => &self.reflector,
        }
    }

    /// The collaborator a plan step dispatches to.
    pub fn for_step(&self, role: StepRole) -> &Arc<dyn Collaborator> {
        self.get(role.role())
    }
}

impl std::fmt::Debug for Roster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Roster")
            .field("planner", &self.planner.name())
            .field("researcher", &self.researcher.name())
            .field("summarizer", &self.summarizer.name())
            .field("critic", &self.critic.name())
            .field("reflector", &self.reflector.name())
            .finish()
    }
}
