//! The closed set of collaborator roles.
//!
//! Every collaborator in a swarm plays exactly one [`Role`]. Only the three
//! mid-pipeline roles can appear in a plan step, which is what [`StepRole`]
//! encodes: planner and reflector are driven by the orchestration loop itself
//! and are unreachable from planner output by construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A collaborator role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Turns a query into a plan of steps.
    Planner,
    /// Gathers information for a task.
    Researcher,
    /// Condenses the current context.
    Summarizer,
    /// Reviews and corrects the current context.
    Critic,
    /// Judges the final context and proposes a fix strategy.
    Reflector,
}

impl Role {
    /// All roles, in pipeline order.
    pub const ALL: [Role; 5] = [
        Role::Planner,
        Role::Researcher,
        Role::Summarizer,
        Role::Critic,
        Role::Reflector,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Planner => "planner",
            Role::Researcher => "researcher",
            Role::Summarizer => "summarizer",
            Role::Critic => "critic",
            Role::Reflector => "reflector",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// A role that a plan step may dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepRole {
    Researcher,
    Summarizer,
    Critic,
}

impl StepRole {
    pub const ALL: [StepRole; 3] = [StepRole::Researcher, StepRole::Summarizer, StepRole::Critic];

    /// The collaborator role this step routes to.
    pub fn role(self) -> Role {
        match self {
            StepRole::Researcher => Role::Researcher,
            StepRole::Summarizer => Role::Summarizer,
            StepRole::Critic => Role::Critic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.role().as_str()
    }
}

impl fmt::Display for StepRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepRole {
    type Err = UnknownRole;

    /// Exact, case-sensitive match on the role label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl TryFrom<Role> for StepRole {
    type Error = UnknownRole;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        match role {
            Role::Researcher => Ok(StepRole::Researcher),
            Role::Summarizer => Ok(StepRole::Summarizer),
            Role::Critic => Ok(StepRole::Critic),
            Role::Planner | Role::Reflector => Err(UnknownRole(role.as_str().to_string())),
        }
    }
}
