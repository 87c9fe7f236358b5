//! Plan and reflection types parsed from collaborator output.
//!
//! Both are read from an already-extracted [`Mapping`], so a malformed
//! reply has been replaced by its fallback before it gets here. Parsing
//! from a mapping is total: a missing or mistyped field degrades to the
//! empty plan, a skipped step, or unknown quality.

use serde_json::{Value, json};
use std::fmt;
use swarmwright_core::StepRole;

use crate::extract::Mapping;

/// One unit of work from the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The `agent` label as written by the planner.
    pub role: Option<String>,
    /// Input for the step; `None` means "use the current context".
    pub task: Option<String>,
}

/// Why a step did not dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingRole,
    UnknownRole(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingRole => f.write_str("step has no agent"),
            SkipReason::UnknownRole(label) => write!(f, "unknown agent '{label}'"),
        }
    }
}

impl Step {
    pub fn new(role: impl Into<String>, task: Option<&str>) -> Self {
        Self {
            role: Some(role.into()),
            task: task.map(str::to_string),
        }
    }

    /// Read one element of the planner's `steps` array.
    ///
    /// Non-string tasks are kept as their compact JSON text; `null` counts
    /// as absent.
    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self {
                role: None,
                task: None,
            };
        };

        let role = obj.get("agent").and_then(Value::as_str).map(str::to_string);
        let task = match obj.get("task") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        Self { role, task }
    }

    /// Resolve the role label against the closed dispatch set.
    pub fn dispatch_role(&self) -> Result<StepRole, SkipReason> {
        match self.role.as_deref() {
            None | Some("") => Err(SkipReason::MissingRole),
            Some(label) => label
                .parse::<StepRole>()
                .map_err(|_| SkipReason::UnknownRole(label.to_string())),
        }
    }

    /// The text this step runs on.
    pub fn input<'a>(&'a self, context: &'a str) -> &'a str {
        self.task.as_deref().unwrap_or(context)
    }
}

/// Ordered steps produced by the planner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub steps: Vec<Step>,
}

impl Plan {
    /// Fallback used when planner output cannot be parsed: `{"steps": []}`.
    pub fn fallback_mapping() -> Mapping {
        let mut map = Mapping::new();
        map.insert("steps".into(), json!([]));
        map
    }

    /// Read `steps` from an extracted mapping. Anything other than an array
    /// yields the empty plan.
    pub fn from_mapping(map: &Mapping) -> Self {
        let steps = map
            .get("steps")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Step::from_value).collect())
            .unwrap_or_default();
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// The reflector's grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Good,
    Weak,
    Unknown,
}

impl Quality {
    /// Only the exact label `good` passes the gate.
    fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("good") => Quality::Good,
            Some("weak") => Quality::Weak,
            _ => Quality::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Good => "good",
            Quality::Weak => "weak",
            Quality::Unknown => "unknown",
        }
    }
}

/// The reflector's verdict on a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionFeedback {
    pub quality: Quality,
    pub fix_strategy: String,
}

impl ReflectionFeedback {
    /// Fallback used when reflector output cannot be parsed.
    pub fn fallback_mapping() -> Mapping {
        let mut map = Mapping::new();
        map.insert("quality".into(), json!("unknown"));
        map.insert("fix_strategy".into(), json!(""));
        map
    }

    pub fn from_mapping(map: &Mapping) -> Self {
        Self {
            quality: Quality::from_label(map.get("quality").and_then(Value::as_str)),
            fix_strategy: map
                .get("fix_strategy")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn is_good(&self) -> bool {
        self.quality == Quality::Good
    }
}
