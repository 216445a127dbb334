//! Flow graph: steps, the edges between them, and the canvas state that owns
//! both.
//!
//! `FlowGraph` is the caller-owned state the drag-drop handlers commit into.
//! Every committing setter bumps `revision` by exactly one, which is how
//! callers (and tests) detect that a drop produced a new state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::component::Component;

/// Canvas coordinate of a step's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rendered size of a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Backend executor attached to a `TASK_EXECUTION` step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Executor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Static inputs the executor is configured with.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputDefinition>,
}

/// An input collected by a prompt or passed to an executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDefinition {
    /// Id of the input component.
    #[serde(rename = "ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Attribute the input binds to (`username`, `password`, ...).
    pub identifier: String,
    #[serde(default)]
    pub required: bool,
}

/// Runs a step only when context `key` equals `value`; otherwise the flow
/// jumps to `on_skip`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub key: String,
    pub value: String,
    pub on_skip: String,
}

/// A node of the flow graph owning a component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    /// `START`, `PROMPT`, `TASK_EXECUTION` or `END`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<Executor>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Step {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position: Position::default(),
            size: None,
            components: Vec::new(),
            executor: None,
            properties: Map::new(),
            condition: None,
        }
    }

    #[must_use]
    pub fn with_components(mut self, components: Vec<Component>) -> Self {
        self.components = components;
        self
    }

    #[must_use]
    pub fn with_executor(mut self, name: impl Into<String>) -> Self {
        self.executor = Some(Executor { name: name.into(), mode: None, inputs: Vec::new() });
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// Directed connection between two steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Which outlet of the source fired: an action component id, `success` or `failure`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
}

impl Edge {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, source_handle: Option<&str>) -> Self {
        let source = source.into();
        let target = target.into();
        let id = match source_handle {
            Some(handle) => format!("{source}:{handle}->{target}"),
            None => format!("{source}->{target}"),
        };
        Self { id, source, target, source_handle: source_handle.map(str::to_owned) }
    }
}

/// Executor-to-connection catalog describing which identity provider
/// connections each executor may use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowMetadata {
    #[serde(default)]
    pub executor_connections: Vec<ExecutorConnections>,
}

impl FlowMetadata {
    /// Whether any executor lists at least one connection.
    #[must_use]
    pub fn has_executor_connections(&self) -> bool {
        self.executor_connections
            .iter()
            .any(|entry| !entry.connections.is_empty())
    }

    /// Connections offered to `executor`, empty when it is not listed.
    #[must_use]
    pub fn connections_for(&self, executor: &str) -> &[String] {
        self.executor_connections
            .iter()
            .find(|entry| entry.executor == executor)
            .map(|entry| entry.connections.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConnections {
    pub executor: String,
    #[serde(default)]
    pub connections: Vec<String>,
}

// =============================================================================
// FLOW GRAPH
// =============================================================================

/// In-memory canvas state: all steps and edges of one flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    #[serde(default)]
    steps: Vec<Step>,
    #[serde(default)]
    edges: Vec<Edge>,
    #[serde(skip)]
    revision: u64,
}

impl FlowGraph {
    #[must_use]
    pub fn new(steps: Vec<Step>, edges: Vec<Edge>) -> Self {
        Self { steps, edges, revision: 0 }
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of commits applied since construction.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// Component tree of step `id`.
    #[must_use]
    pub fn step_components(&self, id: &str) -> Option<&[Component]> {
        self.step(id).map(|step| step.components.as_slice())
    }

    /// State setter: replace the component list of step `id`. Returns false
    /// (and commits nothing) if the step doesn't exist.
    pub fn set_step_components(&mut self, id: &str, components: Vec<Component>) -> bool {
        let Some(step) = self.steps.iter_mut().find(|step| step.id == id) else {
            return false;
        };
        step.components = components;
        self.revision += 1;
        true
    }

    /// State setter: replace every step and edge wholesale.
    pub fn replace_all(&mut self, steps: Vec<Step>, edges: Vec<Edge>) {
        self.steps = steps;
        self.edges = edges;
        self.revision += 1;
    }

    /// State setter: append a step.
    pub fn add_step(&mut self, step: Step) {
        self.steps.push(step);
        self.revision += 1;
    }

    /// Edges leaving step `id`, in insertion order.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |edge| edge.source == id)
    }
}
