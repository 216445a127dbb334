//! Flow definitions: the persisted form of a canvas.
//!
//! The backend stores a flow as a list of node definitions. Each node keeps
//! its component tree under `meta.components` and its outgoing transitions
//! as `onSuccess`, `onFailure` and prompt actions. The canvas keeps those
//! transitions as edges instead, keyed by source handle:
//!
//! | Edge handle | Definition field |
//! |-------------|------------------|
//! | none / `success` | `onSuccess` |
//! | `failure` | `onFailure` |
//! | id of an `ACTION` component | `prompts[].action` |
//!
//! Prompt inputs are derived on export from the input components sharing the
//! action's container, so they are not kept on the canvas.
//!
//! A node's `condition` (run only when a context key matches, else jump to
//! `onSkip`) and its executor's static inputs are carried on the step as-is.
//!
//! YAML flow files written by the backend's file-based store carry `meta` as
//! a JSON-encoded string; both that and an inline mapping load.

#[cfg(test)]
#[path = "definition_test.rs"]
mod definition_test;

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::component::Component;
use crate::consts::{HANDLE_FAILURE, HANDLE_SUCCESS};
pub use crate::flow::{Condition, InputDefinition};
use crate::flow::{Edge, Executor, FlowGraph, Position, Size, Step};
use crate::tree;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("duplicate step id: {0}")]
    DuplicateStep(String),
    #[error("duplicate component id {component_id} in step {step_id}")]
    DuplicateComponent { step_id: String, component_id: String },
    #[error("edge from {source_id} targets unknown step {target_id}")]
    DanglingEdge { source_id: String, target_id: String },
    #[error("condition on {step_id} skips to unknown step {target_id}")]
    DanglingSkip { step_id: String, target_id: String },
    #[error("invalid flow json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid flow yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowType {
    Authentication,
    Registration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDefinition {
    pub handle: String,
    pub name: String,
    pub flow_type: FlowType,
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<NodeLayout>,
    #[serde(default, deserialize_with = "meta_from_json_or_map", skip_serializing_if = "Option::is_none")]
    pub meta: Option<NodeMeta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<PromptDefinition>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<Executor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<String>,
    /// Skip this node unless the condition holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMeta {
    #[serde(default)]
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    /// Id of the action component.
    #[serde(rename = "ref")]
    pub reference: String,
    pub next_node: String,
}

fn meta_from_json_or_map<'de, D>(deserializer: D) -> Result<Option<NodeMeta>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMeta {
        Encoded(String),
        Inline(NodeMeta),
    }

    match Option::<RawMeta>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawMeta::Inline(meta)) => Ok(Some(meta)),
        Some(RawMeta::Encoded(raw)) if raw.trim().is_empty() => Ok(None),
        Some(RawMeta::Encoded(raw)) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

// =============================================================================
// (DE)SERIALIZATION
// =============================================================================

impl FlowDefinition {
    /// Parse a definition from JSON.
    ///
    /// # Errors
    ///
    /// Returns `Json` if the document is malformed.
    pub fn from_json(raw: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `Json` if a property value cannot be encoded.
    pub fn to_json(&self) -> Result<String, DefinitionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a definition from a YAML flow file.
    ///
    /// # Errors
    ///
    /// Returns `Yaml` if the document is malformed or `meta` is an invalid
    /// JSON string.
    pub fn from_yaml(raw: &str) -> Result<Self, DefinitionError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Serialize as YAML with `meta` written inline.
    ///
    /// # Errors
    ///
    /// Returns `Yaml` if a property value cannot be encoded.
    pub fn to_yaml(&self) -> Result<String, DefinitionError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

impl FlowGraph {
    /// Build canvas state from a stored definition.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateStep`, `DuplicateComponent`, `DanglingEdge` or
    /// `DanglingSkip` when the definition violates the graph invariants.
    pub fn from_definition(definition: &FlowDefinition) -> Result<Self, DefinitionError> {
        let mut steps = Vec::with_capacity(definition.nodes.len());
        let mut edges = Vec::new();

        for node in &definition.nodes {
            let layout = node.layout.clone().unwrap_or_default();
            let components = node
                .meta
                .as_ref()
                .map(|meta| meta.components.clone())
                .unwrap_or_default();
            steps.push(Step {
                id: node.id.clone(),
                kind: node.kind.clone(),
                position: layout.position.unwrap_or_default(),
                size: layout.size,
                components,
                executor: node.executor.clone(),
                properties: node.properties.clone(),
                condition: node.condition.clone(),
            });

            for action in node.prompts.iter().filter_map(|prompt| prompt.action.as_ref()) {
                if !action.next_node.is_empty() {
                    edges.push(Edge::new(&node.id, &action.next_node, Some(action.reference.as_str())));
                }
            }
            if let Some(next) = node.on_success.as_deref().filter(|next| !next.is_empty()) {
                edges.push(Edge::new(&node.id, next, Some(HANDLE_SUCCESS)));
            }
            if let Some(next) = node.on_failure.as_deref().filter(|next| !next.is_empty()) {
                edges.push(Edge::new(&node.id, next, Some(HANDLE_FAILURE)));
            }
        }

        let graph = Self::new(steps, edges);
        graph.validate()?;
        Ok(graph)
    }

    /// Check step id uniqueness, tree-wide component id uniqueness per step,
    /// and that every edge and condition skip targets an existing step.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let mut seen = HashSet::new();
        for step in self.steps() {
            if !seen.insert(step.id.as_str()) {
                return Err(DefinitionError::DuplicateStep(step.id.clone()));
            }
            if let Some(component_id) = tree::duplicate_ids(&step.components).into_iter().next() {
                return Err(DefinitionError::DuplicateComponent { step_id: step.id.clone(), component_id });
            }
        }
        for step in self.steps() {
            if let Some(condition) = step.condition.as_ref() {
                if !seen.contains(condition.on_skip.as_str()) {
                    return Err(DefinitionError::DanglingSkip {
                        step_id: step.id.clone(),
                        target_id: condition.on_skip.clone(),
                    });
                }
            }
        }
        for edge in self.edges() {
            if !seen.contains(edge.target.as_str()) {
                return Err(DefinitionError::DanglingEdge {
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                });
            }
        }
        Ok(())
    }

    /// Export canvas state as a definition the backend accepts.
    #[must_use]
    pub fn to_definition(&self, handle: &str, name: &str, flow_type: FlowType) -> FlowDefinition {
        let nodes = self.steps().iter().map(|step| self.node_definition(step)).collect();
        FlowDefinition { handle: handle.to_owned(), name: name.to_owned(), flow_type, nodes }
    }

    fn node_definition(&self, step: &Step) -> NodeDefinition {
        let mut node = NodeDefinition {
            id: step.id.clone(),
            kind: step.kind.clone(),
            layout: Some(NodeLayout { size: step.size, position: Some(step.position) }),
            meta: (!step.components.is_empty()).then(|| NodeMeta { components: step.components.clone() }),
            prompts: Vec::new(),
            properties: step.properties.clone(),
            executor: step.executor.clone(),
            on_success: None,
            on_failure: None,
            condition: step.condition.clone(),
        };

        for edge in self.outgoing(&step.id) {
            match edge.source_handle.as_deref() {
                None | Some(HANDLE_SUCCESS) => {
                    node.on_success.get_or_insert_with(|| edge.target.clone());
                }
                Some(HANDLE_FAILURE) => {
                    node.on_failure.get_or_insert_with(|| edge.target.clone());
                }
                Some(handle) => match tree::find(&step.components, handle) {
                    Some(action) if action.is_action() => node.prompts.push(PromptDefinition {
                        inputs: inputs_for_action(&step.components, handle),
                        action: Some(ActionDefinition { reference: handle.to_owned(), next_node: edge.target.clone() }),
                    }),
                    _ => warn!(step_id = %step.id, %handle, "edge handle names no action; dropped from export"),
                },
            }
        }
        node
    }
}

/// Inputs submitted by `action_id`: the input components in its container.
fn inputs_for_action(components: &[Component], action_id: &str) -> Vec<InputDefinition> {
    tree::siblings_of(components, action_id)
        .unwrap_or_default()
        .iter()
        .filter(|component| component.is_input())
        .map(|input| {
            let props = input.props();
            let identifier = match props.reference() {
                "" => input.id.clone(),
                reference => reference.to_owned(),
            };
            InputDefinition { reference: input.id.clone(), kind: input.kind.clone(), identifier, required: props.required() }
        })
        .collect()
}
