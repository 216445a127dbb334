//! Draggable catalog entries offered by the resource panel.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::component::Component;
use crate::flow::Step;

/// Category of a resource; decides which drop branch handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    /// A single UI element placed inside a step view.
    Element,
    /// A whole new step on the flow canvas.
    Step,
    /// Composite that expands into several steps, elements and edges.
    Widget,
    /// Prebuilt flow that replaces the canvas.
    Template,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Element => "ELEMENT",
            Self::Step => "STEP",
            Self::Widget => "WIDGET",
            Self::Template => "TEMPLATE",
        };
        f.write_str(name)
    }
}

/// A draggable entity. Canvas components being reordered are also described
/// as resources, with `id` naming the existing component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    /// Element or step kind this resource produces (`TEXT_INPUT`, `PROMPT`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub resource_type: ResourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Seed properties copied onto whatever the resource creates.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
}

impl Resource {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: impl Into<String>, resource_type: ResourceType) -> Self {
        Self { id: id.into(), kind: kind.into(), resource_type, display_name: None, config: Map::new() }
    }

    #[must_use]
    pub fn element(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::new(id, kind, ResourceType::Element)
    }

    /// Describe an existing canvas component, e.g. for the dropped notification.
    #[must_use]
    pub fn from_component(component: &Component) -> Self {
        Self {
            id: component.id.clone(),
            kind: component.kind.clone(),
            resource_type: ResourceType::Element,
            display_name: None,
            config: component.props.clone(),
        }
    }

    #[must_use]
    pub fn from_step(step: &Step) -> Self {
        Self {
            id: step.id.clone(),
            kind: step.kind.clone(),
            resource_type: ResourceType::Step,
            display_name: None,
            config: step.properties.clone(),
        }
    }
}
