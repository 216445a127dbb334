//! Widget expansion and executor connection assignment.
//!
//! DESIGN
//! ======
//! A widget is a composite resource: dropping one may add several steps,
//! elements and edges at once. The canvas doesn't know how any particular
//! widget expands; the caller injects a [`WidgetLoader`] that receives the
//! current graph and returns the complete replacement. After expansion, an
//! optional [`ConnectionAssigner`] wires executor steps to identity provider
//! connections described by [`FlowMetadata`]. Both seams accept plain
//! closures.

#[cfg(test)]
#[path = "widget_test.rs"]
mod widget_test;

use serde_json::Value;

use crate::consts::{PROP_IDP_ID, STEP_TASK_EXECUTION};
use crate::drag::DropTarget;
use crate::flow::{Edge, FlowMetadata, Step};
use crate::resource::Resource;

/// Result of expanding a widget. `steps` and `edges` replace the graph
/// wholesale; they are never merged into the previous state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetExpansion {
    pub steps: Vec<Step>,
    pub edges: Vec<Edge>,
    /// Resource to announce as dropped (e.g. to open its property panel).
    pub created: Option<Resource>,
    /// Step the widget created or populated, if any.
    pub created_step_id: Option<String>,
}

/// Expands a widget against the current graph.
pub trait WidgetLoader {
    fn load(&self, widget: &Resource, target: &DropTarget, steps: &[Step], edges: &[Edge]) -> WidgetExpansion;
}

impl<F> WidgetLoader for F
where
    F: Fn(&Resource, &DropTarget, &[Step], &[Edge]) -> WidgetExpansion,
{
    fn load(&self, widget: &Resource, target: &DropTarget, steps: &[Step], edges: &[Edge]) -> WidgetExpansion {
        self(widget, target, steps, edges)
    }
}

/// Post-expansion pass wiring executors to their connections.
pub trait ConnectionAssigner {
    fn assign(&self, steps: Vec<Step>, edges: Vec<Edge>, metadata: &FlowMetadata) -> (Vec<Step>, Vec<Edge>);
}

impl<F> ConnectionAssigner for F
where
    F: Fn(Vec<Step>, Vec<Edge>, &FlowMetadata) -> (Vec<Step>, Vec<Edge>),
{
    fn assign(&self, steps: Vec<Step>, edges: Vec<Edge>, metadata: &FlowMetadata) -> (Vec<Step>, Vec<Edge>) {
        self(steps, edges, metadata)
    }
}

/// Gives every executor step that has no `idpId` yet the first connection
/// its executor lists in the metadata. Steps with an explicit `idpId` are
/// left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstAvailableConnection;

impl ConnectionAssigner for FirstAvailableConnection {
    fn assign(&self, steps: Vec<Step>, edges: Vec<Edge>, metadata: &FlowMetadata) -> (Vec<Step>, Vec<Edge>) {
        let steps = steps
            .into_iter()
            .map(|mut step| {
                if step.kind != STEP_TASK_EXECUTION || step.properties.contains_key(PROP_IDP_ID) {
                    return step;
                }
                let Some(executor) = step.executor.as_ref() else {
                    return step;
                };
                if let Some(first) = metadata.connections_for(&executor.name).first() {
                    tracing::debug!(step_id = %step.id, executor = %executor.name, connection = %first, "assigned connection");
                    step.properties
                        .insert(PROP_IDP_ID.to_owned(), Value::String(first.clone()));
                }
                step
            })
            .collect();
        (steps, edges)
    }
}
