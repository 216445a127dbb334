//! Turning dropped resources into fresh canvas elements and steps.

use rand::Rng;

use crate::component::Component;
use crate::consts::is_container_kind;
use crate::flow::{Position, Step};
use crate::resource::Resource;

/// Builds the concrete element or step a drop creates. Every call must mint
/// a fresh id.
pub trait ResourceFactory {
    fn create_element(&self, resource: &Resource) -> Component;

    fn create_step(&self, resource: &Resource, position: Position) -> Step {
        let mut step = Step::new(generate_id(&resource.kind), resource.kind.clone()).at(position);
        step.properties = resource.config.clone();
        step
    }
}

/// Factory used by the canvas unless the caller injects its own: copies the
/// resource config onto the element and gives containers an empty child list.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResourceFactory;

impl ResourceFactory for DefaultResourceFactory {
    fn create_element(&self, resource: &Resource) -> Component {
        let mut component = Component::new(generate_id(&resource.kind), resource.kind.clone());
        component.props = resource.config.clone();
        for reserved in ["id", "type", "components"] {
            component.props.remove(reserved);
        }
        if is_container_kind(&resource.kind) {
            component.components = Some(Vec::new());
        }
        component
    }
}

/// Mint an id of the form `<kind>_<8 hex chars>`, e.g. `text_input_3fa9c01b`.
#[must_use]
pub fn generate_id(kind: &str) -> String {
    let bytes: [u8; 4] = rand::rng().random();
    let suffix: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{}_{suffix}", kind.to_ascii_lowercase())
}
