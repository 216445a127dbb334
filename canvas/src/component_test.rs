use serde_json::json;

use super::*;

// =============================================================
// Serde
// =============================================================

#[test]
fn deserialize_keeps_unknown_fields_in_props() {
    let raw = json!({
        "id": "input_001",
        "type": "TEXT_INPUT",
        "label": "{{ t(elements:fields.username.label) }}",
        "ref": "username",
        "required": true
    });
    let component: Component = serde_json::from_value(raw).unwrap();
    assert_eq!(component.id, "input_001");
    assert_eq!(component.kind, "TEXT_INPUT");
    assert!(component.components.is_none());
    assert_eq!(component.props.len(), 3);
    assert_eq!(component.props().reference(), "username");
    assert!(component.props().required());
}

#[test]
fn deserialize_nested_container() {
    let raw = json!({
        "id": "block_001",
        "type": "BLOCK",
        "components": [
            {"id": "input_001", "type": "TEXT_INPUT"},
            {"id": "action_001", "type": "ACTION", "eventType": "SUBMIT"}
        ]
    });
    let component: Component = serde_json::from_value(raw).unwrap();
    assert_eq!(component.children().len(), 2);
    assert_eq!(component.children()[1].props().event_type(), "SUBMIT");
    assert!(component.props.is_empty());
}

#[test]
fn serialize_leaf_omits_components() {
    let component = Component::new("text_001", "TEXT").with_prop("variant", "HEADING_1");
    let value = serde_json::to_value(&component).unwrap();
    assert_eq!(value, json!({"id": "text_001", "type": "TEXT", "variant": "HEADING_1"}));
}

#[test]
fn serialize_empty_container_keeps_components() {
    let component = Component::container("block_001", "BLOCK", Vec::new());
    let value = serde_json::to_value(&component).unwrap();
    assert_eq!(value, json!({"id": "block_001", "type": "BLOCK", "components": []}));
}

// =============================================================
// Classification
// =============================================================

#[test]
fn block_kind_is_container_without_children_list() {
    assert!(Component::new("block_001", "BLOCK").is_container());
    assert!(Component::new("form_001", "FORM").is_container());
    assert!(!Component::new("text_001", "TEXT").is_container());
}

#[test]
fn any_kind_with_children_is_container() {
    let component = Component::container("stack_001", "STACK", vec![Component::new("text_001", "TEXT")]);
    assert!(component.is_container());
}

#[test]
fn input_and_action_detection() {
    assert!(Component::new("a", "PASSWORD_INPUT").is_input());
    assert!(Component::new("b", "TEXT_INPUT").is_input());
    assert!(!Component::new("c", "TEXT").is_input());
    assert!(Component::new("d", "ACTION").is_action());
}

#[test]
fn leaf_children_is_empty_slice() {
    assert!(Component::new("text_001", "TEXT").children().is_empty());
}

// =============================================================
// Props
// =============================================================

#[test]
fn props_default_when_absent() {
    let component = Component::new("text_001", "TEXT");
    let props = component.props();
    assert_eq!(props.label(), "");
    assert_eq!(props.reference(), "");
    assert_eq!(props.event_type(), "");
    assert!(!props.required());
}

#[test]
fn props_ignore_wrong_types() {
    let component = Component::new("input_001", "TEXT_INPUT")
        .with_prop("label", 42)
        .with_prop("required", "yes");
    assert_eq!(component.props().label(), "");
    assert!(!component.props().required());
}
