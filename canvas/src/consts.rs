//! Shared string constants for the canvas crate.

// ── Component kinds ─────────────────────────────────────────────

/// Form container; the usual drop target for input elements.
pub const KIND_BLOCK: &str = "BLOCK";

/// Legacy alias for [`KIND_BLOCK`] still emitted by older resource panels.
pub const KIND_FORM: &str = "FORM";

/// Button-like element that submits its enclosing container.
pub const KIND_ACTION: &str = "ACTION";

/// Suffix shared by every input element kind (`TEXT_INPUT`, `PASSWORD_INPUT`, ...).
pub const INPUT_KIND_SUFFIX: &str = "_INPUT";

// ── Step kinds ──────────────────────────────────────────────────

/// Step rendered as a user-facing view.
pub const STEP_PROMPT: &str = "PROMPT";

/// Step that runs a backend executor.
pub const STEP_TASK_EXECUTION: &str = "TASK_EXECUTION";

// ── Edge handles ────────────────────────────────────────────────

/// Source handle for the success branch of a step.
pub const HANDLE_SUCCESS: &str = "success";

/// Source handle for the failure branch of a step.
pub const HANDLE_FAILURE: &str = "failure";

// ── Properties ──────────────────────────────────────────────────

/// Step property naming the identity provider connection an executor uses.
pub const PROP_IDP_ID: &str = "idpId";

/// Returns `true` when components of `kind` may hold nested children.
#[must_use]
pub fn is_container_kind(kind: &str) -> bool {
    kind == KIND_BLOCK || kind == KIND_FORM
}
