//! Error types shared by the evaluator, differ, applier, and output trees.

use thiserror::Error;

/// Handle to a live node inside an [`OutputTree`](crate::OutputTree).
pub type NodeId = usize;

/// Failures reported by an output tree when a mutation addresses a node
/// that does not exist or does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("node {id} missing")]
    Missing { id: NodeId },
    #[error("node {id} is not an element")]
    NotAnElement { id: NodeId },
    #[error("node {id} is not a text node")]
    NotText { id: NodeId },
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}

/// Misuse of a component's persistent state slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state slot of `{component}` holds a different type than `{requested}`")]
    TypeMismatch {
        component: &'static str,
        requested: &'static str,
    },
}

/// Everything that can abort a render pass.
///
/// None of these are retried: a failed pass leaves the output tree as far
/// as the applier got and the stored previous tree untouched.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A component function returned an error while being expanded.
    #[error("component `{component}` failed")]
    Component {
        component: &'static str,
        #[source]
        source: anyhow::Error,
    },
    /// A patch other than `insert` reached the applier without a live target.
    #[error("`{action}` patch applied without a target node")]
    MissingTarget { action: &'static str },
    /// Tree recursion went deeper than [`RenderOptions::max_depth`](crate::RenderOptions).
    #[error("tree depth exceeded the limit of {limit}")]
    DepthExceeded { limit: usize },
    /// `render` was invoked while another render on this thread was running.
    #[error("render invoked while a render is already in progress")]
    Reentrant,
    #[error(transparent)]
    Output(#[from] NodeError),
}
