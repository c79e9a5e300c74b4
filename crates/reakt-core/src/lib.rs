//! Core of reakt: a retained-mode tree renderer.
//!
//! Application code describes the desired tree with [`Node`] values, the
//! [`diff`] module reconciles it against the previously rendered tree into a
//! [`Patch`], and the [`apply`] module replays that patch on a live
//! [`OutputTree`].
//!
//! ```
//! use reakt_core::{element, MemoryTree, Renderer};
//!
//! let mut tree = MemoryTree::new();
//! let root = tree.root();
//! let mut renderer = Renderer::new();
//!
//! renderer.render(element("div").child(element("p").child("1")).build(), &mut tree, root)?;
//! renderer.render(element("div").child(element("p").child("2")).build(), &mut tree, root)?;
//!
//! assert_eq!(tree.inner_markup(root), "<div><p>2</p></div>");
//! assert_eq!(tree.counts().text_writes, 1);
//! # Ok::<(), reakt_core::RenderError>(())
//! ```

pub mod apply;
pub mod builder;
pub mod collections;
pub mod diff;
pub mod error;
pub mod evaluator;
pub mod memory;
pub mod node;
pub mod output;
pub mod render;
pub mod state;

pub use apply::{apply, apply_with_options, realize};
pub use builder::{component, create_node, element, empty, number, text, NodeKind};
pub use diff::{diff, diff_with_options, AttributeDelta, Patch, PatchStats};
pub use error::{NodeError, NodeId, RenderError, StateError};
pub use evaluator::{evaluate, Scope};
pub use memory::{MemoryTree, MutationCounts};
pub use node::{
    Attributes, Component, ComponentNode, Element, Expansion, Handler, Node, Props, Scalar, Value,
    CHILDREN_KEY,
};
pub use output::OutputTree;
pub use render::{render, reset_previous_tree, RenderOptions, Renderer, DEFAULT_MAX_DEPTH};
pub use state::Owned;
