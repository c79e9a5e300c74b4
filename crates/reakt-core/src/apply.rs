//! Application of a [`Patch`] to a live [`OutputTree`].

use log::trace;

use crate::diff::Patch;
use crate::error::{NodeId, RenderError};
use crate::evaluator::evaluate;
use crate::node::{Node, CHILDREN_KEY};
use crate::output::OutputTree;
use crate::render::RenderOptions;

/// Apply `patch` at the position of `target` under `parent`.
///
/// `target` is the live node the patch describes. It may only be absent
/// for `insert`, which then appends to `parent`.
pub fn apply<T: OutputTree + ?Sized>(
    tree: &mut T,
    patch: &Patch,
    parent: NodeId,
    target: Option<NodeId>,
) -> Result<(), RenderError> {
    apply_with_options(tree, patch, parent, target, &RenderOptions::default())
}

pub fn apply_with_options<T: OutputTree + ?Sized>(
    tree: &mut T,
    patch: &Patch,
    parent: NodeId,
    target: Option<NodeId>,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    Applier {
        tree,
        limit: options.max_depth,
    }
    .apply(patch, parent, target)
    .map(|_| ())
}

/// Materialize `node` as a detached live subtree. Returns `None` for empty
/// nodes, including components that expand to nothing.
pub fn realize<T: OutputTree + ?Sized>(
    tree: &mut T,
    node: &Node,
) -> Result<Option<NodeId>, RenderError> {
    Applier {
        tree,
        limit: RenderOptions::default().max_depth,
    }
    .realize(node, 0)
}

struct Applier<'t, T: OutputTree + ?Sized> {
    tree: &'t mut T,
    limit: usize,
}

impl<T: OutputTree + ?Sized> Applier<'_, T> {
    // Returns whether a live node occupies the patched position afterwards.
    fn apply(
        &mut self,
        patch: &Patch,
        parent: NodeId,
        target: Option<NodeId>,
    ) -> Result<bool, RenderError> {
        trace!("applying `{}` under node {parent}", patch.action());
        match patch {
            Patch::Noop => Ok(true),
            Patch::Insert(node) => match self.realize(node, 0)? {
                Some(child) => {
                    self.tree.insert_before(parent, child, target)?;
                    Ok(true)
                }
                None => Ok(false),
            },
            Patch::Delete => {
                let target = require_target(patch, target)?;
                self.tree.remove_child(parent, target)?;
                Ok(false)
            }
            Patch::UpdateText(value) => {
                let target = require_target(patch, target)?;
                self.tree.set_text(target, &value.to_string())?;
                Ok(true)
            }
            Patch::Replace(node) => {
                let target = require_target(patch, target)?;
                match self.realize(node, 0)? {
                    Some(child) => {
                        self.tree.replace_child(parent, child, target)?;
                        Ok(true)
                    }
                    None => {
                        self.tree.remove_child(parent, target)?;
                        Ok(false)
                    }
                }
            }
            Patch::Update {
                attributes,
                children,
            } => {
                let target = require_target(patch, target)?;
                for delta in attributes {
                    match &delta.value {
                        Some(value) => self.tree.set_attribute(target, &delta.key, value)?,
                        None => self.tree.remove_attribute(target, &delta.key)?,
                    }
                }
                // Every position left without a live node (a delete, or a
                // component that expanded to nothing) shifts later children left.
                let mut removed = 0;
                for (index, child) in children.iter().enumerate() {
                    let live = self.tree.child_at(target, index - removed);
                    if !self.apply(child, target, live)? {
                        removed += 1;
                    }
                }
                Ok(true)
            }
        }
    }

    fn realize(&mut self, node: &Node, depth: usize) -> Result<Option<NodeId>, RenderError> {
        if depth > self.limit {
            return Err(RenderError::DepthExceeded { limit: self.limit });
        }
        match node {
            Node::Empty => Ok(None),
            Node::Text(value) => Ok(Some(self.tree.create_text(&value.to_string()))),
            Node::Component(component) => {
                let output = evaluate(component)?;
                self.realize(output, depth + 1)
            }
            Node::Element(element) => {
                let id = self.tree.create_element(element.tag());
                for (key, value) in element.attributes() {
                    if key != CHILDREN_KEY {
                        self.tree.set_attribute(id, key, value)?;
                    }
                }
                for child in element.children() {
                    if let Some(child_id) = self.realize(child, depth + 1)? {
                        self.tree.insert_before(id, child_id, None)?;
                    }
                }
                Ok(Some(id))
            }
        }
    }
}

fn require_target(patch: &Patch, target: Option<NodeId>) -> Result<NodeId, RenderError> {
    target.ok_or(RenderError::MissingTarget {
        action: patch.action(),
    })
}

#[cfg(test)]
#[path = "tests/apply_tests.rs"]
mod tests;
