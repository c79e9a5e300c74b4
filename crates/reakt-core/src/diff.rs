//! Reconciliation of two node trees into a [`Patch`].
//!
//! Matching is purely positional. Children are aligned index by index and
//! positions that are empty on both sides are skipped, so the child patches
//! of an `Update` line up with the live children of the output element
//! rather than with the logical child list.

use std::fmt;

use crate::collections::map::HashSet;
use crate::error::RenderError;
use crate::evaluator::evaluate;
use crate::node::{Element, Node, Scalar, Value, CHILDREN_KEY};
use crate::render::RenderOptions;

/// One attribute change. `value` is `None` when the key is gone from the
/// next tree.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDelta {
    pub key: String,
    pub value: Option<Value>,
}

/// Transformation of a single tree position.
#[derive(Clone, Debug)]
pub enum Patch {
    Noop,
    Insert(Node),
    Delete,
    Replace(Node),
    UpdateText(Scalar),
    Update {
        attributes: Vec<AttributeDelta>,
        children: Vec<Patch>,
    },
}

impl Patch {
    pub fn is_noop(&self) -> bool {
        matches!(self, Patch::Noop)
    }

    pub fn action(&self) -> &'static str {
        match self {
            Patch::Noop => "noop",
            Patch::Insert(_) => "insert",
            Patch::Delete => "delete",
            Patch::Replace(_) => "replace",
            Patch::UpdateText(_) => "update-text",
            Patch::Update { .. } => "update",
        }
    }
}

/// Per-action totals of a patch, counted through nested updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatchStats {
    pub noops: usize,
    pub inserts: usize,
    pub deletes: usize,
    pub replaces: usize,
    pub text_updates: usize,
    pub updates: usize,
    pub attribute_deltas: usize,
}

impl PatchStats {
    pub fn collect(patch: &Patch) -> Self {
        let mut stats = Self::default();
        stats.visit(patch);
        stats
    }

    fn visit(&mut self, patch: &Patch) {
        match patch {
            Patch::Noop => self.noops += 1,
            Patch::Insert(_) => self.inserts += 1,
            Patch::Delete => self.deletes += 1,
            Patch::Replace(_) => self.replaces += 1,
            Patch::UpdateText(_) => self.text_updates += 1,
            Patch::Update {
                attributes,
                children,
            } => {
                self.updates += 1;
                self.attribute_deltas += attributes.len();
                for child in children {
                    self.visit(child);
                }
            }
        }
    }

    /// True when applying the patch would not touch the output tree.
    pub fn is_clean(&self) -> bool {
        self.inserts == 0
            && self.deletes == 0
            && self.replaces == 0
            && self.text_updates == 0
            && self.attribute_deltas == 0
    }
}

impl fmt::Display for PatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserts, {} deletes, {} replaces, {} text updates, {} attribute changes",
            self.inserts, self.deletes, self.replaces, self.text_updates, self.attribute_deltas
        )
    }
}

/// Compute the patch turning `prev` into `next` with default options.
///
/// Returns `Ok(None)` only when both sides are empty. Component nodes are
/// expanded on demand; a failing component aborts the diff.
pub fn diff(prev: &Node, next: &Node) -> Result<Option<Patch>, RenderError> {
    diff_with_options(prev, next, &RenderOptions::default())
}

pub fn diff_with_options(
    prev: &Node,
    next: &Node,
    options: &RenderOptions,
) -> Result<Option<Patch>, RenderError> {
    Differ {
        limit: options.max_depth,
    }
    .diff(prev, next, 0)
}

struct Differ {
    limit: usize,
}

impl Differ {
    fn diff(&self, prev: &Node, next: &Node, depth: usize) -> Result<Option<Patch>, RenderError> {
        if depth > self.limit {
            return Err(RenderError::DepthExceeded { limit: self.limit });
        }
        if prev.same_instance(next) {
            return Ok(Some(Patch::Noop));
        }
        let patch = match (prev, next) {
            (Node::Empty, Node::Empty) => return Ok(None),
            (Node::Empty, _) => Patch::Insert(next.clone()),
            (_, Node::Empty) => Patch::Delete,
            (Node::Text(a), Node::Text(b)) if a.same_kind(b) => {
                if a == b {
                    Patch::Noop
                } else {
                    Patch::UpdateText(b.clone())
                }
            }
            (Node::Element(a), Node::Element(b)) if a.tag() == b.tag() => {
                self.diff_elements(a, b, depth)?
            }
            (Node::Component(a), Node::Component(b))
                if a.component().same_type(b.component()) =>
            {
                let prev_output = evaluate(a)?;
                b.inherit_state(a);
                let next_output = evaluate(b)?;
                return self.diff(prev_output, next_output, depth + 1);
            }
            _ => Patch::Replace(next.clone()),
        };
        Ok(Some(patch))
    }

    fn diff_elements(
        &self,
        prev: &Element,
        next: &Element,
        depth: usize,
    ) -> Result<Patch, RenderError> {
        let (before, after) = (prev.attributes(), next.attributes());
        let mut seen = HashSet::new();
        let attributes: Vec<AttributeDelta> = before
            .keys()
            .chain(after.keys())
            .map(String::as_str)
            .filter(|key| *key != CHILDREN_KEY)
            .filter(|key| seen.insert(*key))
            .filter(|key| before.get(*key) != after.get(*key))
            .map(|key| AttributeDelta {
                key: key.to_owned(),
                value: after.get(key).cloned(),
            })
            .collect();

        let empty = Node::Empty;
        let len = prev.children().len().max(next.children().len());
        let mut children = Vec::new();
        for index in 0..len {
            let before_child = prev.children().get(index).unwrap_or(&empty);
            let after_child = next.children().get(index).unwrap_or(&empty);
            if before_child.is_empty() && after_child.is_empty() {
                continue;
            }
            if let Some(patch) = self.diff(before_child, after_child, depth + 1)? {
                children.push(patch);
            }
        }

        if attributes.is_empty() && children.iter().all(Patch::is_noop) {
            Ok(Patch::Noop)
        } else {
            Ok(Patch::Update {
                attributes,
                children,
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/diff_tests.rs"]
mod tests;
