//! In-memory [`OutputTree`] used by tests, the demo, and headless hosts.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::error::{NodeError, NodeId};
use crate::node::Value;
use crate::output::OutputTree;

const ROOT_TAG: &str = "#root";

enum HostNode {
    Element {
        tag: String,
        attributes: IndexMap<String, Value>,
        children: Vec<NodeId>,
    },
    Text(String),
}

struct Slot {
    node: HostNode,
    parent: Option<NodeId>,
}

/// Number of mutations performed since creation or the last
/// [`MemoryTree::reset_counts`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationCounts {
    pub elements_created: usize,
    pub texts_created: usize,
    pub inserts: usize,
    pub removals: usize,
    pub replacements: usize,
    pub attribute_writes: usize,
    pub attribute_removals: usize,
    pub text_writes: usize,
}

impl MutationCounts {
    /// Insertions, removals, and replacements combined.
    pub fn structural(&self) -> usize {
        self.inserts + self.removals + self.replacements
    }
}

/// Arena-backed output tree with a single root element.
///
/// Detached subtrees are freed immediately, so [`len`](Self::len) reflects
/// only nodes reachable from the root.
pub struct MemoryTree {
    nodes: Vec<Option<Slot>>, // FUTURE: recycle freed slots.
    root: NodeId,
    counts: MutationCounts,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    pub fn new() -> Self {
        let root = Slot {
            node: HostNode::Element {
                tag: ROOT_TAG.to_owned(),
                attributes: IndexMap::new(),
                children: Vec::new(),
            },
            parent: None,
        };
        Self {
            nodes: vec![Some(root)],
            root: 0,
            counts: MutationCounts::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// True when nothing is rendered under the root.
    pub fn is_empty(&self) -> bool {
        self.child_count(self.root) == 0
    }

    pub fn counts(&self) -> MutationCounts {
        self.counts
    }

    pub fn reset_counts(&mut self) {
        self.counts = MutationCounts::default();
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.slot(id).ok()?.node {
            HostNode::Element { tag, .. } => Some(tag.as_str()),
            HostNode::Text(_) => None,
        }
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&Value> {
        match &self.slot(id).ok()?.node {
            HostNode::Element { attributes, .. } => attributes.get(key),
            HostNode::Text(_) => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.slot(id).map(|slot| &slot.node) {
            Ok(HostNode::Element { children, .. }) => children.as_slice(),
            _ => &[],
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).ok()?.parent
    }

    /// Concatenated text of `id` and all of its descendants.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        let mut out = String::new();
        self.collect_text(id, &mut out).ok()?;
        Some(out)
    }

    fn collect_text(&self, id: NodeId, out: &mut String) -> Result<(), NodeError> {
        match &self.slot(id)?.node {
            HostNode::Text(text) => out.push_str(text),
            HostNode::Element { children, .. } => {
                for child in children {
                    self.collect_text(*child, out)?;
                }
            }
        }
        Ok(())
    }

    /// Invoke the handler stored under `event` on `id`. Returns whether a
    /// handler was found.
    pub fn dispatch(&self, id: NodeId, event: &str, payload: &str) -> Result<bool, NodeError> {
        let handler = match &self.slot(id)?.node {
            HostNode::Element { attributes, .. } => {
                attributes.get(event).and_then(Value::as_handler).cloned()
            }
            HostNode::Text(_) => return Err(NodeError::NotAnElement { id }),
        };
        match handler {
            Some(handler) => {
                handler.call(payload);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// HTML-like serialization of `id`. Handler attributes are omitted.
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    /// Serialization of the children of `id`, without `id` itself.
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_markup(*child, &mut out);
        }
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Ok(slot) = self.slot(id) else {
            return;
        };
        match &slot.node {
            HostNode::Text(text) => out.push_str(&escape(text)),
            HostNode::Element {
                tag,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attributes {
                    if value.as_handler().is_some() {
                        continue;
                    }
                    let _ = write!(out, " {key}=\"{}\"", escape(&value.to_string()));
                }
                out.push('>');
                for child in children {
                    self.write_markup(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    pub fn dump_tree(&self) -> String {
        let mut output = String::new();
        self.dump_node(&mut output, self.root, 0);
        output
    }

    fn dump_node(&self, output: &mut String, id: NodeId, depth: usize) {
        let indent = "  ".repeat(depth);
        match self.slot(id).map(|slot| &slot.node) {
            Ok(HostNode::Element { tag, children, .. }) => {
                let _ = writeln!(output, "{indent}[{id}] <{tag}>");
                for child in children {
                    self.dump_node(output, *child, depth + 1);
                }
            }
            Ok(HostNode::Text(text)) => {
                let _ = writeln!(output, "{indent}[{id}] {text:?}");
            }
            Err(_) => {
                let _ = writeln!(output, "{indent}[{id}] (missing)");
            }
        }
    }

    fn slot(&self, id: NodeId) -> Result<&Slot, NodeError> {
        self.nodes
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(NodeError::Missing { id })
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot, NodeError> {
        self.nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(NodeError::Missing { id })
    }

    fn children_mut(&mut self, id: NodeId) -> Result<&mut Vec<NodeId>, NodeError> {
        match &mut self.slot_mut(id)?.node {
            HostNode::Element { children, .. } => Ok(children),
            HostNode::Text(_) => Err(NodeError::NotAnElement { id }),
        }
    }

    fn position(&self, parent: NodeId, child: NodeId) -> Result<usize, NodeError> {
        let children = match &self.slot(parent)?.node {
            HostNode::Element { children, .. } => children,
            HostNode::Text(_) => return Err(NodeError::NotAnElement { id: parent }),
        };
        children
            .iter()
            .position(|c| *c == child)
            .ok_or(NodeError::NotAChild { parent, child })
    }

    fn push(&mut self, node: HostNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(Slot { node, parent: None }));
        id
    }

    // Unlinks `child` from its current parent, if it has one.
    fn detach(&mut self, child: NodeId) -> Result<(), NodeError> {
        if let Some(parent) = self.slot(child)?.parent {
            let index = self.position(parent, child)?;
            self.children_mut(parent)?.remove(index);
            self.slot_mut(child)?.parent = None;
        }
        Ok(())
    }

    fn free(&mut self, id: NodeId) {
        let Some(slot) = self.nodes.get_mut(id).and_then(Option::take) else {
            return;
        };
        if let HostNode::Element { children, .. } = slot.node {
            for child in children {
                self.free(child);
            }
        }
    }
}

impl OutputTree for MemoryTree {
    fn create_element(&mut self, tag: &str) -> NodeId {
        self.counts.elements_created += 1;
        self.push(HostNode::Element {
            tag: tag.to_owned(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        })
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.counts.texts_created += 1;
        self.push(HostNode::Text(text.to_owned()))
    }

    fn set_attribute(
        &mut self,
        element: NodeId,
        key: &str,
        value: &Value,
    ) -> Result<(), NodeError> {
        match &mut self.slot_mut(element)?.node {
            HostNode::Element { attributes, .. } => {
                attributes.insert(key.to_owned(), value.clone());
            }
            HostNode::Text(_) => return Err(NodeError::NotAnElement { id: element }),
        }
        self.counts.attribute_writes += 1;
        Ok(())
    }

    fn remove_attribute(&mut self, element: NodeId, key: &str) -> Result<(), NodeError> {
        match &mut self.slot_mut(element)?.node {
            HostNode::Element { attributes, .. } => {
                attributes.shift_remove(key);
            }
            HostNode::Text(_) => return Err(NodeError::NotAnElement { id: element }),
        }
        self.counts.attribute_removals += 1;
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), NodeError> {
        match &mut self.slot_mut(node)?.node {
            HostNode::Text(content) => {
                content.clear();
                content.push_str(text);
            }
            HostNode::Element { .. } => return Err(NodeError::NotText { id: node }),
        }
        self.counts.text_writes += 1;
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), NodeError> {
        self.slot(child)?;
        if let Some(reference) = reference {
            self.position(parent, reference)?;
        } else {
            self.children_mut(parent)?;
        }
        self.detach(child)?;
        let index = match reference {
            Some(reference) => self.position(parent, reference)?,
            None => self.child_count(parent),
        };
        self.children_mut(parent)?.insert(index, child);
        self.slot_mut(child)?.parent = Some(parent);
        self.counts.inserts += 1;
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError> {
        let index = self.position(parent, child)?;
        self.children_mut(parent)?.remove(index);
        self.free(child);
        self.counts.removals += 1;
        Ok(())
    }

    fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<(), NodeError> {
        self.slot(new_child)?;
        self.position(parent, old_child)?;
        self.detach(new_child)?;
        let index = self.position(parent, old_child)?;
        self.children_mut(parent)?[index] = new_child;
        self.slot_mut(new_child)?.parent = Some(parent);
        self.free(old_child);
        self.counts.replacements += 1;
        Ok(())
    }

    fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children(parent).get(index).copied()
    }

    fn child_count(&self, parent: NodeId) -> usize {
        self.children(parent).len()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
#[path = "tests/memory_tests.rs"]
mod tests;
