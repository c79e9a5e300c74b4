use crate::error::{NodeError, NodeId};
use crate::node::Value;

/// Mutable tree that patches are applied to.
///
/// Implementations own the live nodes and hand out [`NodeId`] handles.
/// Element and text creation cannot fail; every other operation reports a
/// [`NodeError`] when a handle is stale or has the wrong shape.
pub trait OutputTree {
    fn create_element(&mut self, tag: &str) -> NodeId;
    fn create_text(&mut self, text: &str) -> NodeId;
    fn set_attribute(&mut self, element: NodeId, key: &str, value: &Value)
        -> Result<(), NodeError>;
    fn remove_attribute(&mut self, element: NodeId, key: &str) -> Result<(), NodeError>;
    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), NodeError>;
    /// Insert `child` before `reference`, or append when `reference` is `None`.
    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), NodeError>;
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError>;
    fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<(), NodeError>;
    /// Live child of `parent` at `index`, if any.
    fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId>;
    fn child_count(&self, parent: NodeId) -> usize;
}
