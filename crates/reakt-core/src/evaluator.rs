//! Lazy expansion of component nodes.

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;

use crate::error::{RenderError, StateError};
use crate::node::{ComponentNode, Expansion, Node, Props};
use crate::state::{Owned, StateValue};

/// Evaluation context handed to a component function.
///
/// A scope borrows the node being evaluated, so it only exists for the
/// duration of one component call.
pub struct Scope<'a> {
    node: &'a ComponentNode,
}

impl<'a> Scope<'a> {
    fn new(node: &'a ComponentNode) -> Self {
        Self { node }
    }

    pub fn props(&self) -> &'a Props {
        self.node.props()
    }

    pub fn component_name(&self) -> &'static str {
        self.node.component().name()
    }

    /// Persistent value for this component occurrence, created with `init`
    /// the first time the slot is requested. The value is cloned into the
    /// next render's node when the differ matches the two.
    pub fn state<T: Clone + 'static>(
        &self,
        init: impl FnOnce() -> T,
    ) -> Result<Owned<T>, StateError> {
        let slot = match self.node.state_slot() {
            Some(slot) => slot,
            None => {
                let slot: Rc<dyn StateValue> = Rc::new(RefCell::new(init()));
                self.node.set_state_slot(Rc::clone(&slot));
                slot
            }
        };
        slot.into_any()
            .downcast::<RefCell<T>>()
            .map(Owned::from_rc)
            .map_err(|_| StateError::TypeMismatch {
                component: self.component_name(),
                requested: std::any::type_name::<T>(),
            })
    }

    /// Counts evaluations of this component occurrence. The slot starts at
    /// zero and is incremented before being read, so the first call returns 1.
    pub fn render_counter(&self) -> Result<u64, StateError> {
        let counter = self.state(|| 0u64)?;
        Ok(counter.update(|count| {
            *count += 1;
            *count
        }))
    }
}

/// Return the expansion of `node`, invoking its component only if it has
/// not been evaluated before.
pub fn evaluate(node: &ComponentNode) -> Result<&Node, RenderError> {
    if let Expansion::Evaluated(output) = node.expansion() {
        return Ok(output);
    }
    let component = node.component();
    trace!("evaluating component `{}`", component.name());
    let output = {
        let scope = Scope::new(node);
        component
            .invoke(node.props(), &scope)
            .map_err(|source| RenderError::Component {
                component: component.name(),
                source,
            })?
    };
    Ok(node.store_expansion(output))
}

#[cfg(test)]
#[path = "tests/evaluator_tests.rs"]
mod tests;
