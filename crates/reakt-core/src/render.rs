//! Render entry point: diff against the previously rendered tree, patch the
//! output, remember the new tree.

use std::cell::RefCell;

use log::{debug, warn};

use crate::apply::apply_with_options;
use crate::diff::{diff_with_options, PatchStats};
use crate::error::{NodeId, RenderError};
use crate::node::Node;
use crate::output::OutputTree;

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Knobs shared by the differ and the applier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Deepest tree level (elements plus component expansions) that will
    /// be visited before the pass fails with
    /// [`RenderError::DepthExceeded`].
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RenderOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Holds the tree rendered last and reconciles each new tree against it.
#[derive(Debug, Default)]
pub struct Renderer {
    previous: Node,
    options: RenderOptions,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            previous: Node::Empty,
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn previous(&self) -> &Node {
        &self.previous
    }

    /// Forget the previous tree. The next render inserts from scratch, so
    /// the caller is expected to clear the output root as well.
    pub fn reset(&mut self) {
        self.previous = Node::Empty;
    }

    /// Make the children of `root` match `next`.
    ///
    /// On error the previous tree is kept; the output tree may already be
    /// partially patched.
    pub fn render<T: OutputTree + ?Sized>(
        &mut self,
        next: Node,
        tree: &mut T,
        root: NodeId,
    ) -> Result<(), RenderError> {
        match diff_with_options(&self.previous, &next, &self.options)? {
            Some(patch) => {
                debug!("render: {}", PatchStats::collect(&patch));
                let target = tree.child_at(root, 0);
                apply_with_options(tree, &patch, root, target, &self.options)?;
            }
            None => debug!("render: nothing to reconcile"),
        }
        self.previous = next;
        Ok(())
    }
}

thread_local! {
    static RENDERER: RefCell<Renderer> = RefCell::new(Renderer::new());
}

/// Render through the thread's shared [`Renderer`].
///
/// Calling this again while a render on the same thread is in progress,
/// for example from inside a component, fails with
/// [`RenderError::Reentrant`].
pub fn render<T: OutputTree + ?Sized>(
    next: Node,
    tree: &mut T,
    root: NodeId,
) -> Result<(), RenderError> {
    RENDERER.with(|renderer| {
        let Ok(mut renderer) = renderer.try_borrow_mut() else {
            warn!("rejected reentrant render");
            return Err(RenderError::Reentrant);
        };
        renderer.render(next, tree, root)
    })
}

/// Forget the tree remembered by [`render`] on this thread.
pub fn reset_previous_tree() -> Result<(), RenderError> {
    RENDERER.with(|renderer| {
        renderer
            .try_borrow_mut()
            .map(|mut renderer| renderer.reset())
            .map_err(|_| RenderError::Reentrant)
    })
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
