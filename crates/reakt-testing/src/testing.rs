use reakt_core::{MemoryTree, MutationCounts, Node, NodeId, RenderError, RenderOptions, Renderer};

/// Headless harness for exercising renders in tests.
///
/// `RenderTestRule` owns a [`Renderer`] and an in-memory output tree. The
/// installed content closure is re-run on every [`tick`](Self::tick), the
/// way a periodic timer would drive re-renders in a real host.
pub struct RenderTestRule {
    renderer: Renderer,
    tree: MemoryTree,
    content: Option<Box<dyn FnMut() -> Node>>, // Stored user content for reuse across ticks.
    ticks: usize,
}

impl Default for RenderTestRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTestRule {
    /// Create a new test rule backed by an empty in-memory tree.
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            renderer: Renderer::with_options(options),
            tree: MemoryTree::new(),
            content: None,
            ticks: 0,
        }
    }

    /// Install the provided content and perform an initial render.
    pub fn set_content(&mut self, content: impl FnMut() -> Node + 'static) -> Result<(), RenderError> {
        self.content = Some(Box::new(content));
        self.tick()
    }

    /// Rebuild the tree from the installed content and render it.
    pub fn tick(&mut self) -> Result<(), RenderError> {
        let Some(content) = self.content.as_mut() else {
            return Ok(());
        };
        let next = content();
        let root = self.tree.root();
        self.renderer.render(next, &mut self.tree, root)?;
        self.ticks += 1;
        Ok(())
    }

    /// Run `count` ticks, stopping at the first failure.
    pub fn advance(&mut self, count: usize) -> Result<(), RenderError> {
        for _ in 0..count {
            self.tick()?;
        }
        Ok(())
    }

    /// Render a one-off tree without touching the installed content.
    pub fn render(&mut self, node: Node) -> Result<(), RenderError> {
        let root = self.tree.root();
        self.renderer.render(node, &mut self.tree, root)
    }

    /// Successful renders performed so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn tree(&self) -> &MemoryTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut MemoryTree {
        &mut self.tree
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Markup of everything rendered under the root.
    pub fn markup(&self) -> String {
        self.tree.inner_markup(self.tree.root())
    }

    pub fn counts(&self) -> MutationCounts {
        self.tree.counts()
    }

    pub fn reset_counts(&mut self) {
        self.tree.reset_counts();
    }

    /// Mutations performed by a single extra tick.
    pub fn counts_for_tick(&mut self) -> Result<MutationCounts, RenderError> {
        self.reset_counts();
        self.tick()?;
        Ok(self.counts())
    }

    /// Find the first element with `tag` in document order.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find_from(self.tree.root(), tag)
    }

    fn find_from(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        if self.tree.tag(id) == Some(tag) {
            return Some(id);
        }
        self.tree
            .children(id)
            .iter()
            .find_map(|child| self.find_from(*child, tag))
    }

    /// Dispatch `event` on the first element with `tag`.
    pub fn dispatch(&self, tag: &str, event: &str, payload: &str) -> bool {
        self.find_by_tag(tag)
            .and_then(|id| self.tree.dispatch(id, event, payload).ok())
            .unwrap_or(false)
    }

    /// Print the output tree, for interactive debugging of failing tests.
    pub fn dump(&self) {
        print!("{}", self.tree.dump_tree());
    }
}
