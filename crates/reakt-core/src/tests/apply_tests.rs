use super::*;
use crate::builder::{component, element, text};
use crate::diff::diff;
use crate::evaluator::Scope;
use crate::memory::MemoryTree;
use crate::node::{Component, Props, Scalar};
use crate::NodeError;

fn mount(tree: &mut MemoryTree, node: &Node) -> NodeId {
    let root = tree.root();
    let id = realize(tree, node).expect("realize").expect("live node");
    tree.insert_before(root, id, None).expect("mount");
    id
}

fn reconcile(tree: &mut MemoryTree, prev: &Node, next: &Node) {
    let root = tree.root();
    let patch = diff(prev, next).expect("diff").expect("patch");
    let target = tree.child_at(root, 0);
    apply(tree, &patch, root, target).expect("apply");
}

#[test]
fn realize_materializes_subtree() {
    let mut tree = MemoryTree::new();
    let node = element("div")
        .attr("id", "main")
        .child(element("p").child("1"))
        .child(Node::Empty)
        .child(2)
        .build();
    mount(&mut tree, &node);
    assert_eq!(
        tree.inner_markup(tree.root()),
        "<div id=\"main\"><p>1</p>2</div>"
    );
}

#[test]
fn realize_expands_components() {
    fn badge(props: &Props, _scope: &Scope<'_>) -> anyhow::Result<Node> {
        let label = props.get_str("label").unwrap_or_default().to_owned();
        Ok(element("span").attr("class", "badge").child(label).build())
    }
    let mut tree = MemoryTree::new();
    let node = element("div")
        .child(component(&Component::new(badge)).prop("label", "new"))
        .build();
    mount(&mut tree, &node);
    assert_eq!(
        tree.inner_markup(tree.root()),
        "<div><span class=\"badge\">new</span></div>"
    );
}

#[test]
fn realize_of_empty_is_nothing() {
    let mut tree = MemoryTree::new();
    assert_eq!(realize(&mut tree, &Node::Empty).expect("realize"), None);
    assert_eq!(tree.counts(), Default::default());
}

#[test]
fn non_insert_patch_requires_target() {
    let mut tree = MemoryTree::new();
    let root = tree.root();
    for patch in [Patch::Delete, Patch::Replace(text("x"))] {
        let err = apply(&mut tree, &patch, root, None).expect_err("missing target");
        assert!(matches!(err, RenderError::MissingTarget { .. }));
    }
}

#[test]
fn insert_without_target_appends() {
    let mut tree = MemoryTree::new();
    let root = tree.root();
    apply(&mut tree, &Patch::Insert(text("a")), root, None).expect("apply");
    apply(&mut tree, &Patch::Insert(text("b")), root, None).expect("apply");
    assert_eq!(tree.inner_markup(root), "ab");
}

#[test]
fn consecutive_deletes_use_running_offset() {
    let mut tree = MemoryTree::new();
    let prev = element("ul")
        .children(["a", "b", "c", "d"])
        .build();
    let next = element("ul").child("a").build();
    mount(&mut tree, &prev);
    tree.reset_counts();

    reconcile(&mut tree, &prev, &next);
    assert_eq!(tree.inner_markup(tree.root()), "<ul>a</ul>");
    assert_eq!(tree.counts().removals, 3);
}

#[test]
fn delete_then_update_addresses_shifted_child() {
    let mut tree = MemoryTree::new();
    let prev = element("div").children(["a", "b", "c"]).build();
    let next = element("div")
        .child("a")
        .child(Node::Empty)
        .child("C")
        .build();
    mount(&mut tree, &prev);

    reconcile(&mut tree, &prev, &next);
    assert_eq!(tree.inner_markup(tree.root()), "<div>aC</div>");
}

#[test]
fn insert_lands_before_existing_sibling() {
    let mut tree = MemoryTree::new();
    let prev = element("div").child(Node::Empty).child("b").build();
    let next = element("div").child("a").child("b").build();
    mount(&mut tree, &prev);

    reconcile(&mut tree, &prev, &next);
    assert_eq!(tree.inner_markup(tree.root()), "<div>ab</div>");
}

#[test]
fn replace_swaps_in_place() {
    let mut tree = MemoryTree::new();
    let prev = element("div")
        .child(element("p").child("x"))
        .child("tail")
        .build();
    let next = element("div")
        .child(element("h1").child("x"))
        .child("tail")
        .build();
    mount(&mut tree, &prev);
    tree.reset_counts();

    reconcile(&mut tree, &prev, &next);
    assert_eq!(tree.inner_markup(tree.root()), "<div><h1>x</h1>tail</div>");
    assert_eq!(tree.counts().replacements, 1);
    assert_eq!(tree.counts().inserts, 1);
}

#[test]
fn attribute_updates_and_removals() {
    let mut tree = MemoryTree::new();
    let prev = element("a")
        .attr("href", "/one")
        .attr("target", "_blank")
        .build();
    let next = element("a").attr("href", "/two").build();
    let link = mount(&mut tree, &prev);

    reconcile(&mut tree, &prev, &next);
    assert_eq!(tree.to_markup(link), "<a href=\"/two\"></a>");
    assert_eq!(tree.counts().attribute_removals, 1);
}

#[test]
fn update_text_on_element_reports_output_error() {
    let mut tree = MemoryTree::new();
    let root = tree.root();
    let div = tree.create_element("div");
    tree.insert_before(root, div, None).expect("append");
    let patch = Patch::UpdateText(Scalar::Str("x".into()));
    let err = apply(&mut tree, &patch, root, Some(div)).expect_err("not text");
    assert!(matches!(err, RenderError::Output(NodeError::NotText { .. })));
}

fn blank(_props: &Props, _scope: &Scope<'_>) -> anyhow::Result<Node> {
    Ok(Node::Empty)
}

#[test]
fn insert_of_blank_component_keeps_sibling_addressed() {
    let mut tree = MemoryTree::new();
    let prev = element("div").child(Node::Empty).child("a").build();
    let next = element("div")
        .child(component(&Component::new(blank)))
        .child("b")
        .build();
    mount(&mut tree, &prev);
    let sibling = tree.children(tree.child_at(tree.root(), 0).expect("div"))[0];
    tree.reset_counts();

    reconcile(&mut tree, &prev, &next);
    assert_eq!(tree.inner_markup(tree.root()), "<div>b</div>");
    assert_eq!(tree.text_content(sibling).as_deref(), Some("b"));
    assert_eq!(tree.counts().text_writes, 1);
    assert_eq!(tree.counts().structural(), 0);
}

#[test]
fn replace_with_blank_component_keeps_sibling_addressed() {
    let mut tree = MemoryTree::new();
    let prev = element("div").child(element("span")).child("a").build();
    let next = element("div")
        .child(component(&Component::new(blank)))
        .child("b")
        .build();
    mount(&mut tree, &prev);
    let sibling = tree.children(tree.child_at(tree.root(), 0).expect("div"))[1];
    tree.reset_counts();

    reconcile(&mut tree, &prev, &next);
    assert_eq!(tree.inner_markup(tree.root()), "<div>b</div>");
    assert_eq!(tree.text_content(sibling).as_deref(), Some("b"));
    assert_eq!(tree.counts().removals, 1);
    assert_eq!(tree.counts().text_writes, 1);
}

// A component that expanded to nothing still yields a delete when it goes
// away, and that delete lands on the next live sibling.
#[test]
fn delete_of_blank_component_removes_following_sibling() {
    let mut tree = MemoryTree::new();
    let prev = element("div")
        .child(component(&Component::new(blank)))
        .child("keep")
        .build();
    let next = element("div").child(Node::Empty).child("keep").build();
    mount(&mut tree, &prev);
    assert_eq!(tree.inner_markup(tree.root()), "<div>keep</div>");

    reconcile(&mut tree, &prev, &next);
    assert_eq!(tree.inner_markup(tree.root()), "<div></div>");
}
