//! Construction helpers for [`Node`] trees.
//!
//! Building a component node never runs the component; evaluation is
//! left to the differ and applier.

use std::rc::Rc;

use crate::node::{Attributes, Component, ComponentNode, Element, Node, Props, Scalar, Value};

/// What [`create_node`] builds: an element tag or a component reference.
#[derive(Clone, Debug)]
pub enum NodeKind {
    Tag(String),
    Component(Component),
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        NodeKind::Tag(tag.to_owned())
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        NodeKind::Tag(tag)
    }
}

impl From<Component> for NodeKind {
    fn from(component: Component) -> Self {
        NodeKind::Component(component)
    }
}

impl From<&Component> for NodeKind {
    fn from(component: &Component) -> Self {
        NodeKind::Component(component.clone())
    }
}

/// Build an element node for a tag, or an unevaluated component node whose
/// props carry `children`.
pub fn create_node(kind: impl Into<NodeKind>, props: Attributes, children: Vec<Node>) -> Node {
    match kind.into() {
        NodeKind::Tag(tag) => Node::Element(Rc::new(Element::new(tag, props, children))),
        NodeKind::Component(component) => Node::Component(Rc::new(ComponentNode::new(
            component,
            Props::new(props, children),
        ))),
    }
}

pub fn element(tag: impl Into<String>) -> ElementBuilder {
    ElementBuilder {
        tag: tag.into(),
        attributes: Attributes::new(),
        children: Vec::new(),
    }
}

pub fn component(component: &Component) -> ComponentBuilder {
    ComponentBuilder {
        component: component.clone(),
        props: Attributes::new(),
        children: Vec::new(),
    }
}

pub fn text(value: impl Into<String>) -> Node {
    Node::Text(Scalar::Str(Rc::from(value.into())))
}

pub fn number(value: f64) -> Node {
    Node::Text(Scalar::Number(value))
}

pub fn empty() -> Node {
    Node::Empty
}

#[must_use]
pub struct ElementBuilder {
    tag: String,
    attributes: Attributes,
    children: Vec<Node>,
}

impl ElementBuilder {
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Node {
        create_node(NodeKind::Tag(self.tag), self.attributes, self.children)
    }
}

impl From<ElementBuilder> for Node {
    fn from(builder: ElementBuilder) -> Self {
        builder.build()
    }
}

#[must_use]
pub struct ComponentBuilder {
    component: Component,
    props: Attributes,
    children: Vec<Node>,
}

impl ComponentBuilder {
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn build(self) -> Node {
        create_node(
            NodeKind::Component(self.component),
            self.props,
            self.children,
        )
    }
}

impl From<ComponentBuilder> for Node {
    fn from(builder: ComponentBuilder) -> Self {
        builder.build()
    }
}
