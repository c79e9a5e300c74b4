//! Immutable description of a desired UI tree.
//!
//! Element and component nodes live behind `Rc` so that a node has a
//! stable identity across renders: the differ short-circuits on
//! `Rc::ptr_eq`, never on structural equality. Text and empty nodes are
//! plain values without identity.

use std::any::{Any, TypeId};
use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::evaluator::Scope;
use crate::state::StateValue;

/// Attribute or prop bag. Iteration follows insertion order.
pub type Attributes = IndexMap<String, Value>;

/// Reserved prop key carrying a component's children; never diffed or
/// written to the output tree as an attribute.
pub const CHILDREN_KEY: &str = "children";

/// Event callback stored as an attribute value.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&str)>);

impl Handler {
    pub fn new(callback: impl Fn(&str) + 'static) -> Self {
        Self(Rc::new(callback))
    }

    pub fn call(&self, payload: &str) {
        (self.0)(payload)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Attribute value. Equality is strict: floats use `==` and handlers are
/// equal only when they are the same allocation.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(Rc<str>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Handler(Handler),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            Value::Handler(handler) => Some(handler),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(n) => format_number(*n, f),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Handler(_) => f.write_str("[handler]"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Handler> for Value {
    fn from(value: Handler) -> Self {
        Value::Handler(value)
    }
}

/// Content of a text node.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Str(Rc<str>),
    Number(f64),
}

impl Scalar {
    /// Strings only reconcile against strings and numbers against numbers.
    pub fn same_kind(&self, other: &Scalar) -> bool {
        matches!(
            (self, other),
            (Scalar::Str(_), Scalar::Str(_)) | (Scalar::Number(_), Scalar::Number(_))
        )
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Number(n) => format_number(*n, f),
        }
    }
}

// Integral numbers print without a fractional part: `1.0` is shown as `1`.
fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

/// A node that maps one-to-one onto an output-tree element.
#[derive(Debug)]
pub struct Element {
    tag: String,
    attributes: Attributes,
    children: Vec<Node>,
}

impl Element {
    pub(crate) fn new(tag: String, attributes: Attributes, children: Vec<Node>) -> Self {
        Self {
            tag,
            attributes,
            children,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

/// Input handed to a component function: its props plus the children it
/// was built with.
#[derive(Clone, Debug, Default)]
pub struct Props {
    attributes: Attributes,
    children: Vec<Node>,
}

impl Props {
    pub fn new(attributes: Attributes, children: Vec<Node>) -> Self {
        Self {
            attributes,
            children,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

type ComponentFn = dyn Fn(&Props, &Scope<'_>) -> anyhow::Result<Node>;

type ComponentFnPtr = fn(&Props, &Scope<'_>) -> anyhow::Result<Node>;

/// Reference to a component function.
///
/// Two references denote the same component when they wrap the same
/// function type, so `Component::new(counter)` built afresh on every
/// render keeps its identity. Plain function pointers share one type and
/// are told apart by address. Closures capturing different values but
/// sharing one definition site count as the same component.
#[derive(Clone)]
pub struct Component {
    id: TypeId,
    address: Option<usize>,
    name: &'static str,
    func: Rc<ComponentFn>,
}

impl Component {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Props, &Scope<'_>) -> anyhow::Result<Node> + 'static,
    {
        let full = std::any::type_name::<F>();
        let address = (&func as &dyn Any)
            .downcast_ref::<ComponentFnPtr>()
            .map(|ptr| *ptr as usize);
        Self {
            id: TypeId::of::<F>(),
            address,
            name: match address {
                Some(_) => "fn",
                None => full.rsplit("::").next().unwrap_or(full),
            },
            func: Rc::new(func),
        }
    }

    /// Override the name used in logs and errors.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn same_type(&self, other: &Component) -> bool {
        self.id == other.id && self.address == other.address
    }

    pub(crate) fn invoke(&self, props: &Props, scope: &Scope<'_>) -> anyhow::Result<Node> {
        (self.func)(props, scope)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

/// Lifecycle phase of a component node.
#[derive(Debug, Clone, Copy)]
pub enum Expansion<'a> {
    Unevaluated,
    Evaluated(&'a Node),
}

/// A deferred component invocation.
///
/// The expansion is written at most once, on first evaluation. The state
/// slot is copied from the previous node at the same position when the
/// differ matches the two.
pub struct ComponentNode {
    component: Component,
    props: Props,
    expansion: OnceCell<Node>,
    state: RefCell<Option<Rc<dyn StateValue>>>,
}

impl ComponentNode {
    pub(crate) fn new(component: Component, props: Props) -> Self {
        Self {
            component,
            props,
            expansion: OnceCell::new(),
            state: RefCell::new(None),
        }
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn expansion(&self) -> Expansion<'_> {
        match self.expansion.get() {
            Some(node) => Expansion::Evaluated(node),
            None => Expansion::Unevaluated,
        }
    }

    pub fn has_state(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub(crate) fn store_expansion(&self, output: Node) -> &Node {
        self.expansion.get_or_init(|| output)
    }

    pub(crate) fn state_slot(&self) -> Option<Rc<dyn StateValue>> {
        self.state.borrow().clone()
    }

    pub(crate) fn set_state_slot(&self, slot: Rc<dyn StateValue>) {
        *self.state.borrow_mut() = Some(slot);
    }

    /// Take over a copy of `prev`'s state. `prev` keeps its own value.
    pub(crate) fn inherit_state(&self, prev: &ComponentNode) {
        let carried = prev.state.borrow().as_ref().map(|slot| slot.fork());
        *self.state.borrow_mut() = carried;
    }
}

impl fmt::Debug for ComponentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentNode")
            .field("component", &self.component)
            .field("props", &self.props)
            .field("evaluated", &self.expansion.get().is_some())
            .field("has_state", &self.has_state())
            .finish()
    }
}

/// One point of the desired UI tree.
#[derive(Clone, Debug, Default)]
pub enum Node {
    /// Renders nothing and occupies no output position.
    #[default]
    Empty,
    Text(Scalar),
    Element(Rc<Element>),
    Component(Rc<ComponentNode>),
}

impl Node {
    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    /// Pointer identity. Always false for text and empty nodes.
    pub fn same_instance(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Element(a), Node::Element(b)) => Rc::ptr_eq(a, b),
            (Node::Component(a), Node::Component(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            Node::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Scalar> {
        match self {
            Node::Text(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Text(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(Scalar::Str(Rc::from(value)))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(Scalar::Str(Rc::from(value)))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Text(Scalar::Number(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Text(Scalar::Number(value as f64))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Text(Scalar::Number(f64::from(value)))
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Node::Text(Scalar::Number(value as f64))
    }
}

impl<N: Into<Node>> From<Option<N>> for Node {
    fn from(value: Option<N>) -> Self {
        value.map_or(Node::Empty, Into::into)
    }
}
