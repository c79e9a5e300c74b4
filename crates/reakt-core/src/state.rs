use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Type-erased content of a component's state slot.
///
/// Each component node owns its slot. Reconciliation hands the next node a
/// fork of the previous node's value, so the retained tree never observes
/// writes made while evaluating its successor.
pub(crate) trait StateValue: Any {
    fn fork(&self) -> Rc<dyn StateValue>;
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Clone + 'static> StateValue for RefCell<T> {
    fn fork(&self) -> Rc<dyn StateValue> {
        Rc::new(RefCell::new(self.borrow().clone()))
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// Handle to the value held in one component node's state slot.
///
/// Clones of the handle observe the same value. The next render works on
/// its own copy, so writes through a handle from an earlier render do not
/// reach later ones.
pub struct Owned<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Clone for Owned<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Owned<T> {
    pub(crate) fn from_rc(inner: Rc<RefCell<T>>) -> Self {
        Self { inner }
    }

    /// Run `f` with an immutable reference to the stored value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let borrow = self.inner.borrow();
        f(&borrow)
    }

    /// Run `f` with a mutable reference to the stored value.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut borrow = self.inner.borrow_mut();
        f(&mut borrow)
    }

    /// Replace the stored value entirely.
    pub fn replace(&self, new_value: T) -> T {
        self.inner.replace(new_value)
    }
}

impl<T: Clone> Owned<T> {
    pub fn get(&self) -> T {
        self.inner.borrow().clone()
    }
}
