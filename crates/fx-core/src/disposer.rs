//! The `Disposable` capability.
//!
//! An idempotent teardown callable: the wrapped action runs exactly once
//! however many paths race to trigger it (manual call, forced-cleanup
//! timer, bulk teardown, a host invoking the node property). Clones share
//! the same underlying action.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone)]
pub struct Disposable {
    inner: Rc<Inner>,
}

struct Inner {
    disposed: Cell<bool>,
    action: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Disposable {
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                disposed: Cell::new(false),
                action: RefCell::new(Some(Box::new(action))),
            }),
        }
    }

    /// Run the teardown action. Subsequent calls are no-ops.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        if let Some(action) = self.inner.action.borrow_mut().take() {
            action();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposing_twice_runs_the_action_once() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let d = Disposable::new(move || c.set(c.get() + 1));
        assert!(!d.is_disposed());
        d.dispose();
        d.dispose();
        assert_eq!(count.get(), 1);
        assert!(d.is_disposed());
    }

    #[test]
    fn clones_share_disposal_state() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let d = Disposable::new(move || c.set(c.get() + 1));
        let d2 = d.clone();
        d2.dispose();
        d.dispose();
        assert_eq!(count.get(), 1);
        assert!(d.is_disposed() && d2.is_disposed());
    }

    #[test]
    fn reentrant_dispose_from_inside_the_action_is_safe() {
        let slot: Rc<RefCell<Option<Disposable>>> = Rc::new(RefCell::new(None));
        let slot_inner = slot.clone();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let d = Disposable::new(move || {
            c.set(c.get() + 1);
            if let Some(inner) = slot_inner.borrow().as_ref() {
                inner.dispose();
            }
        });
        *slot.borrow_mut() = Some(d.clone());
        d.dispose();
        assert_eq!(count.get(), 1);
    }
}
