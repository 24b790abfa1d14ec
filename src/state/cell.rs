//! Shared mutable state handles.
//!
//! DESIGN
//! ======
//! Stores and feeds are written against [`StateCell`] rather than a concrete
//! signal type. In the browser the cell is a Leptos `RwSignal`, which stops
//! accepting writes once its owner is disposed; tests use `Rc<RefCell<_>>`.
//! A `None` return means the owner is gone and the caller should drop its
//! result.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::{RwSignal, Update, WithUntracked};

/// Read/write access to a piece of state that may outlive its owner.
pub trait StateCell<T> {
    /// Mutate the state in one step. Returns `None` if the state is gone.
    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R>;

    /// Read the state. Returns `None` if the state is gone.
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R>;
}

impl<T> StateCell<T> for Rc<RefCell<T>> {
    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }

    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        Some(f(&self.borrow()))
    }
}

impl<T: Send + Sync + 'static> StateCell<T> for RwSignal<T> {
    fn update_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.try_update(f)
    }

    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.try_with_untracked(f)
    }
}
