// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed callback registries.
//!
//! A [`Signal`] has any number of independent subscribers. Emission walks a
//! snapshot of the subscriber list taken when emission starts:
//!
//! - a subscriber disconnected during emission is skipped if it has not run yet;
//! - a subscriber connected during emission first runs on the next emission;
//! - no subscriber runs twice for one emission.
//!
//! ```
//! use blendint_view::Signal;
//! use core::cell::Cell;
//! use std::rc::Rc;
//!
//! let clicked: Signal<u32> = Signal::new();
//! let total = Rc::new(Cell::new(0));
//! let sink = total.clone();
//! let sub = clicked.connect(move |n| sink.set(sink.get() + n));
//!
//! clicked.emit(&2);
//! clicked.emit(&3);
//! assert_eq!(total.get(), 5);
//!
//! assert!(clicked.disconnect(sub));
//! clicked.emit(&100);
//! assert_eq!(total.get(), 5);
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

/// Handle returned by [`Signal::connect`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Slot<T> = (Subscription, Rc<dyn Fn(&T)>);

struct Slots<T> {
    next: u64,
    slots: Vec<Slot<T>>,
}

/// A cloneable handle to a subscriber registry.
///
/// Clones share the same subscribers.
pub struct Signal<T> {
    inner: Rc<RefCell<Slots<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Slots {
                next: 0,
                slots: Vec::new(),
            })),
        }
    }
}

impl<T> core::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T> Signal<T> {
    /// Create a signal with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber.
    pub fn connect(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = Subscription(inner.next);
        inner.next += 1;
        inner.slots.push((id, Rc::new(f)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not connected.
    pub fn disconnect(&self, id: Subscription) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.slots.len();
        inner.slots.retain(|(s, _)| *s != id);
        before != inner.slots.len()
    }

    /// Returns `true` if `id` is still connected.
    pub fn is_connected(&self, id: Subscription) -> bool {
        self.inner.borrow().slots.iter().any(|(s, _)| *s == id)
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    /// Returns `true` when nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every subscriber with `value`.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Slot<T>> = self.inner.borrow().slots.clone();
        for (id, f) in snapshot {
            // The registry is not borrowed while `f` runs, so subscribers may
            // connect or disconnect freely.
            if self.is_connected(id) {
                f(value);
            }
        }
    }
}
